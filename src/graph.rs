use crate::introspect::{FieldInfo, FkInfo, TableInfo};

/// Labeled directed graph derived from schema metadata. Nodes are tables
/// with their field rows; edges are FK references in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub fields: Vec<FieldInfo>,
}

/// Edge endpoints are node ids, not ownership links. Self-loops and
/// parallel edges are preserved as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// One node per table, one edge per FK reference. Pure and deterministic:
/// identical input yields identical node/edge insertion order.
pub fn build_graph(tables: &[TableInfo], edges: &[FkInfo]) -> Graph {
    let nodes = tables
        .iter()
        .map(|t| Node {
            id: t.name.clone(),
            label: t.name.clone(),
            fields: t.fields.clone(),
        })
        .collect();

    let edges = edges
        .iter()
        .map(|fk| Edge {
            from: fk.from.clone(),
            to: fk.to.clone(),
        })
        .collect();

    Graph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::introspect;
    use crate::schema::social_schema;

    #[test]
    fn test_build_graph_cardinality() {
        let schema = social_schema();
        let (tables, fks) = introspect(&schema);
        let graph = build_graph(&tables, &fks);

        assert_eq!(graph.nodes.len(), tables.len());
        assert_eq!(graph.edges.len(), fks.len());
    }

    #[test]
    fn test_self_loop_round_trips() {
        let schema = social_schema();
        let (tables, fks) = introspect(&schema);
        let graph = build_graph(&tables, &fks);

        let loops: Vec<&Edge> = graph.edges.iter().filter(|e| e.from == e.to).collect();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].from, "comment");
    }

    #[test]
    fn test_idempotent_construction() {
        let schema = social_schema();
        let (t1, e1) = introspect(&schema);
        let (t2, e2) = introspect(&schema);
        assert_eq!(build_graph(&t1, &e1), build_graph(&t2, &e2));
    }

    #[test]
    fn test_node_body_preserves_field_order() {
        let schema = social_schema();
        let (tables, fks) = introspect(&schema);
        let graph = build_graph(&tables, &fks);

        let user = graph.node("user").unwrap();
        assert_eq!(user.fields[0].label, "id (PK)");
        assert_eq!(user.fields[1].label, "username");
    }
}
