use crate::graph::{Graph, Node};
use crate::measure::TextMetrics;
use std::collections::HashMap;

/// Separation values are given in inches (Graphviz convention) and scaled
/// to pixels at render time.
pub const PX_PER_INCH: f64 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDir {
    TopToBottom,
    LeftToRight,
}

/// Spacing/orientation parameters for a single render. Immutable; affects
/// only node placement, never node or edge identity.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub node_sep: f64,
    pub rank_sep: f64,
    pub rank_dir: RankDir,
}

impl LayoutConfig {
    pub fn new(node_sep: f64, rank_sep: f64, rank_dir: RankDir) -> Self {
        debug_assert!(node_sep > 0.0 && rank_sep > 0.0);
        Self {
            node_sep,
            rank_sep,
            rank_dir,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct LayoutEdge {
    pub from: String,
    pub to: String,
    /// Orthogonal path points (start, turns, end), in render coordinates.
    pub waypoints: Vec<(f64, f64)>,
    pub is_self_loop: bool,
    pub edge_index: usize,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub width: f64,
    pub height: f64,
}

/// Node placement in rank-relative coordinates: `major` advances with the
/// rank direction, `cross` runs across a rank.
#[derive(Debug, Clone, Copy)]
struct Placed {
    major: f64,
    cross: f64,
    major_size: f64,
    cross_size: f64,
}

pub struct LayoutEngine {
    metrics: TextMetrics,
    config: LayoutConfig,
    margin: f64,
    anchor_spacing: f64,
    lane_spacing: f64,
    loop_offset: f64,
    corridor_margin: f64,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            metrics: TextMetrics::default(),
            config,
            margin: 40.0,
            anchor_spacing: 18.0,
            lane_spacing: 10.0,
            loop_offset: 25.0,
            corridor_margin: 30.0,
        }
    }

    pub fn layout(&self, graph: &Graph) -> Layout {
        let ranks = assign_ranks(graph);
        let max_rank = ranks.values().copied().max().unwrap_or(0);

        let mut by_rank: Vec<Vec<&Node>> = vec![Vec::new(); max_rank + 1];
        for node in &graph.nodes {
            by_rank[*ranks.get(node.id.as_str()).unwrap_or(&0)].push(node);
        }

        let node_sep = self.config.node_sep * PX_PER_INCH;
        let rank_sep = self.config.rank_sep * PX_PER_INCH;

        // Place nodes rank by rank, preserving insertion order within a rank.
        let mut placed: HashMap<&str, Placed> = HashMap::new();
        // Center of the routing channel after each rank.
        let mut channel_major: Vec<f64> = Vec::with_capacity(by_rank.len());
        let mut major = self.margin;

        for nodes_in_rank in &by_rank {
            let mut cross = self.margin;
            let mut max_major_size: f64 = 0.0;

            for node in nodes_in_rank {
                let field_labels: Vec<String> =
                    node.fields.iter().map(|f| f.label.clone()).collect();
                let (w, h) = self.metrics.node_size(&node.label, &field_labels);
                let (major_size, cross_size) = match self.config.rank_dir {
                    RankDir::TopToBottom => (h, w),
                    RankDir::LeftToRight => (w, h),
                };
                placed.insert(
                    node.id.as_str(),
                    Placed {
                        major,
                        cross,
                        major_size,
                        cross_size,
                    },
                );
                cross += cross_size + node_sep;
                max_major_size = max_major_size.max(major_size);
            }

            channel_major.push(major + max_major_size + rank_sep / 2.0);
            major += max_major_size + rank_sep;
        }

        // Distribute anchors: edges leaving a node on the same side get
        // evenly spaced attachment points so parallel edges stay apart.
        // Key: (node id, attaches on the major+ side).
        let mut anchor_groups: HashMap<(&str, bool), Vec<usize>> = HashMap::new();
        // Lane assignment per routing channel, so edges sharing a channel
        // run on distinct tracks. Key: channel index.
        let mut channel_lanes: HashMap<usize, Vec<usize>> = HashMap::new();
        // Corridor lanes for edges spanning more than one channel.
        let mut corridor_lanes: HashMap<(usize, usize), Vec<usize>> = HashMap::new();

        for (idx, edge) in graph.edges.iter().enumerate() {
            if edge.from == edge.to {
                continue;
            }
            let rf = *ranks.get(edge.from.as_str()).unwrap_or(&0);
            let rt = *ranks.get(edge.to.as_str()).unwrap_or(&0);

            if rf == rt {
                anchor_groups.entry((edge.from.as_str(), true)).or_default().push(idx);
                anchor_groups.entry((edge.to.as_str(), true)).or_default().push(idx);
                channel_lanes.entry(rf).or_default().push(idx);
            } else {
                let down = rt > rf;
                anchor_groups.entry((edge.from.as_str(), down)).or_default().push(idx);
                anchor_groups.entry((edge.to.as_str(), !down)).or_default().push(idx);
                let (lo, hi) = (rf.min(rt), rf.max(rt));
                for ch in lo..hi {
                    channel_lanes.entry(ch).or_default().push(idx);
                }
                if hi - lo > 1 {
                    corridor_lanes.entry((lo, hi)).or_default().push(idx);
                }
            }
        }

        let anchor_cross = |node: &Placed, group: Option<&Vec<usize>>, idx: usize| -> f64 {
            let center = node.cross + node.cross_size / 2.0;
            match group {
                Some(edges) if edges.len() > 1 => {
                    let pos = edges.iter().position(|&i| i == idx).unwrap_or(0);
                    center
                        + (pos as f64 - (edges.len() - 1) as f64 / 2.0) * self.anchor_spacing
                }
                _ => center,
            }
        };

        let lane_offset = |lanes: Option<&Vec<usize>>, idx: usize| -> f64 {
            match lanes {
                Some(edges) if edges.len() > 1 => {
                    let pos = edges.iter().position(|&i| i == idx).unwrap_or(0);
                    (pos as f64 - (edges.len() - 1) as f64 / 2.0) * self.lane_spacing
                }
                _ => 0.0,
            }
        };

        let layout_edges: Vec<LayoutEdge> = graph
            .edges
            .iter()
            .enumerate()
            .filter_map(|(idx, edge)| {
                let from = placed.get(edge.from.as_str())?;
                let to = placed.get(edge.to.as_str())?;

                if edge.from == edge.to {
                    // Loop on the cross+ side of the node.
                    let edge_cross = from.cross + from.cross_size;
                    let pts = vec![
                        (edge_cross, from.major + from.major_size * 0.3),
                        (edge_cross + self.loop_offset, from.major + from.major_size * 0.3),
                        (edge_cross + self.loop_offset, from.major + from.major_size * 0.7),
                        (edge_cross, from.major + from.major_size * 0.7),
                    ];
                    return Some(LayoutEdge {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        waypoints: self.to_render_coords(pts),
                        is_self_loop: true,
                        edge_index: idx,
                    });
                }

                let rf = *ranks.get(edge.from.as_str()).unwrap_or(&0);
                let rt = *ranks.get(edge.to.as_str()).unwrap_or(&0);

                let pts = if rf == rt {
                    let fa = anchor_cross(from, anchor_groups.get(&(edge.from.as_str(), true)), idx);
                    let ta = anchor_cross(to, anchor_groups.get(&(edge.to.as_str(), true)), idx);
                    let ch = channel_major[rf] + lane_offset(channel_lanes.get(&rf), idx);
                    vec![
                        (fa, from.major + from.major_size),
                        (fa, ch),
                        (ta, ch),
                        (ta, to.major + to.major_size),
                    ]
                } else {
                    let down = rt > rf;
                    let fa = anchor_cross(from, anchor_groups.get(&(edge.from.as_str(), down)), idx);
                    let ta = anchor_cross(to, anchor_groups.get(&(edge.to.as_str(), !down)), idx);
                    let (lo, hi) = (rf.min(rt), rf.max(rt));

                    let from_exit = if down { from.major + from.major_size } else { from.major };
                    let to_entry = if down { to.major } else { to.major + to.major_size };

                    if hi - lo == 1 {
                        if (fa - ta).abs() < 1.0 {
                            // Straight shot, no horizontal run needed.
                            vec![(fa, from_exit), (ta, to_entry)]
                        } else {
                            let ch = channel_major[lo] + lane_offset(channel_lanes.get(&lo), idx);
                            vec![(fa, from_exit), (fa, ch), (ta, ch), (ta, to_entry)]
                        }
                    } else {
                        // Multi-rank edge: detour through a corridor past the
                        // intermediate ranks' cross extent.
                        let first_ch = if down { rf } else { rf - 1 };
                        let last_ch = if down { rt - 1 } else { rt };
                        let ch_first = channel_major[first_ch]
                            + lane_offset(channel_lanes.get(&first_ch), idx);
                        let ch_last = channel_major[last_ch]
                            + lane_offset(channel_lanes.get(&last_ch), idx);

                        let mut corridor = self.margin;
                        for rank_nodes in by_rank.iter().take(hi).skip(lo + 1) {
                            for node in rank_nodes {
                                if let Some(p) = placed.get(node.id.as_str()) {
                                    corridor = corridor.max(p.cross + p.cross_size);
                                }
                            }
                        }
                        let corridor_pos = corridor_lanes
                            .get(&(lo, hi))
                            .and_then(|edges| edges.iter().position(|&i| i == idx))
                            .unwrap_or(0);
                        corridor += self.corridor_margin + corridor_pos as f64 * self.lane_spacing;

                        vec![
                            (fa, from_exit),
                            (fa, ch_first),
                            (corridor, ch_first),
                            (corridor, ch_last),
                            (ta, ch_last),
                            (ta, to_entry),
                        ]
                    }
                };

                Some(LayoutEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    waypoints: self.to_render_coords(pts),
                    is_self_loop: false,
                    edge_index: idx,
                })
            })
            .collect();

        let layout_nodes: Vec<LayoutNode> = graph
            .nodes
            .iter()
            .filter_map(|node| {
                let p = placed.get(node.id.as_str())?;
                let (x, y, width, height) = match self.config.rank_dir {
                    RankDir::TopToBottom => (p.cross, p.major, p.cross_size, p.major_size),
                    RankDir::LeftToRight => (p.major, p.cross, p.major_size, p.cross_size),
                };
                Some(LayoutNode {
                    id: node.id.clone(),
                    x,
                    y,
                    width,
                    height,
                })
            })
            .collect();

        let mut max_x: f64 = 0.0;
        let mut max_y: f64 = 0.0;
        for n in &layout_nodes {
            max_x = max_x.max(n.x + n.width);
            max_y = max_y.max(n.y + n.height);
        }
        for e in &layout_edges {
            for &(x, y) in &e.waypoints {
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }

        Layout {
            nodes: layout_nodes,
            edges: layout_edges,
            width: max_x + self.margin,
            height: max_y + self.margin,
        }
    }

    fn to_render_coords(&self, pts: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
        match self.config.rank_dir {
            RankDir::TopToBottom => pts,
            RankDir::LeftToRight => pts.into_iter().map(|(cross, major)| (major, cross)).collect(),
        }
    }
}

/// Longest-path ranking over FK edges: every edge pushes its target at
/// least one rank past its source. Self-loops are ignored; the iteration
/// cap keeps cyclic schemas from spinning.
fn assign_ranks(graph: &Graph) -> HashMap<&str, usize> {
    let mut ranks: HashMap<&str, usize> =
        graph.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();

    for _ in 0..graph.nodes.len() {
        let mut changed = false;
        for edge in &graph.edges {
            if edge.from == edge.to {
                continue;
            }
            let from_rank = *ranks.get(edge.from.as_str()).unwrap_or(&0);
            let to_rank = *ranks.get(edge.to.as_str()).unwrap_or(&0);
            if to_rank < from_rank + 1 {
                if let Some(r) = ranks.get_mut(edge.to.as_str()) {
                    *r = from_rank + 1;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::introspect::introspect;
    use crate::schema::social_schema;

    fn social_graph() -> Graph {
        let schema = social_schema();
        let (tables, fks) = introspect(&schema);
        build_graph(&tables, &fks)
    }

    #[test]
    fn test_ranks_follow_fk_direction() {
        let graph = social_graph();
        let ranks = assign_ranks(&graph);
        // media -> post -> user forms a chain, so each is strictly deeper.
        assert!(ranks["post"] > ranks["media"]);
        assert!(ranks["user"] > ranks["post"]);
    }

    #[test]
    fn test_layout_counts_are_config_independent() {
        let graph = social_graph();
        let compact = LayoutEngine::new(LayoutConfig::new(0.25, 0.5, RankDir::TopToBottom));
        let symmetric = LayoutEngine::new(LayoutConfig::new(1.2, 1.0, RankDir::LeftToRight));

        let a = compact.layout(&graph);
        let b = symmetric.layout(&graph);
        assert_eq!(a.nodes.len(), b.nodes.len());
        assert_eq!(a.edges.len(), b.edges.len());
        assert_eq!(a.nodes.len(), graph.nodes.len());
        assert_eq!(a.edges.len(), graph.edges.len());
    }

    #[test]
    fn test_node_sep_changes_spacing() {
        let graph = social_graph();
        let tight = LayoutEngine::new(LayoutConfig::new(0.25, 0.5, RankDir::TopToBottom));
        let loose = LayoutEngine::new(LayoutConfig::new(1.0, 0.5, RankDir::TopToBottom));

        let a = tight.layout(&graph);
        let b = loose.layout(&graph);
        assert!(b.width > a.width);
    }

    #[test]
    fn test_rank_dir_swaps_axes() {
        let graph = social_graph();
        let tb = LayoutEngine::new(LayoutConfig::new(0.5, 1.0, RankDir::TopToBottom))
            .layout(&graph);
        let lr = LayoutEngine::new(LayoutConfig::new(0.5, 1.0, RankDir::LeftToRight))
            .layout(&graph);

        let pick = |l: &Layout, id: &str| {
            let n = l.nodes.iter().find(|n| n.id == id).unwrap();
            (n.x, n.y)
        };
        // media -> post -> user: ranks advance down in TB, right in LR.
        let (_, media_y) = pick(&tb, "media");
        let (_, user_y) = pick(&tb, "user");
        assert!(user_y > media_y);

        let (media_x, _) = pick(&lr, "media");
        let (user_x, _) = pick(&lr, "user");
        assert!(user_x > media_x);
    }

    #[test]
    fn test_self_loop_layouted() {
        let graph = social_graph();
        let layout = LayoutEngine::new(LayoutConfig::new(1.0, 1.2, RankDir::TopToBottom))
            .layout(&graph);

        let loops: Vec<&LayoutEdge> = layout.edges.iter().filter(|e| e.is_self_loop).collect();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].from, "comment");
        assert_eq!(loops[0].waypoints.len(), 4);
    }

    #[test]
    fn test_parallel_edges_get_distinct_anchors() {
        let graph = social_graph();
        let layout = LayoutEngine::new(LayoutConfig::new(1.0, 1.2, RankDir::TopToBottom))
            .layout(&graph);

        let follow_user: Vec<&LayoutEdge> = layout
            .edges
            .iter()
            .filter(|e| e.from == "follow" && e.to == "user")
            .collect();
        assert_eq!(follow_user.len(), 2);
        assert_ne!(follow_user[0].waypoints[0], follow_user[1].waypoints[0]);
    }
}
