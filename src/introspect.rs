use crate::schema::SchemaMetadata;

pub const PK_MARKER: &str = " (PK)";

#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub fields: Vec<FieldInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Column name, suffixed with the PK marker for primary-key members.
    pub label: String,
    pub primary_key: bool,
}

/// One foreign-key reference, resolved at column level: a column carrying
/// multiple FK references yields one `FkInfo` each.
#[derive(Debug, Clone, PartialEq)]
pub struct FkInfo {
    pub from: String,
    pub to: String,
}

/// Walk the schema metadata into a normalized table list plus the FK edge
/// list. Tables and columns keep their declared order; no deduplication.
pub fn introspect(schema: &SchemaMetadata) -> (Vec<TableInfo>, Vec<FkInfo>) {
    let tables: Vec<TableInfo> = schema
        .tables
        .iter()
        .map(|table| {
            let fields = table
                .columns
                .iter()
                .map(|col| {
                    let primary_key = col.is_primary_key();
                    let label = if primary_key {
                        format!("{}{}", col.name, PK_MARKER)
                    } else {
                        col.name.clone()
                    };
                    FieldInfo { label, primary_key }
                })
                .collect();
            TableInfo {
                name: table.name.clone(),
                fields,
            }
        })
        .collect();

    let edges: Vec<FkInfo> = schema
        .tables
        .iter()
        .flat_map(|table| {
            table.columns.iter().flat_map(move |col| {
                col.foreign_keys().map(move |(target, _column)| FkInfo {
                    from: table.name.clone(),
                    to: target.to_string(),
                })
            })
        })
        .collect();

    (tables, edges)
}
