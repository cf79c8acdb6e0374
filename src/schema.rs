/// Declarative schema metadata: a set of tables passed by value into the
/// introspector. There is no global registry; callers construct one
/// `SchemaMetadata` and hand out references.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaMetadata {
    /// Tables in declaration order. Order drives node emission order.
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub typ: ColumnType,
    pub modifiers: Vec<ColumnModifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Integer,
    Varchar(u32),
    Text,
    Boolean,
    DateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnModifier {
    Pk,
    NotNull,
    Unique,
    Default(String),
    /// Foreign key reference to `table.column`. A column may carry more than
    /// one; each reference induces its own edge.
    Fk { table: String, column: String },
}

impl SchemaMetadata {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl Table {
    pub fn new(name: &str, columns: Vec<Column>) -> Self {
        Self {
            name: name.to_string(),
            columns,
        }
    }
}

impl Column {
    pub fn new(name: &str, typ: ColumnType, modifiers: Vec<ColumnModifier>) -> Self {
        Self {
            name: name.to_string(),
            typ,
            modifiers,
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.modifiers.iter().any(|m| matches!(m, ColumnModifier::Pk))
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modifiers.iter().filter_map(|m| match m {
            ColumnModifier::Fk { table, column } => Some((table.as_str(), column.as_str())),
            _ => None,
        })
    }
}

fn fk(table: &str, column: &str) -> ColumnModifier {
    ColumnModifier::Fk {
        table: table.to_string(),
        column: column.to_string(),
    }
}

/// The social-app schema: users, posts, media, comments (threaded via a
/// nullable self-reference), likes, and follower/followed pairs.
pub fn social_schema() -> SchemaMetadata {
    use ColumnModifier::{Default as Def, NotNull, Pk, Unique};
    use ColumnType::*;

    SchemaMetadata::new(vec![
        Table::new(
            "user",
            vec![
                Column::new("id", Integer, vec![Pk]),
                Column::new("username", Varchar(50), vec![Unique, NotNull]),
                Column::new("email", Varchar(120), vec![Unique, NotNull]),
                Column::new("password", Varchar(128), vec![NotNull]),
                Column::new("full_name", Varchar(120), vec![]),
                Column::new("bio", Text, vec![]),
                Column::new("website", Varchar(200), vec![]),
                Column::new("is_private", Boolean, vec![Def("FALSE".into())]),
                Column::new("is_verified", Boolean, vec![Def("FALSE".into())]),
                Column::new("created_at", DateTime, vec![Def("CURRENT_TIMESTAMP".into())]),
            ],
        ),
        Table::new(
            "post",
            vec![
                Column::new("id", Integer, vec![Pk]),
                Column::new("user_id", Integer, vec![NotNull, fk("user", "id")]),
                Column::new("caption", Text, vec![]),
                Column::new("location", Varchar(200), vec![]),
                Column::new("created_at", DateTime, vec![Def("CURRENT_TIMESTAMP".into())]),
                Column::new("is_archived", Boolean, vec![Def("FALSE".into())]),
            ],
        ),
        Table::new(
            "media",
            vec![
                Column::new("id", Integer, vec![Pk]),
                Column::new("post_id", Integer, vec![NotNull, fk("post", "id")]),
                Column::new("media_type", Varchar(20), vec![]),
                Column::new("url", Varchar(300), vec![NotNull]),
                Column::new("order", Integer, vec![Def("0".into())]),
            ],
        ),
        Table::new(
            "comment",
            vec![
                Column::new("id", Integer, vec![Pk]),
                Column::new("post_id", Integer, vec![NotNull, fk("post", "id")]),
                Column::new("user_id", Integer, vec![NotNull, fk("user", "id")]),
                Column::new("content", Text, vec![NotNull]),
                Column::new("created_at", DateTime, vec![Def("CURRENT_TIMESTAMP".into())]),
                // Nullable parent reference: threaded replies form a
                // self-loop edge on this table.
                Column::new("parent_id", Integer, vec![fk("comment", "id")]),
            ],
        ),
        Table::new(
            "like",
            vec![
                Column::new("id", Integer, vec![Pk]),
                Column::new("user_id", Integer, vec![NotNull, fk("user", "id")]),
                Column::new("post_id", Integer, vec![NotNull, fk("post", "id")]),
                Column::new("created_at", DateTime, vec![Def("CURRENT_TIMESTAMP".into())]),
            ],
        ),
        Table::new(
            "follow",
            vec![
                Column::new("id", Integer, vec![Pk]),
                Column::new("follower_id", Integer, vec![NotNull, fk("user", "id")]),
                Column::new("followed_id", Integer, vec![NotNull, fk("user", "id")]),
                Column::new("created_at", DateTime, vec![Def("CURRENT_TIMESTAMP".into())]),
                Column::new("is_accepted", Boolean, vec![Def("TRUE".into())]),
            ],
        ),
    ])
}
