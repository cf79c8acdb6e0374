use crate::schema::{Column, ColumnModifier, ColumnType, SchemaMetadata, Table};
use std::fmt::Write;

/// Serialize the schema as a SQL DDL dump, one `CREATE TABLE` per table in
/// declaration order. Identifiers are quoted; `like`, `order` and friends
/// collide with SQL keywords otherwise.
pub fn ddl_dump(schema: &SchemaMetadata) -> String {
    let mut out = String::new();
    for table in &schema.tables {
        write_table(&mut out, table);
        out.push('\n');
    }
    out
}

fn write_table(out: &mut String, table: &Table) {
    writeln!(out, "CREATE TABLE \"{}\" (", table.name).unwrap();

    let mut lines: Vec<String> = table.columns.iter().map(column_sql).collect();

    let pk_columns: Vec<&str> = table
        .columns
        .iter()
        .filter(|c| c.is_primary_key())
        .map(|c| c.name.as_str())
        .collect();
    if !pk_columns.is_empty() {
        lines.push(format!("  PRIMARY KEY (\"{}\")", pk_columns.join("\", \"")));
    }

    for col in &table.columns {
        for (target, target_col) in col.foreign_keys() {
            lines.push(format!(
                "  FOREIGN KEY (\"{}\") REFERENCES \"{}\" (\"{}\")",
                col.name, target, target_col
            ));
        }
    }

    writeln!(out, "{}", lines.join(",\n")).unwrap();
    writeln!(out, ");").unwrap();
}

fn column_sql(col: &Column) -> String {
    let mut sql = format!("  \"{}\" {}", col.name, type_sql(&col.typ));
    for modifier in &col.modifiers {
        match modifier {
            ColumnModifier::NotNull => sql.push_str(" NOT NULL"),
            ColumnModifier::Unique => sql.push_str(" UNIQUE"),
            ColumnModifier::Default(value) => {
                sql.push_str(" DEFAULT ");
                sql.push_str(value);
            }
            ColumnModifier::Pk | ColumnModifier::Fk { .. } => {}
        }
    }
    sql
}

fn type_sql(typ: &ColumnType) -> String {
    match typ {
        ColumnType::Integer => "INTEGER".to_string(),
        ColumnType::Varchar(n) => format!("VARCHAR({})", n),
        ColumnType::Text => "TEXT".to_string(),
        ColumnType::Boolean => "BOOLEAN".to_string(),
        ColumnType::DateTime => "DATETIME".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::social_schema;

    #[test]
    fn test_dump_contains_all_tables() {
        let dump = ddl_dump(&social_schema());
        for name in ["user", "post", "media", "comment", "like", "follow"] {
            assert!(dump.contains(&format!("CREATE TABLE \"{}\"", name)));
        }
    }

    #[test]
    fn test_foreign_key_clauses() {
        let dump = ddl_dump(&social_schema());
        assert!(dump.contains(r#"FOREIGN KEY ("user_id") REFERENCES "user" ("id")"#));
        assert!(dump.contains(r#"FOREIGN KEY ("parent_id") REFERENCES "comment" ("id")"#));
        assert!(dump.contains(r#"FOREIGN KEY ("follower_id") REFERENCES "user" ("id")"#));
        assert!(dump.contains(r#"FOREIGN KEY ("followed_id") REFERENCES "user" ("id")"#));
    }

    #[test]
    fn test_column_modifiers() {
        let dump = ddl_dump(&social_schema());
        assert!(dump.contains(r#""username" VARCHAR(50) UNIQUE NOT NULL"#));
        assert!(dump.contains(r#""is_private" BOOLEAN DEFAULT FALSE"#));
        assert!(dump.contains(r#"PRIMARY KEY ("id")"#));
    }
}
