//! Engine query types

use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// A single table read, built by the extractor and executed by an engine.
///
/// Engines that speak SQL render it with [`TableQuery::to_sql`]; the
/// in-memory engine interprets the fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Fully-qualified, dot-delimited table reference (`schema.table`)
    pub table: String,

    /// Projection, restricted to the catalog's declared columns
    pub columns: Vec<String>,

    /// Inclusive lower bound on one column: `column >= value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<(String, JsonValue)>,

    /// Ascending ORDER BY column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    /// Maximum rows to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Rows to skip before returning any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl TableQuery {
    /// Create a plain full-projection query against a table
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            columns,
            lower_bound: None,
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    /// Render the query as Athena SQL.
    ///
    /// Athena (Trino) expects OFFSET before LIMIT.
    pub fn to_sql(&self) -> String {
        let projection = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!("SELECT {projection} FROM {}", self.table);

        if let Some((column, value)) = &self.lower_bound {
            sql.push_str(&format!(" WHERE {} >= {}", quote_ident(column), literal(value)));
        }
        if let Some(column) = &self.order_by {
            sql.push_str(&format!(" ORDER BY {}", quote_ident(column)));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        sql
    }
}

/// Double-quote an identifier, doubling embedded quotes
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Single-quote a string literal, doubling embedded quotes
pub(crate) fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render a JSON scalar as a SQL literal
pub(crate) fn literal(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(true) => "TRUE".to_string(),
        JsonValue::Bool(false) => "FALSE".to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => quote_string(s),
        other => quote_string(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_plain_select() {
        let query = TableQuery::new("demo.users", vec!["id".to_string(), "name".to_string()]);
        assert_eq!(query.to_sql(), r#"SELECT "id", "name" FROM demo.users"#);
    }

    #[test]
    fn test_empty_projection_selects_star() {
        let query = TableQuery::new("demo.users", Vec::new());
        assert_eq!(query.to_sql(), "SELECT * FROM demo.users");
    }

    #[test]
    fn test_bookmark_predicate_is_inclusive() {
        let mut query = TableQuery::new("demo.users", vec!["id".to_string()]);
        query.lower_bound = Some(("updated_at".to_string(), json!("2024-01-01T00:00:00")));
        query.order_by = Some("updated_at".to_string());

        assert_eq!(
            query.to_sql(),
            r#"SELECT "id" FROM demo.users WHERE "updated_at" >= '2024-01-01T00:00:00' ORDER BY "updated_at""#
        );
    }

    #[test]
    fn test_offset_renders_before_limit() {
        let mut query = TableQuery::new("demo.users", vec!["id".to_string()]);
        query.order_by = Some("id".to_string());
        query.offset = Some(20);
        query.limit = Some(10);

        assert_eq!(
            query.to_sql(),
            r#"SELECT "id" FROM demo.users ORDER BY "id" OFFSET 20 LIMIT 10"#
        );
    }

    #[test]
    fn test_literal_escaping() {
        assert_eq!(literal(&json!("o'brien")), "'o''brien'");
        assert_eq!(literal(&json!(42)), "42");
        assert_eq!(literal(&json!(1.5)), "1.5");
        assert_eq!(literal(&json!(true)), "TRUE");
        assert_eq!(literal(&json!(null)), "NULL");
    }

    #[test]
    fn test_ident_escaping() {
        assert_eq!(quote_ident("plain"), "\"plain\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
