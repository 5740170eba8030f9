//! Schema inspection over `information_schema`
//!
//! Athena (and the Trino family generally) exposes its metadata through the
//! standard `information_schema` tables, so the inspector only needs a way to
//! run raw SQL and read string columns back.

use super::types::quote_string;
use super::{ColumnDef, SchemaInspector};
use crate::error::Result;
use crate::types::Row;

/// Raw SQL execution capability, used for introspection queries
pub trait RawSql {
    /// Execute a SQL statement and return all rows of the result
    fn run_sql(&mut self, sql: &str) -> Result<Vec<Row>>;
}

/// `SchemaInspector` over any connection that can run raw SQL
pub struct InformationSchemaInspector<C> {
    conn: C,
}

impl<C: RawSql> InformationSchemaInspector<C> {
    /// Wrap a raw-SQL connection
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    fn string_column(&mut self, sql: &str, column: &str) -> Result<Vec<String>> {
        let rows = self.conn.run_sql(sql)?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get(column).and_then(|v| v.as_str()).map(str::to_string))
            .collect())
    }
}

impl<C: RawSql> SchemaInspector for InformationSchemaInspector<C> {
    fn schema_names(&mut self) -> Result<Vec<String>> {
        self.string_column(
            "SELECT schema_name FROM information_schema.schemata ORDER BY schema_name",
            "schema_name",
        )
    }

    fn table_names(&mut self, schema: &str) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = {} AND table_type = 'BASE TABLE' ORDER BY table_name",
            quote_string(schema)
        );
        self.string_column(&sql, "table_name")
    }

    fn view_names(&mut self, schema: &str) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT table_name FROM information_schema.views \
             WHERE table_schema = {} ORDER BY table_name",
            quote_string(schema)
        );
        self.string_column(&sql, "table_name")
    }

    fn primary_key(&mut self, _schema: &str, _table: &str) -> Result<Option<Vec<String>>> {
        // Athena tables are external and carry no key constraints.
        Ok(None)
    }

    fn unique_indexes(&mut self, _schema: &str, _table: &str) -> Result<Vec<Vec<String>>> {
        // No indexes either; key properties must come from the operator.
        Ok(Vec::new())
    }

    fn columns(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnDef>> {
        let sql = format!(
            "SELECT column_name, data_type, is_nullable FROM information_schema.columns \
             WHERE table_schema = {} AND table_name = {} ORDER BY ordinal_position",
            quote_string(schema),
            quote_string(table)
        );
        let rows = self.conn.run_sql(&sql)?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let name = row.get("column_name")?.as_str()?;
                let native_type = row.get("data_type")?.as_str()?;
                let nullable = row
                    .get("is_nullable")
                    .and_then(|v| v.as_str())
                    .map(|v| v.eq_ignore_ascii_case("yes"))
                    .unwrap_or(true);
                Some(ColumnDef::new(name, native_type, nullable))
            })
            .collect())
    }
}
