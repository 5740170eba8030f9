//! In-memory engine
//!
//! Backs unit and integration tests with a fully deterministic source.
//! Tables are plain row vectors; queries are interpreted directly instead of
//! going through SQL.

use super::{ColumnDef, SchemaInspector, SqlConnection, SqlEngine, TableQuery};
use crate::error::{Error, Result};
use crate::types::{compare_values, JsonValue, Row};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

/// One in-memory table (or view) with its reflection metadata
#[derive(Debug, Clone)]
pub struct MemoryTable {
    /// Schema the table lives in
    pub schema_name: String,
    /// Table name
    pub table_name: String,
    /// Whether this is a view
    pub is_view: bool,
    /// Column definitions, in ordinal order
    pub columns: Vec<ColumnDef>,
    /// Declared primary key, if any
    pub primary_key: Option<Vec<String>>,
    /// Unique index column sets
    pub unique_indexes: Vec<Vec<String>>,
    /// Table rows
    pub rows: Vec<Row>,
}

impl MemoryTable {
    /// Create an empty table
    pub fn new(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            is_view: false,
            columns: Vec::new(),
            primary_key: None,
            unique_indexes: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Create an empty view
    pub fn view(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        let mut table = Self::new(schema_name, table_name);
        table.is_view = true;
        table
    }

    /// Add a column definition
    #[must_use]
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        native_type: impl Into<String>,
        nullable: bool,
    ) -> Self {
        self.columns.push(ColumnDef::new(name, native_type, nullable));
        self
    }

    /// Declare the primary key
    #[must_use]
    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = Some(columns.iter().map(|c| (*c).to_string()).collect());
        self
    }

    /// Add a unique index
    #[must_use]
    pub fn with_unique_index(mut self, columns: &[&str]) -> Self {
        self.unique_indexes
            .push(columns.iter().map(|c| (*c).to_string()).collect());
        self
    }

    /// Add a row from a JSON object; non-object values are ignored
    #[must_use]
    pub fn with_row(mut self, row: JsonValue) -> Self {
        if let Some(object) = row.as_object() {
            self.rows.push(object.clone());
        }
        self
    }

    fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }
}

/// In-memory `SqlEngine`.
///
/// Tracks how many connections were opened and queries executed, which the
/// tests use to assert "no query before validation" behavior.
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    tables: Vec<MemoryTable>,
    views_supported: bool,
    connects: Arc<AtomicUsize>,
    queries: Arc<AtomicUsize>,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            views_supported: true,
            connects: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a table
    #[must_use]
    pub fn with_table(mut self, table: MemoryTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Make view enumeration report as unsupported
    #[must_use]
    pub fn without_view_support(mut self) -> Self {
        self.views_supported = false;
        self
    }

    /// Number of connections opened so far
    pub fn connect_count(&self) -> usize {
        self.connects.load(AtomicOrdering::SeqCst)
    }

    /// Number of queries executed so far, across all connections
    pub fn query_count(&self) -> usize {
        self.queries.load(AtomicOrdering::SeqCst)
    }
}

impl SqlEngine for MemoryEngine {
    fn connect(&self) -> Result<Box<dyn SqlConnection>> {
        self.connects.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Box::new(MemoryConnection {
            tables: self.tables.clone(),
            queries: Arc::clone(&self.queries),
        }))
    }

    fn inspector(&self) -> Result<Box<dyn SchemaInspector>> {
        Ok(Box::new(MemoryInspector {
            tables: self.tables.clone(),
            views_supported: self.views_supported,
        }))
    }
}

struct MemoryConnection {
    tables: Vec<MemoryTable>,
    queries: Arc<AtomicUsize>,
}

impl SqlConnection for MemoryConnection {
    fn select(&mut self, query: &TableQuery) -> Result<Vec<Row>> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);

        let table = self
            .tables
            .iter()
            .find(|t| t.qualified_name() == query.table)
            .ok_or_else(|| Error::query(format!("table not found: {}", query.table)))?;

        let mut rows: Vec<Row> = table
            .rows
            .iter()
            .filter(|row| match &query.lower_bound {
                Some((column, bound)) => {
                    let value = row.get(column).unwrap_or(&JsonValue::Null);
                    compare_values(value, bound) != std::cmp::Ordering::Less
                }
                None => true,
            })
            .cloned()
            .collect();

        if let Some(column) = &query.order_by {
            rows.sort_by(|a, b| {
                compare_values(
                    a.get(column).unwrap_or(&JsonValue::Null),
                    b.get(column).unwrap_or(&JsonValue::Null),
                )
            });
        }

        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(row, &query.columns))
            .collect())
    }
}

fn project(row: Row, columns: &[String]) -> Row {
    if columns.is_empty() {
        return row;
    }
    let mut projected = Row::new();
    for column in columns {
        projected.insert(
            column.clone(),
            row.get(column).cloned().unwrap_or(JsonValue::Null),
        );
    }
    projected
}

struct MemoryInspector {
    tables: Vec<MemoryTable>,
    views_supported: bool,
}

impl MemoryInspector {
    fn find(&self, schema: &str, table: &str) -> Result<&MemoryTable> {
        self.tables
            .iter()
            .find(|t| t.schema_name == schema && t.table_name == table)
            .ok_or_else(|| Error::query(format!("table not found: {schema}.{table}")))
    }
}

impl SchemaInspector for MemoryInspector {
    fn schema_names(&mut self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for table in &self.tables {
            if !names.contains(&table.schema_name) {
                names.push(table.schema_name.clone());
            }
        }
        Ok(names)
    }

    fn table_names(&mut self, schema: &str) -> Result<Vec<String>> {
        Ok(self
            .tables
            .iter()
            .filter(|t| t.schema_name == schema && !t.is_view)
            .map(|t| t.table_name.clone())
            .collect())
    }

    fn view_names(&mut self, schema: &str) -> Result<Vec<String>> {
        if !self.views_supported {
            return Err(Error::introspection("view enumeration"));
        }
        Ok(self
            .tables
            .iter()
            .filter(|t| t.schema_name == schema && t.is_view)
            .map(|t| t.table_name.clone())
            .collect())
    }

    fn primary_key(&mut self, schema: &str, table: &str) -> Result<Option<Vec<String>>> {
        Ok(self.find(schema, table)?.primary_key.clone())
    }

    fn unique_indexes(&mut self, schema: &str, table: &str) -> Result<Vec<Vec<String>>> {
        Ok(self.find(schema, table)?.unique_indexes.clone())
    }

    fn columns(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnDef>> {
        Ok(self.find(schema, table)?.columns.clone())
    }
}
