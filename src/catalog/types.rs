//! Catalog types

use crate::error::Result;
use crate::schema::TableSchema;
use crate::types::ReplicationMethod;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Delimiter for persisted stream identifiers.
///
/// Distinct from the dot used in runtime table references: the stream id is
/// an external identifier that outlives the sync, the dotted form is a
/// query-time reference. The two must never be conflated.
const STREAM_ID_DELIMITER: &str = "-";

/// Delimiter for runtime table references
const TABLE_REF_DELIMITER: &str = ".";

/// Derive the stable stream identifier for a table
pub fn stream_id(schema_name: &str, table_name: &str) -> String {
    qualified_name(schema_name, table_name, STREAM_ID_DELIMITER)
}

/// Join a schema-qualified name with the given delimiter
pub fn qualified_name(schema_name: &str, table_name: &str, delimiter: &str) -> String {
    if schema_name.is_empty() {
        table_name.to_string()
    } else {
        format!("{schema_name}{delimiter}{table_name}")
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Catalog
// ============================================================================

/// Discovered catalog: one entry per extractable table or view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Stream entries
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a stream by its identifier
    pub fn get_stream(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.tap_stream_id == tap_stream_id)
    }

    /// Streams selected for sync
    pub fn selected_streams(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.streams.iter().filter(|s| s.selected)
    }

    /// Parse a catalog from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Convert to pretty JSON
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

// ============================================================================
// Catalog Entry
// ============================================================================

/// One discoverable table or view.
///
/// Never mutated after creation; operator annotations (replication key,
/// selection) are applied to the persisted document between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable stream identifier (dash-delimited schema and table)
    pub tap_stream_id: String,

    /// Stream name, same as the identifier
    pub stream: String,

    /// Source table name
    pub table_name: String,

    /// Source schema name
    pub schema_name: String,

    /// Whether the source object is a view
    #[serde(default)]
    pub is_view: bool,

    /// Portable column schema
    pub schema: TableSchema,

    /// Key property columns (may be empty when the source declares no key)
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// Replication method; discovery always emits full-table
    #[serde(default)]
    pub replication_method: ReplicationMethod,

    /// Replication key column; must be set by an operator before
    /// incremental sync is possible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Whether the stream is selected for sync
    #[serde(default = "default_true")]
    pub selected: bool,
}

impl CatalogEntry {
    /// Create a full-table entry for a discovered object
    pub fn new(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        is_view: bool,
        schema: TableSchema,
    ) -> Self {
        let schema_name = schema_name.into();
        let table_name = table_name.into();
        let tap_stream_id = stream_id(&schema_name, &table_name);
        Self {
            stream: tap_stream_id.clone(),
            tap_stream_id,
            table_name,
            schema_name,
            is_view,
            schema,
            key_properties: Vec::new(),
            replication_method: ReplicationMethod::FullTable,
            replication_key: None,
            selected: true,
        }
    }

    /// Set the key properties
    #[must_use]
    pub fn with_key_properties(mut self, key_properties: Vec<String>) -> Self {
        self.key_properties = key_properties;
        self
    }

    /// Set the replication key and switch to incremental replication
    #[must_use]
    pub fn with_replication_key(mut self, key: impl Into<String>) -> Self {
        self.replication_key = Some(key.into());
        self.replication_method = ReplicationMethod::Incremental;
        self
    }

    /// Dot-delimited runtime table reference
    pub fn fully_qualified_name(&self) -> String {
        qualified_name(&self.schema_name, &self.table_name, TABLE_REF_DELIMITER)
    }

    /// Column names declared by the catalog schema
    pub fn column_names(&self) -> Vec<String> {
        self.schema.column_names()
    }
}
