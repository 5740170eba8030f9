//! Schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON Schema type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Null,
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Number => write!(f, "number"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::Boolean => write!(f, "boolean"),
            JsonType::Object => write!(f, "object"),
            JsonType::Null => write!(f, "null"),
        }
    }
}

/// JSON type can be a single type or array of types (for nullable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonTypeOrArray {
    Single(JsonType),
    Multiple(Vec<JsonType>),
}

impl JsonTypeOrArray {
    /// Create a single type
    pub fn single(t: JsonType) -> Self {
        JsonTypeOrArray::Single(t)
    }

    /// Create a nullable type
    pub fn nullable(t: JsonType) -> Self {
        if t == JsonType::Null {
            JsonTypeOrArray::Single(JsonType::Null)
        } else {
            JsonTypeOrArray::Multiple(vec![t, JsonType::Null])
        }
    }

    /// Check if this type is nullable
    pub fn is_nullable(&self) -> bool {
        match self {
            JsonTypeOrArray::Single(JsonType::Null) => true,
            JsonTypeOrArray::Multiple(types) => types.contains(&JsonType::Null),
            _ => false,
        }
    }

    /// Get the primary (non-null) type
    pub fn primary_type(&self) -> Option<&JsonType> {
        match self {
            JsonTypeOrArray::Single(t) => Some(t),
            JsonTypeOrArray::Multiple(types) => types.iter().find(|t| **t != JsonType::Null),
        }
    }
}

// ============================================================================
// Portable Types
// ============================================================================

/// The portable column types the tap emits.
///
/// Deliberately lossy: decimal/float/double all fold into `Number`, and any
/// native complexity the mapping does not recognize degrades to `String`
/// rather than failing discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortableType {
    DateTime,
    Integer,
    Number,
    String,
    Boolean,
}

impl PortableType {
    /// The JSON-schema type this portable type serializes as
    pub fn json_type(&self) -> JsonType {
        match self {
            PortableType::DateTime | PortableType::String => JsonType::String,
            PortableType::Integer => JsonType::Integer,
            PortableType::Number => JsonType::Number,
            PortableType::Boolean => JsonType::Boolean,
        }
    }

    /// The JSON-schema format hint, if any
    pub fn format(&self) -> Option<&'static str> {
        match self {
            PortableType::DateTime => Some("date-time"),
            _ => None,
        }
    }

    /// Build a schema property of this type
    pub fn to_property(self) -> SchemaProperty {
        let mut property = SchemaProperty::new(self.json_type());
        if let Some(format) = self.format() {
            property.format = Some(format.to_string());
        }
        property
    }
}

// ============================================================================
// Schema Property
// ============================================================================

/// JSON Schema property definition for a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Property type(s)
    #[serde(rename = "type")]
    pub json_type: JsonTypeOrArray,

    /// Format hint (e.g., "date-time")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl SchemaProperty {
    /// Create a new property with the given type
    pub fn new(json_type: JsonType) -> Self {
        Self {
            json_type: JsonTypeOrArray::single(json_type),
            format: None,
        }
    }

    /// Make this property nullable
    pub fn make_nullable(&mut self) {
        if !self.json_type.is_nullable() {
            if let JsonTypeOrArray::Single(t) = &self.json_type {
                self.json_type = JsonTypeOrArray::nullable(t.clone());
            }
        }
    }

    /// Check if nullable
    pub fn is_nullable(&self) -> bool {
        self.json_type.is_nullable()
    }
}

// ============================================================================
// Table Schema
// ============================================================================

/// JSON-schema shaped description of one table's columns.
///
/// Properties serialize in name order; rows are matched to columns by name
/// only, so the ordering carries no meaning beyond determinism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Schema type (always "object")
    #[serde(rename = "type")]
    pub json_type: JsonType,

    /// Column properties
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaProperty>,

    /// Required (non-nullable) columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSchema {
    /// Create a new empty table schema
    pub fn new() -> Self {
        Self {
            json_type: JsonType::Object,
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Add a column property
    pub fn add_property(&mut self, name: &str, property: SchemaProperty) {
        self.properties.insert(name.to_string(), property);
    }

    /// Mark a column as required
    pub fn add_required(&mut self, name: &str) {
        if !self.required.contains(&name.to_string()) {
            self.required.push(name.to_string());
        }
    }

    /// Check if a column is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(&name.to_string())
    }

    /// Get a column property
    pub fn get_property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.get(name)
    }

    /// Column names, in property order
    pub fn column_names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
