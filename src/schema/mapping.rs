//! Native type name to portable type mapping
//!
//! The mapping is an ordered list of substring patterns. Order matters:
//! earlier entries win, so the date/time patterns must precede "int" and
//! "number" for a name like "epoch_timestamp_int" to resolve as a datetime.
//! Unrecognized names never fail - they fall over to the string type.

use super::types::PortableType;
use once_cell::sync::Lazy;

/// The default pattern table, highest priority first.
static DEFAULT_PATTERNS: Lazy<Vec<(&'static str, PortableType)>> = Lazy::new(|| {
    vec![
        ("timestamp", PortableType::DateTime),
        ("datetime", PortableType::DateTime),
        ("date", PortableType::DateTime),
        ("int", PortableType::Integer),
        ("number", PortableType::Number),
        ("decimal", PortableType::Number),
        ("double", PortableType::Number),
        ("float", PortableType::Number),
        ("string", PortableType::String),
        ("text", PortableType::String),
        ("char", PortableType::String),
        ("bool", PortableType::Boolean),
        ("variant", PortableType::String),
    ]
});

/// Generic type class tag, for sources that report a value class instead of
/// a native type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeClass {
    Integer,
    Float,
    Text,
}

/// Ordered native-type-name to portable-type mapping.
///
/// New source engines keep growing new type names, so the table is an
/// editable ordered list rather than a fixed enum of patterns.
#[derive(Debug, Clone)]
pub struct TypeMap {
    patterns: Vec<(String, PortableType)>,
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMap {
    /// Create a mapping with the default pattern table
    pub fn new() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS
                .iter()
                .map(|(pattern, portable)| ((*pattern).to_string(), *portable))
                .collect(),
        }
    }

    /// Create an empty mapping (everything falls over to string)
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Append a pattern at the lowest priority
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>, portable: PortableType) -> Self {
        self.patterns.push((pattern.into(), portable));
        self
    }

    /// Insert a pattern at the given priority position
    pub fn insert_pattern(
        &mut self,
        index: usize,
        pattern: impl Into<String>,
        portable: PortableType,
    ) {
        let index = index.min(self.patterns.len());
        self.patterns.insert(index, (pattern.into(), portable));
    }

    /// The pattern table, highest priority first
    pub fn patterns(&self) -> &[(String, PortableType)] {
        &self.patterns
    }

    /// Map a source-reported native type name to a portable type.
    ///
    /// Returns the portable type of the first pattern whose substring appears
    /// (case-insensitively) anywhere in the name; string if none match.
    pub fn map(&self, native_type: &str) -> PortableType {
        let lowered = native_type.to_lowercase();
        self.patterns
            .iter()
            .find(|(pattern, _)| lowered.contains(pattern.to_lowercase().as_str()))
            .map(|(_, portable)| *portable)
            .unwrap_or(PortableType::String)
    }

    /// Map a generic value class to a portable type
    pub fn map_class(&self, class: NativeClass) -> PortableType {
        match class {
            NativeClass::Integer => PortableType::Integer,
            NativeClass::Float => PortableType::Number,
            NativeClass::Text => PortableType::String,
        }
    }
}
