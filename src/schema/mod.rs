//! Portable schema module
//!
//! The tap describes source columns in a small portable type system that the
//! downstream catalog consumers understand: datetime, integer, number, string
//! and boolean. Source-native type names are folded into that system by an
//! ordered substring mapping.
//!
//! # Overview
//!
//! The schema module provides:
//! - `PortableType` - The five portable column types
//! - `TableSchema` / `SchemaProperty` - JSON-schema shaped table descriptions
//! - `TypeMap` - Ordered native-type-name to portable-type mapping

mod mapping;
mod types;

pub use mapping::{NativeClass, TypeMap};
pub use types::{JsonType, JsonTypeOrArray, PortableType, SchemaProperty, TableSchema};

#[cfg(test)]
mod tests;
