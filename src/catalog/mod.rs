//! Catalog module
//!
//! The catalog is the interchange document between discovery and sync: one
//! entry per extractable table or view, carrying the portable column schema,
//! key properties and replication settings. Entries are created by discovery,
//! persisted externally, and read back unchanged at sync time.
//!
//! # Overview
//!
//! The catalog module provides:
//! - `Catalog` / `CatalogEntry` - the interchange types
//! - `discover` - reflection-driven catalog construction
//! - `stream_id` / `qualified_name` - identifier derivation

mod discover;
mod types;

pub use discover::discover;
pub use types::{qualified_name, stream_id, Catalog, CatalogEntry};
