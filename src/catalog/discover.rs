//! Reflection-driven catalog discovery

use super::types::{Catalog, CatalogEntry};
use crate::engine::SchemaInspector;
use crate::error::{Error, Result};
use crate::schema::{TableSchema, TypeMap};

/// Discover the catalog of extractable tables and views.
///
/// The schema filter is an exact-match allowlist, not a pattern. A source
/// that cannot enumerate views is treated as having none, and a table whose
/// introspection fails is skipped with a warning; neither aborts the pass.
pub fn discover(
    inspector: &mut dyn SchemaInspector,
    type_map: &TypeMap,
    schema_filter: Option<&[String]>,
) -> Result<Catalog> {
    let mut catalog = Catalog::new();

    for schema_name in inspector.schema_names()? {
        if let Some(filter) = schema_filter {
            if !filter.iter().any(|s| s == &schema_name) {
                continue;
            }
        }

        let table_names = inspector.table_names(&schema_name)?;
        let view_names = match inspector.view_names(&schema_name) {
            Ok(views) => views,
            Err(Error::IntrospectionUnsupported { operation }) => {
                tracing::warn!(
                    "Source does not support {operation}; stream list may be incomplete"
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let objects = table_names
            .into_iter()
            .map(|t| (t, false))
            .chain(view_names.into_iter().map(|v| (v, true)));

        for (table_name, is_view) in objects {
            match build_entry(inspector, type_map, &schema_name, &table_name, is_view) {
                Ok(entry) => catalog.streams.push(entry),
                Err(e) => {
                    tracing::warn!(
                        "Skipping {schema_name}.{table_name}: introspection failed: {e}"
                    );
                }
            }
        }
    }

    Ok(catalog)
}

fn build_entry(
    inspector: &mut dyn SchemaInspector,
    type_map: &TypeMap,
    schema_name: &str,
    table_name: &str,
    is_view: bool,
) -> Result<CatalogEntry> {
    // Primary key first, then the first unique index, else no key properties.
    let key_properties = match inspector.primary_key(schema_name, table_name)? {
        Some(pk) if !pk.is_empty() => pk,
        _ => inspector
            .unique_indexes(schema_name, table_name)?
            .into_iter()
            .next()
            .unwrap_or_default(),
    };

    let mut schema = TableSchema::new();
    for column in inspector.columns(schema_name, table_name)? {
        let mut property = type_map.map(&column.native_type).to_property();
        if column.nullable {
            property.make_nullable();
        } else {
            schema.add_required(&column.name);
        }
        schema.add_property(&column.name, property);
    }

    Ok(CatalogEntry::new(schema_name, table_name, is_view, schema)
        .with_key_properties(key_properties))
}
