//! Stream query planning

use super::ExtractOptions;
use crate::catalog::CatalogEntry;
use crate::engine::TableQuery;
use crate::error::{Error, Result};

/// Plan the base read for one stream.
///
/// Validation happens here, before anything touches the source: pagination
/// without a replication key is a configuration error (offset windows need a
/// stable order or they can skip or repeat rows under concurrent writes), and
/// a declared replication key must be one of the catalog's columns.
pub fn plan_stream_query(entry: &CatalogEntry, options: &ExtractOptions) -> Result<TableQuery> {
    let columns = entry.column_names();

    if options.paginate && entry.replication_key.is_none() {
        return Err(Error::config(format!(
            "pagination requested for stream '{}' but no replication key is set",
            entry.tap_stream_id
        )));
    }

    if let Some(key) = &entry.replication_key {
        if !columns.iter().any(|c| c == key) {
            return Err(Error::config(format!(
                "replication key '{key}' is not a column of stream '{}'",
                entry.tap_stream_id
            )));
        }
    }

    let mut query = TableQuery::new(entry.fully_qualified_name(), columns);

    if let Some(key) = &entry.replication_key {
        if let Some(bookmark) = &options.bookmark {
            // Inclusive: the bookmark records the last-seen value, which may
            // have tied rows not yet all emitted.
            query.lower_bound = Some((key.clone(), bookmark.clone()));
        }
        query.order_by = Some(key.clone());
    }

    if !options.paginate {
        // One extra row so exceeding the ceiling is detectable rather than a
        // silent truncation.
        query.limit = options.max_records.map(|limit| limit.saturating_add(1));
    }

    Ok(query)
}
