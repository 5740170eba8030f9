//! Record extraction module
//!
//! Given one catalog entry, the extractor plans a read query - full scan, or
//! ordered/bookmarked/paginated incremental scan - and yields rows lazily as
//! plain name-to-value maps. Values pass through exactly as the engine
//! returns them.
//!
//! # Overview
//!
//! The extract module provides:
//! - `ExtractOptions` - per-stream read options derived from the config
//! - `plan_stream_query` - validated query planning
//! - `RecordReader` - lazy row iterator with bookmark tracking

mod query;
mod reader;

pub use query::plan_stream_query;
pub use reader::RecordReader;


use crate::config::{AthenaConfig, DEFAULT_BATCH_SIZE};
use crate::types::JsonValue;

/// Options governing one stream extraction
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Incoming bookmark: highest replication-key value already extracted
    pub bookmark: Option<JsonValue>,
    /// Whether to read in OFFSET/LIMIT windows
    pub paginate: bool,
    /// Page size for paginated reads
    pub batch_size: u64,
    /// Hard record-count ceiling (safety/testing)
    pub max_records: Option<u64>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            bookmark: None,
            paginate: false,
            batch_size: DEFAULT_BATCH_SIZE,
            max_records: None,
        }
    }
}

impl ExtractOptions {
    /// Derive the options from the tap config
    pub fn from_config(config: &AthenaConfig) -> Self {
        Self {
            bookmark: None,
            paginate: config.paginate,
            batch_size: config.paginate_batch_size,
            max_records: config.max_records,
        }
    }

    /// Set the incoming bookmark
    #[must_use]
    pub fn with_bookmark(mut self, bookmark: Option<JsonValue>) -> Self {
        self.bookmark = bookmark;
        self
    }
}
