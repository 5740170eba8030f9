//! Lazy record reading

use super::query::plan_stream_query;
use super::ExtractOptions;
use crate::catalog::CatalogEntry;
use crate::engine::{SqlConnection, SqlEngine, TableQuery};
use crate::error::{Error, Result};
use crate::types::{compare_values, JsonValue, Row};
use std::cmp::Ordering;

/// Lazy, forward-only row iterator over one stream.
///
/// The connection is opened on the first row request and released when the
/// reader finishes, fails, or is dropped mid-iteration. While iterating it
/// tracks the highest replication-key value seen, which the caller uses to
/// advance the stream's bookmark.
pub struct RecordReader<'a> {
    engine: &'a dyn SqlEngine,
    stream: String,
    base_query: TableQuery,
    options: ExtractOptions,
    replication_key: Option<String>,
    conn: Option<Box<dyn SqlConnection>>,
    buffer: std::vec::IntoIter<Row>,
    offset: u64,
    yielded: u64,
    exhausted: bool,
    finished: bool,
    max_bookmark: Option<JsonValue>,
}

impl std::fmt::Debug for RecordReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordReader")
            .field("stream", &self.stream)
            .field("base_query", &self.base_query)
            .field("options", &self.options)
            .field("replication_key", &self.replication_key)
            .field("conn", &self.conn.as_ref().map(|_| "<connection>"))
            .field("offset", &self.offset)
            .field("yielded", &self.yielded)
            .field("exhausted", &self.exhausted)
            .field("finished", &self.finished)
            .field("max_bookmark", &self.max_bookmark)
            .finish()
    }
}

impl<'a> RecordReader<'a> {
    /// Plan and validate the read.
    ///
    /// Fails before any query executes on configuration errors, and rejects
    /// any non-empty partition context: single-table streams do not support
    /// partitioned extraction.
    pub fn new(
        entry: &CatalogEntry,
        engine: &'a dyn SqlEngine,
        options: ExtractOptions,
        partition: Option<&JsonValue>,
    ) -> Result<Self> {
        if let Some(partition) = partition {
            let empty =
                partition.is_null() || partition.as_object().is_some_and(|o| o.is_empty());
            if !empty {
                return Err(Error::unsupported(
                    &entry.tap_stream_id,
                    "partitioned extraction",
                ));
            }
        }

        let base_query = plan_stream_query(entry, &options)?;

        Ok(Self {
            engine,
            stream: entry.tap_stream_id.clone(),
            base_query,
            options,
            replication_key: entry.replication_key.clone(),
            conn: None,
            buffer: Vec::new().into_iter(),
            offset: 0,
            yielded: 0,
            exhausted: false,
            finished: false,
            max_bookmark: None,
        })
    }

    /// Highest replication-key value yielded so far
    pub fn max_bookmark(&self) -> Option<&JsonValue> {
        self.max_bookmark.as_ref()
    }

    /// Rows yielded so far
    pub fn records_read(&self) -> u64 {
        self.yielded
    }

    fn page_query(&self) -> TableQuery {
        let mut query = self.base_query.clone();
        if self.options.paginate {
            query.offset = Some(self.offset);
            query.limit = Some(self.options.batch_size);
        }
        query
    }

    fn fetch_page(&mut self) -> Result<()> {
        if self.conn.is_none() {
            self.conn = Some(self.engine.connect()?);
        }
        let query = self.page_query();
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| Error::connection("connection unavailable"))?;

        tracing::debug!("Executing query: {}", query.to_sql());
        let rows = conn.select(&query)?;

        if self.options.paginate {
            let fetched = rows.len() as u64;
            // Offsets accumulate across pages and never reset; a page shorter
            // than the batch size is the sole termination signal.
            self.offset += fetched;
            if fetched < self.options.batch_size {
                self.exhausted = true;
            }
        } else {
            self.exhausted = true;
        }

        self.buffer = rows.into_iter();
        Ok(())
    }

    fn track_bookmark(&mut self, row: &Row) {
        let Some(key) = &self.replication_key else {
            return;
        };
        let Some(value) = row.get(key) else {
            return;
        };
        if value.is_null() {
            return;
        }
        let greater = match &self.max_bookmark {
            Some(current) => compare_values(value, current) == Ordering::Greater,
            None => true,
        };
        if greater {
            self.max_bookmark = Some(value.clone());
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        // Release the connection on every exit path.
        self.conn = None;
    }
}

impl Iterator for RecordReader<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            if let Some(row) = self.buffer.next() {
                if let Some(limit) = self.options.max_records {
                    if self.yielded >= limit {
                        self.finish();
                        return Some(Err(Error::OverLimit {
                            stream: self.stream.clone(),
                            limit,
                        }));
                    }
                }
                self.yielded += 1;
                self.track_bookmark(&row);
                return Some(Ok(row));
            }

            if self.exhausted {
                self.finish();
                return None;
            }

            if let Err(e) = self.fetch_page() {
                self.finish();
                return Some(Err(e));
            }
        }
    }
}
