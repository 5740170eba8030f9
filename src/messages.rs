//! Singer message envelope
//!
//! The tap talks to downstream consumers through discrete JSON lines:
//! a SCHEMA message before each stream's records, one RECORD message per
//! extracted row, and STATE messages carrying the bookmark document.

use crate::catalog::CatalogEntry;
use crate::error::Result;
use crate::state::State;
use crate::types::{JsonValue, Row};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Messages emitted during sync
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Stream schema, emitted before the stream's records
    #[serde(rename = "SCHEMA")]
    Schema {
        /// Stream identifier
        stream: String,
        /// Portable JSON schema of the stream
        schema: JsonValue,
        /// Key property columns
        key_properties: Vec<String>,
        /// Bookmark columns, when the stream replicates incrementally
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bookmark_properties: Option<Vec<String>>,
    },

    /// One extracted row
    #[serde(rename = "RECORD")]
    Record {
        /// Stream identifier
        stream: String,
        /// Row values, exactly as the engine returned them
        record: Row,
        /// Timestamp when the record was emitted
        time_extracted: DateTime<Utc>,
    },

    /// Bookmark checkpoint
    #[serde(rename = "STATE")]
    State {
        /// The full state document
        value: JsonValue,
    },
}

impl Message {
    /// Create a SCHEMA message for a catalog entry
    pub fn schema(entry: &CatalogEntry) -> Self {
        Self::Schema {
            stream: entry.tap_stream_id.clone(),
            schema: entry.schema.to_json(),
            key_properties: entry.key_properties.clone(),
            bookmark_properties: entry.replication_key.clone().map(|key| vec![key]),
        }
    }

    /// Create a RECORD message for one extracted row
    pub fn record(stream: impl Into<String>, record: Row) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted: Utc::now(),
        }
    }

    /// Create a STATE message from the current state
    pub fn state(state: &State) -> Result<Self> {
        Ok(Self::State {
            value: serde_json::to_value(state)?,
        })
    }
}

/// Line-delimited JSON message writer
pub struct MessageWriter<W: Write> {
    out: W,
}

impl MessageWriter<std::io::Stdout> {
    /// Writer over stdout, where Singer consumers expect messages
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> MessageWriter<W> {
    /// Wrap any writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Serialize one message as a JSON line and flush it
    pub fn write(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.out, message)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    /// Unwrap the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::schema::{PortableType, TableSchema};
    use serde_json::json;

    fn entry() -> CatalogEntry {
        let mut schema = TableSchema::new();
        schema.add_property("id", PortableType::Integer.to_property());
        schema.add_required("id");
        CatalogEntry::new("demo", "users", false, schema)
            .with_key_properties(vec!["id".to_string()])
    }

    #[test]
    fn test_schema_message_shape() {
        let message = Message::schema(&entry().with_replication_key("id"));
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], json!("SCHEMA"));
        assert_eq!(value["stream"], json!("demo-users"));
        assert_eq!(value["key_properties"], json!(["id"]));
        assert_eq!(value["bookmark_properties"], json!(["id"]));
        assert_eq!(value["schema"]["properties"]["id"]["type"], json!("integer"));
    }

    #[test]
    fn test_schema_message_omits_absent_bookmarks() {
        let message = Message::schema(&entry());
        let value = serde_json::to_value(&message).unwrap();
        assert!(value.get("bookmark_properties").is_none());
    }

    #[test]
    fn test_record_message_shape() {
        let mut row = Row::new();
        row.insert("id".to_string(), json!(7));
        let message = Message::record("demo-users", row);
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], json!("RECORD"));
        assert_eq!(value["record"]["id"], json!(7));
        assert!(value["time_extracted"].is_string());
    }

    #[test]
    fn test_writer_emits_json_lines() {
        let mut writer = MessageWriter::new(Vec::new());
        let state = State::new();
        writer.write(&Message::state(&state).unwrap()).unwrap();
        writer.write(&Message::state(&state).unwrap()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.trim_end().split('\n').collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: JsonValue = serde_json::from_str(line).unwrap();
            assert_eq!(value["type"], json!("STATE"));
        }
    }
}
