//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.

use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete state for a tap run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks, keyed by stream identifier
    #[serde(default)]
    pub bookmarks: HashMap<String, StreamBookmark>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the bookmark entry for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamBookmark> {
        self.bookmarks.get(stream)
    }

    /// Get the mutable bookmark entry for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamBookmark {
        self.bookmarks.entry(stream.to_string()).or_default()
    }

    /// Get the bookmark value for a stream
    pub fn get_bookmark(&self, stream: &str) -> Option<&JsonValue> {
        self.bookmarks.get(stream)?.replication_key_value.as_ref()
    }

    /// Record a bookmark for a stream
    pub fn set_bookmark(&mut self, stream: &str, replication_key: &str, value: JsonValue) {
        let entry = self.get_stream_mut(stream);
        entry.replication_key = Some(replication_key.to_string());
        entry.replication_key_value = Some(value);
    }
}

/// Bookmark for a single stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamBookmark {
    /// Replication key column the bookmark tracks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Highest replication-key value already extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_default() {
        let state = State::new();
        assert!(state.bookmarks.is_empty());
        assert!(state.get_bookmark("demo-users").is_none());
    }

    #[test]
    fn test_state_bookmark() {
        let mut state = State::new();
        state.set_bookmark("demo-users", "updated_at", json!("2024-01-01"));

        assert_eq!(state.get_bookmark("demo-users"), Some(&json!("2024-01-01")));
        assert_eq!(
            state.get_stream("demo-users").unwrap().replication_key.as_deref(),
            Some("updated_at")
        );
    }

    #[test]
    fn test_state_serialization() {
        let mut state = State::new();
        state.set_bookmark("demo-users", "id", json!(42));

        let json = serde_json::to_string(&state).unwrap();
        let restored: State = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.get_bookmark("demo-users"), Some(&json!(42)));
    }
}
