//! State manager implementation
//!
//! Provides file-based state persistence with atomic writes.

use super::types::State;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::path::{Path, PathBuf};

/// State manager for persisting and loading state
#[derive(Debug)]
pub struct StateManager {
    /// Path to the state file, if persistence is enabled
    path: Option<PathBuf>,
    /// Current state
    state: State,
}

impl StateManager {
    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: State::new(),
        }
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| Error::State {
                message: format!("Failed to read state file: {e}"),
            })?;
            serde_json::from_str(&contents).map_err(|e| Error::State {
                message: format!("Failed to parse state file: {e}"),
            })?
        } else {
            State::new()
        };

        Ok(Self {
            path: Some(path),
            state,
        })
    }

    /// Create a state manager from an inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let state: State = serde_json::from_str(json).map_err(|e| Error::State {
            message: format!("Failed to parse state JSON: {e}"),
        })?;

        Ok(Self { path: None, state })
    }

    /// Current state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Mutable current state
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Record a bookmark for a stream
    pub fn set_bookmark(&mut self, stream: &str, replication_key: &str, value: JsonValue) {
        self.state.set_bookmark(stream, replication_key, value);
    }

    /// Persist the state to the configured file, if any.
    ///
    /// Writes to a temp file first, then renames for atomicity.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        self.save_to_file(path)
    }

    /// Persist the state to a specific file path
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(&self.state).map_err(|e| Error::State {
            message: format!("Failed to serialize state: {e}"),
        })?;

        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, &contents).map_err(|e| Error::State {
            message: format!("Failed to write state file: {e}"),
        })?;
        std::fs::rename(&temp_path, path).map_err(|e| Error::State {
            message: format!("Failed to move state file into place: {e}"),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_save_is_a_no_op() {
        let mut manager = StateManager::in_memory();
        manager.set_bookmark("demo-users", "id", json!(1));
        manager.save().unwrap();
    }

    #[test]
    fn test_from_json() {
        let manager = StateManager::from_json(
            r#"{"bookmarks": {"demo-users": {"replication_key": "id", "replication_key_value": 7}}}"#,
        )
        .unwrap();
        assert_eq!(manager.state().get_bookmark("demo-users"), Some(&json!(7)));

        assert!(StateManager::from_json("not json").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        // Missing file loads as empty state.
        let mut manager = StateManager::from_file(&path).unwrap();
        assert!(manager.state().bookmarks.is_empty());

        manager.set_bookmark("demo-users", "updated_at", json!("2024-06-01"));
        manager.save().unwrap();

        let reloaded = StateManager::from_file(&path).unwrap();
        assert_eq!(
            reloaded.state().get_bookmark("demo-users"),
            Some(&json!("2024-06-01"))
        );

        // The temp file does not linger.
        assert!(!path.with_extension("tmp").exists());
    }
}
