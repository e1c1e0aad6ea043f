use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, ConfigError};

use super::{IdentifierStore, StoreError};

/// File name in the config directory
const IDENTIFIER_FILE: &str = "remembered.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct RememberedDocument {
    #[serde(rename = "savedMemberId")]
    saved_member_id: Option<String>,
}

/// Remembered ID kept in a small JSON document.
pub struct FileIdentifierStore {
    path: PathBuf,
}

impl FileIdentifierStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store next to config.json in the user config directory
    pub fn default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(Config::config_dir()?.join(IDENTIFIER_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentifierStore for FileIdentifierStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let doc: RememberedDocument = serde_json::from_str(&contents)?;
        Ok(doc.saved_member_id.filter(|id| !id.is_empty()))
    }

    fn set(&self, identifier: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let doc = RememberedDocument {
            saved_member_id: Some(identifier.to_string()),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&doc)?)?;
        debug!(path = ?self.path, "Remembered ID saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            debug!(path = ?self.path, "Remembered ID removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileIdentifierStore {
        FileIdentifierStore::new(dir.path().join("nested").join(IDENTIFIER_FILE))
    }

    #[test]
    fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get().unwrap(), None);
        // Clearing a missing file is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_set_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        store_in(&dir).set("alice").unwrap();

        // A fresh instance stands in for the next process start
        assert_eq!(store_in(&dir).get().unwrap(), Some("alice".to_string()));
    }

    #[test]
    fn test_set_overwrites_and_clear_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set("alice").unwrap();
        store.set("bob").unwrap();
        assert_eq!(store.get().unwrap(), Some("bob".to_string()));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_document_uses_slot_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set("alice").unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(super::super::SLOT_NAME));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{{{").unwrap();
        assert!(matches!(store.get(), Err(StoreError::Parse(_))));
    }
}
