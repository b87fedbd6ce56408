//! Key/value persistence for settings and the leaderboard
//!
//! Features:
//! - One JSON document per key
//! - Files on native, LocalStorage on web
//! - Atomic replace on native (tmp → rename)
//! - Corrupted entries are moved aside to `<key>.bak` instead of being overwritten

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::StoreError;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebStorage;

/// Suffix appended to a quarantined entry
pub const BACKUP_SUFFIX: &str = ".bak";

/// A flat namespace of text documents.
pub trait Storage {
    /// Read a document; `Ok(None)` when it does not exist.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace a document with `contents`.
    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError>;

    /// Move a document aside to `<key>.bak`, replacing any older backup.
    fn quarantine(&self, key: &str) -> Result<(), StoreError>;
}

/// Serialize `value` as pretty JSON and store it under `key`.
pub fn write_json<T: Serialize>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        key: key.to_string(),
        source,
    })?;
    storage.write(key, &json)
}

/// Documents stored as files in one directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the storage directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document stored under `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn io_error(key: &str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(key, e)),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|source| StoreError::NotText {
                key: key.to_string(),
                source,
            })
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        let target = self.path_for(key);
        let tmp = self.path_for(&format!("{key}.tmp"));
        fs::write(&tmp, contents).map_err(|e| Self::io_error(key, e))?;
        fs::rename(&tmp, &target).map_err(|e| Self::io_error(key, e))?;
        log::debug!("Wrote {}", target.display());
        Ok(())
    }

    fn quarantine(&self, key: &str) -> Result<(), StoreError> {
        let backup = self.path_for(&format!("{key}{BACKUP_SUFFIX}"));
        fs::rename(self.path_for(key), &backup).map_err(|e| Self::io_error(key, e))?;
        log::warn!("Moved corrupted '{}' to {}", key, backup.display());
        Ok(())
    }
}

/// In-memory documents (headless runs and tests)
#[derive(Debug, Default)]
pub struct MemoryStorage {
    docs: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document directly
    pub fn with_doc(self, key: &str, contents: &str) -> Self {
        self.docs
            .borrow_mut()
            .insert(key.to_string(), contents.to_string());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.docs.borrow().contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.docs.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        self.docs
            .borrow_mut()
            .insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn quarantine(&self, key: &str) -> Result<(), StoreError> {
        let mut docs = self.docs.borrow_mut();
        let doc = docs.remove(key).ok_or_else(|| StoreError::Backend {
            key: key.to_string(),
            message: "nothing to quarantine".to_string(),
        })?;
        docs.insert(format!("{key}{BACKUP_SUFFIX}"), doc);
        Ok(())
    }
}
