//! Error types.
//!
//! Loaders recover from these by falling back to defaults; they only reach
//! callers from explicit saves and from the spawner.

use thiserror::Error;

/// Failure reading or writing a persisted store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored bytes are not UTF-8 text.
    #[error("'{key}' is not valid UTF-8: {source}")]
    NotText {
        key: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Non-filesystem backends (browser LocalStorage) report errors as text.
    #[error("storage backend error for '{key}': {message}")]
    Backend { key: String, message: String },
}

/// The spawner could not place a circle inside its retry budget.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("no free spot for a circle after {attempts} attempts")]
    NoSpace { attempts: u32 },
}
