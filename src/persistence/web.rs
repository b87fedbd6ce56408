//! LocalStorage backend

use super::{BACKUP_SUFFIX, Storage};
use crate::error::StoreError;

/// LocalStorage key prefix
const PREFIX: &str = "circle_eater/";

/// Documents stored in the browser's LocalStorage.
pub struct WebStorage {
    storage: web_sys::Storage,
}

impl WebStorage {
    /// Fails when LocalStorage is unavailable (private mode, sandboxed frame).
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Backend {
                key: PREFIX.to_string(),
                message: "LocalStorage unavailable".to_string(),
            })?;
        Ok(Self { storage })
    }

    fn backend_error(key: &str, err: wasm_bindgen::JsValue) -> StoreError {
        StoreError::Backend {
            key: key.to_string(),
            message: format!("{:?}", err),
        }
    }
}

impl Storage for WebStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(&format!("{PREFIX}{key}"))
            .map_err(|e| Self::backend_error(key, e))
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(&format!("{PREFIX}{key}"), contents)
            .map_err(|e| Self::backend_error(key, e))
    }

    fn quarantine(&self, key: &str) -> Result<(), StoreError> {
        let Some(doc) = self.read(key)? else {
            return Err(StoreError::Backend {
                key: key.to_string(),
                message: "nothing to quarantine".to_string(),
            });
        };
        self.write(&format!("{key}{BACKUP_SUFFIX}"), &doc)?;
        self.storage
            .remove_item(&format!("{PREFIX}{key}"))
            .map_err(|e| Self::backend_error(key, e))?;
        log::warn!("Moved corrupted '{}' aside", key);
        Ok(())
    }
}
