//! Client-side key/value storage for the session record

use arrosage_http::ClientError;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// String key/value storage, shaped like the browser's `Storage`
///
/// Reads never fail: a value that cannot be read is reported as absent.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove_item(&self, key: &str);
}

/// In-memory storage, used outside the browser and in tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(target_arch = "wasm32")]
use gloo::storage::{LocalStorage, Storage};

/// The browser's `localStorage`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl SessionStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| ClientError::Storage(format!("{e:?}")))
    }

    fn remove_item(&self, key: &str) {
        if let Err(e) = LocalStorage::raw().remove_item(key) {
            tracing::warn!("Failed to remove {key} from local storage: {e:?}");
        }
    }
}

/// Storage used when none is supplied
pub fn default_storage() -> std::sync::Arc<dyn SessionStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        std::sync::Arc::new(BrowserStorage)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::sync::Arc::new(MemoryStorage::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item("k").is_none());

        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("v"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("k");
        storage.remove_item("k");
        assert!(storage.is_empty());
    }
}
