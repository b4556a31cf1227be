//! Browser LocalStorage backend

use web_sys::Storage;

use super::{PersistentStore, StoreError, parse_stored};

/// Values are stored as decimal strings, one key each
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = Self::local_storage().ok();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores will not persist");
        }
        Self { storage }
    }

    fn local_storage() -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistentStore for LocalStorageStore {
    fn get(&self, key: &str) -> u64 {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(key).ok().flatten())
            .map(|raw| parse_stored(&raw))
            .unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u64) {
        let Some(storage) = &self.storage else { return };
        if storage.set_item(key, &value.to_string()).is_err() {
            log::warn!("Failed to write {} to LocalStorage", key);
        }
    }
}
