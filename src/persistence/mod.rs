//! Integer key/value persistence
//!
//! The game only ever stores small non-negative integers (the best score).
//! Reads never fail: anything missing or unparseable comes back as 0.
//! Backends:
//! - `MemoryStore`: process-local, used by tests and headless runs
//! - `JsonFileStore`: a JSON object on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm)

use std::collections::BTreeMap;

use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

/// Failures inside a backend; never surfaced through `PersistentStore`
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not a json object: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("storage backend unavailable")]
    Unavailable,
}

/// Get/set contract for persisted integers
pub trait PersistentStore {
    /// Stored value, or 0 if absent or invalid
    fn get(&self, key: &str) -> u64;
    /// Store a value; failures are logged, never returned
    fn set(&mut self, key: &str, value: u64);
}

impl<T: PersistentStore + ?Sized> PersistentStore for Box<T> {
    fn get(&self, key: &str) -> u64 {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u64) {
        (**self).set(key, value)
    }
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> u64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_owned(), value);
    }
}

/// Lenient integer parse for raw stored text
///
/// Accepts integers and finite non-negative decimals (truncated);
/// everything else reads as 0.
pub fn parse_stored(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u64>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_defaults_to_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("missing"), 0);
        store.set("k", 42);
        assert_eq!(store.get("k"), 42);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_boxed_store() {
        let mut store: Box<dyn PersistentStore> = Box::new(MemoryStore::new());
        store.set("k", 7);
        assert_eq!(store.get("k"), 7);
    }

    #[test]
    fn test_parse_stored() {
        assert_eq!(parse_stored("123"), 123);
        assert_eq!(parse_stored(" 9 "), 9);
        assert_eq!(parse_stored("12.9"), 12);
        assert_eq!(parse_stored(""), 0);
        assert_eq!(parse_stored("abc"), 0);
        assert_eq!(parse_stored("-5"), 0);
        assert_eq!(parse_stored("NaN"), 0);
        assert_eq!(parse_stored("inf"), 0);
    }
}
