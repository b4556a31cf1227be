//! JSON file backend for native builds

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;

use super::{PersistentStore, StoreError};

/// Keeps all keys in one JSON object, rewritten on every `set`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, u64>,
}

impl JsonFileStore {
    /// Load `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => Self::decode(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Like `open`, but starts empty (with a warning) if the file is unusable
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Ignoring store at {}: {}", path.display(), e);
                Self {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    /// Write the current contents to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Keep only entries that read as non-negative integers
    fn decode(text: &str) -> Result<BTreeMap<String, u64>, StoreError> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(text)?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| {
                let n = match v {
                    Value::Number(n) => n
                        .as_u64()
                        .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64)),
                    Value::String(s) => Some(super::parse_stored(&s)),
                    _ => None,
                }?;
                Some((k, n))
            })
            .collect())
    }
}

impl PersistentStore for JsonFileStore {
    fn get(&self, key: &str) -> u64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_owned(), value);
        if let Err(e) = self.flush() {
            log::warn!("Failed to save {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lane_rush_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = JsonFileStore::open(temp_path("missing")).unwrap();
        assert_eq!(store.get("anything"), 0);
    }

    #[test]
    fn test_set_persists() {
        let path = temp_path("persist");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("lane_rush_best", 80);
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("lane_rush_best"), 80);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_entries_read_as_zero() {
        let path = temp_path("invalid");
        fs::write(&path, r#"{ "a": -3, "b": "17", "c": [1], "d": 12.5, "e": 5 }"#).unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("a"), 0);
        assert_eq!(store.get("b"), 17);
        assert_eq!(store.get("c"), 0);
        assert_eq!(store.get("d"), 12);
        assert_eq!(store.get("e"), 5);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_path("malformed");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Malformed(_))
        ));
        let store = JsonFileStore::open_or_empty(&path);
        assert_eq!(store.get("lane_rush_best"), 0);
        let _ = fs::remove_file(&path);
    }
}
