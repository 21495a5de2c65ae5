//! Key-value persistence behind a trait.
//!
//! The quiz never touches `localStorage` directly. Everything goes through
//! [`KeyValueStore`], which has a browser implementation ([`LocalStorage`],
//! wasm only) and an in-memory one ([`MemoryStore`]) used natively and in tests.
//!
//! Methods take `&self`: web `Storage` is itself a shared handle, so the
//! engine, the stats recorder and the account book can all hold the same
//! `Rc<dyn KeyValueStore>`.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{QuizError, Result};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str);
}

/// Volatile store. Also the fallback when the browser denies storage access.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// `None` when there is no window or storage is disabled (private mode).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| QuizError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

/// Decode the JSON stored under `key`. A missing key is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key) else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| QuizError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Like [`read_json`], but unreadable data is logged, dropped and treated as absent.
pub fn read_json_or_discard<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match read_json(store, key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{e}; discarding");
            store.remove(key);
            None
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).map_err(|e| QuizError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a"), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("2"));
        store.remove("a");
        assert_eq!(store.get("a"), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn json_roundtrip_through_store() {
        let store = MemoryStore::new();
        write_json(&store, "nums", &vec![1u32, 2, 3]).unwrap();
        let back: Option<Vec<u32>> = read_json(&store, "nums").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[test]
    fn missing_key_is_none() {
        let store = MemoryStore::new();
        let back: Option<Vec<u32>> = read_json(&store, "nope").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn corrupt_json_is_reported() {
        let store = MemoryStore::new();
        store.set("nums", "{not json").unwrap();
        let err = read_json::<Vec<u32>>(&store, "nums").unwrap_err();
        assert!(matches!(err, QuizError::Corrupt { ref key, .. } if key == "nums"));
    }

    #[test]
    fn corrupt_json_is_discarded() {
        let store = MemoryStore::new();
        store.set("nums", "[1, 2,").unwrap();
        let back: Option<Vec<u32>> = read_json_or_discard(&store, "nums");
        assert!(back.is_none());
        assert_eq!(store.get("nums"), None);
    }
}
