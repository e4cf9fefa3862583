//! In-process [`KeyValueStore`] backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{KeyValueStore, StoreError};

/// A `HashMap` behind a mutex, shared by cloning.
///
/// Used by the test suites and by single-node deployments that don't
/// need coin state to outlive the process. The mutex is only held for
/// the map operation itself, never across an await.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.lock().expect("store mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_absent_key_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("room1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("room1", b"coins".to_vec()).await.unwrap();
        assert_eq!(store.get("room1").await.unwrap(), Some(b"coins".to_vec()));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("room1", b"old".to_vec()).await.unwrap();
        store.set("room1", b"new".to_vec()).await.unwrap();
        assert_eq!(store.get("room1").await.unwrap(), Some(b"new".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_key() {
        let store = MemoryStore::new();
        store.set("room1", b"coins".to_vec()).await.unwrap();
        store.delete("room1").await.unwrap();
        assert_eq!(store.get("room1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_not_an_error() {
        let store = MemoryStore::new();
        store.delete("never-set").await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("room1", b"coins".to_vec()).await.unwrap();
        assert_eq!(other.get("room1").await.unwrap(), Some(b"coins".to_vec()));
    }
}
