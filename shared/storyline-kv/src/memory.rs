//! In-memory key-value store

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::{KvStore, Result};

/// Process-local store backed by a `DashMap`.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("+15550000000").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryKvStore::new();
        store.set("k", b"one").await.unwrap();
        store.set("k", b"two").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryKvStore::new();
        let other = store.clone();
        other.set("k", b"v").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
