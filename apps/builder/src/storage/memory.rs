use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::storage::{check_quota, validate_key, KeyValueStore, StorageError, DEFAULT_QUOTA_BYTES};

/// In-process key-value store with the same key and quota rules as
/// [`FileStore`](crate::storage::FileStore). Counts successful writes.
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    quota_bytes: usize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            quota_bytes,
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        check_quota(value, self.quota_bytes)?;
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.values.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_count_tracks_successful_sets_only() {
        let store = MemoryStore::with_quota(3);
        store.set("k", "abc").await.unwrap();
        assert!(store.set("k", "abcd").await.is_err());
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("abc"));
    }
}
