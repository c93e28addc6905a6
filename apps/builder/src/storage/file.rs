use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{info, warn};

use crate::storage::{check_quota, validate_key, KeyValueStore, StorageError};

/// Directory-backed key-value store: one `<key>.json` file per key.
pub struct FileStore {
    base_dir: PathBuf,
    quota_bytes: usize,
}

impl FileStore {
    /// Never fails. An unusable directory is reported here and again by each
    /// call that touches it, so callers degrade to "no stored data".
    pub async fn open(base_dir: PathBuf, quota_bytes: usize) -> Self {
        match fs::create_dir_all(&base_dir).await {
            Ok(()) => info!("File store opened at {}", base_dir.display()),
            Err(e) => warn!(
                "Data directory {} is unavailable, saving will fail until it is: {e}",
                base_dir.display()
            ),
        }
        Self {
            base_dir,
            quota_bytes,
        }
    }

    fn value_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_dir.join(format!("{key}.json")))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        check_quota(value, self.quota_bytes)?;
        fs::create_dir_all(&self.base_dir).await?;

        // Write-then-rename so a crash never leaves a truncated value behind
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DEFAULT_QUOTA_BYTES;

    async fn open_temp() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data"), DEFAULT_QUOTA_BYTES).await;
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_key_reads_as_none() {
        let (_dir, store) = open_temp().await;
        assert_eq!(store.get("resume-builder-data").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let (_dir, store) = open_temp().await;
        store.set("k", r#"{"a":1}"#).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some(r#"{"a":1}"#));

        store.set("k", "2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("2"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let (_dir, store) = open_temp().await;
        store.remove("never-written").await.unwrap();
    }

    #[tokio::test]
    async fn test_no_temp_file_left_after_write() {
        let (_dir, store) = open_temp().await;
        store.set("k", "v").await.unwrap();
        assert!(store.base_dir().join("k.json").exists());
        assert!(!store.base_dir().join("k.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_quota_exceeded_leaves_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().to_path_buf(), 8).await;
        store.set("k", "small").await.unwrap();

        let err = store.set("k", "much too large").await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("small"));
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let (_dir, store) = open_temp().await;
        let err = store.set("../outside", "v").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_directory_removed_after_open_is_recreated_on_write() {
        let (dir, store) = open_temp().await;
        std::fs::remove_dir_all(dir.path().join("data")).unwrap();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_unusable_directory_fails_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file").unwrap();

        let store = FileStore::open(blocker.join("data"), DEFAULT_QUOTA_BYTES).await;
        assert!(matches!(store.get("k").await, Err(StorageError::Io(_))));
        assert!(matches!(store.set("k", "v").await, Err(StorageError::Io(_))));
    }
}
