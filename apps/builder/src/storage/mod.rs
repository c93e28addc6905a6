//! Local persistence: a key-value store abstraction, its backends, and the
//! resume-specific wrapper that owns the active model and its autosave.

pub mod autosave;
pub mod file;
#[cfg(test)]
pub mod memory;
pub mod resume_store;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;
pub use resume_store::{ResumeStorage, StorageStatus};

/// Default per-value quota, the usual browser storage allowance.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("quota exceeded: value of {size} bytes exceeds quota of {quota} bytes")]
    QuotaExceeded { size: usize, quota: usize },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage scoped to this client instance.
///
/// Implementations must be safe to share across tasks; the autosave task
/// writes while request handlers read.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key has never been written or was removed.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Keys double as file names, so only a conservative character set is allowed.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

pub(crate) fn check_quota(value: &str, quota: usize) -> Result<(), StorageError> {
    if value.len() > quota {
        return Err(StorageError::QuotaExceeded {
            size: value.len(),
            quota,
        });
    }
    Ok(())
}
