use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::resume::{create_empty_resume_data, ResumeData, RESUME_STORAGE_KEY};
use crate::storage::autosave::Autosave;
use crate::storage::{KeyValueStore, StorageError};

/// Serializes resume snapshots into a single key of a [`KeyValueStore`].
#[derive(Clone)]
pub struct SnapshotStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl SnapshotStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// True when a value exists, parses as JSON and carries a `header` field.
    /// Does not check that the value fully deserializes.
    pub async fn probe(&self) -> Result<bool, StorageError> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            return Ok(false);
        };
        let value: Value = serde_json::from_str(&raw)?;
        Ok(value.get("header").is_some_and(|h| !h.is_null()))
    }

    pub async fn read(&self) -> Result<Option<ResumeData>, StorageError> {
        match self.kv.get(&self.key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn write(&self, data: &ResumeData) -> Result<(), StorageError> {
        let raw = serde_json::to_string(data)?;
        self.kv.set(&self.key, &raw).await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(&self.key).await
    }
}

/// Persistence flags surfaced to the page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    pub initialized: bool,
    pub has_stored_data: bool,
    pub pending_write: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
}

struct ActiveState {
    resume: Arc<ResumeData>,
    has_stored_data: bool,
    initialized: bool,
}

/// Owns the active resume and mirrors it into storage.
///
/// Readers get immutable snapshots; writers go through [`ResumeStorage::update`]
/// or [`ResumeStorage::replace`], which swap in a whole new value and arm the
/// autosave. Every storage failure degrades to "no stored data".
pub struct ResumeStorage {
    snapshots: SnapshotStore,
    autosave: Autosave,
    state: RwLock<ActiveState>,
}

impl ResumeStorage {
    pub fn new(kv: Arc<dyn KeyValueStore>, debounce: Duration) -> Self {
        let snapshots = SnapshotStore::new(kv, RESUME_STORAGE_KEY);
        Self {
            autosave: Autosave::new(snapshots.clone(), debounce),
            snapshots,
            state: RwLock::new(ActiveState {
                resume: Arc::new(ResumeData::empty()),
                has_stored_data: false,
                initialized: false,
            }),
        }
    }

    /// Detects a previously stored resume without loading it.
    pub async fn initialize(&self) {
        let has_stored_data = match self.snapshots.probe().await {
            Ok(found) => found,
            Err(e) => {
                warn!("Could not inspect stored resume, starting without it: {e}");
                false
            }
        };

        let mut state = self.state.write().await;
        state.has_stored_data = has_stored_data;
        state.initialized = true;
        info!(has_stored_data, "Resume storage initialized");
    }

    pub async fn snapshot(&self) -> Arc<ResumeData> {
        Arc::clone(&self.state.read().await.resume)
    }

    pub async fn has_stored_data(&self) -> bool {
        self.state.read().await.has_stored_data
    }

    pub async fn status(&self) -> StorageStatus {
        let (initialized, has_stored_data) = {
            let state = self.state.read().await;
            (state.initialized, state.has_stored_data)
        };
        StorageStatus {
            initialized,
            has_stored_data,
            pending_write: self.autosave.is_pending().await,
            last_saved_at: self.autosave.last_saved_at().await,
        }
    }

    /// Derives the next model from the current one and makes it active.
    ///
    /// The derivation runs under the write lock, so concurrent edits are
    /// applied one after another. An edit that changes nothing is not saved.
    pub async fn update<F>(&self, edit: F) -> Arc<ResumeData>
    where
        F: FnOnce(&ResumeData) -> ResumeData,
    {
        let (next, initialized) = {
            let mut state = self.state.write().await;
            let next = edit(&state.resume);
            if next == *state.resume {
                return Arc::clone(&state.resume);
            }
            let next = Arc::new(next);
            state.resume = Arc::clone(&next);
            (next, state.initialized)
        };

        if initialized {
            self.autosave.schedule(Arc::clone(&next)).await;
        }
        next
    }

    /// Replaces the active model wholesale.
    pub async fn replace(&self, data: ResumeData) -> Arc<ResumeData> {
        let data = data.normalized();
        self.update(move |_| data).await
    }

    /// Makes the stored resume active. Corrupted data falls back to the empty
    /// model and the unreadable entry is removed.
    pub async fn load_stored(&self) -> Arc<ResumeData> {
        self.autosave.cancel().await;

        let loaded = match self.snapshots.read().await {
            Ok(Some(data)) => {
                info!("Loaded stored resume");
                Some(data.normalized())
            }
            Ok(None) => {
                debug!("No stored resume to load");
                None
            }
            Err(e) => {
                warn!("Stored resume is unreadable, starting fresh: {e}");
                if let Err(e) = self.snapshots.clear().await {
                    warn!("Could not remove unreadable stored resume: {e}");
                }
                Some(ResumeData::empty())
            }
        };

        let mut state = self.state.write().await;
        if let Some(data) = loaded {
            state.resume = Arc::new(data);
        }
        state.has_stored_data = false;
        Arc::clone(&state.resume)
    }

    /// Switches to the empty model. The stored value is left in place until
    /// the next edit overwrites it.
    pub async fn start_fresh(&self) -> Arc<ResumeData> {
        self.autosave.cancel().await;
        let mut state = self.state.write().await;
        state.resume = Arc::new(create_empty_resume_data());
        state.has_stored_data = false;
        info!("Started a fresh resume");
        Arc::clone(&state.resume)
    }

    /// Deletes the stored value and switches to the empty model.
    pub async fn reset_all(&self) -> Arc<ResumeData> {
        self.autosave.cancel().await;
        if let Err(e) = self.snapshots.clear().await {
            warn!("Could not clear stored resume: {e}");
        }
        let mut state = self.state.write().await;
        state.resume = Arc::new(create_empty_resume_data());
        state.has_stored_data = false;
        info!("Resume reset");
        Arc::clone(&state.resume)
    }

    /// Commits a pending autosave right away (used on shutdown).
    pub async fn flush(&self) {
        self.autosave.flush().await;
    }
}
