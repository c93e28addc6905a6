//! Debounced persistence of the active resume.
//!
//! Each mutation aborts the pending timer task and spawns a new one, so only
//! the last snapshot inside a quiet window reaches the store. There is no queue.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::resume::ResumeData;
use crate::storage::resume_store::SnapshotStore;

/// Default quiet period before a pending write is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

struct PendingWrite {
    handle: JoinHandle<()>,
    snapshot: Arc<ResumeData>,
}

pub struct Autosave {
    snapshots: SnapshotStore,
    window: Duration,
    pending: Mutex<Option<PendingWrite>>,
    last_saved_at: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl Autosave {
    pub fn new(snapshots: SnapshotStore, window: Duration) -> Self {
        Self {
            snapshots,
            window,
            pending: Mutex::new(None),
            last_saved_at: Arc::new(RwLock::new(None)),
        }
    }

    /// Supersedes any pending write with `snapshot`, due after the window.
    pub async fn schedule(&self, snapshot: Arc<ResumeData>) {
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.handle.abort();
        }

        let snapshots = self.snapshots.clone();
        let last_saved_at = Arc::clone(&self.last_saved_at);
        let window = self.window;
        let to_write = Arc::clone(&snapshot);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            persist(&snapshots, &to_write, &last_saved_at).await;
        });

        *pending = Some(PendingWrite { handle, snapshot });
    }

    /// Drops the pending write, if any. Returns whether one was still waiting.
    pub async fn cancel(&self) -> bool {
        match self.pending.lock().await.take() {
            Some(previous) => {
                let was_waiting = !previous.handle.is_finished();
                previous.handle.abort();
                if was_waiting {
                    debug!("Pending autosave cancelled");
                }
                was_waiting
            }
            None => false,
        }
    }

    /// Writes the pending snapshot immediately instead of waiting out the window.
    pub async fn flush(&self) {
        let Some(previous) = self.pending.lock().await.take() else {
            return;
        };
        if previous.handle.is_finished() {
            return;
        }
        previous.handle.abort();
        persist(&self.snapshots, &previous.snapshot, &self.last_saved_at).await;
    }

    pub async fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .await
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    pub async fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        *self.last_saved_at.read().await
    }
}

/// Write failures (quota, I/O) are logged and swallowed; the in-memory model
/// stays authoritative.
async fn persist(
    snapshots: &SnapshotStore,
    snapshot: &ResumeData,
    last_saved_at: &RwLock<Option<DateTime<Utc>>>,
) {
    match snapshots.write(snapshot).await {
        Ok(()) => {
            *last_saved_at.write().await = Some(Utc::now());
            debug!("Autosaved resume snapshot");
        }
        Err(e) => warn!("Autosave failed, keeping in-memory state: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::RESUME_STORAGE_KEY;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn setup(store: Arc<MemoryStore>) -> Autosave {
        let kv: Arc<dyn KeyValueStore> = store;
        Autosave::new(SnapshotStore::new(kv, RESUME_STORAGE_KEY), DEFAULT_DEBOUNCE)
    }

    fn named(name: &str) -> Arc<ResumeData> {
        let mut data = ResumeData::empty();
        data.header.name = name.to_string();
        Arc::new(data)
    }

    async fn stored_name(store: &MemoryStore) -> Option<String> {
        let raw = store.get(RESUME_STORAGE_KEY).await.unwrap()?;
        let data: ResumeData = serde_json::from_str(&raw).unwrap();
        Some(data.header.name)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_collapse_into_one_write() {
        let store = Arc::new(MemoryStore::new());
        let autosave = setup(Arc::clone(&store));

        for i in 1..=5 {
            autosave.schedule(named(&format!("edit {i}"))).await;
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(store.write_count(), 0, "nothing written inside the window");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.write_count(), 1);
        assert_eq!(stored_name(&store).await.as_deref(), Some("edit 5"));
        assert!(autosave.last_saved_at().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_spaced_beyond_window_each_write() {
        let store = Arc::new(MemoryStore::new());
        let autosave = setup(Arc::clone(&store));

        autosave.schedule(named("first")).await;
        tokio::time::sleep(Duration::from_millis(350)).await;
        autosave.schedule(named("second")).await;
        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(store.write_count(), 2);
        assert_eq!(stored_name(&store).await.as_deref(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_write() {
        let store = Arc::new(MemoryStore::new());
        let autosave = setup(Arc::clone(&store));

        autosave.schedule(named("doomed")).await;
        assert!(autosave.is_pending().await);
        assert!(autosave.cancel().await);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.write_count(), 0);
        assert!(!autosave.is_pending().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately() {
        let store = Arc::new(MemoryStore::new());
        let autosave = setup(Arc::clone(&store));

        autosave.schedule(named("flushed")).await;
        autosave.flush().await;
        assert_eq!(store.write_count(), 1);
        assert_eq!(stored_name(&store).await.as_deref(), Some("flushed"));

        // The aborted timer must not write a second time.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::with_quota(16));
        let autosave = setup(Arc::clone(&store));

        autosave.schedule(named("too big for the quota")).await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.write_count(), 0);
        assert!(autosave.last_saved_at().await.is_none());
    }
}
