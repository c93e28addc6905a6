//! Page orchestration: owns the resume storage, the two dialogs, the preview
//! renderer and the exporter, and enforces which actions each dialog allows.
//!
//! - Load dialog: open while a stored resume was detected and no choice has
//!   been made. Only "load existing" or "start fresh" close it; edits and
//!   reset requests are refused meanwhile.
//! - Reset dialog: opened on request, closed by cancel (nothing changes) or
//!   confirm (everything is wiped).

pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::editor::{apply_edit, removal_flags, FormEdit, RemovalFlags};
use crate::errors::AppError;
use crate::export::layout::PageConfig;
use crate::export::{pdf_file_name, ExportOutcome, PdfExporter};
use crate::models::resume::ResumeData;
use crate::preview::render::PreviewRenderer;
use crate::preview::{project_preview, PreviewDocument, PREVIEW_TARGET_ID};
use crate::storage::{KeyValueStore, ResumeStorage, StorageStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Modals {
    pub load_existing: bool,
    pub reset_confirm: bool,
}

/// Everything the page needs to draw the editor pane.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub resume: ResumeData,
    pub can_remove: RemovalFlags,
    pub modals: Modals,
    pub storage: StorageStatus,
    pub exporting: bool,
}

pub struct Session {
    storage: ResumeStorage,
    renderer: PreviewRenderer,
    exporter: PdfExporter,
    reset_confirm_open: RwLock<bool>,
}

impl Session {
    pub fn new(kv: Arc<dyn KeyValueStore>, debounce: Duration, page_config: PageConfig) -> Result<Self> {
        Ok(Self {
            storage: ResumeStorage::new(kv, debounce),
            renderer: PreviewRenderer::new()?,
            exporter: PdfExporter::new(page_config),
            reset_confirm_open: RwLock::new(false),
        })
    }

    /// Must complete before the page is served.
    pub async fn initialize(&self) {
        self.storage.initialize().await;
    }

    pub async fn view(&self) -> SessionView {
        let resume = self.storage.snapshot().await;
        let storage = self.storage.status().await;
        SessionView {
            can_remove: removal_flags(&resume),
            resume: (*resume).clone(),
            modals: Modals {
                load_existing: storage.has_stored_data,
                reset_confirm: *self.reset_confirm_open.read().await,
            },
            storage,
            exporting: self.exporter.is_generating(),
        }
    }

    async fn ensure_no_load_choice_pending(&self) -> Result<(), AppError> {
        if self.storage.has_stored_data().await {
            return Err(AppError::Conflict(
                "Choose whether to load the saved resume or start fresh first".to_string(),
            ));
        }
        Ok(())
    }

    async fn ensure_load_choice_pending(&self) -> Result<(), AppError> {
        if !self.storage.has_stored_data().await {
            return Err(AppError::Conflict("No saved resume is waiting to be loaded".to_string()));
        }
        Ok(())
    }

    pub async fn apply_edit(&self, edit: &FormEdit) -> Result<SessionView, AppError> {
        self.ensure_no_load_choice_pending().await?;
        self.storage.update(|current| apply_edit(current, edit)).await;
        Ok(self.view().await)
    }

    pub async fn replace_resume(&self, data: ResumeData) -> Result<SessionView, AppError> {
        self.ensure_no_load_choice_pending().await?;
        self.storage.replace(data).await;
        Ok(self.view().await)
    }

    pub async fn load_existing(&self) -> Result<SessionView, AppError> {
        self.ensure_load_choice_pending().await?;
        self.storage.load_stored().await;
        Ok(self.view().await)
    }

    pub async fn start_fresh(&self) -> Result<SessionView, AppError> {
        self.ensure_load_choice_pending().await?;
        self.storage.start_fresh().await;
        Ok(self.view().await)
    }

    pub async fn request_reset(&self) -> Result<SessionView, AppError> {
        self.ensure_no_load_choice_pending().await?;
        *self.reset_confirm_open.write().await = true;
        Ok(self.view().await)
    }

    pub async fn cancel_reset(&self) -> SessionView {
        *self.reset_confirm_open.write().await = false;
        self.view().await
    }

    pub async fn confirm_reset(&self) -> Result<SessionView, AppError> {
        {
            let mut open = self.reset_confirm_open.write().await;
            if !*open {
                return Err(AppError::Conflict("Reset was not requested".to_string()));
            }
            *open = false;
        }
        self.storage.reset_all().await;
        info!("Reset confirmed");
        Ok(self.view().await)
    }

    pub async fn preview(&self) -> PreviewDocument {
        let snapshot = self.storage.snapshot().await;
        project_preview(&snapshot)
    }

    pub async fn preview_html(&self) -> Result<String, AppError> {
        let doc = self.preview().await;
        Ok(self.renderer.render(&doc)?)
    }

    /// Finds the rendered document registered under `target_id`.
    pub async fn locate(&self, target_id: &str) -> Option<PreviewDocument> {
        if target_id == PREVIEW_TARGET_ID {
            Some(self.preview().await)
        } else {
            None
        }
    }

    /// Exports the target under `file_name`, or under the name derived from
    /// the header when none is given.
    pub async fn export(&self, target_id: &str, file_name: Option<String>) -> ExportOutcome {
        let file_name = match file_name {
            Some(name) => name,
            None => {
                let snapshot = self.storage.snapshot().await;
                pdf_file_name(&snapshot.header.name)
            }
        };
        let target = self.locate(target_id).await;
        self.exporter.export(target_id, target, &file_name).await
    }

    pub fn is_exporting(&self) -> bool {
        self.exporter.is_generating()
    }

    /// Writes any pending autosave before shutdown.
    pub async fn flush(&self) {
        self.storage.flush().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::HeaderField;
    use crate::export::layout::letter_portrait;
    use crate::models::resume::RESUME_STORAGE_KEY;
    use crate::preview::SectionKind;
    use crate::storage::autosave::DEFAULT_DEBOUNCE;
    use crate::storage::{FileStore, MemoryStore};

    async fn setup_with(seed: Option<&str>) -> (Arc<MemoryStore>, Session) {
        let store = Arc::new(MemoryStore::new());
        if let Some(raw) = seed {
            store.set(RESUME_STORAGE_KEY, raw).await.unwrap();
        }
        let kv: Arc<dyn KeyValueStore> = store.clone();
        let session = Session::new(kv, DEFAULT_DEBOUNCE, letter_portrait()).unwrap();
        session.initialize().await;
        (store, session)
    }

    fn set_name(name: &str) -> FormEdit {
        FormEdit::SetHeader {
            field: HeaderField::Name,
            value: name.to_string(),
        }
    }

    fn stored(name: &str) -> String {
        let mut data = ResumeData::empty();
        data.header.name = name.to_string();
        serde_json::to_string(&data).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_install_has_no_dialogs() {
        let (_store, session) = setup_with(None).await;
        let view = session.view().await;
        assert!(!view.modals.load_existing);
        assert!(!view.modals.reset_confirm);
        assert!(view.storage.initialized);
    }

    #[tokio::test]
    async fn test_load_dialog_blocks_edits_until_choice() {
        let (_store, session) = setup_with(Some(&stored("Ada"))).await;
        assert!(session.view().await.modals.load_existing);

        let err = session.apply_edit(&set_name("Bob")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(matches!(session.request_reset().await, Err(AppError::Conflict(_))));

        let view = session.load_existing().await.unwrap();
        assert_eq!(view.resume.header.name, "Ada");
        assert!(!view.modals.load_existing);

        let view = session.apply_edit(&set_name("Ada L.")).await.unwrap();
        assert_eq!(view.resume.header.name, "Ada L.");
    }

    #[tokio::test]
    async fn test_start_fresh_closes_dialog_with_empty_model() {
        let (_store, session) = setup_with(Some(&stored("Ada"))).await;
        let view = session.start_fresh().await.unwrap();
        assert_eq!(view.resume.header.name, "");
        assert!(!view.modals.load_existing);
        assert!(matches!(session.load_existing().await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cancel_reset_leaves_state_unchanged() {
        let (_store, session) = setup_with(None).await;
        let before = session.apply_edit(&set_name("Ada")).await.unwrap().resume;

        assert!(session.request_reset().await.unwrap().modals.reset_confirm);
        let view = session.cancel_reset().await;
        assert!(!view.modals.reset_confirm);
        assert_eq!(view.resume, before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_reset_deletes_entry_and_empties_model() {
        let (store, session) = setup_with(None).await;
        session.apply_edit(&set_name("Ada")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(store.get(RESUME_STORAGE_KEY).await.unwrap().is_some());

        assert!(matches!(session.confirm_reset().await, Err(AppError::Conflict(_))));
        session.request_reset().await.unwrap();
        let view = session.confirm_reset().await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(store.get(RESUME_STORAGE_KEY).await.unwrap(), None);
        assert!(!view.modals.reset_confirm);
        assert_eq!(view.resume.header, ResumeData::empty().header);
        assert_eq!(view.resume.key_highlights, vec![String::new()]);
        assert_eq!(view.resume.professional_experience.len(), 1);
        assert_eq!(view.resume.professional_experience[0].job_title, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_rapid_edits_write_once() {
        let (store, session) = setup_with(None).await;
        for name in ["A", "Ad", "Ada", "Ada ", "Ada L"] {
            session.apply_edit(&set_name(name)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(store.write_count(), 1);
        let raw = store.get(RESUME_STORAGE_KEY).await.unwrap().unwrap();
        let persisted: ResumeData = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, session.view().await.resume);
        assert_eq!(persisted.header.name, "Ada L");
    }

    #[tokio::test]
    async fn test_preview_tracks_edits() {
        let (_store, session) = setup_with(None).await;
        assert!(session.preview().await.sections.is_empty());

        session
            .apply_edit(&FormEdit::SetProfileOverview {
                value: "Engineer of engines".into(),
            })
            .await
            .unwrap();
        let doc = session.preview().await;
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].kind(), SectionKind::ProfileOverview);
        assert!(session.preview_html().await.unwrap().contains("Engineer of engines"));
    }

    #[tokio::test]
    async fn test_export_uses_header_name_and_unknown_target_fails() {
        let (_store, session) = setup_with(None).await;
        session.apply_edit(&set_name("Ada Lovelace")).await.unwrap();

        match session.export(PREVIEW_TARGET_ID, None).await {
            ExportOutcome::Completed(pdf) => assert_eq!(pdf.file_name, "Resume_Ada_Lovelace.pdf"),
            other => panic!("expected completed export, got {other:?}"),
        }
        assert!(matches!(
            session.export("missing-target", None).await,
            ExportOutcome::Failed
        ));
        assert!(!session.is_exporting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unusable_data_directory_still_edits() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file").unwrap();
        let store = FileStore::open(blocker.join("data"), 1024).await;

        let session = Session::new(Arc::new(store), DEFAULT_DEBOUNCE, letter_portrait()).unwrap();
        session.initialize().await;
        let view = session.view().await;
        assert!(view.storage.initialized);
        assert!(!view.storage.has_stored_data);
        assert!(!view.modals.load_existing);

        let view = session.apply_edit(&set_name("Ada")).await.unwrap();
        assert_eq!(view.resume.header.name, "Ada");
        tokio::time::sleep(Duration::from_millis(400)).await;

        let view = session.view().await;
        assert_eq!(view.resume.header.name, "Ada");
        assert_eq!(view.storage.last_saved_at, None);
    }
}
