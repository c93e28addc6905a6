//! PDF export of the rendered preview.
//!
//! Only one export runs at a time: the in-progress flag is taken with a
//! compare-and-swap and released by a drop guard, so a panicking or
//! cancelled render still returns the exporter to idle. Failures are logged
//! and reported as [`ExportOutcome::Failed`]; nothing is retried.

pub mod handlers;
pub mod layout;
pub mod pdf;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::export::layout::PageConfig;
use crate::preview::PreviewDocument;

pub const DEFAULT_FILE_NAME: &str = "Resume.pdf";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("render target not found: {0}")]
    MissingTarget(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("PDF render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub enum ExportOutcome {
    Completed(ExportedPdf),
    /// Another export holds the in-progress flag.
    Busy,
    Failed,
}

struct GeneratingGuard(Arc<AtomicBool>);

impl Drop for GeneratingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct PdfExporter {
    config: PageConfig,
    generating: Arc<AtomicBool>,
}

impl PdfExporter {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            generating: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    fn try_begin(&self) -> Option<GeneratingGuard> {
        self.generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| GeneratingGuard(Arc::clone(&self.generating)))
    }

    /// Exports the located preview under `file_name`. `target` is `None` when
    /// nothing is rendered under `target_id`.
    pub async fn export(
        &self,
        target_id: &str,
        target: Option<PreviewDocument>,
        file_name: &str,
    ) -> ExportOutcome {
        let Some(doc) = target else {
            error!("{}", ExportError::MissingTarget(target_id.to_string()));
            return ExportOutcome::Failed;
        };
        let Some(_guard) = self.try_begin() else {
            info!("Export already in progress, ignoring request");
            return ExportOutcome::Busy;
        };

        info!(file_name, "Generating PDF");
        let config = self.config.clone();
        let title = file_name.to_string();
        let rendered = tokio::task::spawn_blocking(move || pdf::render_pdf(&doc, &config, &title))
            .await
            .map_err(ExportError::from)
            .and_then(|result| result);

        match rendered {
            Ok(bytes) => {
                info!(file_name, size = bytes.len(), "PDF generated");
                ExportOutcome::Completed(ExportedPdf {
                    file_name: file_name.to_string(),
                    bytes,
                })
            }
            Err(e) => {
                error!("Error generating PDF: {e}");
                ExportOutcome::Failed
            }
        }
    }
}

/// `Resume_<name>.pdf` with whitespace runs collapsed to `_`, or
/// [`DEFAULT_FILE_NAME`] when the name is blank.
pub fn pdf_file_name(header_name: &str) -> String {
    let parts: Vec<&str> = header_name.split_whitespace().collect();
    if parts.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }
    format!("Resume_{}.pdf", parts.join("_"))
}

/// Accepts a client-chosen download name. Rejects path separators and control
/// characters; appends `.pdf` when missing.
pub fn normalize_file_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty()
        || name.starts_with('.')
        || name.chars().any(|c| c == '/' || c == '\\' || c == '"' || c.is_control())
    {
        return None;
    }
    if name.to_ascii_lowercase().ends_with(".pdf") {
        Some(name.to_string())
    } else {
        Some(format!("{name}.pdf"))
    }
}
