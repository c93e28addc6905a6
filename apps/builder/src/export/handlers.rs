use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::export::{normalize_file_name, ExportOutcome};
use crate::preview::PREVIEW_TARGET_ID;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub target_id: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportStatus {
    pub generating: bool,
}

/// POST /api/v1/export
/// Body is optional; without one the preview is exported under the name
/// derived from the header.
pub async fn handle_export(
    State(state): State<AppState>,
    body: Option<Json<ExportRequest>>,
) -> Result<Response, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let target_id = req.target_id.as_deref().unwrap_or(PREVIEW_TARGET_ID);
    let file_name = match req.file_name.as_deref() {
        Some(raw) => Some(
            normalize_file_name(raw).ok_or_else(|| AppError::Validation(format!("Invalid file name {raw:?}")))?,
        ),
        None => None,
    };

    match state.session.export(target_id, file_name).await {
        ExportOutcome::Completed(pdf) => Ok((
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", pdf.file_name),
                ),
            ],
            Bytes::from(pdf.bytes),
        )
            .into_response()),
        ExportOutcome::Busy => Err(AppError::Conflict("A PDF export is already in progress".to_string())),
        ExportOutcome::Failed => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// GET /api/v1/export/status
pub async fn handle_export_status(State(state): State<AppState>) -> Json<ExportStatus> {
    Json(ExportStatus {
        generating: state.session.is_exporting(),
    })
}
