use axum::{extract::State, response::Html, Json};

use crate::editor::FormEdit;
use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::preview::PreviewDocument;
use crate::session::SessionView;
use crate::state::AppState;

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.view().await)
}

/// POST /api/v1/session/load
pub async fn handle_load_existing(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.session.load_existing().await?))
}

/// POST /api/v1/session/fresh
pub async fn handle_start_fresh(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.session.start_fresh().await?))
}

/// POST /api/v1/session/reset
pub async fn handle_request_reset(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.session.request_reset().await?))
}

/// POST /api/v1/session/reset/cancel
pub async fn handle_cancel_reset(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.cancel_reset().await)
}

/// POST /api/v1/session/reset/confirm
pub async fn handle_confirm_reset(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.session.confirm_reset().await?))
}

/// POST /api/v1/resume/edits
pub async fn handle_apply_edit(
    State(state): State<AppState>,
    Json(edit): Json<FormEdit>,
) -> Result<Json<SessionView>, AppError> {
    tracing::debug!(?edit, "Applying form edit");
    Ok(Json(state.session.apply_edit(&edit).await?))
}

/// PUT /api/v1/resume
pub async fn handle_replace_resume(
    State(state): State<AppState>,
    Json(data): Json<ResumeData>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.session.replace_resume(data).await?))
}

/// GET /api/v1/preview
pub async fn handle_get_preview(State(state): State<AppState>) -> Json<PreviewDocument> {
    Json(state.session.preview().await)
}

/// GET /api/v1/preview/html
pub async fn handle_get_preview_html(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.session.preview_html().await?))
}
