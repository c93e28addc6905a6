pub mod health;
pub mod page;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index_handler))
        .route("/health", get(health::health_handler))
        // Session + dialogs
        .route("/api/v1/session", get(session::handle_get_session))
        .route("/api/v1/session/load", post(session::handle_load_existing))
        .route("/api/v1/session/fresh", post(session::handle_start_fresh))
        .route("/api/v1/session/reset", post(session::handle_request_reset))
        .route(
            "/api/v1/session/reset/cancel",
            post(session::handle_cancel_reset),
        )
        .route(
            "/api/v1/session/reset/confirm",
            post(session::handle_confirm_reset),
        )
        // Editing
        .route("/api/v1/resume", put(session::handle_replace_resume))
        .route("/api/v1/resume/edits", post(session::handle_apply_edit))
        // Preview
        .route("/api/v1/preview", get(session::handle_get_preview))
        .route("/api/v1/preview/html", get(session::handle_get_preview_html))
        // Export
        .route("/api/v1/export", post(export::handle_export))
        .route("/api/v1/export/status", get(export::handle_export_status))
        .with_state(state)
}
