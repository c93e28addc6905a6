use std::sync::Arc;

use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Single editing session; the editor page is one client at a time.
    pub session: Arc<Session>,
}
