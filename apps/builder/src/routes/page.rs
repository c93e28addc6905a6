use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct PageAssets;

/// GET /
/// Serves the two-pane editor page compiled into the binary.
pub async fn index_handler() -> Response {
    match PageAssets::get("index.html") {
        Some(file) => Html(file.data.into_owned()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "editor page not bundled",
        )
            .into_response(),
    }
}
