// GET handlers: version, dashboard view and its sections

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::models::DashboardView;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /version — service name and version from Cargo.toml.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/dashboard — the full latest view.
pub(super) async fn dashboard_handler(State(state): State<AppState>) -> Response {
    with_view(&state, |view| Json(view.clone()).into_response())
}

/// GET /api/hourly — chart series only.
pub(super) async fn hourly_handler(State(state): State<AppState>) -> Response {
    with_view(&state, |view| Json(view.hourly.clone()).into_response())
}

/// GET /api/recent — recent-history table rows, newest first.
pub(super) async fn recent_handler(State(state): State<AppState>) -> Response {
    with_view(&state, |view| Json(view.recent.clone()).into_response())
}

fn with_view(state: &AppState, f: impl FnOnce(&DashboardView) -> Response) -> Response {
    match &*state.latest_rx.borrow() {
        Some(view) => f(view),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "dashboard not loaded yet" })),
        )
            .into_response(),
    }
}
