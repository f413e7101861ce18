// HTTP + WebSocket routes serving the published dashboard view

mod http;
mod ws;

use axum::{Router, routing::get};
use tokio::sync::{broadcast, watch};
use tower_http::cors::{Any, CorsLayer};

use crate::dashboard::ViewPublisher;
use crate::models::DashboardView;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) latest_rx: watch::Receiver<Option<DashboardView>>,
    pub(crate) updates_tx: broadcast::Sender<DashboardView>,
}

pub fn app(publisher: &ViewPublisher) -> Router {
    let state = AppState {
        latest_rx: publisher.subscribe_latest(),
        updates_tx: publisher.updates_tx.clone(),
    };
    Router::new()
        .route("/", get(|| async { "statboard: community stats dashboard" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/dashboard", get(http::dashboard_handler)) // GET /api/dashboard
        .route("/api/hourly", get(http::hourly_handler)) // GET /api/hourly
        .route("/api/recent", get(http::recent_handler)) // GET /api/recent
        .route("/ws/dashboard", get(ws::ws_dashboard)) // WS /ws/dashboard
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
