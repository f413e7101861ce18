// WebSocket handler: latest view on connect, then every new view

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::DashboardView;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        // Subscribe before reading the latest view so no update falls in between.
        let mut rx = state.updates_tx.subscribe();
        let initial = state.latest_rx.borrow().clone();
        if let Err(e) = stream_dashboard(socket, initial, &mut rx).await {
            tracing::info!("Dashboard stream error: {}", e);
        }
    })
}

/// Sends `msg` with a timeout; false when the client is gone or too slow.
async fn send(socket: &mut WebSocket, msg: Message) -> bool {
    matches!(timeout(WS_SEND_TIMEOUT, socket.send(msg)).await, Ok(Ok(())))
}

async fn stream_dashboard(
    mut socket: WebSocket,
    initial: Option<DashboardView>,
    rx: &mut broadcast::Receiver<DashboardView>,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to dashboard stream");

    if let Some(view) = initial {
        let json = serde_json::to_string(&view)?;
        if !send(&mut socket, Message::Text(json.into())).await {
            return Ok(());
        }
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(view) => {
                        let json = serde_json::to_string(&view)?;
                        if !send(&mut socket, Message::Text(json.into())).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket /ws/dashboard client lagged, skipped {} views", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = ping_interval.tick() => {
                if !send(&mut socket, Message::Ping(Bytes::new())).await {
                    break;
                }
            }
        }
    }
    Ok(())
}
