//! WebSocket handler for live reload.
//!
//! Forwards reload events to connected browsers.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast;

use super::manager::ReloadEvent;
use crate::state::AppState;

/// Handle WebSocket upgrade for live reload.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let Some(ref live_reload) = state.live_reload else {
        return;
    };

    let mut receiver: broadcast::Receiver<ReloadEvent> = live_reload.subscribe();

    loop {
        tokio::select! {
            result = receiver.recv() => {
                match result {
                    Ok(event) => {
                        let Ok(msg) = serde_json::to_string(&event) else {
                            continue;
                        };
                        if socket.send(Message::Text(msg.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    // A burst outran this client; the next event still reloads it
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Live reload client lagged");
                    }
                }
            }
            // Client messages only keep the connection alive
            result = socket.recv() => {
                if !matches!(result, Some(Ok(_))) {
                    break;
                }
            }
        }
    }
}
