// =============================================================================
// WebSocket Handler — per-run progress feed
// =============================================================================
//
// Clients connect to `/api/v1/ws?session_id=<id>` and receive the run's
// progress events as JSON text frames until the terminal event, after which
// the server closes the connection.
//
// Late subscribers (connecting after the run already finished) get a single
// synthesized terminal event from the session-store snapshot, since the
// run's broadcast channel is torn down on completion.
//
// The handler also responds to Ping frames with Pong frames and exits on
// client Close.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::progress::ProgressEvent;
use crate::session::SessionStatus;

// =============================================================================
// Query parameters
// =============================================================================

#[derive(Deserialize)]
pub struct WsQuery {
    session_id: Option<String>,
}

// =============================================================================
// WebSocket upgrade handler
// =============================================================================

/// Axum handler for the WebSocket upgrade request.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<WsQuery>,
) -> impl IntoResponse {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        warn!("WebSocket connection rejected: missing session_id");
        return (
            axum::http::StatusCode::BAD_REQUEST,
            "session_id query parameter is required",
        )
            .into_response();
    };

    if state.sessions.get(&session_id).is_none() {
        warn!(session_id = %session_id, "WebSocket connection rejected: unknown session");
        return (axum::http::StatusCode::NOT_FOUND, "unknown session").into_response();
    }

    info!(session_id = %session_id, "WebSocket connection accepted, upgrading");
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state, session_id))
        .into_response()
}

// =============================================================================
// Connection handler
// =============================================================================

/// Forward one run's progress events until the terminal event or disconnect.
async fn handle_ws_connection(socket: WebSocket, state: Arc<AppState>, session_id: String) {
    let (mut sender, mut receiver) = socket.split();

    // Already-terminal run: synthesize the terminal event and close.
    let Some(mut rx) = state.progress.subscribe(&session_id) else {
        if let Some(event) = terminal_snapshot(&state, &session_id) {
            if send_event(&mut sender, &event).await.is_err() {
                debug!(session_id = %session_id, "terminal snapshot send failed");
            }
        }
        let _ = sender.send(Message::Close(None)).await;
        return;
    };

    loop {
        tokio::select! {
            // ── Forward loop: relay progress events ─────────────────────
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        let terminal = event.is_terminal();
                        if let Err(e) = send_event(&mut sender, &event).await {
                            debug!(session_id = %session_id, error = %e, "WebSocket send failed, disconnecting");
                            break;
                        }
                        if terminal {
                            let _ = sender.send(Message::Close(None)).await;
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // Updates carry absolute percentages; skipping is safe.
                        debug!(session_id = %session_id, missed, "WebSocket subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        // Channel torn down after terminal: fall back to the
                        // session snapshot in case we missed the last event.
                        if let Some(event) = terminal_snapshot(&state, &session_id) {
                            let _ = send_event(&mut sender, &event).await;
                        }
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                }
            }

            // ── Recv loop: process incoming messages ────────────────────
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            debug!(error = %e, "failed to send Pong, disconnecting");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(session_id = %session_id, "WebSocket closed by client");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Text/Binary/Pong frames carry nothing for us.
                    }
                    Some(Err(e)) => {
                        warn!(session_id = %session_id, error = %e, "WebSocket receive error, disconnecting");
                        break;
                    }
                }
            }
        }
    }

    debug!(session_id = %session_id, "WebSocket connection finished");
}

// =============================================================================
// Helpers
// =============================================================================

async fn send_event<S>(sender: &mut S, event: &ProgressEvent) -> Result<(), axum::Error>
where
    S: futures_util::Sink<Message, Error = axum::Error> + Unpin,
{
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(e) => {
            // Serialization errors are not network errors; don't disconnect.
            warn!(error = %e, "failed to serialize progress event");
            Ok(())
        }
    }
}

/// Build the terminal event a late subscriber would have missed.
fn terminal_snapshot(state: &Arc<AppState>, session_id: &str) -> Option<ProgressEvent> {
    let session = state.sessions.get(session_id)?;
    match session.status {
        SessionStatus::Completed => Some(ProgressEvent::Completed {
            report_id: session.id,
        }),
        SessionStatus::Error => Some(ProgressEvent::Error {
            error: session
                .error
                .unwrap_or_else(|| "analysis failed".to_string()),
        }),
        SessionStatus::Running => None,
    }
}
