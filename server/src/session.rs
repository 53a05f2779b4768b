//! Per-connection lifecycle: the axum WebSocket gateway and `/health`
//! endpoint (§4.8, §6 Transport, §10.5).
//!
//! Grounded on `flyingrobots-echo`'s `echo-session-ws-gateway` crate (axum
//! `ws` feature, one task per socket forwarding parsed frames into a shared
//! worker) and `gerdoe-jr-dd-pg`'s `base-http` crate for the axum+tokio
//! shape of the router itself.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::debug;

use shared::ids::PlayerId;
use shared::protocol::{ClientEvent, ServerEvent};

/// Messages the socket-handling tasks forward into the single `Room`-owning
/// worker task (§5).
pub enum WorkerMsg {
    Connect {
        player_id: PlayerId,
        external_player_key: Option<String>,
        outbox: mpsc::UnboundedSender<ServerEvent>,
    },
    ClientEvent {
        player_id: PlayerId,
        event: ClientEvent,
    },
    Disconnect {
        player_id: PlayerId,
    },
    HubNameResolved {
        player_id: PlayerId,
        name: String,
    },
    ScoreSubmitted {
        player_id: PlayerId,
        ok: bool,
    },
}

#[derive(Clone)]
pub struct AppState {
    pub worker_tx: mpsc::Sender<WorkerMsg>,
    pub user_count: Arc<AtomicUsize>,
}

#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    #[serde(rename = "playerKey")]
    pub player_key: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params.player_key))
}

async fn handle_socket(socket: WebSocket, state: AppState, player_key: Option<String>) {
    let player_id = PlayerId::next();
    let (mut sink, mut stream) = socket.split();
    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<ServerEvent>();

    state.user_count.fetch_add(1, Ordering::Relaxed);

    if state
        .worker_tx
        .send(WorkerMsg::Connect { player_id, external_player_key: player_key, outbox: outbox_tx })
        .await
        .is_err()
    {
        return;
    }

    let write_task = tokio::spawn(async move {
        while let Some(event) = outbox_rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else { continue };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        let Message::Text(text) = message else { continue };
        match serde_json::from_str::<ClientEvent>(&text) {
            Ok(event) => {
                if state.worker_tx.send(WorkerMsg::ClientEvent { player_id, event }).await.is_err() {
                    break;
                }
            }
            Err(error) => {
                debug!(%player_id, %error, "dropped frame that failed to parse against any known event");
            }
        }
    }

    write_task.abort();
    state.user_count.fetch_sub(1, Ordering::Relaxed);
    let _ = state.worker_tx.send(WorkerMsg::Disconnect { player_id }).await;
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "users": state.user_count.load(Ordering::Relaxed),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
