//! WebSocket connection handling.

use crate::state::AppState;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use scrawl_core::sync::{ClientMessage, ServerMessage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

const OUTBOX_CAPACITY: usize = 256;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forward one board's notifications into the connection's outbox.
fn forward(
    board: String,
    mut rx: broadcast::Receiver<ServerMessage>,
    outbox: mpsc::Sender<ServerMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if outbox.send(msg).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Subscriber of {} lagged by {} messages", board, skipped);
                    let msg = ServerMessage::Error {
                        message: format!("Missed {} updates on board {}", skipped, board),
                    };
                    if outbox.send(msg).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn encode(msg: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(msg) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            warn!("Failed to encode server message: {}", e);
            None
        }
    }
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let peer_id = Uuid::new_v4().to_string();
    info!("New connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (outbox_tx, mut outbox_rx) = mpsc::channel::<ServerMessage>(OUTBOX_CAPACITY);
    let mut subscriptions: HashMap<String, JoinHandle<()>> = HashMap::new();

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let client_msg = match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(client_msg) => client_msg,
                            Err(e) => {
                                warn!("Invalid message from {}: {}", peer_id, e);
                                let err = ServerMessage::Error {
                                    message: format!("Invalid message: {}", e),
                                };
                                if let Some(reply) = encode(&err) {
                                    if sender.send(reply).await.is_err() {
                                        break;
                                    }
                                }
                                continue;
                            }
                        };
                        match client_msg {
                            ClientMessage::Subscribe { board } => {
                                let (snapshot, rx) = state.subscribe(&board);
                                if let Some(previous) = subscriptions.remove(&board) {
                                    previous.abort();
                                }
                                // Written directly: this loop is the outbox's only reader.
                                if let Some(reply) = encode(&snapshot) {
                                    if sender.send(reply).await.is_err() {
                                        break;
                                    }
                                }
                                subscriptions.insert(board.clone(), forward(board.clone(), rx, outbox_tx.clone()));
                                info!("Peer {} subscribed to {}", peer_id, board);
                            }
                            ClientMessage::Unsubscribe { board } => {
                                if let Some(task) = subscriptions.remove(&board) {
                                    task.abort();
                                    info!("Peer {} unsubscribed from {}", peer_id, board);
                                }
                            }
                            ClientMessage::AppendStroke { board, key, stroke } => {
                                debug!("Peer {} appended stroke {} to {}", peer_id, key, board);
                                state.append_stroke(&board, key, stroke);
                            }
                            ClientMessage::AppendShape { board, key, shape } => {
                                debug!("Peer {} appended shape {} to {}", peer_id, key, board);
                                state.append_shape(&board, key, shape);
                            }
                            ClientMessage::SetLastCleared { board, key, at } => {
                                info!("Peer {} cleared {}", peer_id, board);
                                state.set_last_cleared(&board, key, at);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Ok(_)) => {} // Ignore binary/ping/pong
                    Some(Err(e)) => {
                        warn!("WebSocket error for {}: {}", peer_id, e);
                        break;
                    }
                }
            }

            Some(server_msg) = outbox_rx.recv() => {
                if let Some(msg) = encode(&server_msg) {
                    if sender.send(msg).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    for (_, task) in subscriptions.drain() {
        task.abort();
    }
    info!("Connection closed: {}", peer_id);
}
