//! Scrawl WebSocket Relay Server
//!
//! A live document backend for Scrawl boards. Each board keeps ordered
//! `strokes` and `shapes` collections and a `lastCleared` timestamp;
//! every write is broadcast to all subscribers of the board, the writer
//! included.
//!
//! ## Protocol
//!
//! Messages are JSON with a `type` tag:
//! ```json
//! { "type": "subscribe", "board": "board-id" }
//! { "type": "append_stroke", "board": "board-id", "key": "k1", "stroke": { "lines": [] } }
//! { "type": "set_last_cleared", "board": "board-id", "key": "c1", "at": 1700000000000 }
//! ```

mod state;
mod ws;

use axum::{Router, routing::get};
use state::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

const DEFAULT_ADDR: &str = "0.0.0.0:3030";

/// Build the router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scrawl_server=info,tower_http=info".into()),
        )
        .init();

    let addr: SocketAddr = std::env::var("SCRAWL_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Scrawl relay server listening on {}", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    axum::serve(listener, app(Arc::new(AppState::new()))).await?;
    Ok(())
}

/// Index page
async fn index() -> &'static str {
    "Scrawl Relay Server - Connect via WebSocket at /ws"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}
