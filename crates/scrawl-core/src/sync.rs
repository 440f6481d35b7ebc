//! WebSocket client for the relay server.
//!
//! Defines the JSON wire protocol shared with `scrawl-server` and a native
//! [`SocketBackend`] that implements [`LiveBackend`] over it.

use crate::collaboration::{BackendEvent, Keyed, LiveBackend, SyncError, SyncResult};
use crate::shapes::{ShapeAnnotation, Stroke};
use serde::{Deserialize, Serialize};

/// Messages sent to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start receiving a board's children
    Subscribe { board: String },
    /// Stop receiving a board's children
    Unsubscribe { board: String },
    /// Append a stroke under a client-generated key
    AppendStroke {
        board: String,
        key: String,
        stroke: Stroke,
    },
    /// Append a shape under a client-generated key
    AppendShape {
        board: String,
        key: String,
        shape: ShapeAnnotation,
    },
    /// Set the shared clear timestamp (ms since the epoch) under a
    /// client-generated key
    SetLastCleared { board: String, key: String, at: u64 },
}

/// Messages received from the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Snapshot sent in reply to `subscribe`
    Subscribed {
        board: String,
        #[serde(default)]
        strokes: Vec<Keyed<Stroke>>,
        #[serde(default)]
        shapes: Vec<Keyed<ShapeAnnotation>>,
        #[serde(default)]
        last_cleared: Option<Keyed<u64>>,
    },
    StrokeAdded {
        board: String,
        key: String,
        stroke: Stroke,
    },
    ShapeAdded {
        board: String,
        key: String,
        shape: ShapeAnnotation,
    },
    LastCleared { board: String, key: String, at: u64 },
    /// Error message
    Error { message: String },
}

impl ServerMessage {
    /// Flatten into backend notifications. A snapshot replays its children
    /// followed by the current clear timestamp.
    pub fn into_events(self) -> Vec<BackendEvent> {
        match self {
            ServerMessage::Subscribed {
                board,
                strokes,
                shapes,
                last_cleared,
            } => {
                let mut events = Vec::with_capacity(strokes.len() + shapes.len() + 1);
                events.extend(strokes.into_iter().map(|child| BackendEvent::StrokeAdded {
                    board: board.clone(),
                    key: child.key,
                    stroke: child.value,
                }));
                events.extend(shapes.into_iter().map(|child| BackendEvent::ShapeAdded {
                    board: board.clone(),
                    key: child.key,
                    shape: child.value,
                }));
                events.push(BackendEvent::LastCleared {
                    board,
                    cleared: last_cleared,
                });
                events
            }
            ServerMessage::StrokeAdded { board, key, stroke } => {
                vec![BackendEvent::StrokeAdded { board, key, stroke }]
            }
            ServerMessage::ShapeAdded { board, key, shape } => {
                vec![BackendEvent::ShapeAdded { board, key, shape }]
            }
            ServerMessage::LastCleared { board, key, at } => vec![BackendEvent::LastCleared {
                board,
                cleared: Some(Keyed::new(key, at)),
            }],
            ServerMessage::Error { message } => vec![BackendEvent::Error(message)],
        }
    }
}

const LOG_PREVIEW_CHARS: usize = 100;

/// Leading characters of a message for debug logs.
fn preview(text: &str) -> &str {
    text.char_indices()
        .nth(LOG_PREVIEW_CHARS)
        .map_or(text, |(end, _)| &text[..end])
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events from the WebSocket client
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Connected to server
    Connected,
    /// Disconnected from server
    Disconnected,
    /// Parsed message from the server
    Received(ServerMessage),
    /// Error occurred
    Error { message: String },
}

// ============================================================================
// Native WebSocket Client
// ============================================================================

mod native_client {
    use super::*;
    use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;
    use tungstenite::{Message, connect};
    use url::Url;

    /// Commands sent to the WebSocket thread.
    enum WsCommand {
        Send(String),
        Close,
    }

    /// WebSocket client for native platforms.
    ///
    /// Uses a background thread for non-blocking operation. Messages sent
    /// before the handshake completes are queued in the command channel.
    pub struct NativeWebSocket {
        state: ConnectionState,
        events: Vec<SyncEvent>,
        /// Channel to send commands to the WebSocket thread.
        cmd_tx: Option<Sender<WsCommand>>,
        /// Channel to receive events from the WebSocket thread.
        event_rx: Option<Receiver<SyncEvent>>,
        /// Handle to the WebSocket thread.
        _thread: Option<JoinHandle<()>>,
    }

    impl NativeWebSocket {
        /// Create a new disconnected WebSocket client.
        pub fn new() -> Self {
            Self {
                state: ConnectionState::Disconnected,
                events: Vec::new(),
                cmd_tx: None,
                event_rx: None,
                _thread: None,
            }
        }

        /// Connect to a WebSocket server.
        pub fn connect(&mut self, url: &str) -> SyncResult<()> {
            if self.cmd_tx.is_some() {
                return Err(SyncError::Connect("Already connected".to_string()));
            }

            let parsed_url = Url::parse(url).map_err(|e| SyncError::Connect(format!("Invalid URL: {e}")))?;
            if parsed_url.scheme() != "ws" && parsed_url.scheme() != "wss" {
                return Err(SyncError::Connect(format!(
                    "Invalid WebSocket URL scheme: {}",
                    parsed_url.scheme()
                )));
            }

            self.state = ConnectionState::Connecting;

            let (cmd_tx, cmd_rx) = channel::<WsCommand>();
            let (event_tx, event_rx) = channel::<SyncEvent>();

            let url = url.to_string();

            let handle = thread::spawn(move || {
                log::info!("WebSocket thread: connecting to {}", url);

                match connect(&url) {
                    Ok((mut socket, response)) => {
                        log::info!("WebSocket connected, status: {}", response.status());
                        let _ = event_tx.send(SyncEvent::Connected);

                        // Short read timeout so the loop can service outgoing commands.
                        if let tungstenite::stream::MaybeTlsStream::Plain(tcp) = socket.get_mut() {
                            let _ = tcp.set_read_timeout(Some(Duration::from_millis(50)));
                            let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
                        }

                        loop {
                            match cmd_rx.try_recv() {
                                Ok(WsCommand::Send(msg)) => {
                                    log::debug!("WebSocket sending: {}", preview(&msg));
                                    if let Err(e) = socket.send(Message::Text(msg)) {
                                        log::error!("WebSocket send error: {}", e);
                                        let _ = event_tx.send(SyncEvent::Error {
                                            message: format!("Send failed: {e}"),
                                        });
                                        break;
                                    }
                                    // Drain the rest of the queue before blocking on a read.
                                    continue;
                                }
                                Ok(WsCommand::Close) => {
                                    log::info!("WebSocket close requested");
                                    let _ = socket.close(None);
                                    break;
                                }
                                Err(TryRecvError::Disconnected) => {
                                    log::info!("WebSocket command channel disconnected");
                                    break;
                                }
                                Err(TryRecvError::Empty) => {}
                            }

                            match socket.read() {
                                Ok(Message::Text(txt)) => {
                                    log::debug!("WebSocket received: {}", preview(&txt));
                                    match serde_json::from_str::<ServerMessage>(&txt) {
                                        Ok(msg) => {
                                            let _ = event_tx.send(SyncEvent::Received(msg));
                                        }
                                        Err(e) => log::warn!("Failed to parse server message: {}", e),
                                    }
                                }
                                Ok(Message::Ping(data)) => {
                                    let _ = socket.send(Message::Pong(data));
                                }
                                Ok(Message::Close(_)) => {
                                    log::info!("WebSocket received close frame");
                                    break;
                                }
                                Ok(_) => {}
                                Err(tungstenite::Error::Io(ref e))
                                    if e.kind() == std::io::ErrorKind::WouldBlock
                                        || e.kind() == std::io::ErrorKind::TimedOut =>
                                {
                                    continue;
                                }
                                Err(e) => {
                                    log::error!("WebSocket read error: {}", e);
                                    break;
                                }
                            }
                        }

                        log::info!("WebSocket thread exiting");
                        let _ = event_tx.send(SyncEvent::Disconnected);
                    }
                    Err(e) => {
                        log::error!("WebSocket connection failed: {}", e);
                        let _ = event_tx.send(SyncEvent::Error {
                            message: format!("Connection failed: {}", e),
                        });
                    }
                }
            });

            self.cmd_tx = Some(cmd_tx);
            self.event_rx = Some(event_rx);
            self._thread = Some(handle);

            Ok(())
        }

        /// Disconnect from the server.
        pub fn disconnect(&mut self) {
            if let Some(tx) = self.cmd_tx.take() {
                let _ = tx.send(WsCommand::Close);
            }
            self.event_rx = None;
            self._thread = None;
            self.state = ConnectionState::Disconnected;
        }

        /// Queue a text message.
        pub fn send(&self, msg: &str) -> SyncResult<()> {
            match self.cmd_tx {
                Some(ref tx) => tx
                    .send(WsCommand::Send(msg.to_string()))
                    .map_err(|e| SyncError::Send(e.to_string())),
                None => Err(SyncError::NotConnected),
            }
        }

        /// Poll for pending events (non-blocking).
        pub fn poll_events(&mut self) -> Vec<SyncEvent> {
            if let Some(ref rx) = self.event_rx {
                while let Ok(event) = rx.try_recv() {
                    match &event {
                        SyncEvent::Connected => self.state = ConnectionState::Connected,
                        SyncEvent::Disconnected => self.state = ConnectionState::Disconnected,
                        SyncEvent::Error { .. } => self.state = ConnectionState::Error,
                        SyncEvent::Received(_) => {}
                    }
                    self.events.push(event);
                }
            }

            std::mem::take(&mut self.events)
        }

        /// Get current connection state.
        pub fn state(&self) -> ConnectionState {
            self.state
        }

        /// Check if connected.
        pub fn is_connected(&self) -> bool {
            self.state == ConnectionState::Connected
        }
    }

    impl Default for NativeWebSocket {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for NativeWebSocket {
        fn drop(&mut self) {
            self.disconnect();
        }
    }
}

pub use native_client::NativeWebSocket;

/// [`LiveBackend`] backed by the relay server.
pub struct SocketBackend {
    socket: NativeWebSocket,
}

impl SocketBackend {
    /// Open a connection to `url` (`ws://` or `wss://`). The handshake
    /// completes in the background.
    pub fn connect(url: &str) -> SyncResult<Self> {
        let mut socket = NativeWebSocket::new();
        socket.connect(url)?;
        Ok(Self { socket })
    }

    pub fn state(&self) -> ConnectionState {
        self.socket.state()
    }

    fn send(&self, msg: &ClientMessage) -> SyncResult<()> {
        let json = serde_json::to_string(msg)?;
        self.socket.send(&json)
    }
}

impl LiveBackend for SocketBackend {
    fn append_stroke(&mut self, board: &str, key: &str, stroke: &Stroke) -> SyncResult<()> {
        self.send(&ClientMessage::AppendStroke {
            board: board.to_string(),
            key: key.to_string(),
            stroke: stroke.clone(),
        })
    }

    fn append_shape(&mut self, board: &str, key: &str, shape: &ShapeAnnotation) -> SyncResult<()> {
        self.send(&ClientMessage::AppendShape {
            board: board.to_string(),
            key: key.to_string(),
            shape: *shape,
        })
    }

    fn set_last_cleared(&mut self, board: &str, key: &str, at: u64) -> SyncResult<()> {
        self.send(&ClientMessage::SetLastCleared {
            board: board.to_string(),
            key: key.to_string(),
            at,
        })
    }

    fn subscribe(&mut self, board: &str) -> SyncResult<()> {
        self.send(&ClientMessage::Subscribe {
            board: board.to_string(),
        })
    }

    fn unsubscribe(&mut self, board: &str) -> SyncResult<()> {
        self.send(&ClientMessage::Unsubscribe {
            board: board.to_string(),
        })
    }

    fn poll_events(&mut self) -> Vec<BackendEvent> {
        let mut events = Vec::new();
        for event in self.socket.poll_events() {
            match event {
                SyncEvent::Connected => log::info!("Live backend connected"),
                SyncEvent::Disconnected => {
                    events.push(BackendEvent::Error("Disconnected from relay".to_string()))
                }
                SyncEvent::Received(msg) => events.extend(msg.into_events()),
                SyncEvent::Error { message } => events.push(BackendEvent::Error(message)),
            }
        }
        events
    }
}
