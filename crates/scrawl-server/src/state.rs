//! Shared board state held by the relay.

use dashmap::DashMap;
use scrawl_core::collaboration::Keyed;
use scrawl_core::shapes::{ShapeAnnotation, Stroke};
use scrawl_core::sync::ServerMessage;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// One board's collections plus its notification channel.
pub struct Board {
    tx: broadcast::Sender<ServerMessage>,
    strokes: Vec<Keyed<Stroke>>,
    shapes: Vec<Keyed<ShapeAnnotation>>,
    last_cleared: Option<Keyed<u64>>,
}

impl Board {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            strokes: Vec::new(),
            shapes: Vec::new(),
            last_cleared: None,
        }
    }

    fn notify(&self, msg: ServerMessage) {
        // No receivers just means nobody is subscribed right now.
        let _ = self.tx.send(msg);
    }
}

/// All boards, keyed by board id.
#[derive(Default)]
pub struct AppState {
    boards: DashMap<String, Board>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a board and start receiving its changes.
    ///
    /// Both happen under the board's entry lock, so no append can fall
    /// between the snapshot and the first notification.
    pub fn subscribe(&self, board_id: &str) -> (ServerMessage, broadcast::Receiver<ServerMessage>) {
        let board = self
            .boards
            .entry(board_id.to_string())
            .or_insert_with(Board::new);
        let rx = board.tx.subscribe();
        let snapshot = ServerMessage::Subscribed {
            board: board_id.to_string(),
            strokes: board.strokes.clone(),
            shapes: board.shapes.clone(),
            last_cleared: board.last_cleared.clone(),
        };
        (snapshot, rx)
    }

    pub fn append_stroke(&self, board_id: &str, key: String, stroke: Stroke) {
        let mut board = self
            .boards
            .entry(board_id.to_string())
            .or_insert_with(Board::new);
        board.strokes.push(Keyed::new(key.clone(), stroke.clone()));
        board.notify(ServerMessage::StrokeAdded {
            board: board_id.to_string(),
            key,
            stroke,
        });
    }

    pub fn append_shape(&self, board_id: &str, key: String, shape: ShapeAnnotation) {
        let mut board = self
            .boards
            .entry(board_id.to_string())
            .or_insert_with(Board::new);
        board.shapes.push(Keyed::new(key.clone(), shape));
        board.notify(ServerMessage::ShapeAdded {
            board: board_id.to_string(),
            key,
            shape,
        });
    }

    /// Record a clear: the board's collections are emptied.
    pub fn set_last_cleared(&self, board_id: &str, key: String, at: u64) {
        let mut board = self
            .boards
            .entry(board_id.to_string())
            .or_insert_with(Board::new);
        board.strokes.clear();
        board.shapes.clear();
        board.last_cleared = Some(Keyed::new(key.clone(), at));
        board.notify(ServerMessage::LastCleared {
            board: board_id.to_string(),
            key,
            at,
        });
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    pub fn stroke_count(&self, board_id: &str) -> usize {
        self.boards.get(board_id).map_or(0, |b| b.strokes.len())
    }
}
