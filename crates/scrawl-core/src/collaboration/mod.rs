//! Collaboration: mirroring the local document through a live backend.
//!
//! [`SyncBridge`] owns no document state. It publishes locally committed
//! strokes and shapes, and turns backend notifications into
//! [`RemoteChange`]s for the engine to apply.

mod backend;
mod memory;

pub use backend::{
    BackendEvent, BoardPaths, Keyed, LiveBackend, SyncError, SyncResult, new_board_id,
    new_record_key,
};
pub use memory::{MemoryBackend, MemoryHub};

use crate::shapes::{ShapeAnnotation, Stroke};
use std::collections::HashSet;

/// A remote edit the engine should apply locally.
#[derive(Debug)]
pub enum RemoteChange {
    StrokeAppended(Stroke),
    ShapeAppended(ShapeAnnotation),
    /// Another actor cleared the board.
    Cleared,
    Failed(SyncError),
}

/// Bridges the local engine and a [`LiveBackend`] for one board at a time.
pub struct SyncBridge {
    backend: Box<dyn LiveBackend>,
    paths: BoardPaths,
    /// Keys already applied locally, including our own writes.
    known_keys: HashSet<String>,
    /// The first `lastCleared` after subscribing is the current value, not a clear.
    awaiting_baseline: bool,
    last_cleared: Option<Keyed<u64>>,
    /// Key of our own clear until the backend echoes it back. Children
    /// delivered before that echo were appended before the clear.
    pending_clear: Option<String>,
    pending: Vec<RemoteChange>,
}

impl SyncBridge {
    /// Create a bridge and subscribe to `board_id`. A failed subscribe is
    /// reported through the next [`poll`](Self::poll).
    pub fn new(backend: Box<dyn LiveBackend>, board_id: &str) -> Self {
        let mut bridge = Self {
            backend,
            paths: BoardPaths::for_board(board_id),
            known_keys: HashSet::new(),
            awaiting_baseline: true,
            last_cleared: None,
            pending_clear: None,
            pending: Vec::new(),
        };
        if let Err(e) = bridge.backend.subscribe(board_id) {
            log::warn!("Subscribe to {} failed: {e}", bridge.paths.strokes);
            bridge.pending.push(RemoteChange::Failed(e));
        }
        bridge
    }

    pub fn board_id(&self) -> &str {
        &self.paths.board_id
    }

    pub fn paths(&self) -> &BoardPaths {
        &self.paths
    }

    /// Timestamp of the latest clear this bridge knows of.
    pub fn last_cleared(&self) -> Option<u64> {
        self.last_cleared.as_ref().map(|c| c.value)
    }

    /// Whether our own clear is still waiting for its echo.
    pub fn is_clearing(&self) -> bool {
        self.pending_clear.is_some()
    }

    /// Append a committed stroke under a fresh key.
    pub fn publish_stroke(&mut self, stroke: &Stroke) -> SyncResult<()> {
        let key = new_record_key();
        self.known_keys.insert(key.clone());
        self.backend
            .append_stroke(&self.paths.board_id, &key, stroke)
            .inspect_err(|e| log::warn!("Write to {} failed: {e}", self.paths.strokes))
    }

    /// Append a committed shape under a fresh key.
    pub fn publish_shape(&mut self, shape: &ShapeAnnotation) -> SyncResult<()> {
        let key = new_record_key();
        self.known_keys.insert(key.clone());
        self.backend
            .append_shape(&self.paths.board_id, &key, shape)
            .inspect_err(|e| log::warn!("Write to {} failed: {e}", self.paths.shapes))
    }

    /// Announce a whiteboard-wide clear at `at` (ms since the epoch).
    pub fn publish_clear(&mut self, at: u64) -> SyncResult<()> {
        let key = new_record_key();
        self.pending_clear = Some(key.clone());
        let result = self
            .backend
            .set_last_cleared(&self.paths.board_id, &key, at)
            .inspect_err(|e| log::warn!("Write to {} failed: {e}", self.paths.last_cleared));
        if result.is_err() {
            self.pending_clear = None;
        }
        result
    }

    /// Re-point the bridge at another board and re-subscribe.
    pub fn switch_board(&mut self, board_id: &str) -> SyncResult<()> {
        if let Err(e) = self.backend.unsubscribe(&self.paths.board_id) {
            log::warn!("Unsubscribe from {} failed: {e}", self.paths.board_id);
        }
        self.paths = BoardPaths::for_board(board_id);
        self.known_keys.clear();
        self.awaiting_baseline = true;
        self.last_cleared = None;
        self.pending_clear = None;
        log::info!("Switched to board {board_id}");
        self.backend
            .subscribe(board_id)
            .inspect_err(|e| log::warn!("Subscribe to {} failed: {e}", self.paths.strokes))
    }

    /// Drain remote changes for the current board.
    pub fn poll(&mut self) -> Vec<RemoteChange> {
        let mut changes = std::mem::take(&mut self.pending);
        for event in self.backend.poll_events() {
            if let Some(change) = self.ingest(event) {
                changes.push(change);
            }
        }
        changes
    }

    fn ingest(&mut self, event: BackendEvent) -> Option<RemoteChange> {
        match event {
            BackendEvent::StrokeAdded { board, key, stroke } => {
                if !self.accepts(&board, key) {
                    return None;
                }
                log::debug!("Remote stroke with {} line(s)", stroke.len());
                Some(RemoteChange::StrokeAppended(stroke))
            }
            BackendEvent::ShapeAdded { board, key, shape } => {
                if !self.accepts(&board, key) {
                    return None;
                }
                log::debug!("Remote {} shape", shape.shape_kind.name());
                Some(RemoteChange::ShapeAppended(shape))
            }
            BackendEvent::LastCleared { board, cleared } => {
                if board != self.paths.board_id {
                    return None;
                }
                let Some(cleared) = cleared else {
                    self.awaiting_baseline = false;
                    return None;
                };
                if self.pending_clear.as_deref() == Some(cleared.key.as_str()) {
                    log::debug!("Clear of {board} acknowledged");
                    self.pending_clear = None;
                    self.awaiting_baseline = false;
                    self.last_cleared = Some(cleared);
                    return None;
                }
                if self.awaiting_baseline {
                    self.awaiting_baseline = false;
                    if self.pending_clear.is_none() {
                        self.last_cleared = Some(cleared);
                    }
                    return None;
                }
                // A clear ordered before our own one is already covered by it.
                if self.pending_clear.is_some()
                    || self.last_cleared.as_ref().is_some_and(|c| c.key == cleared.key)
                {
                    return None;
                }
                self.last_cleared = Some(cleared);
                log::info!("Board {board} cleared remotely");
                Some(RemoteChange::Cleared)
            }
            BackendEvent::Error(message) => Some(RemoteChange::Failed(SyncError::Backend(message))),
        }
    }

    /// Whether a child notification is new for the current board. Children
    /// that arrive while our clear is unacknowledged were wiped by it.
    fn accepts(&mut self, board: &str, key: String) -> bool {
        board == self.paths.board_id && self.pending_clear.is_none() && self.known_keys.insert(key)
    }
}
