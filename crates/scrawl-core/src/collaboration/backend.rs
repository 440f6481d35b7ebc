//! The live document backend seen by the sync bridge.

use crate::shapes::{ShapeAnnotation, Stroke};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from talking to a live backend. Never fatal to local editing.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Not connected to a live backend")]
    NotConnected,
    #[error("Send failed: {0}")]
    Send(String),
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for backend operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Generate a fresh board identifier.
pub fn new_board_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a record key for an appended child, unique across writers.
pub fn new_record_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Backend locations of one board's data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardPaths {
    pub board_id: String,
    pub strokes: String,
    pub shapes: String,
    pub last_cleared: String,
}

impl BoardPaths {
    pub fn for_board(board_id: &str) -> Self {
        Self {
            board_id: board_id.to_string(),
            strokes: format!("whiteboards/{board_id}/strokes"),
            shapes: format!("whiteboards/{board_id}/shapes"),
            last_cleared: format!("whiteboards/{board_id}/lastCleared"),
        }
    }
}

/// A child record together with the key it was appended under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyed<T> {
    pub key: String,
    pub value: T,
}

impl<T> Keyed<T> {
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Notification delivered by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
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
    /// Current value of `lastCleared`, tagged with the key of the clear that
    /// set it. Delivered once right after every subscribe (possibly `None`),
    /// then on every clear.
    LastCleared {
        board: String,
        cleared: Option<Keyed<u64>>,
    },
    Error(String),
}

/// Append/subscribe access to per-board `strokes`, `shapes` and `lastCleared`.
///
/// Writes are fire-and-forget: `Ok` means the write was handed off, not
/// that it reached the store.
pub trait LiveBackend {
    fn append_stroke(&mut self, board: &str, key: &str, stroke: &Stroke) -> SyncResult<()>;

    fn append_shape(&mut self, board: &str, key: &str, shape: &ShapeAnnotation) -> SyncResult<()>;

    /// Set the shared clear timestamp under `key`. This also empties the
    /// board's collections.
    fn set_last_cleared(&mut self, board: &str, key: &str, at: u64) -> SyncResult<()>;

    /// Start receiving the board's children. Existing children are replayed,
    /// followed by the current `lastCleared` value.
    fn subscribe(&mut self, board: &str) -> SyncResult<()>;

    fn unsubscribe(&mut self, board: &str) -> SyncResult<()>;

    /// Drain pending notifications without blocking.
    fn poll_events(&mut self) -> Vec<BackendEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_paths() {
        let paths = BoardPaths::for_board("abc");
        assert_eq!(paths.strokes, "whiteboards/abc/strokes");
        assert_eq!(paths.shapes, "whiteboards/abc/shapes");
        assert_eq!(paths.last_cleared, "whiteboards/abc/lastCleared");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(new_board_id(), new_board_id());
        let key = new_record_key();
        assert_eq!(key.len(), 32);
        assert_ne!(key, new_record_key());
    }
}
