//! In-process live backend.
//!
//! A [`MemoryHub`] plays the role of the shared store; every engine that
//! should see the same boards gets its own [`MemoryBackend`] from
//! [`MemoryHub::connect`].

use super::backend::{BackendEvent, BoardPaths, Keyed, LiveBackend, SyncError, SyncResult};
use crate::shapes::{ShapeAnnotation, Stroke};
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, MutexGuard};

struct Subscriber {
    client: u64,
    board: String,
    tx: Sender<BackendEvent>,
}

#[derive(Default)]
struct HubState {
    /// Children keyed by collection path.
    strokes: HashMap<String, Vec<Keyed<Stroke>>>,
    shapes: HashMap<String, Vec<Keyed<ShapeAnnotation>>>,
    last_cleared: HashMap<String, Keyed<u64>>,
    subscribers: Vec<Subscriber>,
    next_client: u64,
}

impl HubState {
    fn broadcast(&self, board: &str, event: &BackendEvent) {
        for subscriber in self.subscribers.iter().filter(|s| s.board == board) {
            // A dropped receiver just means that client went away.
            let _ = subscriber.tx.send(event.clone());
        }
    }
}

/// Shared in-memory store of boards.
#[derive(Clone, Default)]
pub struct MemoryHub {
    state: Arc<Mutex<HubState>>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client handle onto this hub.
    pub fn connect(&self) -> MemoryBackend {
        let (tx, rx) = channel();
        let client = match self.state.lock() {
            Ok(mut state) => {
                state.next_client += 1;
                state.next_client
            }
            Err(_) => 0,
        };
        MemoryBackend {
            hub: self.clone(),
            client,
            tx,
            rx,
        }
    }

    /// Strokes currently stored for `board`, in append order.
    pub fn strokes(&self, board: &str) -> Vec<Stroke> {
        let path = BoardPaths::for_board(board).strokes;
        self.state
            .lock()
            .map(|state| {
                state
                    .strokes
                    .get(&path)
                    .map(|children| children.iter().map(|c| c.value.clone()).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Shapes currently stored for `board`, in append order.
    pub fn shapes(&self, board: &str) -> Vec<ShapeAnnotation> {
        let path = BoardPaths::for_board(board).shapes;
        self.state
            .lock()
            .map(|state| {
                state
                    .shapes
                    .get(&path)
                    .map(|children| children.iter().map(|c| c.value).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    pub fn last_cleared(&self, board: &str) -> Option<u64> {
        let path = BoardPaths::for_board(board).last_cleared;
        self.state
            .lock()
            .ok()
            .and_then(|state| state.last_cleared.get(&path).map(|c| c.value))
    }

    fn lock(&self) -> SyncResult<MutexGuard<'_, HubState>> {
        self.state
            .lock()
            .map_err(|e| SyncError::Backend(format!("Lock error: {e}")))
    }
}

/// One client's connection to a [`MemoryHub`].
pub struct MemoryBackend {
    hub: MemoryHub,
    client: u64,
    tx: Sender<BackendEvent>,
    rx: Receiver<BackendEvent>,
}

impl LiveBackend for MemoryBackend {
    fn append_stroke(&mut self, board: &str, key: &str, stroke: &Stroke) -> SyncResult<()> {
        let path = BoardPaths::for_board(board).strokes;
        let mut state = self.hub.lock()?;
        state
            .strokes
            .entry(path)
            .or_default()
            .push(Keyed::new(key, stroke.clone()));
        state.broadcast(
            board,
            &BackendEvent::StrokeAdded {
                board: board.to_string(),
                key: key.to_string(),
                stroke: stroke.clone(),
            },
        );
        Ok(())
    }

    fn append_shape(&mut self, board: &str, key: &str, shape: &ShapeAnnotation) -> SyncResult<()> {
        let path = BoardPaths::for_board(board).shapes;
        let mut state = self.hub.lock()?;
        state
            .shapes
            .entry(path)
            .or_default()
            .push(Keyed::new(key, *shape));
        state.broadcast(
            board,
            &BackendEvent::ShapeAdded {
                board: board.to_string(),
                key: key.to_string(),
                shape: *shape,
            },
        );
        Ok(())
    }

    fn set_last_cleared(&mut self, board: &str, key: &str, at: u64) -> SyncResult<()> {
        let paths = BoardPaths::for_board(board);
        let cleared = Keyed::new(key, at);
        let mut state = self.hub.lock()?;
        state.strokes.remove(&paths.strokes);
        state.shapes.remove(&paths.shapes);
        state.last_cleared.insert(paths.last_cleared, cleared.clone());
        state.broadcast(
            board,
            &BackendEvent::LastCleared {
                board: board.to_string(),
                cleared: Some(cleared),
            },
        );
        Ok(())
    }

    fn subscribe(&mut self, board: &str) -> SyncResult<()> {
        let paths = BoardPaths::for_board(board);
        let mut state = self.hub.lock()?;

        let strokes = state.strokes.get(&paths.strokes).cloned().unwrap_or_default();
        for child in strokes {
            let _ = self.tx.send(BackendEvent::StrokeAdded {
                board: board.to_string(),
                key: child.key,
                stroke: child.value,
            });
        }
        let shapes = state.shapes.get(&paths.shapes).cloned().unwrap_or_default();
        for child in shapes {
            let _ = self.tx.send(BackendEvent::ShapeAdded {
                board: board.to_string(),
                key: child.key,
                shape: child.value,
            });
        }
        let _ = self.tx.send(BackendEvent::LastCleared {
            board: board.to_string(),
            cleared: state.last_cleared.get(&paths.last_cleared).cloned(),
        });

        let client = self.client;
        if !state
            .subscribers
            .iter()
            .any(|s| s.client == client && s.board == board)
        {
            state.subscribers.push(Subscriber {
                client,
                board: board.to_string(),
                tx: self.tx.clone(),
            });
        }
        log::debug!("Client {client} subscribed to {}", paths.strokes);
        Ok(())
    }

    fn unsubscribe(&mut self, board: &str) -> SyncResult<()> {
        let client = self.client;
        let mut state = self.hub.lock()?;
        state
            .subscribers
            .retain(|s| !(s.client == client && s.board == board));
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<BackendEvent> {
        self.rx.try_iter().collect()
    }
}

impl Drop for MemoryBackend {
    fn drop(&mut self) {
        let client = self.client;
        if let Ok(mut state) = self.hub.state.lock() {
            state.subscribers.retain(|s| s.client != client);
        }
    }
}
