//! Scrawl Core Library
//!
//! Platform-agnostic engine for the Scrawl collaborative whiteboard: the
//! document model, view transform, tool state machine, erasing, undo/redo
//! and live synchronisation.

pub mod camera;
pub mod canvas;
pub mod collaboration;
pub mod engine;
pub mod eraser;
pub mod input;
pub mod shapes;
pub mod shortcuts;
pub mod sync;
pub mod tools;

pub use camera::{Camera, ViewConfig};
pub use canvas::{DocumentLoadError, StrokeStore, WhiteboardDocument};
pub use collaboration::{
    BoardPaths, LiveBackend, MemoryHub, RemoteChange, SyncBridge, SyncError, new_board_id,
};
pub use engine::{Command, EngineEvent, HostEvent, StepOutput, Whiteboard};
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent, PointerKind, WheelEvent};
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use sync::{ConnectionState, SocketBackend, SyncEvent};
pub use tools::{CursorHint, Repaint, ToolConfig, ToolConfigStore, ToolKind, ToolMachine};
