//! Input events for mouse/touch/pen, wheel and keyboard.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// The primary button draws; every other button pans.
    pub fn is_primary(self) -> bool {
        self == MouseButton::Left
    }
}

/// What produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointerKind {
    #[default]
    Mouse,
    /// Touch contact; `contacts` is the number of fingers on the surface.
    Touch { contacts: u8 },
    Pen,
}

impl PointerKind {
    pub fn is_touch(self) -> bool {
        matches!(self, PointerKind::Touch { .. })
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch/pen handling.
/// Positions are in screen coordinates relative to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        kind: PointerKind,
    },
    Move {
        position: Point,
        kind: PointerKind,
    },
    Up {
        position: Point,
        button: MouseButton,
        kind: PointerKind,
    },
}

impl PointerEvent {
    /// Primary mouse press.
    pub fn down(position: Point) -> Self {
        PointerEvent::Down {
            position,
            button: MouseButton::Left,
            kind: PointerKind::Mouse,
        }
    }

    /// Mouse move.
    pub fn moved(position: Point) -> Self {
        PointerEvent::Move {
            position,
            kind: PointerKind::Mouse,
        }
    }

    /// Primary mouse release.
    pub fn up(position: Point) -> Self {
        PointerEvent::Up {
            position,
            button: MouseButton::Left,
            kind: PointerKind::Mouse,
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => position,
        }
    }

    pub fn kind(&self) -> PointerKind {
        match *self {
            PointerEvent::Down { kind, .. }
            | PointerEvent::Move { kind, .. }
            | PointerEvent::Up { kind, .. } => kind,
        }
    }
}

/// Mouse wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// Zoom gestures hold Ctrl (or Cmd); everything else scrolls.
    pub fn is_zoom(&self) -> bool {
        self.modifiers.command()
    }
}

/// Keyboard press with the modifiers held at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// Tracks cursor positions and held buttons between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Position seen by the previous pointer event.
    pub previous_pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer event. On press the previous position snaps to the
    /// press point so the first move produces a segment from there.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down {
                position, button, ..
            } => {
                self.pointer_position = position;
                self.previous_pointer_position = position;
                self.pressed_buttons.insert(button);
            }
            PointerEvent::Move { position, .. } => {
                self.pointer_position = position;
            }
            PointerEvent::Up {
                position, button, ..
            } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
            }
        }
    }

    /// Mark the current position as consumed; called after every move.
    pub fn end_move(&mut self) {
        self.previous_pointer_position = self.pointer_position;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Screen-space movement since the last consumed position.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }
}
