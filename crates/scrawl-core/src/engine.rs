//! The whiteboard engine: a single-owner event queue and step function.
//!
//! Hosts push [`EngineEvent`]s and call [`Whiteboard::step`]. All document
//! mutations, local or remote, happen inside `step`, one event at a time.

use crate::camera::Camera;
use crate::canvas::{DocumentLoadError, StrokeStore};
use crate::collaboration::{LiveBackend, RemoteChange, SyncBridge, SyncError, new_board_id};
use crate::input::{KeyEvent, PointerEvent, WheelEvent};
use crate::shapes::TextAnnotation;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::tools::{CursorHint, Repaint, ToolConfig, ToolContext, ToolEffect, ToolKind, ToolMachine};
use kurbo::Point;
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Toolbar and menu actions.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Clear,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Share,
    Save,
    /// Load a persisted document from its JSON text.
    Open(String),
    SwitchBoard(String),
    /// Text typed by the user after a [`HostEvent::TextEntryRequested`].
    SubmitText(String),
}

/// Requests and notifications for the surrounding UI.
#[derive(Debug)]
pub enum HostEvent {
    ShareRequested { board_id: String },
    SaveRequested { json: String },
    OpenRequested,
    ToolRequested(ToolKind),
    TextEntryRequested { at: Point },
    DocumentLoaded,
    LoadFailed(DocumentLoadError),
    SyncFailed(SyncError),
    BoardSwitched { board_id: String },
    Cursor(CursorHint),
}

/// Input accepted by the engine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    Key(KeyEvent),
    Command(Command),
    ConfigChanged(ToolConfig),
}

/// Everything produced by one [`Whiteboard::step`].
#[derive(Debug, Default)]
pub struct StepOutput {
    pub repaints: Vec<Repaint>,
    pub host_events: Vec<HostEvent>,
}

impl StepOutput {
    /// Add a repaint. A full repaint supersedes everything queued before it.
    pub fn push_repaint(&mut self, repaint: Repaint) {
        if repaint == Repaint::Full {
            self.repaints.clear();
        }
        self.repaints.push(repaint);
    }

    pub fn needs_full_redraw(&self) -> bool {
        self.repaints.contains(&Repaint::Full)
    }

    pub fn is_empty(&self) -> bool {
        self.repaints.is_empty() && self.host_events.is_empty()
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// One whiteboard: document, view, tool state and optional sync.
pub struct Whiteboard {
    store: StrokeStore,
    camera: Camera,
    machine: ToolMachine,
    config: ToolConfig,
    board_id: String,
    bridge: Option<SyncBridge>,
    queue: VecDeque<EngineEvent>,
}

impl Default for Whiteboard {
    fn default() -> Self {
        Self::new(ToolConfig::default())
    }
}

impl Whiteboard {
    /// Create an unsynced whiteboard on a fresh board id.
    pub fn new(config: ToolConfig) -> Self {
        Self {
            store: StrokeStore::new(),
            camera: Camera::new(),
            machine: ToolMachine::new(),
            config,
            board_id: new_board_id(),
            bridge: None,
            queue: VecDeque::new(),
        }
    }

    /// Use a specific camera (e.g. custom zoom bounds).
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Start the whiteboard on an existing board id.
    pub fn with_board(mut self, board_id: impl Into<String>) -> Self {
        self.board_id = board_id.into();
        self
    }

    /// Mirror this whiteboard through `backend`, subscribing to the current board.
    pub fn connect(&mut self, backend: Box<dyn LiveBackend>) {
        log::info!("Connecting board {} to live backend", self.board_id);
        self.bridge = Some(SyncBridge::new(backend, &self.board_id));
    }

    pub fn disconnect(&mut self) {
        self.bridge = None;
    }

    pub fn is_synced(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn machine(&self) -> &ToolMachine {
        &self.machine
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// Queue an event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: EngineEvent) {
        self.queue.push_back(event);
    }

    /// Observer entry point for the tool configuration store.
    pub fn on_config_changed(&mut self, config: ToolConfig) {
        self.push_event(EngineEvent::ConfigChanged(config));
    }

    /// Process queued events, then remote changes.
    pub fn step(&mut self) -> StepOutput {
        let mut out = StepOutput::default();
        while let Some(event) = self.queue.pop_front() {
            self.dispatch(event, &mut out);
        }
        self.ingest_remote(&mut out);
        out
    }

    fn dispatch(&mut self, event: EngineEvent, out: &mut StepOutput) {
        match event {
            EngineEvent::Pointer(pointer) => self.pointer(&pointer, out),
            EngineEvent::Wheel(wheel) => {
                if self.camera.wheel(wheel.position, wheel.delta, wheel.is_zoom()) {
                    out.push_repaint(Repaint::Full);
                    if wheel.is_zoom() {
                        self.push_cursor(out);
                    }
                }
            }
            EngineEvent::Key(key) => self.key(&key, out),
            EngineEvent::Command(command) => self.command(command, out),
            EngineEvent::ConfigChanged(config) => {
                self.config = config;
                self.push_cursor(out);
            }
        }
    }

    fn pointer(&mut self, event: &PointerEvent, out: &mut StepOutput) {
        let effects = self.machine.handle_pointer(
            event,
            ToolContext {
                config: &self.config,
                camera: &mut self.camera,
                store: &mut self.store,
            },
        );
        for effect in effects {
            match effect {
                ToolEffect::Repaint(repaint) => out.push_repaint(repaint),
                ToolEffect::StrokeCommitted(stroke) => {
                    if let Some(bridge) = self.bridge.as_mut() {
                        if let Err(e) = bridge.publish_stroke(&stroke) {
                            out.host_events.push(HostEvent::SyncFailed(e));
                        }
                    }
                }
                ToolEffect::ShapeCommitted(shape) => {
                    if let Some(bridge) = self.bridge.as_mut() {
                        if let Err(e) = bridge.publish_shape(&shape) {
                            out.host_events.push(HostEvent::SyncFailed(e));
                        }
                    }
                }
                ToolEffect::TextEntryRequested(at) => {
                    out.host_events.push(HostEvent::TextEntryRequested { at })
                }
                ToolEffect::Cursor(hint) => out.host_events.push(HostEvent::Cursor(hint)),
            }
        }
    }

    fn key(&mut self, event: &KeyEvent, out: &mut StepOutput) {
        let Some(action) = ShortcutRegistry::lookup(event) else {
            return;
        };
        match action {
            ShortcutAction::Undo => self.command(Command::Undo, out),
            ShortcutAction::Redo => self.command(Command::Redo, out),
            ShortcutAction::ZoomIn => self.command(Command::ZoomIn, out),
            ShortcutAction::ZoomOut => self.command(Command::ZoomOut, out),
            ShortcutAction::ResetZoom => self.command(Command::ResetZoom, out),
            ShortcutAction::Clear => self.command(Command::Clear, out),
            ShortcutAction::Save => self.command(Command::Save, out),
            ShortcutAction::Open => out.host_events.push(HostEvent::OpenRequested),
            ShortcutAction::SelectTool(tool) => out.host_events.push(HostEvent::ToolRequested(tool)),
        }
    }

    fn command(&mut self, command: Command, out: &mut StepOutput) {
        match command {
            Command::Clear => {
                self.clear_local();
                if let Some(bridge) = self.bridge.as_mut() {
                    if let Err(e) = bridge.publish_clear(now_ms()) {
                        out.host_events.push(HostEvent::SyncFailed(e));
                    }
                }
                out.push_repaint(Repaint::Full);
            }
            Command::Undo => {
                if self.store.undo() {
                    out.push_repaint(Repaint::Full);
                }
            }
            Command::Redo => {
                if self.store.redo() {
                    out.push_repaint(Repaint::Full);
                }
            }
            Command::ZoomIn => {
                if self.camera.zoom_in() {
                    out.push_repaint(Repaint::Full);
                    self.push_cursor(out);
                }
            }
            Command::ZoomOut => {
                if self.camera.zoom_out() {
                    out.push_repaint(Repaint::Full);
                    self.push_cursor(out);
                }
            }
            Command::ResetZoom => {
                if (self.camera.scale() - 1.0).abs() > f64::EPSILON {
                    self.camera.reset();
                    out.push_repaint(Repaint::Full);
                    self.push_cursor(out);
                }
            }
            Command::Share => out.host_events.push(HostEvent::ShareRequested {
                board_id: self.board_id.clone(),
            }),
            Command::Save => match self.store.to_json() {
                Ok(json) => out.host_events.push(HostEvent::SaveRequested { json }),
                Err(e) => log::error!("Failed to serialize document: {e}"),
            },
            Command::Open(json) => match self.store.load_json(&json) {
                Ok(()) => {
                    log::info!("Loaded document with {} stroke(s)", self.store.strokes().len());
                    out.host_events.push(HostEvent::DocumentLoaded);
                    out.push_repaint(Repaint::Full);
                }
                Err(e) => {
                    log::warn!("Document load failed: {e}");
                    out.host_events.push(HostEvent::LoadFailed(e));
                }
            },
            Command::SwitchBoard(board_id) => self.switch_board(board_id, out),
            Command::SubmitText(text) => {
                if text.is_empty() {
                    return;
                }
                let Some(anchor) = self.machine.take_text_anchor() else {
                    log::debug!("Text submitted without an anchor; ignoring");
                    return;
                };
                let annotation = TextAnnotation::new(anchor, text, self.config.text_font_size());
                self.store.add_text(annotation);
                out.push_repaint(Repaint::Full);
            }
        }
    }

    fn switch_board(&mut self, board_id: String, out: &mut StepOutput) {
        if board_id.is_empty() || board_id == self.board_id {
            return;
        }
        self.store.reset();
        self.machine.cancel();
        if let Some(bridge) = self.bridge.as_mut() {
            if let Err(e) = bridge.switch_board(&board_id) {
                out.host_events.push(HostEvent::SyncFailed(e));
            }
        }
        log::info!("Board switched from {} to {board_id}", self.board_id);
        self.board_id = board_id.clone();
        out.host_events.push(HostEvent::BoardSwitched { board_id });
        out.push_repaint(Repaint::Full);
    }

    fn ingest_remote(&mut self, out: &mut StepOutput) {
        let Some(bridge) = self.bridge.as_mut() else {
            return;
        };
        for change in bridge.poll() {
            match change {
                RemoteChange::StrokeAppended(stroke) => {
                    self.store.commit_stroke(stroke);
                    out.push_repaint(Repaint::Full);
                }
                RemoteChange::ShapeAppended(shape) => {
                    self.store.add_shape(shape);
                    out.push_repaint(Repaint::Full);
                }
                RemoteChange::Cleared => {
                    self.clear_local();
                    out.push_repaint(Repaint::Full);
                }
                RemoteChange::Failed(e) => {
                    log::warn!("Live backend error: {e}");
                    out.host_events.push(HostEvent::SyncFailed(e));
                }
            }
        }
    }

    fn clear_local(&mut self) {
        self.store.clear();
        self.camera.reset();
    }

    fn push_cursor(&self, out: &mut StepOutput) {
        out.host_events.push(HostEvent::Cursor(CursorHint::for_tool(
            &self.config,
            self.camera.scale(),
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaboration::MemoryHub;
    use crate::input::Modifiers;
    use crate::shapes::{BrushType, Line, ShapeKind, Stroke};
    use crate::tools::ToolConfigStore;
    use kurbo::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pen() -> ToolConfig {
        ToolConfig {
            selected_tool: ToolKind::Pen,
            ..ToolConfig::default()
        }
    }

    fn draw(board: &mut Whiteboard, points: &[(f64, f64)]) -> StepOutput {
        let (first, rest) = points.split_first().unwrap();
        board.push_event(EngineEvent::Pointer(PointerEvent::down(Point::new(first.0, first.1))));
        for p in rest {
            board.push_event(EngineEvent::Pointer(PointerEvent::moved(Point::new(p.0, p.1))));
        }
        let last = points.last().unwrap();
        board.push_event(EngineEvent::Pointer(PointerEvent::up(Point::new(last.0, last.1))));
        board.step()
    }

    fn command(board: &mut Whiteboard, command: Command) -> StepOutput {
        board.push_event(EngineEvent::Command(command));
        board.step()
    }

    fn remote_stroke() -> Stroke {
        let mut stroke = Stroke::new();
        stroke.push(Line::ink(Point::new(1.0, 1.0), Point::new(2.0, 2.0), "#ff0000", 3.0, BrushType::Pen));
        stroke
    }

    #[test]
    fn test_draw_undo_redo_scenario() {
        let mut board = Whiteboard::new(pen());
        let out = draw(&mut board, &[(0.0, 0.0), (10.0 / 3.0, 10.0 / 3.0), (20.0 / 3.0, 20.0 / 3.0), (10.0, 10.0)]);
        assert_eq!(out.repaints.len(), 3);
        assert!(!out.needs_full_redraw());
        let stroke = board.store().strokes()[0].clone();
        assert_eq!(stroke.len(), 3);

        let out = command(&mut board, Command::Undo);
        assert!(out.needs_full_redraw());
        assert!(board.store().strokes().is_empty());
        assert_eq!(board.store().undo_history(), &[stroke.clone()]);

        command(&mut board, Command::Redo);
        assert_eq!(board.store().strokes(), &[stroke]);
        assert!(board.store().undo_history().is_empty());

        assert!(command(&mut board, Command::Redo).is_empty());
    }

    #[test]
    fn test_full_repaint_drops_earlier_repaints() {
        let mut out = StepOutput::default();
        out.push_repaint(Repaint::Segment(remote_stroke().lines[0].clone()));
        out.push_repaint(Repaint::Full);
        out.push_repaint(Repaint::Segment(remote_stroke().lines[0].clone()));
        assert_eq!(out.repaints.len(), 2);
        assert_eq!(out.repaints[0], Repaint::Full);
    }

    #[test]
    fn test_clear_resets_document_and_view() {
        let mut board = Whiteboard::new(pen());
        draw(&mut board, &[(0.0, 0.0), (5.0, 5.0)]);
        board.push_event(EngineEvent::Command(Command::ZoomIn));
        board.push_event(EngineEvent::Wheel(WheelEvent {
            position: Point::ZERO,
            delta: Vec2::new(10.0, 10.0),
            modifiers: Modifiers::NONE,
        }));
        board.step();
        assert!(!board.camera().is_reset());

        let out = command(&mut board, Command::Clear);
        assert!(out.needs_full_redraw());
        assert!(board.store().document().is_empty());
        assert!(board.camera().is_reset());
    }

    #[test]
    fn test_zoom_commands_clamp() {
        let mut board = Whiteboard::default();
        for _ in 0..10 {
            board.push_event(EngineEvent::Command(Command::ZoomIn));
        }
        board.step();
        assert!((board.camera().scale() - 2.0).abs() < f64::EPSILON);
        assert!(command(&mut board, Command::ZoomIn).is_empty());

        let out = command(&mut board, Command::ResetZoom);
        assert!(out.needs_full_redraw());
        assert!(command(&mut board, Command::ResetZoom).is_empty());
    }

    #[test]
    fn test_shortcuts_dispatch() {
        let mut board = Whiteboard::new(pen());
        draw(&mut board, &[(0.0, 0.0), (5.0, 5.0)]);

        board.push_event(EngineEvent::Key(KeyEvent::new("z", Modifiers::CTRL)));
        board.push_event(EngineEvent::Key(KeyEvent::new("3", Modifiers::NONE)));
        board.push_event(EngineEvent::Key(KeyEvent::new("o", Modifiers::CTRL)));
        let out = board.step();
        assert!(board.store().strokes().is_empty());
        assert!(matches!(out.host_events[0], HostEvent::ToolRequested(ToolKind::Eraser)));
        assert!(matches!(out.host_events[1], HostEvent::OpenRequested));
    }

    #[test]
    fn test_save_then_open_roundtrip() {
        let mut board = Whiteboard::new(pen());
        draw(&mut board, &[(0.0, 0.0), (5.0, 5.0), (9.0, 2.0)]);
        board.push_event(EngineEvent::ConfigChanged(ToolConfig {
            selected_tool: ToolKind::Shape,
            selected_shape: ShapeKind::Triangle,
            ..pen()
        }));
        board.step();
        draw(&mut board, &[(10.0, 10.0), (30.0, 30.0)]);

        let out = command(&mut board, Command::Save);
        let Some(HostEvent::SaveRequested { json }) = out.host_events.into_iter().next() else {
            panic!("expected a save request");
        };

        let mut other = Whiteboard::default();
        let out = command(&mut other, Command::Open(json));
        assert!(matches!(out.host_events[0], HostEvent::DocumentLoaded));
        assert_eq!(other.store().document(), board.store().document());
    }

    #[test]
    fn test_open_malformed_keeps_state() {
        let mut board = Whiteboard::new(pen());
        draw(&mut board, &[(0.0, 0.0), (5.0, 5.0)]);
        let out = command(&mut board, Command::Open("{\"strokes\": 3".to_string()));
        assert!(matches!(out.host_events[0], HostEvent::LoadFailed(DocumentLoadError::Parse(_))));
        assert_eq!(board.store().strokes().len(), 1);
        assert!(out.repaints.is_empty());
    }

    #[test]
    fn test_text_entry_flow() {
        let mut board = Whiteboard::new(ToolConfig {
            selected_tool: ToolKind::Text,
            text_size: 10.0,
            ..ToolConfig::default()
        });
        board.push_event(EngineEvent::Pointer(PointerEvent::down(Point::new(50.0, 60.0))));
        board.push_event(EngineEvent::Pointer(PointerEvent::up(Point::new(50.0, 60.0))));
        let out = board.step();
        assert!(matches!(out.host_events[0], HostEvent::TextEntryRequested { at } if at == Point::new(50.0, 60.0)));

        assert!(command(&mut board, Command::SubmitText(String::new())).is_empty());
        let out = command(&mut board, Command::SubmitText("hey".to_string()));
        assert!(out.needs_full_redraw());
        let text = &board.store().text_objects()[0];
        assert_eq!(text.text, "hey");
        assert!((text.width - 25.0).abs() < f64::EPSILON);
        assert_eq!(board.store().selected_text(), Some(0));

        assert!(command(&mut board, Command::SubmitText("again".to_string())).is_empty());
    }

    #[test]
    fn test_share_reports_board() {
        let mut board = Whiteboard::default().with_board("abc");
        let out = command(&mut board, Command::Share);
        assert!(matches!(&out.host_events[0], HostEvent::ShareRequested { board_id } if board_id == "abc"));
    }

    #[test]
    fn test_remote_stroke_appends_in_receipt_order() {
        let hub = MemoryHub::new();
        let mut local = Whiteboard::new(pen()).with_board("shared");
        local.connect(Box::new(hub.connect()));
        draw(&mut local, &[(0.0, 0.0), (5.0, 5.0)]);
        draw(&mut local, &[(5.0, 5.0), (9.0, 9.0)]);
        assert_eq!(local.store().strokes().len(), 2);

        let mut remote = crate::collaboration::SyncBridge::new(Box::new(hub.connect()), "shared");
        remote.poll();
        remote.publish_stroke(&remote_stroke()).unwrap();

        let out = local.step();
        assert!(out.needs_full_redraw());
        assert_eq!(local.store().strokes().len(), 3);
        assert_eq!(local.store().strokes()[2], remote_stroke());
    }

    #[test]
    fn test_two_boards_converge() {
        let hub = MemoryHub::new();
        let mut a = Whiteboard::new(pen()).with_board("room");
        let mut b = Whiteboard::new(ToolConfig {
            selected_tool: ToolKind::Shape,
            ..ToolConfig::default()
        })
        .with_board("room");
        a.connect(Box::new(hub.connect()));
        b.connect(Box::new(hub.connect()));

        draw(&mut a, &[(0.0, 0.0), (5.0, 5.0)]);
        draw(&mut b, &[(10.0, 10.0), (20.0, 20.0)]);
        a.step();
        b.step();

        assert_eq!(a.store().strokes(), b.store().strokes());
        assert_eq!(a.store().shapes(), b.store().shapes());
        assert_eq!(a.store().strokes().len(), 1);
        assert_eq!(a.store().shapes().len(), 1);
    }

    #[test]
    fn test_remote_clear_resets_other_board() {
        let hub = MemoryHub::new();
        let mut a = Whiteboard::new(pen()).with_board("room");
        let mut b = Whiteboard::new(pen()).with_board("room");
        a.connect(Box::new(hub.connect()));
        b.connect(Box::new(hub.connect()));
        draw(&mut a, &[(0.0, 0.0), (5.0, 5.0)]);
        b.step();
        command(&mut b, Command::ZoomIn);
        assert_eq!(b.store().strokes().len(), 1);

        command(&mut a, Command::Clear);
        let out = b.step();
        assert!(out.needs_full_redraw());
        assert!(b.store().strokes().is_empty());
        assert!(b.camera().is_reset());
        assert!(hub.strokes("room").is_empty());

        draw(&mut a, &[(1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(a.store().strokes().len(), 1);
    }

    #[test]
    fn test_clear_drops_unpolled_peer_strokes() {
        let hub = MemoryHub::new();
        let mut a = Whiteboard::new(pen()).with_board("room");
        let mut b = Whiteboard::new(pen()).with_board("room");
        a.connect(Box::new(hub.connect()));
        b.connect(Box::new(hub.connect()));
        a.step();

        draw(&mut b, &[(0.0, 0.0), (5.0, 5.0)]);
        command(&mut a, Command::Clear);
        b.step();

        assert!(hub.strokes("room").is_empty());
        assert!(a.store().strokes().is_empty());
        assert!(b.store().strokes().is_empty());

        draw(&mut b, &[(1.0, 1.0), (2.0, 2.0)]);
        a.step();
        assert_eq!(a.store().strokes(), b.store().strokes());
        assert_eq!(a.store().strokes().len(), hub.strokes("room").len());
    }

    #[test]
    fn test_draw_then_clear_in_one_step_stays_cleared() {
        let hub = MemoryHub::new();
        let mut board = Whiteboard::new(pen()).with_board("room");
        board.connect(Box::new(hub.connect()));

        board.push_event(EngineEvent::Pointer(PointerEvent::down(Point::new(0.0, 0.0))));
        board.push_event(EngineEvent::Pointer(PointerEvent::moved(Point::new(5.0, 5.0))));
        board.push_event(EngineEvent::Pointer(PointerEvent::up(Point::new(5.0, 5.0))));
        board.push_event(EngineEvent::Command(Command::Clear));
        board.step();

        assert!(hub.strokes("room").is_empty());
        assert!(board.store().strokes().is_empty());
        assert!(board.step().is_empty());
    }

    #[test]
    fn test_switch_board_resets_and_resubscribes() {
        let hub = MemoryHub::new();
        let mut writer = Whiteboard::new(pen()).with_board("next");
        writer.connect(Box::new(hub.connect()));
        draw(&mut writer, &[(0.0, 0.0), (5.0, 5.0)]);

        let mut board = Whiteboard::new(pen()).with_board("first");
        board.connect(Box::new(hub.connect()));
        draw(&mut board, &[(0.0, 0.0), (1.0, 1.0)]);
        command(&mut board, Command::Undo);

        assert!(command(&mut board, Command::SwitchBoard("first".to_string())).is_empty());
        assert!(command(&mut board, Command::SwitchBoard(String::new())).is_empty());

        let out = command(&mut board, Command::SwitchBoard("next".to_string()));
        assert!(matches!(&out.host_events[0], HostEvent::BoardSwitched { board_id } if board_id == "next"));
        assert_eq!(board.board_id(), "next");
        assert!(board.store().undo_history().is_empty());
        assert_eq!(board.store().strokes(), writer.store().strokes());
    }

    #[test]
    fn test_config_store_drives_engine() {
        let board = Rc::new(RefCell::new(Whiteboard::default()));
        let mut store = ToolConfigStore::new(ToolConfig::default());
        let target = Rc::clone(&board);
        store.subscribe(move |config| target.borrow_mut().on_config_changed(config.clone()));

        store.update(|c| {
            c.selected_tool = ToolKind::Eraser;
            c.eraser_size = 8.0;
        });
        let out = board.borrow_mut().step();
        assert_eq!(board.borrow().config().selected_tool, ToolKind::Eraser);
        assert!(matches!(out.host_events[0], HostEvent::Cursor(CursorHint::Eraser { size }) if (size - 8.0).abs() < f64::EPSILON));
    }
}
