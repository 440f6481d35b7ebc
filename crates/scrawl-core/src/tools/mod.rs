//! Tool system for the whiteboard.
//!
//! [`ToolMachine`] turns pointer events into document edits for the tool
//! selected in the [`ToolConfig`], and reports what the host must do next
//! as a list of [`ToolEffect`]s.

mod config;

pub use config::{SubscriptionId, ToolConfig, ToolConfigStore};

use crate::camera::Camera;
use crate::canvas::StrokeStore;
use crate::eraser;
use crate::input::{InputState, PointerEvent, PointerKind};
use crate::shapes::{Line, ShapeAnnotation, ShapeKind, Stroke};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Eraser,
    Shape,
    Text,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Pen => "Pen",
            ToolKind::Eraser => "Eraser",
            ToolKind::Shape => "Shape",
            ToolKind::Text => "Text",
        }
    }
}

/// Eraser algorithm selected in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraserKind {
    /// Paint out pixels only.
    #[default]
    Precision,
    /// Remove whole strokes from the document.
    Smart,
}

/// What the canvas needs repainted.
#[derive(Debug, Clone, PartialEq)]
pub enum Repaint {
    /// Redraw everything from the document.
    Full,
    /// Draw one in-progress segment on top of the current pixels.
    /// Coordinates are in screen space; width is unscaled.
    Segment(Line),
}

/// Overlay cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorHint {
    /// Square eraser outline, `size` in screen pixels.
    Eraser { size: f64 },
    Pen,
    Move,
    Default,
}

impl CursorHint {
    /// Resting cursor for the selected tool.
    pub fn for_tool(config: &ToolConfig, scale: f64) -> Self {
        match config.selected_tool {
            ToolKind::Eraser => CursorHint::Eraser {
                size: config.eraser_width() * scale,
            },
            ToolKind::Pen => CursorHint::Pen,
            ToolKind::Select | ToolKind::Shape | ToolKind::Text => CursorHint::Default,
        }
    }
}

/// Outcome of feeding one pointer event to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEffect {
    Repaint(Repaint),
    /// A stroke was appended to the store and should be published.
    StrokeCommitted(Stroke),
    /// A shape was appended to the store and should be published.
    ShapeCommitted(ShapeAnnotation),
    /// The text tool missed every annotation; ask the host for text to place here.
    TextEntryRequested(Point),
    Cursor(CursorHint),
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Waiting for a press.
    #[default]
    Idle,
    /// Pen gesture; `stroke` is the in-progress stroke, not yet in the store.
    Drawing { stroke: Stroke },
    /// Eraser gesture; precision samples accumulate in `stroke`.
    Erasing { stroke: Stroke },
    Panning,
    /// Text tool press; `dragging` while a hit annotation follows the pointer.
    Texting { dragging: bool },
    /// Shape drag, all points in model coordinates.
    ShapeDragging {
        kind: ShapeKind,
        start: Point,
        current: Point,
    },
}

/// Everything a pointer event may read or mutate.
pub struct ToolContext<'a> {
    pub config: &'a ToolConfig,
    pub camera: &'a mut Camera,
    pub store: &'a mut StrokeStore,
}

/// Interprets pointer sequences for the active tool.
#[derive(Debug, Clone, Default)]
pub struct ToolMachine {
    state: ToolState,
    input: InputState,
    /// Model point where submitted text will be placed.
    text_anchor: Option<Point>,
}

impl ToolMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != ToolState::Idle
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn text_anchor(&self) -> Option<Point> {
        self.text_anchor
    }

    /// Consume the anchor recorded by the last text-tool miss.
    pub fn take_text_anchor(&mut self) -> Option<Point> {
        self.text_anchor.take()
    }

    /// The stroke being drawn or erased, if any.
    pub fn current_stroke(&self) -> Option<&Stroke> {
        match &self.state {
            ToolState::Drawing { stroke } | ToolState::Erasing { stroke } => Some(stroke),
            _ => None,
        }
    }

    /// Live preview of the shape being dragged.
    pub fn shape_preview(&self) -> Option<ShapeAnnotation> {
        match self.state {
            ToolState::ShapeDragging {
                kind,
                start,
                current,
            } => Some(ShapeAnnotation::new(kind, start, current)),
            _ => None,
        }
    }

    pub fn is_text_dragging(&self) -> bool {
        matches!(self.state, ToolState::Texting { dragging: true })
    }

    /// Abandon the current gesture without committing anything.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Feed one pointer event.
    pub fn handle_pointer(&mut self, event: &PointerEvent, ctx: ToolContext<'_>) -> Vec<ToolEffect> {
        match *event {
            PointerEvent::Down {
                position,
                button,
                kind,
            } => {
                if let PointerKind::Touch { contacts } = kind {
                    if contacts != 1 {
                        return Vec::new();
                    }
                }
                if self.is_active() {
                    return Vec::new();
                }
                self.input.handle_pointer_event(event);
                if button.is_primary() {
                    self.begin(position, kind, ctx)
                } else {
                    self.state = ToolState::Panning;
                    vec![ToolEffect::Cursor(CursorHint::Move)]
                }
            }
            PointerEvent::Move { .. } => {
                self.input.handle_pointer_event(event);
                let effects = self.update(ctx);
                self.input.end_move();
                effects
            }
            PointerEvent::Up { position, .. } => {
                self.input.handle_pointer_event(event);
                self.end(position, ctx)
            }
        }
    }

    fn begin(&mut self, position: Point, kind: PointerKind, ctx: ToolContext<'_>) -> Vec<ToolEffect> {
        let ToolContext {
            config,
            camera,
            store,
        } = ctx;
        let model = camera.to_model(position);

        match config.selected_tool {
            ToolKind::Pen => {
                let mut stroke = Stroke::new();
                if kind.is_touch() {
                    stroke.push(Line::ink(
                        model,
                        model,
                        config.ink_color(),
                        config.ink_width(),
                        config.brush_type,
                    ));
                }
                self.state = ToolState::Drawing { stroke };
                Vec::new()
            }
            ToolKind::Eraser => {
                let mut stroke = Stroke::new();
                if kind.is_touch() && config.eraser_type == EraserKind::Precision {
                    stroke.push(eraser::precision_line(model, model, config.eraser_width()));
                }
                self.state = ToolState::Erasing { stroke };
                Vec::new()
            }
            ToolKind::Shape => {
                self.state = ToolState::ShapeDragging {
                    kind: config.selected_shape,
                    start: model,
                    current: model,
                };
                Vec::new()
            }
            ToolKind::Text => match store.select_text_at(model) {
                Some(index) => {
                    log::debug!("Selected text annotation {index}");
                    self.state = ToolState::Texting { dragging: true };
                    vec![ToolEffect::Repaint(Repaint::Full)]
                }
                None => {
                    self.state = ToolState::Texting { dragging: false };
                    self.text_anchor = Some(model);
                    vec![ToolEffect::TextEntryRequested(model)]
                }
            },
            ToolKind::Select => Vec::new(),
        }
    }

    fn update(&mut self, ctx: ToolContext<'_>) -> Vec<ToolEffect> {
        let ToolContext {
            config,
            camera,
            store,
        } = ctx;
        let previous_screen = self.input.previous_pointer_position;
        let current_screen = self.input.pointer_position;
        let previous = camera.to_model(previous_screen);
        let current = camera.to_model(current_screen);

        match &mut self.state {
            ToolState::Idle => Vec::new(),
            ToolState::Drawing { stroke } => {
                if config.selected_tool != ToolKind::Pen {
                    return Vec::new();
                }
                let line = Line::ink(
                    previous,
                    current,
                    config.ink_color(),
                    config.ink_width(),
                    config.brush_type,
                );
                let segment = screen_segment(&line, previous_screen, current_screen);
                stroke.push(line);
                vec![ToolEffect::Repaint(Repaint::Segment(segment))]
            }
            ToolState::Erasing { stroke } => {
                if config.selected_tool != ToolKind::Eraser {
                    return Vec::new();
                }
                match config.eraser_type {
                    EraserKind::Precision => {
                        let line = eraser::precision_line(previous, current, config.eraser_width());
                        let segment = screen_segment(&line, previous_screen, current_screen);
                        stroke.push(line);
                        vec![ToolEffect::Repaint(Repaint::Segment(segment))]
                    }
                    EraserKind::Smart => {
                        eraser::smart_erase(store, current, config.eraser_width());
                        vec![ToolEffect::Repaint(Repaint::Full)]
                    }
                }
            }
            ToolState::Panning => {
                camera.pan_screen(current_screen - previous_screen);
                vec![ToolEffect::Repaint(Repaint::Full)]
            }
            ToolState::Texting { dragging } => {
                if !*dragging || config.selected_tool != ToolKind::Text {
                    return Vec::new();
                }
                if store.translate_selected_text(current - previous) {
                    vec![ToolEffect::Repaint(Repaint::Full)]
                } else {
                    Vec::new()
                }
            }
            ToolState::ShapeDragging { current: end, .. } => {
                *end = current;
                vec![ToolEffect::Repaint(Repaint::Full)]
            }
        }
    }

    fn end(&mut self, position: Point, ctx: ToolContext<'_>) -> Vec<ToolEffect> {
        let ToolContext {
            config,
            camera,
            store,
        } = ctx;

        match std::mem::take(&mut self.state) {
            ToolState::Idle => Vec::new(),
            ToolState::Drawing { stroke } | ToolState::Erasing { stroke } => {
                if store.commit_stroke(stroke.clone()) {
                    vec![ToolEffect::StrokeCommitted(stroke)]
                } else {
                    Vec::new()
                }
            }
            ToolState::Panning => vec![ToolEffect::Cursor(CursorHint::for_tool(
                config,
                camera.scale(),
            ))],
            ToolState::Texting { .. } => vec![ToolEffect::Repaint(Repaint::Full)],
            ToolState::ShapeDragging { kind, start, .. } => {
                let shape = ShapeAnnotation::new(kind, start, camera.to_model(position));
                store.add_shape(shape);
                vec![
                    ToolEffect::ShapeCommitted(shape),
                    ToolEffect::Repaint(Repaint::Full),
                ]
            }
        }
    }
}

/// Screen-space copy of a model line for incremental drawing.
fn screen_segment(line: &Line, from: Point, to: Point) -> Line {
    Line {
        x0: from.x,
        y0: from.y,
        x1: to.x,
        y1: to.y,
        ..line.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use crate::shapes::{BrushType, TextAnnotation};
    use kurbo::Vec2;

    struct Rig {
        machine: ToolMachine,
        config: ToolConfig,
        camera: Camera,
        store: StrokeStore,
    }

    impl Rig {
        fn new(tool: ToolKind) -> Self {
            Self {
                machine: ToolMachine::new(),
                config: ToolConfig {
                    selected_tool: tool,
                    ..ToolConfig::default()
                },
                camera: Camera::new(),
                store: StrokeStore::new(),
            }
        }

        fn send(&mut self, event: PointerEvent) -> Vec<ToolEffect> {
            self.machine.handle_pointer(
                &event,
                ToolContext {
                    config: &self.config,
                    camera: &mut self.camera,
                    store: &mut self.store,
                },
            )
        }

        fn drag(&mut self, points: &[(f64, f64)]) -> Vec<ToolEffect> {
            let mut effects = Vec::new();
            let (first, rest) = points.split_first().unwrap();
            effects.extend(self.send(PointerEvent::down(Point::new(first.0, first.1))));
            for p in rest {
                effects.extend(self.send(PointerEvent::moved(Point::new(p.0, p.1))));
            }
            let last = points.last().unwrap();
            effects.extend(self.send(PointerEvent::up(Point::new(last.0, last.1))));
            effects
        }
    }

    #[test]
    fn test_pen_draws_and_commits() {
        let mut rig = Rig::new(ToolKind::Pen);
        let effects = rig.drag(&[(0.0, 0.0), (10.0 / 3.0, 10.0 / 3.0), (20.0 / 3.0, 20.0 / 3.0), (10.0, 10.0)]);

        let segments = effects
            .iter()
            .filter(|e| matches!(e, ToolEffect::Repaint(Repaint::Segment(_))))
            .count();
        assert_eq!(segments, 3);
        assert!(!effects.contains(&ToolEffect::Repaint(Repaint::Full)));
        assert_eq!(rig.store.strokes().len(), 1);
        assert_eq!(rig.store.strokes()[0].len(), 3);
        assert!(matches!(effects.last(), Some(ToolEffect::StrokeCommitted(s)) if s.len() == 3));
        assert!(!rig.machine.is_active());
    }

    #[test]
    fn test_pen_lines_are_in_model_space() {
        let mut rig = Rig::new(ToolKind::Pen);
        rig.camera.set_scale(2.0);
        rig.camera.offset = Vec2::new(10.0, 0.0);
        let effects = rig.drag(&[(40.0, 40.0), (60.0, 40.0)]);

        let line = &rig.store.strokes()[0].lines[0];
        assert!((line.x0 - 10.0).abs() < 1e-9);
        assert!((line.x1 - 20.0).abs() < 1e-9);
        assert!((line.y0 - 20.0).abs() < 1e-9);

        let Some(ToolEffect::Repaint(Repaint::Segment(segment))) = effects.first() else {
            panic!("expected a segment repaint");
        };
        assert!((segment.x0 - 40.0).abs() < 1e-9);
        assert!((segment.x1 - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_highlighter_uses_highlighter_settings() {
        let mut rig = Rig::new(ToolKind::Pen);
        rig.config.brush_type = BrushType::Highlighter;
        rig.config.highlighter_size = 9.0;
        rig.drag(&[(0.0, 0.0), (5.0, 5.0)]);

        let line = &rig.store.strokes()[0].lines[0];
        assert_eq!(line.color, "#ffff00");
        assert!((line.width - 9.0).abs() < f64::EPSILON);
        assert_eq!(line.brush_type, BrushType::Highlighter);
    }

    #[test]
    fn test_click_without_move_commits_nothing() {
        let mut rig = Rig::new(ToolKind::Pen);
        let effects = rig.drag(&[(5.0, 5.0)]);
        assert!(effects.is_empty());
        assert!(rig.store.strokes().is_empty());
    }

    #[test]
    fn test_touch_tap_leaves_dot() {
        let mut rig = Rig::new(ToolKind::Pen);
        let touch = PointerKind::Touch { contacts: 1 };
        rig.send(PointerEvent::Down {
            position: Point::new(7.0, 8.0),
            button: MouseButton::Left,
            kind: touch,
        });
        let effects = rig.send(PointerEvent::Up {
            position: Point::new(7.0, 8.0),
            button: MouseButton::Left,
            kind: touch,
        });
        assert!(matches!(effects.as_slice(), [ToolEffect::StrokeCommitted(_)]));
        let line = &rig.store.strokes()[0].lines[0];
        assert_eq!(line.start(), line.end());
    }

    #[test]
    fn test_two_finger_touch_ignored() {
        let mut rig = Rig::new(ToolKind::Pen);
        rig.send(PointerEvent::Down {
            position: Point::ZERO,
            button: MouseButton::Left,
            kind: PointerKind::Touch { contacts: 2 },
        });
        assert!(!rig.machine.is_active());
    }

    #[test]
    fn test_touch_honors_smart_eraser() {
        let mut rig = Rig::new(ToolKind::Eraser);
        rig.config.eraser_type = EraserKind::Smart;
        let mut ink = Stroke::new();
        ink.push(Line::ink(Point::new(0.0, 0.0), Point::new(10.0, 0.0), "#000", 2.0, BrushType::Pen));
        rig.store.commit_stroke(ink);

        let touch = PointerKind::Touch { contacts: 1 };
        rig.send(PointerEvent::Down {
            position: Point::new(30.0, 30.0),
            button: MouseButton::Left,
            kind: touch,
        });
        rig.send(PointerEvent::Move {
            position: Point::new(5.0, 0.0),
            kind: touch,
        });
        rig.send(PointerEvent::Up {
            position: Point::new(5.0, 0.0),
            button: MouseButton::Left,
            kind: touch,
        });
        assert!(rig.store.strokes().is_empty());
        assert_eq!(rig.store.undo_history().len(), 1);
    }

    #[test]
    fn test_precision_erase_keeps_strokes_until_commit() {
        let mut rig = Rig::new(ToolKind::Eraser);
        let mut ink = Stroke::new();
        ink.push(Line::ink(Point::new(0.0, 0.0), Point::new(10.0, 0.0), "#000", 2.0, BrushType::Pen));
        rig.store.commit_stroke(ink.clone());

        rig.send(PointerEvent::down(Point::new(0.0, 0.0)));
        let effects = rig.send(PointerEvent::moved(Point::new(10.0, 0.0)));
        assert!(matches!(effects.as_slice(), [ToolEffect::Repaint(Repaint::Segment(l))] if l.is_eraser()));
        assert_eq!(rig.store.strokes(), &[ink.clone()]);

        rig.send(PointerEvent::up(Point::new(10.0, 0.0)));
        assert_eq!(rig.store.strokes().len(), 2);
        assert_eq!(rig.store.strokes()[0], ink);
        assert!(rig.store.strokes()[1].lines.iter().all(Line::is_eraser));
    }

    #[test]
    fn test_secondary_button_pans() {
        let mut rig = Rig::new(ToolKind::Pen);
        rig.camera.set_scale(2.0);
        let effects = rig.send(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Right,
            kind: PointerKind::Mouse,
        });
        assert_eq!(effects, vec![ToolEffect::Cursor(CursorHint::Move)]);
        assert_eq!(rig.machine.state(), &ToolState::Panning);

        let effects = rig.send(PointerEvent::moved(Point::new(20.0, -10.0)));
        assert_eq!(effects, vec![ToolEffect::Repaint(Repaint::Full)]);
        assert!((rig.camera.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((rig.camera.offset.y + 5.0).abs() < f64::EPSILON);

        let effects = rig.send(PointerEvent::Up {
            position: Point::new(20.0, -10.0),
            button: MouseButton::Right,
            kind: PointerKind::Mouse,
        });
        assert_eq!(effects, vec![ToolEffect::Cursor(CursorHint::Pen)]);
        assert!(rig.store.strokes().is_empty());
    }

    #[test]
    fn test_shape_drag_previews_and_commits() {
        let mut rig = Rig::new(ToolKind::Shape);
        rig.config.selected_shape = ShapeKind::Circle;
        rig.send(PointerEvent::down(Point::new(10.0, 10.0)));
        let effects = rig.send(PointerEvent::moved(Point::new(30.0, 20.0)));
        assert_eq!(effects, vec![ToolEffect::Repaint(Repaint::Full)]);
        assert_eq!(
            rig.machine.shape_preview(),
            Some(ShapeAnnotation::new(ShapeKind::Circle, Point::new(10.0, 10.0), Point::new(30.0, 20.0)))
        );

        let effects = rig.send(PointerEvent::up(Point::new(50.0, 40.0)));
        let expected = ShapeAnnotation::new(ShapeKind::Circle, Point::new(10.0, 10.0), Point::new(50.0, 40.0));
        assert_eq!(effects[0], ToolEffect::ShapeCommitted(expected));
        assert_eq!(rig.store.shapes(), &[expected]);
        assert!(rig.machine.shape_preview().is_none());
    }

    #[test]
    fn test_shape_stored_unscaled() {
        let mut rig = Rig::new(ToolKind::Shape);
        rig.camera.set_scale(2.0);
        rig.drag(&[(20.0, 20.0), (100.0, 80.0)]);
        let shape = rig.store.shapes()[0];
        assert_eq!(shape.start, Point::new(10.0, 10.0));
        assert_eq!(shape.end, Point::new(50.0, 40.0));
    }

    #[test]
    fn test_text_miss_requests_entry() {
        let mut rig = Rig::new(ToolKind::Text);
        let effects = rig.send(PointerEvent::down(Point::new(40.0, 60.0)));
        assert_eq!(effects, vec![ToolEffect::TextEntryRequested(Point::new(40.0, 60.0))]);
        assert_eq!(rig.machine.text_anchor(), Some(Point::new(40.0, 60.0)));
    }

    #[test]
    fn test_text_hit_drags_selection() {
        let mut rig = Rig::new(ToolKind::Text);
        rig.store.add_text(TextAnnotation::new(Point::new(0.0, 20.0), "hello", 12.0));

        rig.send(PointerEvent::down(Point::new(5.0, 10.0)));
        assert!(rig.machine.is_text_dragging());
        rig.send(PointerEvent::moved(Point::new(15.0, 30.0)));
        assert_eq!(rig.store.text_objects()[0].origin(), Point::new(10.0, 40.0));

        rig.send(PointerEvent::up(Point::new(15.0, 30.0)));
        assert!(!rig.machine.is_text_dragging());
        assert!(rig.machine.text_anchor().is_none());
    }

    #[test]
    fn test_select_tool_does_nothing() {
        let mut rig = Rig::new(ToolKind::Select);
        let effects = rig.drag(&[(0.0, 0.0), (50.0, 50.0)]);
        assert!(effects.is_empty());
        assert!(rig.store.document().is_empty());
    }

    #[test]
    fn test_previous_cursor_updates_when_idle() {
        let mut rig = Rig::new(ToolKind::Select);
        rig.send(PointerEvent::moved(Point::new(3.0, 4.0)));
        assert_eq!(rig.machine.input().previous_pointer_position, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_cursor_for_tool() {
        let config = ToolConfig {
            selected_tool: ToolKind::Eraser,
            eraser_size: 10.0,
            ..ToolConfig::default()
        };
        assert_eq!(CursorHint::for_tool(&config, 1.5), CursorHint::Eraser { size: 15.0 });
    }
}
