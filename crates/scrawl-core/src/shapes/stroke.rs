//! Freehand ink: lines and strokes.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Color written into eraser lines; never painted, kept for the persisted schema.
pub const ERASER_COLOR: &str = "rgb(0 0 0 / 0%)";

/// How a line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushType {
    #[default]
    Pen,
    Highlighter,
    Calligraphy,
    Glow,
}

impl BrushType {
    pub fn name(self) -> &'static str {
        match self {
            BrushType::Pen => "Pen",
            BrushType::Highlighter => "Highlighter",
            BrushType::Calligraphy => "Calligraphy",
            BrushType::Glow => "Glow",
        }
    }
}

/// Whether a line deposits ink or removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTool {
    #[default]
    Pen,
    Eraser,
}

/// One segment between two consecutive pointer samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    pub width: f64,
    #[serde(alias = "type")]
    pub brush_type: BrushType,
    pub tool: LineTool,
}

impl Line {
    /// Create an ink line between two points.
    pub fn ink(from: Point, to: Point, color: impl Into<String>, width: f64, brush_type: BrushType) -> Self {
        Self {
            x0: from.x,
            y0: from.y,
            x1: to.x,
            y1: to.y,
            color: color.into(),
            width,
            brush_type,
            tool: LineTool::Pen,
        }
    }

    /// Create an eraser line between two points.
    pub fn eraser(from: Point, to: Point, width: f64) -> Self {
        Self {
            x0: from.x,
            y0: from.y,
            x1: to.x,
            y1: to.y,
            color: ERASER_COLOR.to_string(),
            width,
            brush_type: BrushType::Pen,
            tool: LineTool::Eraser,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn length(&self) -> f64 {
        (self.end() - self.start()).hypot()
    }

    /// Axis-aligned bounding box of the segment (zero-area for straight lines).
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    /// Map both endpoints through `f`, keeping style fields.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        let start = f(self.start());
        let end = f(self.end());
        Self {
            x0: start.x,
            y0: start.y,
            x1: end.x,
            y1: end.y,
            ..self.clone()
        }
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == LineTool::Eraser
    }
}

/// One continuous drag gesture's worth of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bounding box of all lines, if any.
    pub fn bounds(&self) -> Option<Rect> {
        self.lines
            .iter()
            .map(Line::bounds)
            .reduce(|acc, r| acc.union(r))
    }
}
