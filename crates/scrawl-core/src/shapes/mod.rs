//! Document content: freehand strokes, geometric shapes and text.

mod stroke;
mod text;

pub use stroke::{BrushType, ERASER_COLOR, Line, LineTool, Stroke};
pub use text::{TEXT_HEIGHT, TextAnnotation};

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Geometric shapes placed with the shape tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Square,
    #[default]
    Rectangle,
    Circle,
    Triangle,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Square => "Square",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
        }
    }

    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Square,
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Triangle,
        ]
    }
}

/// A committed shape, stored as the model-space drag start and end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeAnnotation {
    #[serde(alias = "shape")]
    pub shape_kind: ShapeKind,
    pub start: Point,
    pub end: Point,
}

impl ShapeAnnotation {
    pub fn new(shape_kind: ShapeKind, start: Point, end: Point) -> Self {
        Self {
            shape_kind,
            start,
            end,
        }
    }

    /// Rectangle spanned by the drag, used for hit tests.
    pub fn drag_bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}
