//! A surface that records draw calls for later replay.

use crate::renderer::{Paint, Surface, SurfaceHost};
use kurbo::{BezPath, Point, Rect, Shape, Size};
use peniko::Color;

/// One recorded draw call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    Stroke {
        path: BezPath,
        style: kurbo::Stroke,
        paint: Paint,
    },
    Fill {
        path: BezPath,
        paint: Paint,
    },
    Text {
        origin: Point,
        text: String,
        font_size: f64,
        color: Color,
    },
}

impl DrawCommand {
    /// Screen area touched by the path geometry, ignoring stroke width.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            DrawCommand::Stroke { path, .. } | DrawCommand::Fill { path, .. } => Some(path.bounding_box()),
            DrawCommand::Clear(_) | DrawCommand::Text { .. } => None,
        }
    }

    pub fn is_erase(&self) -> bool {
        match self {
            DrawCommand::Stroke { paint, .. } | DrawCommand::Fill { paint, .. } => paint.is_erase(),
            _ => false,
        }
    }
}

/// Records every call made to it.
///
/// Hosts replay the list onto their own canvas; `clear` drops everything
/// recorded before it, since those pixels are gone anyway.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    size: Size,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand the recorded commands to the caller, leaving the list empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn stroke(&mut self, path: &BezPath, style: &kurbo::Stroke, paint: &Paint) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            style: style.clone(),
            paint: *paint,
        });
    }

    fn fill(&mut self, path: &BezPath, paint: &Paint) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            paint: *paint,
        });
    }

    fn fill_text(&mut self, origin: Point, text: &str, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
            font_size,
            color,
        });
    }
}

impl SurfaceHost for DisplayList {
    fn surface(&mut self) -> Option<&mut dyn Surface> {
        Some(self)
    }
}
