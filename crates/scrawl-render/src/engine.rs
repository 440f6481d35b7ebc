//! Full and incremental redraws of a whiteboard.

use crate::brush::LinePainter;
use crate::renderer::{Paint, RenderConfig, RenderError, RenderResult, Surface, SurfaceHost, TextRendering};
use crate::shapes::shape_outline;
use kurbo::{Rect, Shape};
use scrawl_core::shapes::{ShapeAnnotation, Stroke};
use scrawl_core::tools::Repaint;
use scrawl_core::{Camera, Whiteboard, WhiteboardDocument};

/// Everything a redraw reads.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub document: &'a WhiteboardDocument,
    pub camera: &'a Camera,
    /// In-progress stroke, drawn over the committed ones.
    pub current_stroke: Option<&'a Stroke>,
    pub shape_preview: Option<ShapeAnnotation>,
    pub selected_text: Option<usize>,
    pub text_dragging: bool,
}

impl<'a> Frame<'a> {
    pub fn new(document: &'a WhiteboardDocument, camera: &'a Camera) -> Self {
        Self {
            document,
            camera,
            current_stroke: None,
            shape_preview: None,
            selected_text: None,
            text_dragging: false,
        }
    }

    pub fn from_whiteboard(board: &'a Whiteboard) -> Self {
        let machine = board.machine();
        Self {
            document: board.store().document(),
            camera: board.camera(),
            current_stroke: machine.current_stroke(),
            shape_preview: machine.shape_preview(),
            selected_text: board.store().selected_text(),
            text_dragging: machine.is_text_dragging(),
        }
    }
}

/// Paints frames onto whatever surface the host provides.
#[derive(Debug, Clone)]
pub struct RenderEngine {
    config: RenderConfig,
    /// Calligraphy width left by the last painted line.
    calligraphy_width: f64,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl RenderEngine {
    pub fn new(config: RenderConfig) -> Self {
        let calligraphy_width = LinePainter::new(&config, 1.0).calligraphy_width();
        Self {
            config,
            calligraphy_width,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Carry out the repaints produced by one engine step.
    ///
    /// Returns false when nothing could be drawn.
    pub fn apply(&mut self, host: &mut dyn SurfaceHost, frame: &Frame<'_>, repaints: &[Repaint]) -> bool {
        if repaints.is_empty() {
            return true;
        }
        if repaints.contains(&Repaint::Full) {
            return self.redraw(host, frame);
        }
        let surface = match acquire(host) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Segment draw skipped: {e}");
                return false;
            }
        };
        let mut painter = LinePainter::new(&self.config, frame.camera.scale())
            .with_calligraphy_width(self.calligraphy_width);
        for repaint in repaints {
            if let Repaint::Segment(line) = repaint {
                painter.paint(surface, line);
            }
        }
        self.calligraphy_width = painter.calligraphy_width();
        true
    }

    /// Repaint the whole frame from the document.
    pub fn redraw(&mut self, host: &mut dyn SurfaceHost, frame: &Frame<'_>) -> bool {
        match acquire(host) {
            Ok(surface) => {
                self.paint_frame(surface, frame);
                true
            }
            Err(e) => {
                log::error!("Redraw aborted: {e}");
                false
            }
        }
    }

    fn paint_frame(&mut self, surface: &mut dyn Surface, frame: &Frame<'_>) {
        let camera = frame.camera;
        surface.clear(self.config.background_color);

        let shape_style = kurbo::Stroke::new(self.config.shape_stroke_width);
        let shape_paint = Paint::solid(self.config.shape_color);
        for shape in frame.document.shapes.iter().chain(frame.shape_preview.as_ref()) {
            surface.stroke(&shape_outline(shape, camera), &shape_style, &shape_paint);
        }

        let mut painter = LinePainter::new(&self.config, camera.scale());
        for stroke in frame.document.strokes.iter().chain(frame.current_stroke) {
            for line in &stroke.lines {
                painter.paint(surface, &line.map_points(|p| camera.to_screen(p)));
            }
        }
        self.calligraphy_width = painter.calligraphy_width();

        self.paint_text(surface, frame);
    }

    fn paint_text(&self, surface: &mut dyn Surface, frame: &Frame<'_>) {
        let camera = frame.camera;
        let texts = &frame.document.text_objects;
        let first = match self.config.text_rendering {
            TextRendering::All => 0,
            TextRendering::LatestOnly => texts.len().saturating_sub(1),
        };
        let font_size = self.config.text_font_size * camera.scale();
        for (index, text) in texts.iter().enumerate().skip(first) {
            surface.fill_text(camera.to_screen(text.origin()), &text.text, font_size, self.config.text_color);

            if frame.text_dragging && frame.selected_text == Some(index) {
                let bounds = text.bounds();
                let border = Rect::from_points(
                    camera.to_screen(bounds.origin()),
                    camera.to_screen((bounds.x1, bounds.y1).into()),
                );
                surface.stroke(
                    &border.to_path(0.1),
                    &kurbo::Stroke::new(self.config.selection_width),
                    &Paint::solid(self.config.selection_color),
                );
            }
        }
    }
}

fn acquire(host: &mut dyn SurfaceHost) -> RenderResult<&mut dyn Surface> {
    host.surface().ok_or(RenderError::SurfaceUnavailable)
}
