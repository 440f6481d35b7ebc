//! Per-brush painting of a single screen-space line.

use crate::renderer::{Paint, RenderConfig, Surface};
use kurbo::{BezPath, Cap, Join, Point, Rect, Shape, Stroke};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use scrawl_core::shapes::{BrushType, Line, LineTool};

/// Parse a CSS color, falling back to black.
pub fn line_color(css: &str) -> Color {
    match parse_color(css) {
        Ok(color) => color.to_alpha_color::<Srgb>(),
        Err(e) => {
            log::warn!("Unparseable stroke color {css:?}: {e}; using black");
            Color::BLACK
        }
    }
}

/// Canvas line width before any calligraphy line has been drawn.
const INITIAL_CALLIGRAPHY_WIDTH: f64 = 1.0;

/// Paints lines. Calligraphy width eases from line to line, so a painter
/// carries state across the lines of one stroke.
#[derive(Debug, Clone)]
pub struct LinePainter<'a> {
    config: &'a RenderConfig,
    scale: f64,
    calligraphy_width: f64,
}

impl<'a> LinePainter<'a> {
    pub fn new(config: &'a RenderConfig, scale: f64) -> Self {
        Self {
            config,
            scale,
            calligraphy_width: INITIAL_CALLIGRAPHY_WIDTH,
        }
    }

    /// Continue from a width left by an earlier stroke segment.
    pub fn with_calligraphy_width(mut self, width: f64) -> Self {
        self.calligraphy_width = width;
        self
    }

    pub fn calligraphy_width(&self) -> f64 {
        self.calligraphy_width
    }

    /// Paint a line whose coordinates are already in screen space and whose
    /// width is in model units.
    pub fn paint(&mut self, surface: &mut dyn Surface, line: &Line) {
        let width = line.width * self.scale;
        if line.tool == LineTool::Eraser {
            let mut path = BezPath::new();
            path.move_to(line.start());
            path.line_to(line.end());
            surface.stroke(&path, &Stroke::new(width), &Paint::erase());
            return;
        }

        let color = line_color(&line.color);
        match line.brush_type {
            BrushType::Pen => {
                surface.stroke(&self.pen_path(line), &round_stroke(width), &Paint::solid(color));
            }
            BrushType::Highlighter => self.highlight(surface, line, color),
            BrushType::Calligraphy => {
                let target = (width * line.length() * self.config.calligraphy_speed_factor)
                    .max(1.0)
                    .min(width);
                self.calligraphy_width += (target - self.calligraphy_width) * self.config.calligraphy_easing;
                surface.stroke(
                    &quad_path(line),
                    &round_stroke(self.calligraphy_width),
                    &Paint::solid(color),
                );
            }
            BrushType::Glow => {
                surface.stroke(
                    &self.pen_path(line),
                    &round_stroke(width),
                    &Paint::solid(color).with_blur(self.config.glow_blur),
                );
            }
        }
    }

    /// Interpolated polyline followed by a quadratic through the midpoint.
    fn pen_path(&self, line: &Line) -> BezPath {
        let (start, end) = (line.start(), line.end());
        let segments = self.config.pen_segments.max(1);
        let mut path = BezPath::new();
        for i in 1..=segments {
            let point = start.lerp(end, i as f64 / segments as f64);
            if i == 1 {
                path.move_to(point);
            } else {
                path.line_to(point);
            }
        }
        path.extend(quad_path(line));
        path
    }

    /// Translucent rectangles stamped along the line.
    fn highlight(&self, surface: &mut dyn Surface, line: &Line, color: Color) {
        let stamps = self.config.highlighter_stamps.max(1);
        let height = line.width * self.scale * self.config.highlighter_height_factor;
        let step = line.length() / stamps as f64;
        let direction = line.end() - line.start();
        let angle = direction.y.atan2(direction.x);
        let paint = Paint::solid(color.multiply_alpha(self.config.highlighter_alpha));
        for i in 0..stamps {
            let origin = Point::new(
                line.x0 + i as f64 * step * angle.cos(),
                line.y0 + i as f64 * step * angle.sin() - height / 2.0,
            );
            let rect = Rect::from_origin_size(origin, (step, height));
            surface.fill(&rect.to_path(0.1), &paint);
        }
    }
}

fn round_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

fn quad_path(line: &Line) -> BezPath {
    let (start, end) = (line.start(), line.end());
    let mut path = BezPath::new();
    path.move_to(start);
    path.quad_to(start.midpoint(end), end);
    path
}
