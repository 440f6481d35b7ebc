//! Drawing surface abstraction and render configuration.

use kurbo::{BezPath, Point, Size};
use peniko::{Color, Compose};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No drawing surface available")]
    SurfaceUnavailable,
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Which text annotations a full redraw paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRendering {
    #[default]
    All,
    /// Only the most recently added annotation.
    LatestOnly,
}

/// Colors and brush constants used when painting.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub background_color: Color,
    pub text_font_size: f64,
    pub text_color: Color,
    /// Border drawn around a text annotation while it is dragged.
    pub selection_color: Color,
    pub selection_width: f64,
    pub shape_color: Color,
    pub shape_stroke_width: f64,
    pub glow_blur: f64,
    pub highlighter_alpha: f32,
    pub highlighter_stamps: usize,
    /// Highlighter stamp height as a multiple of the scaled line width.
    pub highlighter_height_factor: f64,
    /// Interpolated sub-segments for pen and glow lines.
    pub pen_segments: usize,
    pub calligraphy_speed_factor: f64,
    pub calligraphy_easing: f64,
    pub text_rendering: TextRendering,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            text_font_size: 20.0,
            text_color: Color::BLACK,
            selection_color: Color::from_rgb8(70, 130, 180), // steelblue
            selection_width: 2.0,
            shape_color: Color::BLACK,
            shape_stroke_width: 2.0,
            glow_blur: 10.0,
            highlighter_alpha: 0.4,
            highlighter_stamps: 30,
            highlighter_height_factor: 8.0,
            pen_segments: 10,
            calligraphy_speed_factor: 0.06,
            calligraphy_easing: 0.2,
            text_rendering: TextRendering::All,
        }
    }
}

impl RenderConfig {
    pub fn with_text_rendering(mut self, mode: TextRendering) -> Self {
        self.text_rendering = mode;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }
}

/// How a path is painted onto the surface.
#[derive(Debug, Clone, Copy)]
pub struct Paint {
    pub color: Color,
    pub compose: Compose,
    /// Shadow blur radius in pixels; zero for none.
    pub blur: f64,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            compose: Compose::SrcOver,
            blur: 0.0,
        }
    }

    /// Destination-out paint: removes pixels under the path.
    pub fn erase() -> Self {
        Self {
            color: Color::BLACK,
            compose: Compose::DestOut,
            blur: 0.0,
        }
    }

    pub fn with_blur(mut self, blur: f64) -> Self {
        self.blur = blur;
        self
    }

    pub fn is_erase(&self) -> bool {
        self.compose == Compose::DestOut
    }
}

/// A 2D drawing target in screen coordinates.
///
/// Implementations map these calls onto a real canvas or scene.
pub trait Surface {
    fn size(&self) -> Size;

    /// Fill the whole surface with `color`, discarding previous pixels.
    fn clear(&mut self, color: Color);

    fn stroke(&mut self, path: &BezPath, style: &kurbo::Stroke, paint: &Paint);

    fn fill(&mut self, path: &BezPath, paint: &Paint);

    /// Draw `text` with its baseline starting at `origin`.
    fn fill_text(&mut self, origin: Point, text: &str, font_size: f64, color: Color);
}

/// Something that may or may not currently have a surface to draw on,
/// such as a window that has not been created yet.
pub trait SurfaceHost {
    fn surface(&mut self) -> Option<&mut dyn Surface>;
}
