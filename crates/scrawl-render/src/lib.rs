//! Scrawl Render Library
//!
//! Turns a whiteboard frame into draw calls on a [`Surface`].

mod brush;
mod display_list;
mod engine;
mod renderer;
mod shapes;

pub use brush::{LinePainter, line_color};
pub use display_list::{DisplayList, DrawCommand};
pub use engine::{Frame, RenderEngine};
pub use renderer::{Paint, RenderConfig, RenderError, RenderResult, Surface, SurfaceHost, TextRendering};
pub use shapes::{outline, shape_outline};
