//! Screen-space outlines for shape annotations.

use kurbo::{BezPath, Circle, Point, Shape};
use scrawl_core::Camera;
use scrawl_core::shapes::{ShapeAnnotation, ShapeKind};

/// Outline of `shape` as it appears through `camera`.
pub fn shape_outline(shape: &ShapeAnnotation, camera: &Camera) -> BezPath {
    outline(
        shape.shape_kind,
        camera.to_screen(shape.start),
        camera.to_screen(shape.end),
    )
}

/// Outline for a drag from `start` to `end`, both in screen coordinates.
pub fn outline(kind: ShapeKind, start: Point, end: Point) -> BezPath {
    let width = end.x - start.x;
    let height = end.y - start.y;
    match kind {
        ShapeKind::Rectangle => corner_rect(start, width, height),
        ShapeKind::Square => {
            let size = width.abs().max(height.abs());
            let side = if width < 0.0 { -size } else { size };
            corner_rect(start, side, side)
        }
        // The drag start is the center; the end lies on the circumference.
        ShapeKind::Circle => Circle::new(start, width.hypot(height)).to_path(0.1),
        ShapeKind::Triangle => {
            let base = width.abs();
            let mut path = BezPath::new();
            path.move_to(start);
            path.line_to((start.x + base, start.y));
            path.line_to((start.x + base / 2.0, start.y - height));
            path.close_path();
            path
        }
    }
}

/// Rectangle anchored at `origin`; negative sizes extend left or up.
fn corner_rect(origin: Point, width: f64, height: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(origin);
    path.line_to((origin.x + width, origin.y));
    path.line_to((origin.x + width, origin.y + height));
    path.line_to((origin.x, origin.y + height));
    path.close_path();
    path
}
