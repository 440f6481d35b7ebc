//! Eraser algorithms.
//!
//! Precision erase is raster-only: each sample becomes an eraser [`Line`]
//! that the renderer paints with destination-out compositing. Smart erase
//! removes whole strokes from the store.

use crate::canvas::StrokeStore;
use crate::shapes::{Line, Stroke};
use kurbo::{Point, Rect, Size};

/// Square eraser footprint of side `size` centered on `center`.
pub fn eraser_rect(center: Point, size: f64) -> Rect {
    Rect::from_center_size(center, Size::new(size.max(0.0), size.max(0.0)))
}

/// Bounding-box overlap between a line and a rectangle.
///
/// Touching edges count as overlap. A diagonal line whose box overlaps the
/// rectangle is a hit even when the segment itself misses it.
pub fn line_overlaps(line: &Line, rect: Rect) -> bool {
    let bounds = line.bounds();
    !(rect.x1 < bounds.x0 || rect.x0 > bounds.x1 || rect.y1 < bounds.y0 || rect.y0 > bounds.y1)
}

/// True if any line of `stroke` overlaps `rect`.
pub fn stroke_hit(stroke: &Stroke, rect: Rect) -> bool {
    stroke.lines.iter().any(|line| line_overlaps(line, rect))
}

/// Remove every committed stroke touched by the eraser square at `center`
/// (model coordinates). Removed strokes go to the undo history so `redo`
/// restores them. Returns the number of strokes removed.
pub fn smart_erase(store: &mut StrokeStore, center: Point, eraser_size: f64) -> usize {
    let rect = eraser_rect(center, eraser_size);
    let removed = store.remove_strokes_where(|stroke| stroke_hit(stroke, rect));
    if removed > 0 {
        log::debug!("Smart erase removed {removed} stroke(s) at ({:.1}, {:.1})", center.x, center.y);
    }
    removed
}

/// Model-space eraser line for one precision-erase sample.
pub fn precision_line(previous: Point, current: Point, eraser_size: f64) -> Line {
    Line::eraser(previous, current, eraser_size.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::BrushType;

    fn stroke_between(a: (f64, f64), b: (f64, f64)) -> Stroke {
        let mut stroke = Stroke::new();
        stroke.push(Line::ink(Point::new(a.0, a.1), Point::new(b.0, b.1), "#000000", 5.0, BrushType::Pen));
        stroke
    }

    #[test]
    fn test_eraser_rect_centered() {
        let rect = eraser_rect(Point::new(10.0, 10.0), 4.0);
        assert_eq!(rect, Rect::new(8.0, 8.0, 12.0, 12.0));
    }

    #[test]
    fn test_line_overlap_edges() {
        let line = Line::ink(Point::new(0.0, 0.0), Point::new(10.0, 0.0), "#000", 1.0, BrushType::Pen);
        assert!(line_overlaps(&line, Rect::new(10.0, -1.0, 12.0, 1.0)));
        assert!(!line_overlaps(&line, Rect::new(10.5, -1.0, 12.0, 1.0)));
        assert!(!line_overlaps(&line, Rect::new(2.0, 0.5, 4.0, 2.0)));
    }

    #[test]
    fn test_bounding_box_test_hits_diagonal_miss() {
        // The segment passes far from (90, 10), but its box covers it.
        let line = Line::ink(Point::new(0.0, 0.0), Point::new(100.0, 100.0), "#000", 1.0, BrushType::Pen);
        assert!(line_overlaps(&line, eraser_rect(Point::new(90.0, 10.0), 5.0)));
    }

    #[test]
    fn test_smart_erase_removes_exact_set() {
        let mut store = StrokeStore::new();
        let near = stroke_between((0.0, 0.0), (10.0, 0.0));
        let far = stroke_between((100.0, 100.0), (120.0, 110.0));
        let also_near = stroke_between((12.0, -5.0), (12.0, 5.0));
        store.commit_stroke(near.clone());
        store.commit_stroke(far.clone());
        store.commit_stroke(also_near.clone());

        let removed = smart_erase(&mut store, Point::new(11.0, 0.0), 5.0);
        assert_eq!(removed, 2);
        assert_eq!(store.strokes(), &[far]);
        assert_eq!(store.undo_history(), &[near, also_near]);
    }

    #[test]
    fn test_smart_erase_miss_is_noop() {
        let mut store = StrokeStore::new();
        store.commit_stroke(stroke_between((0.0, 0.0), (10.0, 0.0)));
        assert_eq!(smart_erase(&mut store, Point::new(50.0, 50.0), 5.0), 0);
        assert_eq!(store.strokes().len(), 1);
        assert!(store.undo_history().is_empty());
    }

    #[test]
    fn test_precision_line_never_touches_store() {
        let mut store = StrokeStore::new();
        store.commit_stroke(stroke_between((0.0, 0.0), (10.0, 0.0)));
        let before = store.strokes().to_vec();

        let line = precision_line(Point::new(0.0, 0.0), Point::new(5.0, 0.0), 7.0);
        assert!(line.is_eraser());
        assert!((line.width - 7.0).abs() < f64::EPSILON);
        assert_eq!(store.strokes(), before.as_slice());
    }
}
