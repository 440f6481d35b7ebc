//! Text annotations.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Line height given to new text annotations.
pub const TEXT_HEIGHT: f64 = 20.0;

/// Horizontal padding added to the measured text width.
const TEXT_PADDING: f64 = 10.0;

/// Average glyph advance relative to the font size.
const GLYPH_ADVANCE: f64 = 0.5;

/// A text label. `(x, y)` is the baseline origin in model coordinates;
/// the text occupies `[x, x + width] × [y - height, y]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub width: f64,
    pub height: f64,
}

impl TextAnnotation {
    /// Create a text annotation, estimating its width from the font size.
    pub fn new(position: Point, text: impl Into<String>, font_size: f64) -> Self {
        let text = text.into();
        let width = estimate_width(&text, font_size);
        Self {
            x: position.x,
            y: position.y,
            text,
            width,
            height: TEXT_HEIGHT,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y - self.height, self.x + self.width, self.y)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y - self.height
            && point.y <= self.y
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

fn estimate_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size.max(0.0) * GLYPH_ADVANCE + TEXT_PADDING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_estimates_width() {
        let text = TextAnnotation::new(Point::new(5.0, 50.0), "abcd", 12.0);
        assert!((text.width - 34.0).abs() < f64::EPSILON);
        assert!((text.height - TEXT_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contains_uses_baseline_box() {
        let text = TextAnnotation::new(Point::new(0.0, 50.0), "hi", 10.0);
        assert!(text.contains(Point::new(1.0, 40.0)));
        assert!(text.contains(Point::new(0.0, 50.0)));
        assert!(!text.contains(Point::new(1.0, 51.0)));
        assert!(!text.contains(Point::new(1.0, 29.0)));
        assert!(!text.contains(Point::new(-0.5, 40.0)));
    }

    #[test]
    fn test_translate() {
        let mut text = TextAnnotation::new(Point::ZERO, "x", 10.0);
        text.translate(Vec2::new(3.0, -4.0));
        assert_eq!(text.origin(), Point::new(3.0, -4.0));
    }
}
