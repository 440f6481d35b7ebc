//! Camera module for pan/zoom transforms.
//!
//! The offset is expressed in model units and applied before scaling, so
//! `screen = (model + offset) * scale` and `model = screen / scale - offset`.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom bounds and step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    /// Smallest allowed scale.
    pub min_scale: f64,
    /// Largest allowed scale.
    pub max_scale: f64,
    /// Increment applied by `zoom_in` / `zoom_out`.
    pub zoom_step: f64,
    /// Wheel delta that corresponds to a 100% zoom change.
    pub wheel_zoom_divisor: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.25,
            max_scale: 2.0,
            zoom_step: 0.25,
            wheel_zoom_divisor: 500.0,
        }
    }
}

/// Camera manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and model coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan offset in model units.
    pub offset: Vec2,
    /// Current scale, always within the configured bounds.
    scale: f64,
    config: ViewConfig,
}

impl Default for Camera {
    fn default() -> Self {
        Self::with_config(ViewConfig::default())
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom bounds.
    pub fn with_config(config: ViewConfig) -> Self {
        let mut config = config;
        if config.min_scale > config.max_scale {
            std::mem::swap(&mut config.min_scale, &mut config.max_scale);
        }
        Self {
            offset: Vec2::ZERO,
            scale: 1.0_f64.clamp(config.min_scale, config.max_scale),
            config,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Set the scale directly, clamped to the configured bounds.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(self.config.min_scale, self.config.max_scale);
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts model coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale) * Affine::translate(self.offset)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to model coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(-self.offset) * Affine::scale(1.0 / self.scale)
    }

    /// Convert a model point to screen coordinates.
    pub fn to_screen(&self, model: Point) -> Point {
        Point::new(
            (model.x + self.offset.x) * self.scale,
            (model.y + self.offset.y) * self.scale,
        )
    }

    /// Convert a screen point to model coordinates.
    pub fn to_model(&self, screen: Point) -> Point {
        Point::new(
            screen.x / self.scale - self.offset.x,
            screen.y / self.scale - self.offset.y,
        )
    }

    /// Pan by a delta measured in screen pixels.
    pub fn pan_screen(&mut self, delta: Vec2) {
        self.offset += delta / self.scale;
    }

    /// Step the zoom up by one increment. Returns false at the upper bound.
    pub fn zoom_in(&mut self) -> bool {
        if self.scale >= self.config.max_scale {
            return false;
        }
        self.scale = (self.scale + self.config.zoom_step).min(self.config.max_scale);
        true
    }

    /// Step the zoom down by one increment. Returns false at the lower bound.
    pub fn zoom_out(&mut self) -> bool {
        if self.scale <= self.config.min_scale {
            return false;
        }
        self.scale = (self.scale - self.config.zoom_step).max(self.config.min_scale);
        true
    }

    /// Zoom by `factor`, keeping the model point under `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let new_scale = (self.scale * factor).clamp(self.config.min_scale, self.config.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }

        let anchor = self.to_model(screen_point);
        self.scale = new_scale;
        self.offset = Vec2::new(
            screen_point.x / new_scale - anchor.x,
            screen_point.y / new_scale - anchor.y,
        );
        true
    }

    /// Apply a wheel gesture: zoom around the pointer when `zoom` is set,
    /// otherwise scroll the view opposite to the wheel delta.
    pub fn wheel(&mut self, position: Point, delta: Vec2, zoom: bool) -> bool {
        if zoom {
            let factor = 1.0 - delta.y / self.config.wheel_zoom_divisor;
            self.zoom_at(position, factor)
        } else {
            if delta == Vec2::ZERO {
                return false;
            }
            self.pan_screen(-delta);
            true
        }
    }

    /// Reset camera to the origin at 100%.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0_f64.clamp(self.config.min_scale, self.config.max_scale);
    }

    /// Check whether the camera is at the reset position.
    pub fn is_reset(&self) -> bool {
        self.offset == Vec2::ZERO && (self.scale - 1.0).abs() < f64::EPSILON
    }
}
