//! Tool configuration and its change-notifying store.

use super::{EraserKind, ToolKind};
use crate::shapes::{BrushType, ShapeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings the toolbar controls. Read by the engine whenever a gesture
/// needs them, never cached for the length of a gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolConfig {
    pub selected_tool: ToolKind,
    pub brush_type: BrushType,
    pub eraser_type: EraserKind,
    pub tool_color: String,
    pub highlighter_color: String,
    pub tool_size: f64,
    pub highlighter_size: f64,
    pub eraser_size: f64,
    pub text_size: f64,
    pub selected_shape: ShapeKind,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            selected_tool: ToolKind::Select,
            brush_type: BrushType::Pen,
            eraser_type: EraserKind::Precision,
            tool_color: "#000000".to_string(),
            highlighter_color: "#ffff00".to_string(),
            tool_size: 5.0,
            highlighter_size: 5.0,
            eraser_size: 5.0,
            text_size: 12.0,
            selected_shape: ShapeKind::Rectangle,
        }
    }
}

impl ToolConfig {
    /// Color for new ink, which depends on the brush.
    pub fn ink_color(&self) -> &str {
        match self.brush_type {
            BrushType::Highlighter => &self.highlighter_color,
            BrushType::Pen | BrushType::Calligraphy | BrushType::Glow => &self.tool_color,
        }
    }

    /// Width for new ink, which depends on the brush. Negative sizes count as zero.
    pub fn ink_width(&self) -> f64 {
        let size = match self.brush_type {
            BrushType::Highlighter => self.highlighter_size,
            BrushType::Pen | BrushType::Calligraphy | BrushType::Glow => self.tool_size,
        };
        non_negative(size)
    }

    pub fn eraser_width(&self) -> f64 {
        non_negative(self.eraser_size)
    }

    pub fn text_font_size(&self) -> f64 {
        non_negative(self.text_size)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Handle returned by [`ToolConfigStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ToolConfig)>;

/// Owns the current [`ToolConfig`] and notifies subscribers on change.
#[derive(Default)]
pub struct ToolConfigStore {
    config: ToolConfig,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl fmt::Debug for ToolConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolConfigStore")
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ToolConfigStore {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn get(&self) -> &ToolConfig {
        &self.config
    }

    /// Mutate the configuration. Subscribers run only if something changed.
    pub fn update(&mut self, f: impl FnOnce(&mut ToolConfig)) -> bool {
        let before = self.config.clone();
        f(&mut self.config);
        if self.config == before {
            return false;
        }
        for (_, listener) in &mut self.listeners {
            listener(&self.config);
        }
        true
    }

    /// Replace the configuration wholesale.
    pub fn set(&mut self, config: ToolConfig) -> bool {
        self.update(|current| *current = config)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ToolConfig) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }
}
