//! Keyboard shortcut registry.

use crate::input::KeyEvent;
use crate::tools::ToolKind;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Clear,
    Save,
    Open,
    /// Ask the host to select a tool; tool selection lives in the config store.
    SelectTool(ToolKind),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        self.key.eq_ignore_ascii_case(&event.key)
            && self.ctrl == event.modifiers.command()
            && self.shift == event.modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Y", true, false, Redo, "Redo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("=", true, false, ZoomIn, "Zoom in"),
            Shortcut::new("-", true, false, ZoomOut, "Zoom out"),
            Shortcut::new("0", true, false, ResetZoom, "Reset zoom"),
            Shortcut::new("X", true, false, Clear, "Clear whiteboard"),
            Shortcut::new("S", true, false, Save, "Save"),
            Shortcut::new("O", true, false, Open, "Open..."),
            Shortcut::new("1", false, false, SelectTool(ToolKind::Select), "Select"),
            Shortcut::new("2", false, false, SelectTool(ToolKind::Pen), "Pen"),
            Shortcut::new("3", false, false, SelectTool(ToolKind::Eraser), "Eraser"),
            Shortcut::new("4", false, false, SelectTool(ToolKind::Shape), "Shape"),
            Shortcut::new("6", false, false, SelectTool(ToolKind::Text), "Text"),
        ]
    }

    /// Find the action bound to a key press.
    pub fn lookup(event: &KeyEvent) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(event))
            .map(|shortcut| shortcut.action)
    }

    /// Help text, one shortcut per line.
    pub fn help() -> String {
        Self::all()
            .iter()
            .map(|shortcut| format!("  {:20} {}", shortcut.format(), shortcut.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn key(key: &str, ctrl: bool, shift: bool) -> KeyEvent {
        KeyEvent::new(
            key,
            Modifiers {
                ctrl,
                shift,
                ..Modifiers::default()
            },
        )
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(ShortcutRegistry::lookup(&key("z", true, false)), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutRegistry::lookup(&key("Z", true, true)), Some(ShortcutAction::Redo));
        assert_eq!(ShortcutRegistry::lookup(&key("y", true, false)), Some(ShortcutAction::Redo));
    }

    #[test]
    fn test_modifiers_must_match() {
        assert_eq!(ShortcutRegistry::lookup(&key("z", false, false)), None);
        assert_eq!(ShortcutRegistry::lookup(&key("2", true, false)), None);
        assert_eq!(
            ShortcutRegistry::lookup(&key("2", false, false)),
            Some(ShortcutAction::SelectTool(ToolKind::Pen))
        );
    }

    #[test]
    fn test_meta_counts_as_ctrl() {
        let event = KeyEvent::new(
            "s",
            Modifiers {
                meta: true,
                ..Modifiers::default()
            },
        );
        assert_eq!(ShortcutRegistry::lookup(&event), Some(ShortcutAction::Save));
    }

    #[test]
    fn test_format_and_help() {
        let redo = Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo");
        assert_eq!(redo.format(), "Ctrl+Shift+Z");
        assert!(ShortcutRegistry::help().contains("Ctrl+0"));
    }
}
