//! Named canvas actions and their keyboard shortcuts.

use crate::input::{Key, Modifiers};

/// Operations reachable from toolbar, menus and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasAction {
    Undo,
    Redo,
    DeleteSelected,
    SnapToGrid,
    ZoomIn,
    ZoomOut,
    EnterResizeMode,
    ExitResizeMode,
    RotateLeft,
    RotateRight,
}

impl CanvasAction {
    pub fn description(self) -> &'static str {
        match self {
            CanvasAction::Undo => "Undo",
            CanvasAction::Redo => "Redo",
            CanvasAction::DeleteSelected => "Delete selected images",
            CanvasAction::SnapToGrid => "Snap all images to the grid",
            CanvasAction::ZoomIn => "Zoom in",
            CanvasAction::ZoomOut => "Zoom out",
            CanvasAction::EnterResizeMode => "Resize the selected image",
            CanvasAction::ExitResizeMode => "Leave resize mode",
            CanvasAction::RotateLeft => "Rotate left 90°",
            CanvasAction::RotateRight => "Rotate right 90°",
        }
    }
}

/// A keyboard shortcut bound to an action.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub action: CanvasAction,
}

impl Shortcut {
    pub const fn new(key: Key, ctrl: bool, shift: bool, action: CanvasAction) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(match self.key {
            Key::Escape => "Escape".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Char(c) => c.to_uppercase().to_string(),
        });
        parts.join("+")
    }

    fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        if self.key != key || self.ctrl != modifiers.command() {
            return false;
        }
        // Shift only disambiguates letters; symbols like '+' need it on some layouts
        match key {
            Key::Char(c) if c.is_alphabetic() => self.shift == modifiers.shift,
            _ => true,
        }
    }
}

/// Registry of all canvas shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    const SHORTCUTS: &'static [Shortcut] = &[
        Shortcut::new(Key::Char('z'), true, false, CanvasAction::Undo),
        Shortcut::new(Key::Char('z'), true, true, CanvasAction::Redo),
        Shortcut::new(Key::Char('y'), true, false, CanvasAction::Redo),
        Shortcut::new(Key::Char('g'), true, false, CanvasAction::SnapToGrid),
        Shortcut::new(Key::Char('='), true, false, CanvasAction::ZoomIn),
        Shortcut::new(Key::Char('+'), true, false, CanvasAction::ZoomIn),
        Shortcut::new(Key::Char('-'), true, false, CanvasAction::ZoomOut),
        Shortcut::new(Key::Char('r'), true, false, CanvasAction::EnterResizeMode),
        Shortcut::new(Key::Escape, false, false, CanvasAction::ExitResizeMode),
        Shortcut::new(Key::Char('['), true, false, CanvasAction::RotateLeft),
        Shortcut::new(Key::Char(']'), true, false, CanvasAction::RotateRight),
        Shortcut::new(Key::Delete, false, false, CanvasAction::DeleteSelected),
        Shortcut::new(Key::Backspace, false, false, CanvasAction::DeleteSelected),
    ];

    pub fn all() -> &'static [Shortcut] {
        Self::SHORTCUTS
    }

    /// Action bound to a key chord, if any.
    pub fn lookup(key: Key, modifiers: Modifiers) -> Option<CanvasAction> {
        Self::SHORTCUTS
            .iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.action)
    }

    /// Shortcuts bound to an action, for menu hints.
    pub fn for_action(action: CanvasAction) -> impl Iterator<Item = &'static Shortcut> {
        Self::SHORTCUTS.iter().filter(move |shortcut| shortcut.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(ShortcutRegistry::lookup(Key::Char('z'), Modifiers::CTRL), Some(CanvasAction::Undo));
        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::CTRL
        };
        assert_eq!(ShortcutRegistry::lookup(Key::Char('z'), ctrl_shift), Some(CanvasAction::Redo));
        assert_eq!(ShortcutRegistry::lookup(Key::Char('+'), ctrl_shift), Some(CanvasAction::ZoomIn));
        assert_eq!(ShortcutRegistry::lookup(Key::Delete, Modifiers::NONE), Some(CanvasAction::DeleteSelected));
        assert_eq!(ShortcutRegistry::lookup(Key::Char('z'), Modifiers::NONE), None);
        assert_eq!(ShortcutRegistry::lookup(Key::Char('q'), Modifiers::CTRL), None);
    }

    #[test]
    fn test_cmd_counts_as_ctrl() {
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutRegistry::lookup(Key::Char('g'), cmd), Some(CanvasAction::SnapToGrid));
    }

    #[test]
    fn test_format() {
        let redo: Vec<String> = ShortcutRegistry::for_action(CanvasAction::Redo).map(Shortcut::format).collect();
        assert_eq!(redo, vec!["Ctrl+Shift+Z", "Ctrl+Y"]);
        let rotate: Vec<String> = ShortcutRegistry::for_action(CanvasAction::RotateRight)
            .map(Shortcut::format)
            .collect();
        assert_eq!(rotate, vec!["Ctrl+]"]);
    }
}
