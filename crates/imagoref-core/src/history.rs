//! Cursor-based undo/redo history with atomic macros.

use crate::command::Command;
use crate::scene::Scene;

/// Default number of entries kept before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// One undo/redo step: a single command or a whole macro.
#[derive(Debug)]
pub struct HistoryEntry {
    label: String,
    commands: Vec<Command>,
}

impl HistoryEntry {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn apply(&mut self, scene: &mut Scene) {
        for command in &mut self.commands {
            command.apply(scene);
        }
    }

    fn revert(&mut self, scene: &mut Scene) {
        for command in self.commands.iter_mut().rev() {
            command.revert(scene);
        }
    }
}

/// Undo/redo availability, for enabling menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Ordered history of applied and undone entries.
///
/// Entries before `cursor` are applied, the rest are undone and can be redone.
#[derive(Debug)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    open_macro: Option<HistoryEntry>,
    /// Maximum number of entries, 0 for unlimited.
    limit: usize,
    reported: Availability,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            open_macro: None,
            limit,
            reported: Availability::default(),
        }
    }

    /// Record a command whose effect has already been applied.
    ///
    /// Inside a macro the command joins the macro's entry. Otherwise any redo
    /// tail is discarded first.
    pub fn push(&mut self, command: impl Into<Command>) {
        let command = command.into();
        if let Some(open) = &mut self.open_macro {
            log::debug!("Recording '{}' in macro '{}'", command.label(), open.label);
            open.commands.push(command);
            return;
        }
        log::debug!("Recording '{}'", command.label());
        let label = command.label();
        self.push_entry(HistoryEntry {
            label,
            commands: vec![command],
        });
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        self.cursor = self.entries.len();
        self.enforce_limit();
    }

    /// Open a macro. Commands pushed until [`HistoryStack::end_macro`] form one entry.
    pub fn begin_macro(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if let Some(open) = &self.open_macro {
            log::warn!("Ignoring macro '{}': '{}' is still open", label, open.label);
            return false;
        }
        log::debug!("Begin macro '{label}'");
        self.open_macro = Some(HistoryEntry {
            label,
            commands: Vec::new(),
        });
        true
    }

    /// Close the open macro. An empty macro leaves no entry.
    pub fn end_macro(&mut self) -> bool {
        let Some(entry) = self.open_macro.take() else {
            log::warn!("end_macro without an open macro");
            return false;
        };
        if entry.is_empty() {
            log::debug!("Dropping empty macro '{}'", entry.label);
            return false;
        }
        log::debug!("End macro '{}' ({} commands)", entry.label, entry.len());
        self.push_entry(entry);
        true
    }

    /// Check if commands are currently collected into a macro.
    pub fn is_macro_open(&self) -> bool {
        self.open_macro.is_some()
    }

    /// Revert the entry before the cursor.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        if self.is_macro_open() {
            log::warn!("Ignoring undo while a macro is open");
            return false;
        }
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let entry = &mut self.entries[self.cursor];
        log::debug!("Undo '{}'", entry.label);
        entry.revert(scene);
        true
    }

    /// Re-apply the entry at the cursor.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        if self.is_macro_open() {
            log::warn!("Ignoring redo while a macro is open");
            return false;
        }
        let Some(entry) = self.entries.get_mut(self.cursor) else {
            return false;
        };
        log::debug!("Redo '{}'", entry.label);
        entry.apply(scene);
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.cursor.checked_sub(1).map(|i| self.entries[i].label())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(HistoryEntry::label)
    }

    pub fn availability(&self) -> Availability {
        Availability {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Report availability if it changed since the last call.
    pub fn take_availability_change(&mut self) -> Option<Availability> {
        let current = self.availability();
        if current == self.reported {
            return None;
        }
        self.reported = current;
        Some(current)
    }

    /// Number of entries, applied or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, including an open macro.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.open_macro = None;
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        if self.limit == 0 || self.entries.len() <= self.limit {
            return;
        }
        // Oldest applied entries go first, then the far end of the redo tail.
        let excess = self.entries.len() - self.limit;
        let dropped = excess.min(self.cursor);
        self.entries.drain(..dropped);
        self.cursor -= dropped;
        self.entries.truncate(self.limit);
        log::debug!("History limit {} reached, dropped {} entries", self.limit, excess);
    }
}
