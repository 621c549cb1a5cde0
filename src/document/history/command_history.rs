//! Command history for tracking undo/redo state.

use crate::constants::DEFAULT_HISTORY_LIMIT;

use super::commands::EditCommand;

/// Undo and redo stacks for one document
pub struct CommandHistory {
    /// Stack of commands that can be undone (most recent last)
    undo_stack: Vec<EditCommand>,
    /// Stack of commands that can be redone (most recent last)
    redo_stack: Vec<EditCommand>,
    /// False only while a command is being replayed
    capturing: bool,
    /// Set by any recorded change, cleared on save/load
    dirty: bool,
    /// Maximum undo depth, 0 for unlimited
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capturing: true,
            dirty: false,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl CommandHistory {
    /// Record a new command. Ignored while a replay is in progress.
    pub fn push(&mut self, command: EditCommand) {
        if !self.capturing {
            tracing::trace!("Ignoring {} pushed during replay", command.name());
            return;
        }

        // Clear redo stack when a new action is performed
        self.redo_stack.clear();

        self.undo_stack.push(command);
        self.trim();
        self.dirty = true;
    }

    fn trim(&mut self) {
        if self.limit == 0 {
            return;
        }
        while self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the last command for undo
    pub fn pop_undo(&mut self) -> Option<EditCommand> {
        self.undo_stack.pop()
    }

    /// Pop the last command for redo
    pub fn pop_redo(&mut self) -> Option<EditCommand> {
        self.redo_stack.pop()
    }

    /// Push a command to the redo stack (used after undo)
    pub fn push_redo(&mut self, command: EditCommand) {
        self.redo_stack.push(command);
    }

    /// Push a command to the undo stack (used after redo)
    pub fn push_undo(&mut self, command: EditCommand) {
        self.undo_stack.push(command);
        self.trim();
    }

    pub(crate) fn begin_replay(&mut self) {
        self.capturing = false;
    }

    pub(crate) fn end_replay(&mut self) {
        self.capturing = true;
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the undo depth, dropping the oldest commands if needed
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.trim();
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("capturing", &self.capturing)
            .field("dirty", &self.dirty)
            .field("limit", &self.limit)
            .finish()
    }
}
