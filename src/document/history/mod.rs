//! Undo/Redo for document edits.
//!
//! Every reversible mutation of the [`Document`](super::Document) is recorded
//! as an [`EditCommand`]. Undo pops the newest command and replays its inverse
//! through the same document entry points, with capture switched off so the
//! replay itself is never recorded.
//!
//! ## Module Structure
//!
//! - [`commands`] - EditCommand enum defining all reversible operations
//! - [`command_history`] - CommandHistory stacks, replay guard and dirty flag
//! - [`execute`] - Replay of a command in either direction
//! - [`systems`] - Bevy systems answering undo/redo requests

mod command_history;
mod commands;
mod execute;
mod systems;


// Re-exports
pub use command_history::CommandHistory;
pub use commands::{EditCommand, LayerRemoval};
pub(crate) use execute::{execute_redo, execute_undo};
pub use systems::{RedoRequest, UndoRequest, handle_redo, handle_undo};

/// Whether a mutation is recorded in the history.
///
/// User edits pass `Record`. Undo/redo and edit tools replaying their own
/// changes pass `Replay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capture {
    #[default]
    Record,
    Replay,
}

impl Capture {
    pub fn is_record(self) -> bool {
        self == Capture::Record
    }
}
