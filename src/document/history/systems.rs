//! Bevy systems for handling undo/redo requests.

use bevy::prelude::*;

use crate::document::Document;

/// Message asking the document to undo its last command
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct UndoRequest;

/// Message asking the document to redo the last undone command
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RedoRequest;

/// System to undo once per request
pub fn handle_undo(mut events: MessageReader<UndoRequest>, mut document: ResMut<Document>) {
    for _ in events.read() {
        if !document.undo() {
            tracing::debug!("Nothing to undo");
        }
    }
}

/// System to redo once per request
pub fn handle_redo(mut events: MessageReader<RedoRequest>, mut document: ResMut<Document>) {
    for _ in events.read() {
        if !document.redo() {
            tracing::debug!("Nothing to redo");
        }
    }
}
