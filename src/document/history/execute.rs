//! Execute functions for undo and redo operations.
//!
//! Both run with capture switched off. Commands are updated in place so the
//! same value can move back and forth between the two stacks.

use crate::document::Document;
use crate::drawing::ObjectId;

use super::Capture;
use super::commands::{EditCommand, LayerRemoval};

/// Revert `command` against `document`
pub(crate) fn execute_undo(command: &mut EditCommand, document: &mut Document) {
    match command {
        EditCommand::Add { ids, detached, .. } => {
            // Undo add = delete, keeping the objects for redo
            let removals = document.delete_objects_with(ids.as_slice(), Capture::Replay);
            *detached = removals
                .into_iter()
                .flat_map(LayerRemoval::into_objects)
                .collect();
        }
        EditCommand::Remove { removals } => {
            // Undo delete = put every object back where it was
            for removal in removals.iter_mut() {
                let detached = std::mem::take(&mut removal.detached);
                document.restore_objects(&removal.layer, detached);
            }
        }
        EditCommand::Move { ids, offset } => {
            document.move_objects_with(-*offset, ids.as_slice(), Capture::Replay);
        }
        EditCommand::NodeMove { nodes } => {
            for node in nodes.iter_mut().rev() {
                match document.object_mut(node.owner()) {
                    Some(target) => node.undo(target),
                    None => tracing::warn!("Node owner {} no longer exists", node.owner()),
                }
            }
        }
        EditCommand::ToolEdit { tool } => tool.undo(document),
    }
}

/// Reapply `command` against `document`
pub(crate) fn execute_redo(command: &mut EditCommand, document: &mut Document) {
    match command {
        EditCommand::Add {
            layer, detached, ..
        } => {
            for object in detached.drain(..) {
                document.add_object_with(layer.as_str(), object, Capture::Replay);
            }
        }
        EditCommand::Remove { removals } => {
            let ids: Vec<ObjectId> = removals
                .iter()
                .flat_map(|removal| removal.ids.iter().copied())
                .collect();
            *removals = document.delete_objects_with(&ids, Capture::Replay);
        }
        EditCommand::Move { ids, offset } => {
            document.move_objects_with(*offset, ids.as_slice(), Capture::Replay);
        }
        EditCommand::NodeMove { nodes } => {
            for node in nodes.iter_mut() {
                match document.object_mut(node.owner()) {
                    Some(target) => node.redo(target),
                    None => tracing::warn!("Node owner {} no longer exists", node.owner()),
                }
            }
        }
        EditCommand::ToolEdit { tool } => tool.redo(document),
    }
}
