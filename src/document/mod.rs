//! The editable document: layers, selection, undo/redo and its Bevy surface.
//!
//! ## Module Structure
//!
//! - [`layer`] - Drawing layers plus the background and grid layers
//! - [`selection`] - Ordered set of selected object ids
//! - [`history`] - Edit commands and the undo/redo stacks
//! - [`model`] - The [`Document`] resource and its mutation API

pub mod history;
pub mod layer;
mod model;
pub mod selection;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};
use crate::persistence::{
    CurrentDocumentFile, DocumentLoadError, DocumentSaveError, LoadDocumentRequest,
    NewDocumentRequest, SaveDocumentRequest, UpdateLastDocumentPathRequest,
    load_document_system, new_document_system, save_document_system,
};

pub use history::{Capture, CommandHistory, EditCommand, LayerRemoval, RedoRequest, UndoRequest};
pub use layer::{BackgroundLayer, DrawingLayer, GridLayer, GridStyle};
pub use model::Document;
pub use selection::SelectionSet;

pub struct DocumentPlugin;

impl Plugin for DocumentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Document>()
            .init_resource::<CurrentDocumentFile>()
            .init_resource::<DocumentLoadError>()
            .init_resource::<DocumentSaveError>()
            .add_message::<UndoRequest>()
            .add_message::<RedoRequest>()
            .add_message::<SaveDocumentRequest>()
            .add_message::<LoadDocumentRequest>()
            .add_message::<NewDocumentRequest>()
            .add_message::<UpdateLastDocumentPathRequest>()
            .add_systems(Startup, apply_history_limit.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    new_document_system.run_if(on_message::<NewDocumentRequest>),
                    load_document_system.run_if(on_message::<LoadDocumentRequest>),
                    history::handle_undo.run_if(on_message::<UndoRequest>),
                    history::handle_redo.run_if(on_message::<RedoRequest>),
                    save_document_system.run_if(on_message::<SaveDocumentRequest>),
                )
                    .chain(),
            );
    }
}

/// Startup system copying the configured undo depth onto the document
fn apply_history_limit(config: Option<Res<AppConfig>>, mut document: ResMut<Document>) {
    if let Some(config) = config {
        document.set_history_limit(config.data.history_limit);
        tracing::debug!("History limit set to {}", config.data.history_limit);
    }
}
