//! Bevy systems reacting to document file requests.
//!
//! Documents are small, so these run synchronously within the frame.

use bevy::prelude::*;

use crate::document::Document;

use super::PersistError;
use super::messages::{
    LoadDocumentRequest, NewDocumentRequest, SaveDocumentRequest, UpdateLastDocumentPathRequest,
};
use super::resources::{CurrentDocumentFile, DocumentLoadError, DocumentSaveError};

/// Saves the document for each request
pub fn save_document_system(
    mut events: MessageReader<SaveDocumentRequest>,
    mut document: ResMut<Document>,
    mut current_file: ResMut<CurrentDocumentFile>,
    mut save_error: ResMut<DocumentSaveError>,
    mut config_events: MessageWriter<UpdateLastDocumentPathRequest>,
) {
    for event in events.read() {
        if let Some(parent) = event.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!("Failed to create directory {:?}: {}", parent, e);
        }

        match document.try_save(&event.path) {
            Ok(()) => {
                document.mark_clean();
                save_error.message = None;
                current_file.path = Some(event.path.clone());
                config_events.write(UpdateLastDocumentPathRequest {
                    path: event.path.clone(),
                });
                tracing::info!("Saved document to {:?}", event.path);
            }
            Err(e) => {
                let message = format!("Failed to save document: {}", e);
                tracing::error!("{}", message);
                save_error.message = Some(message);
            }
        }
    }
}

/// Loads a document for each request
pub fn load_document_system(
    mut events: MessageReader<LoadDocumentRequest>,
    mut document: ResMut<Document>,
    mut current_file: ResMut<CurrentDocumentFile>,
    mut load_error: ResMut<DocumentLoadError>,
    mut config_events: MessageWriter<UpdateLastDocumentPathRequest>,
) {
    for event in events.read() {
        match document.load(&event.path) {
            Ok(()) => {
                load_error.message = None;
                current_file.path = Some(event.path.clone());
                config_events.write(UpdateLastDocumentPathRequest {
                    path: event.path.clone(),
                });
            }
            Err(e) => {
                // A rejected root leaves the open document untouched
                if !matches!(e, PersistError::UnexpectedRoot { .. }) {
                    current_file.path = None;
                }
                let message = format!("Failed to load document: {}", e);
                tracing::error!("{}", message);
                load_error.message = Some(message);
            }
        }
    }
}

/// Replaces the document with a blank one
pub fn new_document_system(
    mut events: MessageReader<NewDocumentRequest>,
    mut document: ResMut<Document>,
    mut current_file: ResMut<CurrentDocumentFile>,
    mut load_error: ResMut<DocumentLoadError>,
    mut save_error: ResMut<DocumentSaveError>,
) {
    for _ in events.read() {
        document.reset_to_default();
        current_file.path = None;
        load_error.message = None;
        save_error.message = None;
        tracing::info!("Created new document");
    }
}
