//! Resource types for document file state.

use bevy::prelude::*;
use std::path::PathBuf;

/// Resource tracking load errors for display to user.
#[derive(Resource, Default)]
pub struct DocumentLoadError {
    pub message: Option<String>,
}

/// Resource tracking save errors for display to user.
#[derive(Resource, Default)]
pub struct DocumentSaveError {
    pub message: Option<String>,
}

/// Resource tracking the file the document was last loaded from or saved to
#[derive(Resource, Default)]
pub struct CurrentDocumentFile {
    pub path: Option<PathBuf>,
}
