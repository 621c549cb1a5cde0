//! Message types for document file operations.

use bevy::prelude::*;
use std::path::PathBuf;

#[derive(Message)]
pub struct SaveDocumentRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct LoadDocumentRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct NewDocumentRequest;

/// Message to update the last document path in config
#[derive(Message)]
pub struct UpdateLastDocumentPathRequest {
    pub path: PathBuf,
}
