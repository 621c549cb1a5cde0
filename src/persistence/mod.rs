//! Document persistence: save and load to the XML document format.
//!
//! ## Module Structure
//!
//! - [`property`] - Named textual properties and their value kinds
//! - [`xml`] - Element tree and writer helpers over `quick-xml`
//! - [`save`] - `Document::save` / `Document::try_save`
//! - [`load`] - `Document::load`
//! - [`messages`] - Message types for document file operations
//! - [`resources`] - Resource types for file/error state
//! - [`systems`] - Bevy systems reacting to file requests

mod load;
mod messages;
pub mod property;
mod resources;
mod save;
mod systems;
pub mod xml;


use thiserror::Error;

pub use messages::{
    LoadDocumentRequest, NewDocumentRequest, SaveDocumentRequest, UpdateLastDocumentPathRequest,
};
pub use property::{Properties, PropertyError, PropertyValue};
pub use resources::{CurrentDocumentFile, DocumentLoadError, DocumentSaveError};
pub use systems::{load_document_system, new_document_system, save_document_system};

pub(crate) const BACKGROUND_TAG: &str = "backgroundlayer";
pub(crate) const GRID_TAG: &str = "gridlayer";
pub(crate) const LAYER_TAG: &str = "layer";
pub(crate) const OBJECT_TAG: &str = "object";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("unexpected root element {found:?}, expected {expected:?}")]
    UnexpectedRoot { found: String, expected: String },
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("<{element}> is missing attribute {attribute:?}")]
    MissingAttribute { element: String, attribute: String },
}
