//! Editing kernel for a 2D vector drawing tool.
//!
//! A [`Document`](document::Document) owns layers of drawable objects, the
//! selection and an undo/redo history, and persists itself to XML. Concrete
//! shapes plug in through [`drawing::DrawObject`] and an
//! [`ObjectRegistry`](drawing::ObjectRegistry) handed to the document.

pub mod config;
pub mod constants;
pub mod document;
pub mod drawing;
pub mod geometry;
pub mod logging;
pub mod paths;
pub mod persistence;
