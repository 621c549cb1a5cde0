//! Writing a document to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::Writer;

use crate::constants::DOCUMENT_ROOT_TAG;
use crate::document::{Document, DrawingLayer};

use super::xml::{write_declaration, write_end, write_properties, write_start};
use super::{BACKGROUND_TAG, GRID_TAG, LAYER_TAG, OBJECT_TAG, PersistError};

impl Document {
    /// Save to `path`, logging any failure. Returns true on success and marks
    /// the document clean.
    pub fn save(&mut self, path: &Path) -> bool {
        match self.try_save(path) {
            Ok(()) => {
                self.mark_clean();
                tracing::info!("Saved document to {:?}", path);
                true
            }
            Err(e) => {
                tracing::error!("Failed to save document to {:?}: {}", path, e);
                false
            }
        }
    }

    /// Save to `path`, reporting failures. Does not touch the dirty flag.
    pub fn try_save(&self, path: &Path) -> Result<(), PersistError> {
        let file = File::create(path)?;
        let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);
        self.write_xml(&mut writer)?;
        writer.into_inner().flush()?;
        Ok(())
    }

    /// Serialize the whole document, declaration included
    pub fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), PersistError> {
        write_declaration(writer)?;
        write_start(writer, DOCUMENT_ROOT_TAG, &[])?;

        write_start(writer, BACKGROUND_TAG, &[])?;
        write_properties(writer, &self.background)?;
        write_end(writer, BACKGROUND_TAG)?;

        write_start(writer, GRID_TAG, &[])?;
        write_properties(writer, &self.grid)?;
        write_end(writer, GRID_TAG)?;

        for layer in &self.layers {
            write_layer(writer, layer)?;
        }

        write_properties(writer, self)?;
        write_end(writer, DOCUMENT_ROOT_TAG)
    }
}

fn write_layer<W: Write>(writer: &mut Writer<W>, layer: &DrawingLayer) -> Result<(), PersistError> {
    write_start(writer, LAYER_TAG, &[("id", layer.id())])?;
    write_properties(writer, layer)?;
    for object in layer.objects() {
        write_start(writer, OBJECT_TAG, &[("type", object.object_type())])?;
        write_properties(writer, object)?;
        write_end(writer, OBJECT_TAG)?;
    }
    write_end(writer, LAYER_TAG)
}
