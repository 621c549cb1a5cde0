//! Reading a document from disk.

use std::path::Path;

use crate::constants::{DEFAULT_ZOOM, DOCUMENT_ROOT_TAG};
use crate::document::{BackgroundLayer, Document, DrawingLayer, GridLayer, SelectionSet};
use crate::drawing::ObjectRegistry;
use crate::geometry::{Color, UnitPoint};

use super::xml::{Element, PROPERTY_TAG, apply_properties, apply_property, parse_document};
use super::{BACKGROUND_TAG, GRID_TAG, LAYER_TAG, OBJECT_TAG, PersistError};

impl Document {
    /// Replace the document with the contents of `path`.
    ///
    /// Unreadable or malformed files reset the document to its defaults and
    /// return the error. A file whose root element is not a canvas document
    /// is rejected before anything is changed.
    pub fn load(&mut self, path: &Path) -> Result<(), PersistError> {
        let parsed = std::fs::read_to_string(path)
            .map_err(PersistError::from)
            .and_then(|text| parse_document(&text));
        let root = match parsed {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!("Failed to read document {:?}: {}", path, e);
                self.reset_to_default();
                return Err(e);
            }
        };

        self.load_element(&root)?;
        tracing::info!(
            "Loaded document from {:?}: {} layers, {} objects",
            path,
            self.layers.len(),
            self.layers.iter().map(DrawingLayer::len).sum::<usize>()
        );
        Ok(())
    }

    /// Replace the document with an already parsed root element
    pub fn load_element(&mut self, root: &Element) -> Result<(), PersistError> {
        if root.name != DOCUMENT_ROOT_TAG {
            return Err(PersistError::UnexpectedRoot {
                found: root.name.clone(),
                expected: DOCUMENT_ROOT_TAG.to_string(),
            });
        }

        self.background = BackgroundLayer::default();
        self.grid = GridLayer::default();
        self.layers.clear();
        self.active_layer_id.clear();
        self.selection = SelectionSet::default();
        self.history.clear();
        self.zoom = DEFAULT_ZOOM;
        self.center = UnitPoint::ZERO;

        if let Err(e) = self.apply_children(root) {
            tracing::warn!("Document load aborted: {}", e);
            self.reset_to_default();
            return Err(e);
        }

        if self.layers.is_empty() {
            self.layers = DrawingLayer::defaults();
        }
        if self.layer(&self.active_layer_id).is_none() {
            self.active_layer_id = self.layers[0].id().to_string();
        }
        for layer in &mut self.layers {
            for object in layer.objects_mut() {
                object.after_load();
            }
        }
        self.mark_clean();
        Ok(())
    }

    fn apply_children(&mut self, root: &Element) -> Result<(), PersistError> {
        for child in &root.children {
            match child.name.as_str() {
                BACKGROUND_TAG => apply_properties(child, &mut self.background),
                GRID_TAG => apply_properties(child, &mut self.grid),
                LAYER_TAG => {
                    let layer = read_layer(child, self.registry())?;
                    if self.layer(layer.id()).is_some() {
                        return Err(PersistError::Malformed(format!(
                            "duplicate layer id {:?}",
                            layer.id()
                        )));
                    }
                    self.layers.push(layer);
                }
                PROPERTY_TAG => apply_property(child, self),
                other => tracing::debug!("Ignoring <{}> element", other),
            }
        }
        Ok(())
    }
}

fn read_layer(element: &Element, registry: &ObjectRegistry) -> Result<DrawingLayer, PersistError> {
    let id = element.require_attribute("id")?;
    if id.is_empty() {
        return Err(PersistError::Malformed("layer with empty id".into()));
    }

    let mut layer = DrawingLayer::new(id, id, Color::WHITE, 0.0);
    for child in &element.children {
        match child.name.as_str() {
            PROPERTY_TAG => apply_property(child, &mut layer),
            OBJECT_TAG => {
                let type_name = child.require_attribute("type")?;
                match registry.create(type_name) {
                    Some(mut object) => {
                        apply_properties(child, &mut *object);
                        layer.push_object(object);
                    }
                    None => tracing::warn!(
                        "Skipping object of unknown type '{}' in layer '{}'",
                        type_name,
                        id
                    ),
                }
            }
            other => tracing::debug!("Ignoring <{}> in layer '{}'", other, id),
        }
    }
    Ok(layer)
}
