//! The document resource and its mutation API.

use std::collections::HashMap;

use bevy::prelude::Resource;

use crate::constants::DEFAULT_ZOOM;
use crate::drawing::{
    Canvas, DrawObject, EditTool, NodePoint, ObjectId, ObjectRegistry, SnapKind, SnapPoint,
};
use crate::geometry::{ParseValueError, UnitPoint, UnitRect};
use crate::persistence::property::{parse_float_property, parse_point_property};
use crate::persistence::{Properties, PropertyError, PropertyValue};

use super::history::{
    Capture, CommandHistory, EditCommand, LayerRemoval, execute_redo, execute_undo,
};
use super::layer::{BackgroundLayer, DetachedObjects, DrawingLayer, GridLayer};
use super::selection::SelectionSet;

/// A drawing: layers of objects, the selection and the edit history.
///
/// All edits go through this type so that every recorded mutation can be
/// undone. Methods ending in `_with` take an explicit [`Capture`]; the plain
/// versions record.
#[derive(Resource)]
pub struct Document {
    pub(crate) background: BackgroundLayer,
    pub(crate) grid: GridLayer,
    pub(crate) layers: Vec<DrawingLayer>,
    pub(crate) active_layer_id: String,
    pub(crate) selection: SelectionSet,
    pub(crate) history: CommandHistory,
    pub(crate) zoom: f64,
    pub(crate) center: UnitPoint,
    registry: ObjectRegistry,
    edit_tools: HashMap<String, Box<dyn EditTool>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(ObjectRegistry::default())
    }
}

impl Document {
    /// An empty document with the default layers, creating objects from `registry`
    pub fn new(registry: ObjectRegistry) -> Self {
        let layers = DrawingLayer::defaults();
        let active_layer_id = first_layer_id(&layers);
        Self {
            background: BackgroundLayer::default(),
            grid: GridLayer::default(),
            layers,
            active_layer_id,
            selection: SelectionSet::default(),
            history: CommandHistory::default(),
            zoom: DEFAULT_ZOOM,
            center: UnitPoint::ZERO,
            registry,
            edit_tools: HashMap::new(),
        }
    }

    /// Return to the state of a new document.
    ///
    /// The registry, edit tools and history limit are kept.
    pub fn reset_to_default(&mut self) {
        self.background = BackgroundLayer::default();
        self.grid = GridLayer::default();
        self.layers = DrawingLayer::defaults();
        self.active_layer_id = first_layer_id(&self.layers);
        self.selection = SelectionSet::default();
        self.history.clear();
        self.history.clear_dirty();
        self.zoom = DEFAULT_ZOOM;
        self.center = UnitPoint::ZERO;
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history.set_limit(limit);
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    pub(crate) fn mark_clean(&mut self) {
        self.history.clear_dirty();
    }

    // Layers

    pub fn layers(&self) -> &[DrawingLayer] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&DrawingLayer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    /// Mutable access to a layer's display attributes. Marks the document dirty.
    pub fn layer_mut(&mut self, id: &str) -> Option<&mut DrawingLayer> {
        let layer = self.layers.iter_mut().find(|layer| layer.id() == id)?;
        self.history.mark_dirty();
        Some(layer)
    }

    /// Append a layer. Returns false if a layer with the same id exists.
    pub fn add_layer(&mut self, layer: DrawingLayer) -> bool {
        if self.layer(layer.id()).is_some() {
            tracing::warn!("Layer '{}' already exists", layer.id());
            return false;
        }
        self.layers.push(layer);
        self.history.mark_dirty();
        true
    }

    pub fn active_layer_id(&self) -> &str {
        &self.active_layer_id
    }

    pub fn active_layer(&self) -> Option<&DrawingLayer> {
        self.layer(&self.active_layer_id)
    }

    /// Returns false if no layer has this id
    pub fn set_active_layer(&mut self, id: &str) -> bool {
        if self.layer(id).is_none() {
            return false;
        }
        self.active_layer_id = id.to_string();
        true
    }

    pub fn background_layer(&self) -> &BackgroundLayer {
        &self.background
    }

    pub fn background_layer_mut(&mut self) -> &mut BackgroundLayer {
        self.history.mark_dirty();
        &mut self.background
    }

    pub fn grid_layer(&self) -> &GridLayer {
        &self.grid
    }

    pub fn grid_layer_mut(&mut self) -> &mut GridLayer {
        self.history.mark_dirty();
        &mut self.grid
    }

    // Viewport

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Ignores values that are not finite and positive
    pub fn set_zoom(&mut self, zoom: f64) {
        if !is_valid_zoom(zoom) {
            tracing::warn!("Ignoring invalid zoom {}", zoom);
            return;
        }
        self.zoom = zoom;
        self.history.mark_dirty();
    }

    pub fn center_point(&self) -> UnitPoint {
        self.center
    }

    pub fn set_center_point(&mut self, center: UnitPoint) {
        self.center = center;
        self.history.mark_dirty();
    }

    // Objects

    pub fn object(&self, id: ObjectId) -> Option<&dyn DrawObject> {
        self.layers.iter().find_map(|layer| layer.object(id))
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> Option<&mut (dyn DrawObject + 'static)> {
        find_object_mut(&mut self.layers, id)
    }

    /// Edit an object in place without recording a command. Marks the document dirty.
    pub fn with_object_mut<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut dyn DrawObject) -> R,
    ) -> Option<R> {
        let object = find_object_mut(&mut self.layers, id)?;
        let result = f(object);
        self.history.mark_dirty();
        Some(result)
    }

    /// The layer currently holding `id`
    pub fn layer_of(&self, id: ObjectId) -> Option<&DrawingLayer> {
        self.layers.iter().find(|layer| layer.contains(id))
    }

    /// Build a new object of `type_name` bound to the active layer.
    ///
    /// The object is not inserted; pass it to [`Document::add_object`] once the
    /// user has finished placing it. Returns `None` if the active layer is
    /// disabled or the type is not registered.
    pub fn create_object(
        &self,
        type_name: &str,
        point: UnitPoint,
        snap: Option<&SnapPoint>,
    ) -> Option<Box<dyn DrawObject>> {
        let layer = self.active_layer()?;
        if !layer.enabled {
            tracing::debug!("Active layer '{}' is disabled", layer.id());
            return None;
        }
        let Some(mut object) = self.registry.create(type_name) else {
            tracing::warn!("Unknown object type '{}'", type_name);
            return None;
        };
        object.initialize_from_model(point, layer, snap);
        Some(object)
    }

    pub fn add_object(&mut self, layer_id: &str, object: Box<dyn DrawObject>) -> Option<ObjectId> {
        self.add_object_with(layer_id, object, Capture::Record)
    }

    /// Settle `object` and append it to the layer `layer_id`.
    ///
    /// Returns `None` and drops the object if the layer does not exist.
    pub fn add_object_with(
        &mut self,
        layer_id: &str,
        mut object: Box<dyn DrawObject>,
        capture: Capture,
    ) -> Option<ObjectId> {
        if let Some(settled) = object.edit_result() {
            object = settled;
        }
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.id() == layer_id) else {
            tracing::warn!("Cannot add object to unknown layer '{}'", layer_id);
            return None;
        };

        let id = object.id();
        layer.push_object(object);

        if capture.is_record() {
            self.history.push(EditCommand::Add {
                layer: layer_id.to_string(),
                ids: vec![id],
                detached: Vec::new(),
            });
        }
        self.history.mark_dirty();
        Some(id)
    }

    /// Delete objects from whichever layers hold them, recording one command.
    ///
    /// Returns the number of objects removed. Ids found in no layer are ignored.
    pub fn delete_objects(&mut self, ids: &[ObjectId]) -> usize {
        let removals = self.detach_objects(ids);
        let count = removals.iter().map(LayerRemoval::len).sum();
        if count > 0 {
            self.history.push(EditCommand::Remove { removals });
        }
        count
    }

    /// Delete objects. Under [`Capture::Replay`] the removed objects are handed
    /// back to the caller instead of being recorded.
    pub fn delete_objects_with(&mut self, ids: &[ObjectId], capture: Capture) -> Vec<LayerRemoval> {
        match capture {
            Capture::Record => {
                self.delete_objects(ids);
                Vec::new()
            }
            Capture::Replay => self.detach_objects(ids),
        }
    }

    fn detach_objects(&mut self, ids: &[ObjectId]) -> Vec<LayerRemoval> {
        let mut removals = Vec::new();
        for layer in &mut self.layers {
            let mut detached = layer.take_objects(ids);
            if detached.is_empty() {
                continue;
            }
            for (_, object) in detached.iter_mut() {
                self.selection.remove(object.id());
                object.set_selected(false);
            }
            removals.push(LayerRemoval::new(layer.id(), detached));
        }
        if !removals.is_empty() {
            self.history.mark_dirty();
        }
        removals
    }

    /// Put detached objects back at their original positions
    pub(crate) fn restore_objects(&mut self, layer_id: &str, detached: DetachedObjects) {
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.id() == layer_id) else {
            tracing::warn!(
                "Dropping {} objects for missing layer '{}'",
                detached.len(),
                layer_id
            );
            return;
        };
        layer.restore_objects(detached);
        self.history.mark_dirty();
    }

    pub fn move_objects(&mut self, offset: UnitPoint, ids: &[ObjectId]) {
        self.move_objects_with(offset, ids, Capture::Record);
    }

    /// Translate every object in `ids` by `offset`. Ids found in no layer are
    /// ignored; if none remain nothing is recorded.
    pub fn move_objects_with(&mut self, offset: UnitPoint, ids: &[ObjectId], capture: Capture) {
        let resident: Vec<ObjectId> = ids
            .iter()
            .copied()
            .filter(|&id| self.layer_of(id).is_some())
            .collect();
        if resident.is_empty() {
            return;
        }
        if capture.is_record() {
            self.history.push(EditCommand::Move {
                ids: resident.clone(),
                offset,
            });
        }
        for layer in &mut self.layers {
            for object in layer.objects_mut() {
                if resident.contains(&object.id()) {
                    object.move_by(offset);
                }
            }
        }
        self.history.mark_dirty();
    }

    /// Clone `ids` into the active layer, offset by `offset`, and select the
    /// clones. The whole batch is one undo step. Returns the new ids.
    pub fn copy_objects(&mut self, offset: UnitPoint, ids: &[ObjectId]) -> Vec<ObjectId> {
        self.clear_selected_objects();

        let clones: Vec<Box<dyn DrawObject>> = ids
            .iter()
            .filter_map(|&id| self.object(id))
            .map(|object| {
                let mut clone = object.clone_object();
                clone.move_by(offset);
                clone
            })
            .collect();
        if clones.is_empty() {
            return Vec::new();
        }

        let layer_id = self.active_layer_id.clone();
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.id() == layer_id) else {
            tracing::warn!("No active layer to copy into");
            return Vec::new();
        };
        let new_ids: Vec<ObjectId> = clones.iter().map(|clone| clone.id()).collect();
        for clone in clones {
            layer.push_object(clone);
        }

        for &id in &new_ids {
            self.add_selected_object(id);
        }
        self.history.push(EditCommand::Add {
            layer: layer_id,
            ids: new_ids.clone(),
            detached: Vec::new(),
        });
        self.history.mark_dirty();
        new_ids
    }

    /// Record a finished tool edit
    pub fn after_edit_objects(&mut self, mut tool: Box<dyn EditTool>) {
        tool.finished();
        self.history.push(EditCommand::ToolEdit { tool });
        self.history.mark_dirty();
    }

    pub fn move_nodes(&mut self, position: UnitPoint, nodes: Vec<Box<dyn NodePoint>>) {
        self.move_nodes_with(position, nodes, Capture::Record);
    }

    /// Drag every node to `position` and finish it
    pub fn move_nodes_with(
        &mut self,
        position: UnitPoint,
        mut nodes: Vec<Box<dyn NodePoint>>,
        capture: Capture,
    ) {
        for node in nodes.iter_mut() {
            match find_object_mut(&mut self.layers, node.owner()) {
                Some(target) => {
                    node.set_position(&mut *target, position);
                    node.finish(target);
                }
                None => tracing::warn!("Node owner {} is not in the document", node.owner()),
            }
        }
        if capture.is_record() && !nodes.is_empty() {
            self.history.push(EditCommand::NodeMove { nodes });
        }
        self.history.mark_dirty();
    }

    /// Register a tool prototype under `key`
    pub fn add_edit_tool(&mut self, key: impl Into<String>, tool: Box<dyn EditTool>) {
        self.edit_tools.insert(key.into(), tool);
    }

    /// A fresh copy of the tool registered under `key`
    pub fn get_edit_tool(&self, key: &str) -> Option<Box<dyn EditTool>> {
        self.edit_tools.get(key).map(|tool| tool.clone_tool())
    }

    // Hit testing

    fn visible_objects(&self) -> impl Iterator<Item = &dyn DrawObject> {
        self.layers
            .iter()
            .filter(|layer| layer.visible)
            .flat_map(|layer| layer.objects())
    }

    /// Objects on visible layers hit by `rect`, in layer then insertion order
    pub fn get_hit_objects_in_rect(
        &self,
        canvas: &dyn Canvas,
        rect: &UnitRect,
        any_point: bool,
    ) -> Vec<ObjectId> {
        self.visible_objects()
            .filter(|object| object.object_in_rectangle(canvas, rect, any_point))
            .map(|object| object.id())
            .collect()
    }

    /// Objects on visible layers under `point`, in layer then insertion order
    pub fn get_hit_objects(&self, canvas: &dyn Canvas, point: UnitPoint) -> Vec<ObjectId> {
        self.visible_objects()
            .filter(|object| object.point_in_object(canvas, point))
            .map(|object| object.id())
            .collect()
    }

    /// The first snap offered by an object under `point`
    pub fn snap_point(
        &self,
        canvas: &dyn Canvas,
        point: UnitPoint,
        running: &[SnapKind],
        user: Option<SnapKind>,
    ) -> Option<SnapPoint> {
        let hits: Vec<&dyn DrawObject> = self
            .visible_objects()
            .filter(|object| object.point_in_object(canvas, point))
            .collect();
        hits.iter()
            .find_map(|object| object.snap_point(canvas, point, &hits, running, user))
    }

    // Selection

    /// Select `id`. Returns false if no layer holds it.
    pub fn add_selected_object(&mut self, id: ObjectId) -> bool {
        let Some(object) = find_object_mut(&mut self.layers, id) else {
            return false;
        };
        object.set_selected(true);
        self.selection.insert(id);
        true
    }

    /// Deselect `id`. Returns false if it was not selected.
    pub fn remove_selected_object(&mut self, id: ObjectId) -> bool {
        if !self.selection.remove(id) {
            return false;
        }
        if let Some(object) = find_object_mut(&mut self.layers, id) {
            object.set_selected(false);
        }
        true
    }

    pub fn clear_selected_objects(&mut self) {
        for id in self.selection.take() {
            if let Some(object) = find_object_mut(&mut self.layers, id) {
                object.set_selected(false);
            }
        }
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(id)
    }

    pub fn selected_objects(&self) -> Vec<ObjectId> {
        self.selection.iter().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn first_selected(&self) -> Option<ObjectId> {
        self.selection.first()
    }

    // Undo / Redo

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the newest command. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        let Some(mut command) = self.history.pop_undo() else {
            return false;
        };
        tracing::debug!("Undo {}", command.name());
        self.history.begin_replay();
        execute_undo(&mut command, self);
        self.history.end_replay();
        self.history.push_redo(command);
        self.history.mark_dirty();
        true
    }

    /// Reapply the newest undone command. Returns false if there was none.
    pub fn redo(&mut self) -> bool {
        let Some(mut command) = self.history.pop_redo() else {
            return false;
        };
        tracing::debug!("Redo {}", command.name());
        self.history.begin_replay();
        execute_redo(&mut command, self);
        self.history.end_replay();
        self.history.push_undo(command);
        self.history.mark_dirty();
        true
    }
}

fn is_valid_zoom(zoom: f64) -> bool {
    zoom.is_finite() && zoom > 0.0
}

fn first_layer_id(layers: &[DrawingLayer]) -> String {
    layers
        .first()
        .map(|layer| layer.id().to_string())
        .unwrap_or_default()
}

fn find_object_mut(
    layers: &mut [DrawingLayer],
    id: ObjectId,
) -> Option<&mut (dyn DrawObject + 'static)> {
    layers.iter_mut().find_map(|layer| layer.object_mut(id))
}

impl Properties for Document {
    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("Zoom", self.zoom.into()),
            ("CenterPoint", self.center.into()),
            ("ActiveLayer", self.active_layer_id.clone().into()),
        ]
    }

    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "Zoom" => {
                let zoom = parse_float_property(name, value)?;
                if !is_valid_zoom(zoom) {
                    return Err(PropertyError::Invalid {
                        name: name.to_string(),
                        source: ParseValueError::new("zoom", value),
                    });
                }
                self.zoom = zoom;
            }
            "CenterPoint" => self.center = parse_point_property(name, value)?,
            "ActiveLayer" => {
                if !self.set_active_layer(value) {
                    return Err(PropertyError::Invalid {
                        name: name.to_string(),
                        source: ParseValueError::new("layer id", value),
                    });
                }
            }
            "IsDirty" => return Err(PropertyError::ReadOnly(name.to_string())),
            _ => return Err(PropertyError::Unknown(name.to_string())),
        }
        Ok(())
    }
}
