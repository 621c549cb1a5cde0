//! Edit command enum for undo/redo operations.

use crate::document::layer::DetachedObjects;
use crate::drawing::{DrawObject, EditTool, NodePoint, ObjectId};
use crate::geometry::UnitPoint;

/// Objects removed from one layer by a single delete
pub struct LayerRemoval {
    pub layer: String,
    /// Removed objects with the index each occupied. Empty while the objects
    /// are back in the layer.
    pub(crate) detached: DetachedObjects,
    pub ids: Vec<ObjectId>,
}

impl LayerRemoval {
    pub(crate) fn new(layer: impl Into<String>, detached: DetachedObjects) -> Self {
        let ids = detached.iter().map(|(_, object)| object.id()).collect();
        Self {
            layer: layer.into(),
            detached,
            ids,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(crate) fn into_objects(self) -> impl Iterator<Item = Box<dyn DrawObject>> {
        self.detached.into_iter().map(|(_, object)| object)
    }
}

/// A reversible change to the document
pub enum EditCommand {
    /// Objects were appended to a layer. `detached` holds them while undone.
    Add {
        layer: String,
        ids: Vec<ObjectId>,
        detached: Vec<Box<dyn DrawObject>>,
    },
    /// Objects were deleted, possibly from several layers
    Remove { removals: Vec<LayerRemoval> },
    /// Objects were translated by `offset`
    Move { ids: Vec<ObjectId>, offset: UnitPoint },
    /// Editing handles were dragged
    NodeMove { nodes: Vec<Box<dyn NodePoint>> },
    /// A tool finished an edit it knows how to invert
    ToolEdit { tool: Box<dyn EditTool> },
}

impl EditCommand {
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::Add { .. } => "Add",
            EditCommand::Remove { .. } => "Remove",
            EditCommand::Move { .. } => "Move",
            EditCommand::NodeMove { .. } => "NodeMove",
            EditCommand::ToolEdit { .. } => "ToolEdit",
        }
    }
}

impl std::fmt::Debug for EditCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditCommand::Add { layer, ids, detached } => f
                .debug_struct("Add")
                .field("layer", layer)
                .field("ids", ids)
                .field("detached", &detached.len())
                .finish(),
            EditCommand::Remove { removals } => f
                .debug_struct("Remove")
                .field(
                    "layers",
                    &removals
                        .iter()
                        .map(|r| (r.layer.as_str(), r.len()))
                        .collect::<Vec<_>>(),
                )
                .finish(),
            EditCommand::Move { ids, offset } => f
                .debug_struct("Move")
                .field("ids", ids)
                .field("offset", offset)
                .finish(),
            EditCommand::NodeMove { nodes } => f
                .debug_struct("NodeMove")
                .field("nodes", &nodes.len())
                .finish(),
            EditCommand::ToolEdit { .. } => f.write_str("ToolEdit"),
        }
    }
}
