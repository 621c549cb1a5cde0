//! Capabilities the document requires of the things it manages.
//!
//! The kernel never knows concrete shape types. It stores
//! `Box<dyn DrawObject>` values inside layers and talks to editing handles and
//! tools through [`NodePoint`] and [`EditTool`].
//!
//! ## Module Structure
//!
//! - [`registry`] - Name to constructor map used by `create_object` and load
//! - [`line`] - Built-in line shape and its endpoint handle

pub mod line;
pub mod registry;

use std::any::Any;
use std::fmt;

use uuid::Uuid;

use crate::document::{Document, DrawingLayer};
use crate::geometry::{UnitPoint, UnitRect};
use crate::persistence::Properties;

pub use line::{Line, LineEnd, LineNode};
pub use registry::{ObjectConstructor, ObjectRegistry};

/// Stable identity of a drawable object for the lifetime of an editing session
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an ObjectId from a u128 (useful for tests).
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", &self.0.to_string()[..8])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Coordinate-space services of the view a hit-test or snap runs against
pub trait Canvas {
    /// Convert a length in screen pixels to document units
    fn to_unit(&self, pixels: f64) -> f64;
}

/// A canvas with a fixed scale, for headless use
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledCanvas {
    pub units_per_pixel: f64,
}

impl Default for ScaledCanvas {
    fn default() -> Self {
        Self {
            units_per_pixel: 1.0,
        }
    }
}

impl Canvas for ScaledCanvas {
    fn to_unit(&self, pixels: f64) -> f64 {
        pixels * self.units_per_pixel
    }
}

/// Kind of attraction point a drawable object can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapKind {
    Endpoint,
    Midpoint,
    Center,
    Quadrant,
    Nearest,
}

/// A snap result computed by a drawable object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub kind: SnapKind,
    pub point: UnitPoint,
    pub owner: ObjectId,
}

/// A shape instance owned by a layer.
///
/// `move_by` must be a pure translation: moving by an offset and then by its
/// negation restores the original coordinates.
pub trait DrawObject: Properties + Any + Send + Sync {
    fn id(&self) -> ObjectId;

    /// Registry name of the concrete type
    fn object_type(&self) -> &'static str;

    /// Copy with a fresh id and the selected flag cleared
    fn clone_object(&self) -> Box<dyn DrawObject>;

    fn move_by(&mut self, offset: UnitPoint);

    fn is_selected(&self) -> bool;

    fn set_selected(&mut self, selected: bool);

    /// Hit-test against a selection region. With `any_point` a partial overlap
    /// counts; otherwise the object must lie fully inside.
    fn object_in_rectangle(&self, canvas: &dyn Canvas, rect: &UnitRect, any_point: bool) -> bool;

    fn point_in_object(&self, canvas: &dyn Canvas, point: UnitPoint) -> bool;

    /// Offer a snap point near `point`, considering the other hit objects
    fn snap_point(
        &self,
        canvas: &dyn Canvas,
        point: UnitPoint,
        candidates: &[&dyn DrawObject],
        running: &[SnapKind],
        user: Option<SnapKind>,
    ) -> Option<SnapPoint>;

    /// Bind a freshly created object to `layer` and seed it at `point`
    fn initialize_from_model(&mut self, point: UnitPoint, layer: &DrawingLayer, snap: Option<&SnapPoint>);

    /// An in-progress edit instance returns the settled object it stands for
    fn edit_result(&mut self) -> Option<Box<dyn DrawObject>> {
        None
    }

    /// Called once every property of a loaded object has been applied
    fn after_load(&mut self) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// An editing handle on one point of a drawable object.
///
/// The handle records enough to restore the object on `undo` and reapply the
/// change on `redo`. The document resolves [`NodePoint::owner`] and passes the
/// object in, so handles never hold references into layers.
pub trait NodePoint: Send + Sync {
    fn owner(&self) -> ObjectId;

    fn set_position(&mut self, target: &mut dyn DrawObject, position: UnitPoint);

    fn finish(&mut self, target: &mut dyn DrawObject);

    fn undo(&mut self, target: &mut dyn DrawObject);

    fn redo(&mut self, target: &mut dyn DrawObject);
}

/// A tool-driven edit that knows how to invert itself.
///
/// Undo and redo receive the document; changes they make through its
/// mutation methods should pass [`crate::document::Capture::Replay`].
pub trait EditTool: Send + Sync {
    fn clone_tool(&self) -> Box<dyn EditTool>;

    fn finished(&mut self);

    fn undo(&mut self, document: &mut Document);

    fn redo(&mut self, document: &mut Document);
}
