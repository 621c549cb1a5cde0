use std::collections::HashSet;

use crate::drawing::{DrawObject, ObjectId};
use crate::geometry::{Color, UnitPoint};
use crate::persistence::property::{
    parse_bool_property, parse_color_property, parse_float_property, parse_int_property,
    parse_point_property,
};
use crate::persistence::{Properties, PropertyError, PropertyValue};

/// An editable layer: an ordered list of drawable objects plus display attributes.
///
/// Insertion order is display (z) order. Layers are mutated only through the
/// document so the history stays in step with their contents.
pub struct DrawingLayer {
    id: String,
    pub name: String,
    pub color: Color,
    /// Line weight applied to new objects on this layer
    pub width: f64,
    pub visible: bool,
    /// Disabled layers reject new objects
    pub enabled: bool,
    objects: Vec<Box<dyn DrawObject>>,
}

/// Objects detached from a layer, each with the index it occupied
pub(crate) type DetachedObjects = Vec<(usize, Box<dyn DrawObject>)>;

impl DrawingLayer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: Color, width: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            width,
            visible: true,
            enabled: true,
            objects: Vec::new(),
        }
    }

    /// The three layers every new document starts with
    pub fn defaults() -> Vec<DrawingLayer> {
        vec![
            DrawingLayer::new("layer0", "Hairline Layer", Color::WHITE, 0.0),
            DrawingLayer::new("layer1", "0.005 Layer", Color::RED, 0.005),
            DrawingLayer::new("layer2", "0.025 Layer", Color::GREEN, 0.025),
        ]
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn objects(&self) -> impl Iterator<Item = &dyn DrawObject> {
        self.objects.iter().map(|o| o.as_ref())
    }

    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&dyn DrawObject> {
        self.objects.iter().find(|o| o.id() == id).map(|o| o.as_ref())
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> Option<&mut (dyn DrawObject + 'static)> {
        self.objects
            .iter_mut()
            .find(|o| o.id() == id)
            .map(|o| o.as_mut())
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn DrawObject>> {
        self.objects.iter_mut()
    }

    pub(crate) fn push_object(&mut self, object: Box<dyn DrawObject>) {
        self.objects.push(object);
    }

    /// Remove every object whose id is in `ids`, returning them in their
    /// original order together with the index each occupied
    pub(crate) fn take_objects(&mut self, ids: &[ObjectId]) -> DetachedObjects {
        let wanted: HashSet<ObjectId> = ids.iter().copied().collect();
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.objects.len());
        for (index, object) in std::mem::take(&mut self.objects).into_iter().enumerate() {
            if wanted.contains(&object.id()) {
                taken.push((index, object));
            } else {
                kept.push(object);
            }
        }
        self.objects = kept;
        taken
    }

    /// Put back objects returned by [`DrawingLayer::take_objects`]
    pub(crate) fn restore_objects(&mut self, detached: DetachedObjects) {
        for (index, object) in detached {
            let index = index.min(self.objects.len());
            self.objects.insert(index, object);
        }
    }
}

impl std::fmt::Debug for DrawingLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingLayer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .field("objects", &self.objects.len())
            .finish()
    }
}

impl Properties for DrawingLayer {
    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("Name", self.name.clone().into()),
            ("Color", self.color.into()),
            ("Width", self.width.into()),
            ("Visible", self.visible.into()),
            ("Enabled", self.enabled.into()),
        ]
    }

    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "Name" => self.name = value.to_string(),
            "Color" => self.color = parse_color_property(name, value)?,
            "Width" => self.width = parse_float_property(name, value)?,
            "Visible" => self.visible = parse_bool_property(name, value)?,
            "Enabled" => self.enabled = parse_bool_property(name, value)?,
            "Id" => return Err(PropertyError::ReadOnly(name.to_string())),
            _ => return Err(PropertyError::Unknown(name.to_string())),
        }
        Ok(())
    }
}

/// Fill painted behind everything else
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundLayer {
    pub color: Color,
}

impl Default for BackgroundLayer {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
        }
    }
}

impl Properties for BackgroundLayer {
    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![("Color", self.color.into())]
    }

    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "Color" => self.color = parse_color_property(name, value)?,
            _ => return Err(PropertyError::Unknown(name.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    #[default]
    Dots,
    Lines,
}

impl GridStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridStyle::Dots => "Dots",
            GridStyle::Lines => "Lines",
        }
    }
}

/// Reference grid drawn over the background
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayer {
    pub enabled: bool,
    pub spacing: UnitPoint,
    /// Grid lines closer than this many pixels are not drawn
    pub min_size: i64,
    pub style: GridStyle,
    pub color: Color,
}

impl Default for GridLayer {
    fn default() -> Self {
        Self {
            enabled: true,
            spacing: UnitPoint::new(1.0, 1.0),
            min_size: 15,
            style: GridStyle::Dots,
            color: Color::GRAY,
        }
    }
}

impl Properties for GridLayer {
    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("Enabled", self.enabled.into()),
            ("GridStyle", self.style.as_str().into()),
            ("Spacing", self.spacing.into()),
            ("MinSize", self.min_size.into()),
            ("Color", self.color.into()),
        ]
    }

    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "Enabled" => self.enabled = parse_bool_property(name, value)?,
            "GridStyle" => {
                self.style = match value {
                    "Dots" => GridStyle::Dots,
                    "Lines" => GridStyle::Lines,
                    _ => {
                        return Err(PropertyError::Invalid {
                            name: name.to_string(),
                            source: crate::geometry::ParseValueError::new("grid style", value),
                        });
                    }
                }
            }
            "Spacing" => self.spacing = parse_point_property(name, value)?,
            "MinSize" => self.min_size = parse_int_property(name, value)?,
            "Color" => self.color = parse_color_property(name, value)?,
            _ => return Err(PropertyError::Unknown(name.to_string())),
        }
        Ok(())
    }
}
