//! Named, textual properties: the unit of persistence for documents, layers
//! and drawable objects.
//!
//! A type exposes the properties it wants written through
//! [`Properties::properties`] and accepts them back through
//! [`Properties::set_property`]. Anything not listed is never persisted.

use std::fmt;

use thiserror::Error;

use crate::geometry::{format_float, parse_float, Color, ParseValueError, UnitPoint};

/// A property value with its canonical textual encoding
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    Point(UnitPoint),
    Color(Color),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Float(v) => f.write_str(&format_float(*v)),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Point(p) => write!(f, "{}", p),
            PropertyValue::Color(c) => write!(f, "{}", c),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<UnitPoint> for PropertyValue {
    fn from(value: UnitPoint) -> Self {
        PropertyValue::Point(value)
    }
}

impl From<Color> for PropertyValue {
    fn from(value: Color) -> Self {
        PropertyValue::Color(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("unknown property {0:?}")]
    Unknown(String),
    #[error("property {0:?} is read-only")]
    ReadOnly(String),
    #[error("invalid value for property {name:?}: {source}")]
    Invalid {
        name: String,
        #[source]
        source: ParseValueError,
    },
}

/// Types whose state is persisted as a list of named properties
pub trait Properties {
    /// The persisted properties, in write order
    fn properties(&self) -> Vec<(&'static str, PropertyValue)>;

    /// Assign a property from its textual form
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError>;
}

fn invalid(name: &str, source: ParseValueError) -> PropertyError {
    PropertyError::Invalid {
        name: name.to_string(),
        source,
    }
}

pub fn parse_float_property(name: &str, value: &str) -> Result<f64, PropertyError> {
    parse_float(value).map_err(|e| invalid(name, e))
}

pub fn parse_int_property(name: &str, value: &str) -> Result<i64, PropertyError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(name, ParseValueError::new("integer", value)))
}

pub fn parse_bool_property(name: &str, value: &str) -> Result<bool, PropertyError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(name, ParseValueError::new("bool", value))),
    }
}

pub fn parse_point_property(name: &str, value: &str) -> Result<UnitPoint, PropertyError> {
    value.parse().map_err(|e| invalid(name, e))
}

pub fn parse_color_property(name: &str, value: &str) -> Result<Color, PropertyError> {
    value.parse().map_err(|e| invalid(name, e))
}
