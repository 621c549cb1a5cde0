//! Value types shared by the document, layers and drawable objects.
//!
//! All coordinates are in document units as `f64`. Textual forms are the ones
//! written to persisted documents, so `Display` and `FromStr` round-trip.

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use thiserror::Error;

use crate::constants::FLOAT_DIGITS;

/// Round `value` to `digits` decimal places.
pub fn round_to_digits(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

/// Canonical textual form of a float property: rounded to 8 decimals and
/// written with a fixed number of fraction digits.
pub fn format_float(value: f64) -> String {
    format!(
        "{:.*}",
        FLOAT_DIGITS as usize,
        round_to_digits(value, FLOAT_DIGITS)
    )
}

/// Parse a float written by [`format_float`] (or any plain decimal) and apply
/// the same canonical rounding.
pub fn parse_float(text: &str) -> Result<f64, ParseValueError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| ParseValueError::new("float", text))?;
    Ok(round_to_digits(value, FLOAT_DIGITS))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {text:?} as {kind}")]
pub struct ParseValueError {
    pub kind: &'static str,
    pub text: String,
}

impl ParseValueError {
    pub fn new(kind: &'static str, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// A point or offset in document units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitPoint {
    pub x: f64,
    pub y: f64,
}

impl UnitPoint {
    pub const ZERO: UnitPoint = UnitPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: UnitPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: UnitPoint) -> UnitPoint {
        UnitPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Both coordinates within `epsilon` of `other`
    pub fn approx_eq(&self, other: UnitPoint, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for UnitPoint {
    type Output = UnitPoint;

    fn add(self, rhs: UnitPoint) -> UnitPoint {
        UnitPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for UnitPoint {
    type Output = UnitPoint;

    fn sub(self, rhs: UnitPoint) -> UnitPoint {
        UnitPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for UnitPoint {
    type Output = UnitPoint;

    fn neg(self) -> UnitPoint {
        UnitPoint::new(-self.x, -self.y)
    }
}

impl fmt::Display for UnitPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            round_to_digits(self.x, FLOAT_DIGITS),
            round_to_digits(self.y, FLOAT_DIGITS)
        )
    }
}

impl FromStr for UnitPoint {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| ParseValueError::new("point", s))?;
        let x = parse_float(x).map_err(|_| ParseValueError::new("point", s))?;
        let y = parse_float(y).map_err(|_| ParseValueError::new("point", s))?;
        Ok(UnitPoint::new(x, y))
    }
}

/// Axis-aligned rectangle in document units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitRect {
    pub min: UnitPoint,
    pub max: UnitPoint,
}

impl UnitRect {
    /// Build a rectangle from any two opposite corners
    pub fn from_corners(a: UnitPoint, b: UnitPoint) -> Self {
        Self {
            min: UnitPoint::new(a.x.min(b.x), a.y.min(b.y)),
            max: UnitPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, point: UnitPoint) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn contains_rect(&self, other: &UnitRect) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }
}

/// RGBA color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseValueError::new("color", s);
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(err()),
        }
    }
}
