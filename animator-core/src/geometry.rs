//! Value types shared by keyframes, motions and shapes

use crate::{Error, Result};
use std::fmt;

/// Largest difference at which two coordinates, sizes or headings still compare equal.
pub const EPSILON: f64 = 0.01;

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// A point on the canvas
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// Interpolated positions drift by fractions of a pixel, so equality is tolerant.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from wider channel values, rejecting anything outside 0..=255
    pub fn from_channels(r: i64, g: i64, b: i64) -> Result<Self> {
        let channel = |v: i64| {
            u8::try_from(v)
                .map_err(|_| Error::InvalidValue(format!("color channel {v} is outside 0..=255")))
        };
        Ok(Self::new(channel(r)?, channel(g)?, channel(b)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Width and height of a shape
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl PartialEq for Size {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.width, other.width) && approx_eq(self.height, other.height)
    }
}

/// The complete set of visual properties of a shape at one instant
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VisualState {
    pub position: Position,
    pub color: Color,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees
    pub heading: f64,
}

impl VisualState {
    pub fn new(position: Position, color: Color, width: f64, height: f64) -> Self {
        Self {
            position,
            color,
            width,
            height,
            heading: 0.0,
        }
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Geometric center, used as the rotation pivot
    pub fn center(&self) -> Position {
        Position::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    /// Checks that the dimensions are finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidValue(format!(
                    "{label} must be a non-negative number, got {value}"
                )));
            }
        }
        if !self.position.x.is_finite() || !self.position.y.is_finite() || !self.heading.is_finite()
        {
            return Err(Error::InvalidValue(
                "position and heading must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::new(Position::default(), Color::BLACK, 0.0, 0.0)
    }
}

impl PartialEq for VisualState {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.color == other.color
            && approx_eq(self.width, other.width)
            && approx_eq(self.height, other.height)
            && approx_eq(self.heading, other.heading)
    }
}

/// Canvas rectangle the animation is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    /// Creates canvas bounds; both dimensions must be positive
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidValue(format!(
                "canvas dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 500,
            height: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_equality_is_tolerant() {
        assert_eq!(Position::new(10.0, 20.0), Position::new(10.005, 19.995));
        assert_ne!(Position::new(10.0, 20.0), Position::new(10.05, 20.0));
    }

    #[test]
    fn test_color_channels_are_range_checked() {
        assert_eq!(Color::from_channels(255, 0, 12).unwrap(), Color::new(255, 0, 12));
        assert!(matches!(
            Color::from_channels(256, 0, 0),
            Err(Error::InvalidValue(_))
        ));
        assert!(Color::from_channels(0, -1, 0).is_err());
    }

    #[test]
    fn test_negative_dimensions_are_rejected() {
        let state = VisualState::new(Position::default(), Color::RED, -1.0, 10.0);
        assert!(matches!(state.validate(), Err(Error::InvalidValue(_))));
        assert!(VisualState::default().validate().is_ok());
    }

    #[test]
    fn test_bounds_require_positive_area() {
        assert!(Bounds::new(0, 0, 0, 100).is_err());
        let bounds = Bounds::new(-10, 5, 360, 360).unwrap();
        assert_eq!(bounds.x, -10);
        assert_eq!(Bounds::default().width, 500);
    }
}
