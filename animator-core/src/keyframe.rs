//! Keyframes: complete snapshots of one shape at one tick

use crate::geometry::{VisualState, EPSILON};
use std::fmt;

/// The full visual state of a named shape at a specific tick
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Keyframe {
    /// Tick this snapshot belongs to
    pub tick: u32,
    /// Name of the shape described
    pub shape: String,
    /// Position, color, size and heading at `tick`
    pub state: VisualState,
}

impl Keyframe {
    /// Creates a new keyframe
    pub fn new(tick: u32, shape: impl Into<String>, state: VisualState) -> Self {
        Self {
            tick,
            shape: shape.into(),
            state,
        }
    }

    /// Overwrites every property of `target` with this keyframe's values
    pub fn apply(&self, target: &mut VisualState) {
        *target = self.state;
    }

    /// Same snapshot moved to another tick
    pub fn at_tick(&self, tick: u32) -> Self {
        Self {
            tick,
            shape: self.shape.clone(),
            state: self.state,
        }
    }

    pub fn has_heading(&self) -> bool {
        self.state.heading.abs() > EPSILON
    }

    /// Formats this keyframe with its heading even when the heading is zero
    pub fn with_heading(&self) -> WithHeading<'_> {
        WithHeading(self)
    }

    fn write_snapshot(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.state;
        write!(
            f,
            "{} {} {} {} {} {} {} {}",
            self.tick,
            s.position.x as i64,
            s.position.y as i64,
            s.width as i64,
            s.height as i64,
            s.color.r,
            s.color.g,
            s.color.b
        )
    }
}

/// Renders `t x y w h r g b [heading]` with geometry truncated to whole
/// pixels. The heading is written only when it is non-zero.
impl fmt::Display for Keyframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_snapshot(f)?;
        if self.has_heading() {
            write!(f, " {}", self.state.heading as i64)?;
        }
        Ok(())
    }
}

/// [`Keyframe`] display that always ends with the heading
pub struct WithHeading<'a>(&'a Keyframe);

impl fmt::Display for WithHeading<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_snapshot(f)?;
        write!(f, " {}", self.0.state.heading as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Position};

    fn frame(tick: u32) -> Keyframe {
        Keyframe::new(
            tick,
            "R",
            VisualState::new(Position::new(200.7, 10.2), Color::RED, 50.0, 100.0),
        )
    }

    #[test]
    fn test_display_truncates_geometry() {
        assert_eq!(frame(3).to_string(), "3 200 10 50 100 255 0 0");
    }

    #[test]
    fn test_display_heading() {
        assert_eq!(frame(3).with_heading().to_string(), "3 200 10 50 100 255 0 0 0");

        let mut turned = frame(3);
        turned.state.heading = 45.5;
        assert!(turned.has_heading());
        assert_eq!(turned.to_string(), "3 200 10 50 100 255 0 0 45");
        assert_eq!(turned.with_heading().to_string(), turned.to_string());
    }

    #[test]
    fn test_equality_covers_every_field() {
        assert_eq!(frame(1), frame(1));
        assert_ne!(frame(1), frame(2));

        let mut other = frame(1);
        other.shape = "C".to_string();
        assert_ne!(frame(1), other);

        let mut turned = frame(1);
        turned.state.heading = 45.0;
        assert_ne!(frame(1), turned);
    }

    #[test]
    fn test_apply_overwrites_state() {
        let mut state = VisualState::default();
        frame(1).apply(&mut state);
        assert_eq!(state.color, Color::RED);
        assert_eq!(state.width, 50.0);
        assert_eq!(frame(1).at_tick(9).tick, 9);
    }
}
