//! Motions: linear, single-family transitions of a shape between two ticks
//!
//! A [`Motion`] changes exactly one property family of one shape. The per-tick
//! step is computed once when the motion is built, and [`Motion::apply`]
//! writes the interpolated value for any tick inside the motion's range.

use crate::geometry::{approx_eq, Color, Position, Size, VisualState};
use crate::shape::{Shape, ShapeKind};
use crate::{Error, Result};
use std::fmt;
use std::num::NonZeroU32;

/// The property group a motion changes. Overlap and consistency rules are scoped per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Family {
    Position,
    Color,
    Size,
    Rotation,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Position => "position",
            Family::Color => "color",
            Family::Size => "size",
            Family::Rotation => "rotation",
        };
        f.write_str(name)
    }
}

/// Start and end values of a motion, tagged by family
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Change {
    Move { from: Position, to: Position },
    Recolor { from: Color, to: Color },
    Resize { from: Size, to: Size },
    Rotate { from: f64, to: f64 },
}

impl Change {
    pub fn family(&self) -> Family {
        match self {
            Change::Move { .. } => Family::Position,
            Change::Recolor { .. } => Family::Color,
            Change::Resize { .. } => Family::Size,
            Change::Rotate { .. } => Family::Rotation,
        }
    }

    /// A change whose start and end values are identical
    pub fn is_noop(&self) -> bool {
        match self {
            Change::Move { from, to } => from == to,
            Change::Recolor { from, to } => from == to,
            Change::Resize { from, to } => from == to,
            Change::Rotate { from, to } => approx_eq(*from, *to),
        }
    }

    /// Whether `state` already holds this change's start value
    fn starts_at(&self, state: &VisualState) -> bool {
        match self {
            Change::Move { from, .. } => *from == state.position,
            Change::Recolor { from, .. } => *from == state.color,
            Change::Resize { from, .. } => *from == state.size(),
            Change::Rotate { from, .. } => approx_eq(*from, state.heading),
        }
    }

    fn components(&self) -> ([f64; 3], [f64; 3]) {
        match *self {
            Change::Move { from, to } => ([from.x, from.y, 0.0], [to.x, to.y, 0.0]),
            Change::Recolor { from, to } => (
                [f64::from(from.r), f64::from(from.g), f64::from(from.b)],
                [f64::from(to.r), f64::from(to.g), f64::from(to.b)],
            ),
            Change::Resize { from, to } => {
                ([from.width, from.height, 0.0], [to.width, to.height, 0.0])
            }
            Change::Rotate { from, to } => ([from, 0.0, 0.0], [to, 0.0, 0.0]),
        }
    }

    fn validate(&self) -> Result<()> {
        let (from, to) = self.components();
        if from.iter().chain(to.iter()).any(|v| !v.is_finite()) {
            return Err(Error::InvalidValue(format!(
                "{} motion values must be finite",
                self.family()
            )));
        }
        if let Change::Resize { from, to } = self {
            if from.width <= 0.0 || from.height <= 0.0 || to.width <= 0.0 || to.height <= 0.0 {
                return Err(Error::InvalidValue(
                    "all dimensions of a resize must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// A change of one property family of one shape between two ticks
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Motion {
    shape: String,
    start: u32,
    end: u32,
    change: Change,
    /// Per-tick step for each component of the family
    #[cfg_attr(feature = "serde", serde(skip))]
    delta: [f64; 3],
}

impl Motion {
    /// Creates a motion, validating the tick range and the family's values
    pub fn new(shape: impl Into<String>, start: u32, end: u32, change: Change) -> Result<Self> {
        let shape = shape.into();
        if shape.is_empty() {
            return Err(Error::InvalidValue(
                "a motion must name the shape it animates".to_string(),
            ));
        }
        if start > end {
            return Err(Error::InvalidValue(format!(
                "motion on {shape} starts at {start}, after its end at {end}"
            )));
        }
        change.validate()?;

        // A zero-length motion jumps by the whole difference.
        let span = if start == end { 1.0 } else { f64::from(end - start) };
        let (from, to) = change.components();
        let delta = [
            (to[0] - from[0]) / span,
            (to[1] - from[1]) / span,
            (to[2] - from[2]) / span,
        ];

        Ok(Self {
            shape,
            start,
            end,
            change,
            delta,
        })
    }

    /// Moves a shape from one position to another
    pub fn movement(
        shape: impl Into<String>,
        start: u32,
        end: u32,
        from: Position,
        to: Position,
    ) -> Result<Self> {
        Self::new(shape, start, end, Change::Move { from, to })
    }

    /// Changes a shape's color
    pub fn recolor(
        shape: impl Into<String>,
        start: u32,
        end: u32,
        from: Color,
        to: Color,
    ) -> Result<Self> {
        Self::new(shape, start, end, Change::Recolor { from, to })
    }

    /// Changes a shape's width and height
    pub fn resize(
        shape: impl Into<String>,
        start: u32,
        end: u32,
        from: Size,
        to: Size,
    ) -> Result<Self> {
        Self::new(shape, start, end, Change::Resize { from, to })
    }

    /// Turns a shape from one heading (degrees) to another
    pub fn rotate(
        shape: impl Into<String>,
        start: u32,
        end: u32,
        from: f64,
        to: f64,
    ) -> Result<Self> {
        Self::new(shape, start, end, Change::Rotate { from, to })
    }

    pub fn shape(&self) -> &str {
        &self.shape
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn change(&self) -> &Change {
        &self.change
    }

    pub fn family(&self) -> Family {
        self.change.family()
    }

    pub fn is_noop(&self) -> bool {
        self.change.is_noop()
    }

    /// Checks if the motion covers the given tick
    pub fn is_active(&self, tick: u32) -> bool {
        tick >= self.start && tick <= self.end
    }

    /// Writes the interpolated value for `tick` into `target`.
    ///
    /// Ticks outside `[start, end]` leave `target` untouched. The end tick
    /// always receives the exact end value.
    pub fn apply(&self, target: &mut VisualState, tick: u32) {
        if !self.is_active(tick) {
            return;
        }

        if tick == self.end {
            match self.change {
                Change::Move { to, .. } => target.position = to,
                Change::Recolor { to, .. } => target.color = to,
                Change::Resize { to, .. } => {
                    target.width = to.width;
                    target.height = to.height;
                }
                Change::Rotate { to, .. } => target.heading = to,
            }
            return;
        }

        let elapsed = f64::from(tick - self.start);
        let [dx, dy, dz] = self.delta;
        match self.change {
            Change::Move { from, .. } => {
                target.position = Position::new(from.x + dx * elapsed, from.y + dy * elapsed);
            }
            Change::Recolor { from, .. } => {
                target.color = Color::new(
                    step_channel(from.r, dx, elapsed),
                    step_channel(from.g, dy, elapsed),
                    step_channel(from.b, dz, elapsed),
                );
            }
            Change::Resize { from, .. } => {
                target.width = from.width + dx * elapsed;
                target.height = from.height + dy * elapsed;
            }
            Change::Rotate { from, .. } => {
                target.heading = from + dx * elapsed;
            }
        }
    }

    /// Whether `other` contends with this motion for the same property.
    ///
    /// Both motions must be of the same family and their ranges must
    /// intersect; touching endpoints do not count. A no-op never conflicts.
    pub fn overlaps(&self, other: &Motion) -> bool {
        self.family() == other.family()
            && !self.is_noop()
            && other.start < self.end
            && self.start < other.end
    }

    /// Checks this motion's start value against `shape`.
    ///
    /// `shape` should hold its state at this motion's start tick. A motion
    /// that begins before the shape's recorded start is always accepted,
    /// since it pulls the shape's start earlier.
    pub fn is_compatible_with(&self, shape: &Shape) -> Result<()> {
        if shape.name() != self.shape {
            return Err(Error::InvalidValue(format!(
                "motion for shape {} cannot operate on shape {}",
                self.shape,
                shape.name()
            )));
        }
        let predates_shape = shape.start_tick().map_or(true, |start| self.start < start);
        if predates_shape || self.change.starts_at(shape.state()) {
            Ok(())
        } else {
            Err(Error::StateMismatch {
                shape: self.shape.clone(),
                family: self.family(),
                tick: self.start,
            })
        }
    }

    /// SVG `<animate>` directives for this motion.
    ///
    /// Returns `None` for rotations, whose directive depends on the shape's
    /// pivot; see [`Motion::to_svg_rotation`].
    pub fn to_svg(&self, kind: ShapeKind, speed: NonZeroU32) -> Option<String> {
        let (begin, dur) = self.timing(speed);
        let animate = |attribute: &str, from: f64, to: f64| {
            format!(
                "<animate attributeType=\"xml\" begin=\"{begin:.2}\" dur=\"{dur:.2}\" \
                 attributeName=\"{attribute}\" from=\"{from:.1}\" to=\"{to:.1}\" fill=\"freeze\"/>\n"
            )
        };

        match self.change {
            Change::Move { from, to } => {
                let (ax, ay) = match kind {
                    ShapeKind::Rectangle => ("x", "y"),
                    ShapeKind::Ellipse => ("cx", "cy"),
                };
                Some(animate(ax, from.x, to.x) + &animate(ay, from.y, to.y))
            }
            Change::Resize { from, to } => {
                let (aw, ah) = match kind {
                    ShapeKind::Rectangle => ("width", "height"),
                    ShapeKind::Ellipse => ("rx", "ry"),
                };
                Some(animate(aw, from.width, to.width) + &animate(ah, from.height, to.height))
            }
            Change::Recolor { from, to } => Some(format!(
                "<animate attributeType=\"xml\" begin=\"{begin:.2}\" dur=\"{dur:.2}\" \
                 attributeName=\"fill\" from=\"{from}\" to=\"{to}\" fill=\"freeze\"/>\n"
            )),
            Change::Rotate { .. } => None,
        }
    }

    /// SVG `<animateTransform>` directive for a rotation about `pivot`.
    ///
    /// Returns `None` for every other family.
    pub fn to_svg_rotation(&self, speed: NonZeroU32, pivot: Position) -> Option<String> {
        let Change::Rotate { from, to } = self.change else {
            return None;
        };
        let (begin, dur) = self.timing(speed);
        let (px, py) = (pivot.x as i64, pivot.y as i64);
        Some(format!(
            "<animateTransform attributeType=\"xml\" type=\"rotate\" begin=\"{begin:.2}\" \
             dur=\"{dur:.2}\" attributeName=\"transform\" from=\"{} {px} {py}\" \
             to=\"{} {px} {py}\" fill=\"freeze\"/>\n",
            from as i64, to as i64
        ))
    }

    fn timing(&self, speed: NonZeroU32) -> (f64, f64) {
        let speed = f64::from(speed.get());
        (
            f64::from(self.start) / speed,
            f64::from(self.end - self.start) / speed,
        )
    }
}

impl PartialEq for Motion {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.start == other.start
            && self.end == other.end
            && self.change == other.change
    }
}

fn step_channel(from: u8, delta: f64, elapsed: f64) -> u8 {
    (f64::from(from) + delta * elapsed).round().clamp(0.0, 255.0) as u8
}
