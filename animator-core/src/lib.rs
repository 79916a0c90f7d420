//! Animator Core Library
//!
//! This library provides the timeline and interpolation engine behind the
//! shape animator: shapes whose position, size, color and heading change over
//! discrete ticks through linear motions, the keyframes those motions are
//! derived from, and the layered timeline that owns every shape.

pub mod builder;
pub mod description;
pub mod geometry;
pub mod keyframe;
pub mod layers;
pub mod motion;
pub mod shape;
pub mod synthesis;
pub mod timeline;

pub use builder::TimelineBuilder;
pub use geometry::{Bounds, Color, Position, Size, VisualState};
pub use keyframe::Keyframe;
pub use motion::{Change, Family, Motion};
pub use shape::{Shape, ShapeKind};
pub use timeline::Timeline;

/// Result type for animator-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for animator-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shape already exists: {0}")]
    DuplicateEntity(String),

    #[error("Not found: {0}")]
    UnknownEntity(String),

    #[error("Overlapping {family} motions on shape {shape} between ticks {start} and {end}")]
    TemporalConflict {
        shape: String,
        family: Family,
        start: u32,
        end: u32,
    },

    #[error("Start {family} of motion does not match shape {shape} at t = {tick}")]
    StateMismatch {
        shape: String,
        family: Family,
        tick: u32,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unsupported shape type {0}")]
    UnsupportedType(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}
