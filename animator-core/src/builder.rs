//! Declarative construction of a [`Timeline`]

use crate::geometry::Bounds;
use crate::keyframe::Keyframe;
use crate::motion::Motion;
use crate::shape::Shape;
use crate::synthesis::synthesize;
use crate::timeline::Timeline;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Gap count handed to synthesis for declared motions, high enough that a
/// stationary declaration always yields a filler motion.
const DECLARED_GAPS: usize = 7;

/// Collects shape, keyframe and motion declarations and turns them into a
/// validated [`Timeline`].
///
/// Declaration methods chain and never fail on their own. The first problem
/// met is kept and reported by [`TimelineBuilder::build`].
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    bounds: Bounds,
    shapes: Vec<Shape>,
    keyframes: Vec<Keyframe>,
    motions: Vec<Motion>,
    error: Option<Error>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bounds(&mut self, x: i32, y: i32, width: u32, height: u32) -> &mut Self {
        match Bounds::new(x, y, width, height) {
            Ok(bounds) => self.bounds = bounds,
            Err(err) => self.fail(err),
        }
        self
    }

    /// Declares a shape of a textual kind such as `"ellipse"`
    pub fn declare_shape(&mut self, name: &str, kind: &str, layer: usize) -> &mut Self {
        match Shape::from_type(name, kind, layer) {
            Ok(shape) => self.shapes.push(shape),
            Err(err) => self.fail(err),
        }
        self
    }

    pub fn add_keyframe(&mut self, frame: Keyframe) -> &mut Self {
        self.keyframes.push(frame);
        self
    }

    /// Declares a transition between two full snapshots of a shape.
    ///
    /// Both snapshots are kept as keyframes and the motions between them are
    /// synthesized right away.
    pub fn add_motion(&mut self, from: Keyframe, to: Keyframe) -> &mut Self {
        match synthesize(&from, &to, DECLARED_GAPS) {
            Ok(motions) => self.motions.extend(motions),
            Err(err) => self.fail(err),
        }
        self.keyframes.push(from);
        self.keyframes.push(to);
        self
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Builds the timeline.
    ///
    /// Shapes are added in declaration order, then keyframes are handed to
    /// their shapes, then motions are added in ascending order of start tick
    /// whatever order they were declared in.
    pub fn build(self) -> Result<Timeline> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut timeline = Timeline::new(self.bounds);
        for shape in self.shapes {
            timeline.add_shape(shape)?;
        }

        let mut frames: IndexMap<String, Vec<Keyframe>> = IndexMap::new();
        for frame in self.keyframes {
            frames.entry(frame.shape.clone()).or_default().push(frame);
        }
        for (name, frames) in frames {
            timeline.shape_mut(&name)?.seed_keyframes(frames)?;
        }

        let mut by_start: BTreeMap<u32, Vec<Motion>> = BTreeMap::new();
        let count = self.motions.len();
        for motion in self.motions {
            by_start.entry(motion.start()).or_default().push(motion);
        }
        for motion in by_start.into_values().flatten() {
            timeline.shape_mut(motion.shape())?.add_motion(motion)?;
        }

        for shape in timeline.shapes_mut() {
            shape.sync_motions()?;
        }
        debug!(
            shapes = timeline.shapes().len(),
            motions = count,
            last_tick = timeline.last_tick(),
            "built timeline"
        );
        Ok(timeline)
    }
}
