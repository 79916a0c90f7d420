//! Shapes: named entities that own their keyframes and motions
//!
//! The keyframe list is the source of truth for a shape's animation; the
//! motion index is rebuilt from it whenever the list changes. Two ways of
//! reading state are offered: [`Shape::apply_motion`] steps the live state
//! forward one tick at a time, and [`Shape::state_at`] computes a detached
//! snapshot for any tick. Both give the same answer for the same tick.

use crate::geometry::{Position, VisualState};
use crate::keyframe::Keyframe;
use crate::motion::Motion;
use crate::synthesis::{motion_index, MotionIndex};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace, warn};

/// Geometric primitive a shape is drawn as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rectangle" => Ok(ShapeKind::Rectangle),
            "ellipse" => Ok(ShapeKind::Ellipse),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

/// A named, layered shape with its keyframes and derived motions
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Shape {
    name: String,
    kind: ShapeKind,
    state: VisualState,
    /// State before the first keyframe, where point queries start replaying
    initial: VisualState,
    /// First and last tick the shape exists on
    span: Option<(u32, u32)>,
    keyframes: BTreeMap<u32, Keyframe>,
    motions: MotionIndex,
    #[cfg_attr(feature = "serde", serde(skip))]
    active: Vec<Motion>,
    layer: usize,
    visible: bool,
}

impl Shape {
    /// Creates a black, zero-sized shape at the origin on layer 0
    pub fn new(name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            state: VisualState::default(),
            initial: VisualState::default(),
            span: None,
            keyframes: BTreeMap::new(),
            motions: MotionIndex::new(),
            active: Vec::new(),
            layer: 0,
            visible: false,
        }
    }

    /// Creates a shape from a textual kind such as `"rectangle"`
    pub fn from_type(name: impl Into<String>, kind: &str, layer: usize) -> Result<Self> {
        Ok(Self::new(name, kind.parse()?).on_layer(layer))
    }

    pub fn on_layer(mut self, layer: usize) -> Self {
        self.layer = layer;
        self
    }

    /// Sets the state the shape has before any keyframe applies
    pub fn with_state(mut self, state: VisualState) -> Self {
        self.state = state;
        self.initial = state;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn state(&self) -> &VisualState {
        &self.state
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    pub(crate) fn set_layer(&mut self, layer: usize) {
        self.layer = layer;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn start_tick(&self) -> Option<u32> {
        self.span.map(|(start, _)| start)
    }

    pub fn end_tick(&self) -> Option<u32> {
        self.span.map(|(_, end)| end)
    }

    /// Rotation pivot for the current state
    pub fn center(&self) -> Position {
        self.state.center()
    }

    /// Keyframes in tick order
    pub fn keyframes(&self) -> impl Iterator<Item = &Keyframe> + '_ {
        self.keyframes.values()
    }

    pub fn keyframe_at(&self, tick: u32) -> Option<&Keyframe> {
        self.keyframes.get(&tick)
    }

    /// All motions, ordered by start tick
    pub fn motions(&self) -> impl Iterator<Item = &Motion> + '_ {
        self.motions.values().flatten()
    }

    /// Motions grouped by start tick
    pub fn motion_groups(&self) -> &MotionIndex {
        &self.motions
    }

    /// Motions currently being played by [`Shape::apply_motion`]
    pub fn active_motions(&self) -> &[Motion] {
        &self.active
    }

    /// Adds a motion to the index after checking it against the shape.
    ///
    /// Fails with `TemporalConflict` if it overlaps a motion of the same
    /// family, and with `StateMismatch` if its start value disagrees with the
    /// shape's state at its start tick. Adding a motion identical to one
    /// already present changes nothing.
    pub fn add_motion(&mut self, motion: Motion) -> Result<()> {
        if motion.shape() != self.name {
            return Err(Error::InvalidValue(format!(
                "motion for shape {} cannot be added to shape {}",
                motion.shape(),
                self.name
            )));
        }
        if self.motions().any(|existing| *existing == motion) {
            warn!(
                shape = %self.name,
                start = motion.start(),
                end = motion.end(),
                "skipping duplicate {} motion",
                motion.family()
            );
            return Ok(());
        }

        if self.span.is_some() {
            if self.motions().any(|existing| existing.overlaps(&motion)) {
                return Err(Error::TemporalConflict {
                    shape: self.name.clone(),
                    family: motion.family(),
                    start: motion.start(),
                    end: motion.end(),
                });
            }
            motion.is_compatible_with(&self.state_at(motion.start()))?;
        }

        debug!(
            shape = %self.name,
            start = motion.start(),
            end = motion.end(),
            "adding {} motion",
            motion.family()
        );
        let (start, end) = (motion.start(), motion.end());
        self.motions.entry(start).or_default().push(motion);
        self.span = Some(match self.span {
            Some((s, e)) => (s.min(start), e.max(end)),
            None => (start, end),
        });
        Ok(())
    }

    /// Inserts a keyframe, replacing any keyframe already at its tick, and
    /// rebuilds the motion index
    pub fn add_keyframe(&mut self, frame: Keyframe) -> Result<()> {
        self.check_keyframe(&frame)?;
        let mut frames = self.keyframes.clone();
        let tick = frame.tick;
        if frames.insert(tick, frame).is_some() {
            debug!(shape = %self.name, tick, "replacing keyframe");
        }
        self.replace_keyframes(frames)
    }

    /// Removes the keyframe at `tick` and rebuilds the motion index
    pub fn remove_keyframe(&mut self, tick: u32) -> Result<()> {
        let mut frames = self.keyframes.clone();
        if frames.remove(&tick).is_none() {
            return Err(Error::UnknownEntity(format!(
                "keyframe of shape {} at tick {tick}",
                self.name
            )));
        }
        debug!(shape = %self.name, tick, "removing keyframe");
        self.replace_keyframes(frames)
    }

    /// Removes a motion and repairs the keyframes around it.
    ///
    /// Removing the first motion drops the start keyframe and removing the
    /// last drops the end keyframe. Removing a motion in the middle replaces
    /// its end keyframe with a copy of its start keyframe, leaving a flat
    /// segment instead of a gap.
    pub fn remove_motion(&mut self, motion: &Motion) -> Result<()> {
        let known = self
            .motions
            .get(&motion.start())
            .is_some_and(|group| group.contains(motion));
        if !known {
            return Err(Error::UnknownEntity(format!(
                "{} motion of shape {} from tick {} to {}",
                motion.family(),
                self.name,
                motion.start(),
                motion.end()
            )));
        }
        debug!(
            shape = %self.name,
            start = motion.start(),
            end = motion.end(),
            "removing {} motion",
            motion.family()
        );

        // Motions added directly, without keyframes at both ends, have no
        // keyframes to repair.
        let (start, end) = (motion.start(), motion.end());
        let Some(anchor) = self
            .keyframes
            .get(&start)
            .filter(|_| self.keyframes.contains_key(&end))
            .map(|frame| frame.at_tick(end))
        else {
            self.remove_unanchored_motion(motion);
            return Ok(());
        };

        let mut frames = self.keyframes.clone();
        if self.keyframes.keys().next() == Some(&start) {
            frames.remove(&start);
        } else if self.keyframes.keys().next_back() == Some(&end) {
            frames.remove(&end);
        } else {
            frames.insert(end, anchor);
        }
        self.replace_keyframes(frames)
    }

    fn remove_unanchored_motion(&mut self, motion: &Motion) {
        if let Some(group) = self.motions.get_mut(&motion.start()) {
            group.retain(|m| m != motion);
            if group.is_empty() {
                self.motions.remove(&motion.start());
            }
        }
        self.active.retain(|m| m != motion);

        let mut start = self.motions.keys().next().copied();
        let mut end = self.motions().map(Motion::end).max();
        if let Some((first, last)) = self.keyframe_span() {
            start = Some(start.map_or(first, |s| s.min(first)));
            end = Some(end.map_or(last, |e| e.max(last)));
        }
        self.span = start.zip(end);
    }

    /// Seeds keyframes without touching the motion index. A keyframe at a
    /// tick that is already taken is ignored.
    pub(crate) fn seed_keyframes(&mut self, frames: Vec<Keyframe>) -> Result<()> {
        for frame in frames {
            self.check_keyframe(&frame)?;
            if self.keyframes.contains_key(&frame.tick) {
                continue;
            }
            if self.start_tick().map_or(true, |start| frame.tick < start) {
                frame.apply(&mut self.state);
                frame.apply(&mut self.initial);
            }
            let tick = frame.tick;
            self.keyframes.insert(tick, frame);
            self.span = Some(match self.span {
                Some((s, e)) => (s.min(tick), e.max(tick)),
                None => (tick, tick),
            });
        }
        Ok(())
    }

    /// Rebuilds the motion index if it no longer has one group per keyframe gap.
    ///
    /// Returns whether a rebuild happened.
    pub fn sync_motions(&mut self) -> Result<bool> {
        if self.keyframes.is_empty() || self.motions.len() == self.keyframes.len() - 1 {
            return Ok(false);
        }
        debug!(shape = %self.name, "regenerating motions from keyframes");
        self.motions = motion_index(self.keyframes.values())?;
        self.span = self.keyframe_span();
        Ok(true)
    }

    /// Advances the live state to `tick`.
    ///
    /// Motions are activated when `tick` equals their start, so this must be
    /// called once per tick in increasing order. Use [`Shape::state_at`] for
    /// random access.
    pub fn apply_motion(&mut self, tick: u32) {
        self.sync_or_warn();
        self.visible = self.covers(tick);

        if self.start_tick() == Some(tick) {
            if let Some(frame) = self.keyframes.get(&tick) {
                frame.apply(&mut self.state);
            }
        }

        if let Some(group) = self.motions.get(&tick) {
            self.active.extend(group.iter().cloned());
        }

        let state = &mut self.state;
        self.active.retain(|motion| {
            if motion.is_active(tick) {
                motion.apply(state, tick);
                true
            } else {
                false
            }
        });
        trace!(shape = %self.name, tick, active = self.active.len(), "applied motions");
    }

    /// Returns a copy of this shape holding its state at `tick`.
    ///
    /// The copy is computed from the nearest keyframe at or before `tick`,
    /// or from the initial state when there is none, independently of the
    /// live playback state. Ticks before the first keyframe clamp to it.
    pub fn state_at(&self, tick: u32) -> Shape {
        let mut snapshot = self.clone();
        snapshot.active.clear();
        snapshot.sync_or_warn();
        snapshot.replay_to(tick);
        snapshot
    }

    fn replay_to(&mut self, tick: u32) {
        let anchor = match self.keyframes.keys().next().copied() {
            None => {
                // Only directly added motions: replay them from the initial state.
                self.state = self.initial;
                self.start_tick()
            }
            Some(first) if tick < first => {
                if let Some(frame) = self.keyframes.get(&first) {
                    frame.apply(&mut self.state);
                }
                None
            }
            Some(_) => {
                let nearest = self.keyframes.range(..=tick).next_back();
                let Some((&at, frame)) = nearest else {
                    return;
                };
                frame.apply(&mut self.state);
                // Motions already running when the anchor keyframe is reached.
                self.active = self
                    .motions
                    .range(..at)
                    .flat_map(|(_, group)| group)
                    .filter(|motion| motion.end() >= at)
                    .cloned()
                    .collect();
                Some(at)
            }
        };

        if let (Some(from), Some(end)) = (anchor, self.end_tick()) {
            for t in from..=tick.min(end) {
                self.apply_motion(t);
            }
        }
        self.visible = self.covers(tick);
    }

    fn covers(&self, tick: u32) -> bool {
        self.span.is_some_and(|(start, end)| start <= tick && tick <= end)
    }

    fn keyframe_span(&self) -> Option<(u32, u32)> {
        let first = self.keyframes.keys().next().copied();
        first.zip(self.keyframes.keys().next_back().copied())
    }

    fn sync_or_warn(&mut self) {
        if let Err(err) = self.sync_motions() {
            warn!(shape = %self.name, "keeping stale motions: {err}");
        }
    }

    fn check_keyframe(&self, frame: &Keyframe) -> Result<()> {
        if frame.shape != self.name {
            return Err(Error::InvalidValue(format!(
                "keyframe for shape {} cannot be added to shape {}",
                frame.shape, self.name
            )));
        }
        frame.state.validate()
    }

    /// Commits a new keyframe list, rebuilding motions and the tick span.
    /// Nothing changes if the motions cannot be derived.
    /// A new first keyframe also becomes the initial and live state.
    fn replace_keyframes(&mut self, frames: BTreeMap<u32, Keyframe>) -> Result<()> {
        let motions = motion_index(frames.values())?;
        let first_changed = frames.values().next() != self.keyframes.values().next();
        self.keyframes = frames;
        self.span = self.keyframe_span();
        self.motions = motions;
        self.active.clear();

        if first_changed {
            if let Some(first) = self.keyframes.values().next() {
                first.apply(&mut self.state);
                first.apply(&mut self.initial);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Size};
    use crate::motion::Family;

    fn state(x: f64, y: f64, color: Color, w: f64, h: f64) -> VisualState {
        VisualState::new(Position::new(x, y), color, w, h)
    }

    fn rect_with_frames(frames: &[(u32, VisualState)]) -> Shape {
        let mut shape = Shape::new("R", ShapeKind::Rectangle);
        for (tick, s) in frames {
            shape.add_keyframe(Keyframe::new(*tick, "R", *s)).unwrap();
        }
        shape
    }

    fn two_moves() -> Shape {
        rect_with_frames(&[
            (1, state(200.0, 200.0, Color::RED, 50.0, 100.0)),
            (10, state(200.0, 10.0, Color::RED, 50.0, 100.0)),
            (50, state(300.0, 300.0, Color::RED, 50.0, 100.0)),
        ])
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("ellipse".parse::<ShapeKind>().unwrap(), ShapeKind::Ellipse);
        assert!(matches!(
            "triangle".parse::<ShapeKind>(),
            Err(Error::UnsupportedType(kind)) if kind == "triangle"
        ));
        assert_eq!(Shape::from_type("R", "rectangle", 3).unwrap().layer(), 3);
    }

    #[test]
    fn test_keyframes_set_span_and_motions() {
        let shape = two_moves();
        assert_eq!(shape.start_tick(), Some(1));
        assert_eq!(shape.end_tick(), Some(50));
        assert_eq!(shape.motion_groups().len(), 2);
        assert!(shape.motions().all(|m| m.family() == Family::Position));
    }

    #[test]
    fn test_state_at_keyframes_and_between() {
        let shape = two_moves();
        assert_eq!(shape.state_at(10).state().position, Position::new(200.0, 10.0));
        assert_eq!(shape.state_at(50).state().position, Position::new(300.0, 300.0));
        assert_eq!(shape.state_at(30).state().position, Position::new(250.0, 155.0));
        assert_eq!(shape.state_at(30).state().color, Color::RED);
    }

    #[test]
    fn test_state_at_clamps_outside_range() {
        let shape = two_moves();
        let before = shape.state_at(0);
        assert_eq!(before.state().position, Position::new(200.0, 200.0));
        assert!(!before.is_visible());

        let after = shape.state_at(99);
        assert_eq!(after.state().position, Position::new(300.0, 300.0));
        assert!(!after.is_visible());
    }

    #[test]
    fn test_state_at_does_not_touch_live_state() {
        let mut shape = two_moves();
        for tick in 0..=5 {
            shape.apply_motion(tick);
        }
        let live = *shape.state();
        let _ = shape.state_at(40);
        assert_eq!(*shape.state(), live);
        assert_eq!(shape.active_motions().len(), 1);
    }

    #[test]
    fn test_stateful_playback_matches_point_query() {
        let mut shape = rect_with_frames(&[
            (2, state(0.0, 0.0, Color::RED, 10.0, 10.0)),
            (12, state(100.0, 50.0, Color::BLUE, 30.0, 10.0)),
            (20, state(100.0, 50.0, Color::GREEN, 30.0, 10.0).with_heading(90.0)),
        ]);
        let reference = shape.clone();
        for tick in 0..=25 {
            shape.apply_motion(tick);
            let snapshot = reference.state_at(tick);
            assert_eq!(shape.state(), snapshot.state(), "diverged at tick {tick}");
            assert_eq!(shape.is_visible(), snapshot.is_visible(), "visibility at {tick}");
        }
    }

    #[test]
    fn test_add_motion_rejects_overlap() {
        let mut shape = two_moves();
        let clash = Motion::movement(
            "R",
            5,
            20,
            Position::new(200.0, 115.5),
            Position::new(0.0, 0.0),
        )
        .unwrap();
        let err = shape.add_motion(clash).unwrap_err();
        assert!(matches!(
            err,
            Error::TemporalConflict { family: Family::Position, start: 5, end: 20, .. }
        ));
        assert_eq!(shape.motion_groups().len(), 2);
    }

    #[test]
    fn test_add_motion_rejects_state_mismatch() {
        let mut shape = two_moves();
        let grow = Motion::resize("R", 15, 35, Size::new(60.0, 100.0), Size::new(100.0, 100.0))
            .unwrap();
        let err = shape.add_motion(grow).unwrap_err();
        assert!(matches!(
            err,
            Error::StateMismatch { family: Family::Size, tick: 15, .. }
        ));

        let grow = Motion::resize("R", 15, 35, Size::new(50.0, 100.0), Size::new(100.0, 100.0))
            .unwrap();
        shape.add_motion(grow).unwrap();
    }

    #[test]
    fn test_motion_before_start_is_compatible() {
        let mut shape = two_moves();
        let early = Motion::recolor("R", 0, 1, Color::GREEN, Color::RED).unwrap();
        shape.add_motion(early).unwrap();
        assert_eq!(shape.start_tick(), Some(0));
    }

    #[test]
    fn test_duplicate_motion_is_ignored() {
        let mut shape = Shape::new("R", ShapeKind::Rectangle);
        let m = Motion::rotate("R", 0, 10, 0.0, 45.0).unwrap();
        shape.add_motion(m.clone()).unwrap();
        shape.add_motion(m).unwrap();
        assert_eq!(shape.motions().count(), 1);
    }

    #[test]
    fn test_motion_for_other_shape_is_rejected() {
        let mut shape = Shape::new("R", ShapeKind::Rectangle);
        let m = Motion::rotate("C", 0, 10, 0.0, 45.0).unwrap();
        assert!(matches!(shape.add_motion(m), Err(Error::InvalidValue(_))));
    }

    #[test]
    fn test_add_keyframe_replaces_same_tick() {
        let mut shape = two_moves();
        shape
            .add_keyframe(Keyframe::new(10, "R", state(0.0, 0.0, Color::RED, 50.0, 100.0)))
            .unwrap();
        assert_eq!(shape.keyframes().count(), 3);
        assert_eq!(shape.state_at(10).state().position, Position::new(0.0, 0.0));
    }

    #[test]
    fn test_earlier_keyframe_moves_start_and_state() {
        let mut shape = two_moves();
        shape
            .add_keyframe(Keyframe::new(0, "R", state(1.0, 1.0, Color::GREEN, 5.0, 5.0)))
            .unwrap();
        assert_eq!(shape.start_tick(), Some(0));
        assert_eq!(shape.state().color, Color::GREEN);
        assert_eq!(shape.motion_groups().len(), 3);
    }

    #[test]
    fn test_invalid_keyframe_leaves_shape_unchanged() {
        let mut shape = two_moves();
        let bad = Keyframe::new(60, "R", state(0.0, 0.0, Color::RED, -5.0, 10.0));
        assert!(shape.add_keyframe(bad).is_err());
        // Growing from a zero width cannot be expressed as a resize.
        let flat = Keyframe::new(60, "R", state(0.0, 0.0, Color::RED, 0.0, 10.0));
        assert!(shape.add_keyframe(flat).is_err());
        assert_eq!(shape.end_tick(), Some(50));
        assert_eq!(shape.keyframes().count(), 3);
    }

    #[test]
    fn test_remove_keyframe_regenerates() {
        let mut shape = two_moves();
        shape.remove_keyframe(10).unwrap();
        assert_eq!(shape.motion_groups().len(), 1);
        assert_eq!(shape.state_at(50).state().position, Position::new(300.0, 300.0));
        assert!(matches!(shape.remove_keyframe(10), Err(Error::UnknownEntity(_))));

        shape.remove_keyframe(50).unwrap();
        assert_eq!(shape.end_tick(), Some(1));
        shape.remove_keyframe(1).unwrap();
        assert_eq!(shape.start_tick(), None);
        assert_eq!(shape.motions().count(), 0);
    }

    #[test]
    fn test_remove_first_motion_advances_start() {
        let mut shape = two_moves();
        let first = shape.motion_groups()[&1][0].clone();
        shape.remove_motion(&first).unwrap();
        assert_eq!(shape.start_tick(), Some(10));
        assert_eq!(shape.keyframes().count(), 2);
    }

    #[test]
    fn test_remove_last_motion_drops_end() {
        let mut shape = two_moves();
        let last = shape.motion_groups()[&10][0].clone();
        shape.remove_motion(&last).unwrap();
        assert_eq!(shape.end_tick(), Some(10));
    }

    #[test]
    fn test_remove_middle_motion_flattens_gap() {
        let mut shape = rect_with_frames(&[
            (0, state(0.0, 0.0, Color::RED, 10.0, 10.0)),
            (10, state(50.0, 0.0, Color::RED, 10.0, 10.0)),
            (20, state(50.0, 50.0, Color::RED, 10.0, 10.0)),
            (30, state(0.0, 50.0, Color::RED, 10.0, 10.0)),
        ]);
        let middle = shape.motion_groups()[&10][0].clone();
        shape.remove_motion(&middle).unwrap();

        assert_eq!(shape.keyframe_at(20).unwrap().state.position, Position::new(50.0, 0.0));
        assert_eq!(shape.motion_groups().len(), 3);
        assert!(shape.motion_groups()[&10][0].is_noop());
        assert!(matches!(shape.remove_motion(&middle), Err(Error::UnknownEntity(_))));
    }

    #[test]
    fn test_motions_without_keyframes_still_play() {
        let mut shape = Shape::new("C", ShapeKind::Ellipse)
            .with_state(state(0.0, 0.0, Color::RED, 10.0, 10.0));
        shape
            .add_motion(Motion::movement("C", 0, 10, Position::new(0.0, 0.0), Position::new(10.0, 0.0)).unwrap())
            .unwrap();
        assert_eq!(shape.state_at(5).state().position, Position::new(5.0, 0.0));
        for tick in 0..=5 {
            shape.apply_motion(tick);
        }
        assert_eq!(shape.state().position, Position::new(5.0, 0.0));
    }

    fn drifting_ellipse() -> Shape {
        let mut shape = Shape::new("C", ShapeKind::Ellipse)
            .with_state(state(0.0, 0.0, Color::RED, 10.0, 10.0));
        shape
            .add_motion(Motion::movement("C", 5, 10, Position::new(0.0, 0.0), Position::new(10.0, 0.0)).unwrap())
            .unwrap();
        shape
            .add_motion(Motion::recolor("C", 8, 14, Color::RED, Color::BLUE).unwrap())
            .unwrap();
        shape
    }

    #[test]
    fn test_point_query_ignores_earlier_playback() {
        let mut shape = drifting_ellipse();
        let before = shape.state_at(2);
        for tick in 0..=10 {
            shape.apply_motion(tick);
        }
        assert_eq!(shape.state().position, Position::new(10.0, 0.0));

        let after = shape.state_at(2);
        assert_eq!(after.state(), before.state());
        assert_eq!(after.state().position, Position::new(0.0, 0.0));
        assert!(!after.is_visible());
        assert_eq!(shape.state_at(12).state(), shape.state_at(12).state());
    }

    #[test]
    fn test_direct_motions_play_like_point_queries() {
        let mut shape = drifting_ellipse();
        let reference = shape.clone();
        for tick in 0..=20 {
            shape.apply_motion(tick);
            let snapshot = reference.state_at(tick);
            assert_eq!(shape.state(), snapshot.state(), "diverged at tick {tick}");
            assert_eq!(shape.is_visible(), snapshot.is_visible(), "visibility at {tick}");
        }
    }

    #[test]
    fn test_motion_before_first_keyframe_agrees_on_visibility() {
        let mut shape = rect_with_frames(&[
            (1, state(200.0, 200.0, Color::RED, 50.0, 100.0)),
            (10, state(200.0, 10.0, Color::RED, 50.0, 100.0)),
        ]);
        shape
            .add_motion(Motion::recolor("R", 0, 1, Color::GREEN, Color::RED).unwrap())
            .unwrap();
        let reference = shape.clone();
        for tick in 0..=12 {
            shape.apply_motion(tick);
            let snapshot = reference.state_at(tick);
            assert_eq!(shape.is_visible(), snapshot.is_visible(), "visibility at {tick}");
            assert_eq!(shape.state(), snapshot.state(), "diverged at tick {tick}");
        }
        assert!(!reference.state_at(0).is_visible());
    }

    #[test]
    fn test_remove_motion_without_boundary_keyframes() {
        let mut shape = rect_with_frames(&[
            (1, state(200.0, 200.0, Color::RED, 50.0, 100.0)),
            (10, state(200.0, 10.0, Color::RED, 50.0, 100.0)),
        ]);
        let early = Motion::recolor("R", 0, 1, Color::GREEN, Color::RED).unwrap();
        shape.add_motion(early.clone()).unwrap();
        assert_eq!(shape.start_tick(), Some(0));

        shape.remove_motion(&early).unwrap();
        assert_eq!(shape.motions().count(), 1);
        assert_eq!(shape.keyframes().count(), 2);
        assert_eq!(shape.start_tick(), Some(1));
        assert!(matches!(shape.remove_motion(&early), Err(Error::UnknownEntity(_))));
    }

    #[test]
    fn test_removing_first_keyframe_resets_initial_state() {
        let mut shape = two_moves();
        shape.remove_keyframe(1).unwrap();
        assert_eq!(shape.state().position, Position::new(200.0, 10.0));
        assert_eq!(shape.state_at(0).state().position, Position::new(200.0, 10.0));
    }
}
