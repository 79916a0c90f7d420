//! Derivation of motions from adjacent keyframes

use crate::geometry::approx_eq;
use crate::keyframe::Keyframe;
use crate::motion::{Change, Motion};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Motions of one shape grouped by start tick
pub type MotionIndex = BTreeMap<u32, Vec<Motion>>;

/// Generates the motions that carry a shape from keyframe `from` to keyframe `to`.
///
/// One motion is emitted per property family whose value differs. When
/// nothing differs and `remaining` (the keyframe gaps still to process,
/// including this one) is above one, a stationary move is emitted so the gap
/// still has a motion record.
pub fn synthesize(from: &Keyframe, to: &Keyframe, remaining: usize) -> Result<Vec<Motion>> {
    if from.shape != to.shape {
        return Err(Error::InvalidValue(format!(
            "keyframes for {} and {} cannot form one motion",
            from.shape, to.shape
        )));
    }

    let (a, b) = (&from.state, &to.state);
    let mut changes = Vec::with_capacity(4);
    if a.color != b.color {
        changes.push(Change::Recolor {
            from: a.color,
            to: b.color,
        });
    }
    if a.position != b.position {
        changes.push(Change::Move {
            from: a.position,
            to: b.position,
        });
    }
    if a.size() != b.size() {
        changes.push(Change::Resize {
            from: a.size(),
            to: b.size(),
        });
    }
    if !approx_eq(a.heading, b.heading) {
        changes.push(Change::Rotate {
            from: a.heading,
            to: b.heading,
        });
    }
    if changes.is_empty() && remaining > 1 {
        changes.push(Change::Move {
            from: a.position,
            to: b.position,
        });
    }

    changes
        .into_iter()
        .map(|change| Motion::new(from.shape.as_str(), from.tick, to.tick, change))
        .collect()
}

/// Rebuilds the full motion index from a tick-sorted keyframe list.
///
/// Every gap between consecutive keyframes gets a group, even when the
/// group is empty, so the group count always equals `frames.len() - 1`.
pub fn motion_index<'a, I>(frames: I) -> Result<MotionIndex>
where
    I: IntoIterator<Item = &'a Keyframe>,
{
    let frames: Vec<&Keyframe> = frames.into_iter().collect();
    let gaps = frames.len().saturating_sub(1);

    let mut index = MotionIndex::new();
    for (i, pair) in frames.windows(2).enumerate() {
        let motions = synthesize(pair[0], pair[1], gaps - i)?;
        index.insert(pair[0].tick, motions);
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Position, VisualState};
    use crate::motion::Family;

    fn frame(tick: u32, x: f64, color: Color, width: f64) -> Keyframe {
        Keyframe::new(
            tick,
            "R",
            VisualState::new(Position::new(x, 0.0), color, width, 10.0),
        )
    }

    #[test]
    fn test_one_motion_per_changed_family() {
        let a = frame(1, 0.0, Color::RED, 10.0);
        let b = frame(10, 50.0, Color::BLUE, 10.0);
        let motions = synthesize(&a, &b, 1).unwrap();
        let families: Vec<Family> = motions.iter().map(Motion::family).collect();
        assert_eq!(families, vec![Family::Color, Family::Position]);
        assert!(motions.iter().all(|m| m.start() == 1 && m.end() == 10));
    }

    #[test]
    fn test_rotation_is_detected() {
        let a = frame(0, 0.0, Color::RED, 10.0);
        let mut b = frame(5, 0.0, Color::RED, 10.0);
        b.state.heading = 30.0;
        let motions = synthesize(&a, &b, 1).unwrap();
        assert_eq!(motions.len(), 1);
        assert_eq!(motions[0].family(), Family::Rotation);
    }

    #[test]
    fn test_filler_only_when_gaps_remain() {
        let a = frame(1, 5.0, Color::RED, 10.0);
        let b = frame(10, 5.0, Color::RED, 10.0);

        let filler = synthesize(&a, &b, 2).unwrap();
        assert_eq!(filler.len(), 1);
        assert!(filler[0].is_noop());
        assert_eq!(filler[0].family(), Family::Position);

        assert!(synthesize(&a, &b, 1).unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_shapes_are_rejected() {
        let a = frame(1, 0.0, Color::RED, 10.0);
        let mut b = frame(2, 1.0, Color::RED, 10.0);
        b.shape = "C".to_string();
        assert!(matches!(synthesize(&a, &b, 1), Err(Error::InvalidValue(_))));
    }

    #[test]
    fn test_motion_index_has_a_group_per_gap() {
        let frames = vec![
            frame(1, 0.0, Color::RED, 10.0),
            frame(10, 0.0, Color::RED, 10.0),
            frame(20, 40.0, Color::RED, 10.0),
            frame(30, 40.0, Color::RED, 10.0),
        ];
        let index = motion_index(&frames).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index[&1].len(), 1, "stationary gap keeps a filler");
        assert_eq!(index[&10][0].family(), Family::Position);
        assert!(index[&20].is_empty(), "final stationary gap has no filler");
    }
}
