//! Reader for the textual animation description format
//!
//! One directive per line; blank lines and `#` comments are ignored:
//!
//! ```text
//! canvas <x> <y> <w> <h>
//! shape <name> <kind> [layer]
//! motion <name> <t1> <x1> <y1> <w1> <h1> <r1> <g1> <b1> [heading1] <t2> <x2> <y2> <w2> <h2> <r2> <g2> <b2> [heading2]
//! keyframe <name> <t> <x> <y> <w> <h> <r> <g> <b> [heading]
//! ```

use crate::builder::TimelineBuilder;
use crate::geometry::{Color, Position, VisualState};
use crate::keyframe::Keyframe;
use crate::timeline::Timeline;
use crate::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Numbers in one side of a motion line, without and with a heading
const SNAPSHOT: usize = 8;
const SNAPSHOT_WITH_HEADING: usize = 9;

/// Reads a description and builds the timeline it declares.
///
/// Syntax errors carry the 1-based line number. Errors found while
/// building the model are returned as the model reports them.
pub fn read<R: BufRead>(reader: R) -> Result<Timeline> {
    let mut builder = TimelineBuilder::new();
    let mut directives = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or_default().trim();
        let mut words = content.split_whitespace();
        let Some(directive) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();
        apply_directive(&mut builder, directive, &args).map_err(|message| Error::Parse {
            line: index + 1,
            message,
        })?;
        directives += 1;
    }

    debug!(directives, "read animation description");
    builder.build()
}

/// Reads a description held in memory
pub fn read_str(text: &str) -> Result<Timeline> {
    read(text.as_bytes())
}

type LineResult<T> = std::result::Result<T, String>;

fn apply_directive(builder: &mut TimelineBuilder, directive: &str, args: &[&str]) -> LineResult<()> {
    match directive {
        "canvas" => {
            let [x, y, w, h] = args else {
                return Err(format!("canvas takes 4 values, got {}", args.len()));
            };
            builder.set_bounds(integer(x)?, integer(y)?, integer(w)?, integer(h)?);
        }
        "shape" => match args {
            [name, kind] => {
                builder.declare_shape(name, kind, 0);
            }
            [name, kind, layer] => {
                builder.declare_shape(name, kind, integer(layer)?);
            }
            _ => {
                return Err(format!(
                    "shape takes a name, a kind and an optional layer, got {} values",
                    args.len()
                ))
            }
        },
        "motion" => {
            let (name, values) = split_name(args)?;
            let values = numbers(values)?;
            let half = match values.len() {
                n if n == 2 * SNAPSHOT => SNAPSHOT,
                n if n == 2 * SNAPSHOT_WITH_HEADING => SNAPSHOT_WITH_HEADING,
                n => return Err(format!("motion takes 16 or 18 numbers, got {n}")),
            };
            let (from, to) = values.split_at(half);
            builder.add_motion(snapshot(name, from)?, snapshot(name, to)?);
        }
        "keyframe" => {
            let (name, values) = split_name(args)?;
            let values = numbers(values)?;
            if values.len() != SNAPSHOT && values.len() != SNAPSHOT_WITH_HEADING {
                return Err(format!("keyframe takes 8 or 9 numbers, got {}", values.len()));
            }
            builder.add_keyframe(snapshot(name, &values)?);
        }
        other => return Err(format!("unknown directive {other:?}")),
    }
    Ok(())
}

fn split_name<'a>(args: &'a [&'a str]) -> LineResult<(&'a str, &'a [&'a str])> {
    args.split_first()
        .map(|(name, rest)| (*name, rest))
        .ok_or_else(|| "missing shape name".to_string())
}

fn numbers(args: &[&str]) -> LineResult<Vec<f64>> {
    args.iter()
        .map(|arg| match arg.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(format!("{arg:?} is not a number")),
        })
        .collect()
}

/// Parses a whole number, accepting a decimal form and truncating it
fn integer<T: TryFrom<i64>>(arg: &str) -> LineResult<T> {
    let value = arg
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{arg:?} is not a number"))?;
    T::try_from(value as i64).map_err(|_| format!("{arg} is out of range"))
}

/// Builds a keyframe from `t x y w h r g b [heading]`
fn snapshot(name: &str, values: &[f64]) -> LineResult<Keyframe> {
    let &[t, x, y, w, h, r, g, b, ..] = values else {
        return Err(format!("expected at least {SNAPSHOT} numbers"));
    };
    let heading = values.get(SNAPSHOT).copied().unwrap_or(0.0);

    if t < 0.0 || t > f64::from(u32::MAX) {
        return Err(format!("tick {t} is out of range"));
    }
    if w < 0.0 || h < 0.0 {
        return Err(format!("size {w}x{h} must not be negative"));
    }
    let color = Color::from_channels(r as i64, g as i64, b as i64).map_err(|err| err.to_string())?;

    let state = VisualState::new(Position::new(x, y), color, w, h).with_heading(heading);
    Ok(Keyframe::new(t as u32, name, state))
}
