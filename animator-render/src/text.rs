//! Textual description output, readable by `animator_core::description`

use crate::Result;
use animator_core::{Keyframe, Shape, Timeline};
use std::io::Write;
use tracing::debug;

/// Writes a timeline back out in the description format.
///
/// Every pair of consecutive keyframes becomes one `motion` line; a shape
/// with a single keyframe gets a `keyframe` line instead. Geometry is
/// truncated to whole pixels.
pub struct TextRenderer<'a> {
    timeline: &'a Timeline,
}

impl<'a> TextRenderer<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        Self { timeline }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let bounds = self.timeline.bounds();
        writeln!(
            out,
            "canvas {} {} {} {}",
            bounds.x, bounds.y, bounds.width, bounds.height
        )?;

        let shapes = self.timeline.shapes();
        for shape in shapes.values() {
            write_shape(out, shape)?;
        }
        debug!(shapes = shapes.len(), "wrote text description");
        Ok(())
    }

    /// Renders into a string
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn write_shape<W: Write>(out: &mut W, shape: &Shape) -> Result<()> {
    if shape.layer() == 0 {
        writeln!(out, "shape {} {}", shape.name(), shape.kind())?;
    } else {
        writeln!(out, "shape {} {} {}", shape.name(), shape.kind(), shape.layer())?;
    }

    let frames: Vec<&Keyframe> = shape.keyframes().collect();
    if let [only] = frames.as_slice() {
        writeln!(out, "keyframe {} {only}", shape.name())?;
        return Ok(());
    }

    for pair in frames.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        // Both sides carry a heading or neither does.
        if from.has_heading() || to.has_heading() {
            writeln!(
                out,
                "motion {} {} {}",
                shape.name(),
                from.with_heading(),
                to.with_heading()
            )?;
        } else {
            writeln!(out, "motion {} {from} {to}", shape.name())?;
        }
    }
    Ok(())
}
