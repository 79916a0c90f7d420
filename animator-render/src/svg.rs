//! Animated SVG output

use crate::{RenderConfig, Result};
use animator_core::{Change, Shape, ShapeKind, Timeline};
use std::io::Write;
use std::num::NonZeroU32;
use tracing::debug;

/// Renders a timeline as a self-animating SVG document.
///
/// Shapes are drawn bottom layer first so higher layers overdraw lower
/// ones. Each shape starts hidden, appears at its start tick, and carries one
/// animation directive per motion.
pub struct SvgRenderer<'a> {
    timeline: &'a Timeline,
    speed: NonZeroU32,
}

impl<'a> SvgRenderer<'a> {
    /// Creates a renderer; fails if the configured speed is zero
    pub fn new(timeline: &'a Timeline, config: &RenderConfig) -> Result<Self> {
        Ok(Self {
            timeline,
            speed: config.ticks_per_second()?,
        })
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let bounds = self.timeline.bounds();
        writeln!(
            out,
            "<svg viewBox=\"{} {} {} {}\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">",
            bounds.x, bounds.y, bounds.width, bounds.height
        )?;

        let mut drawn = 0usize;
        for layer in self.timeline.shapes_by_layer() {
            for shape in layer.values() {
                self.write_shape(out, shape)?;
                drawn += 1;
            }
        }

        write!(out, "</svg>")?;
        debug!(shapes = drawn, speed = self.speed.get(), "wrote svg document");
        Ok(())
    }

    /// Renders into a string
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn write_shape<W: Write>(&self, out: &mut W, shape: &Shape) -> Result<()> {
        let initial = shape
            .keyframes()
            .next()
            .map(|frame| frame.state)
            .unwrap_or(*shape.state());
        let (tag, attributes) = match shape.kind() {
            ShapeKind::Rectangle => (
                "rect",
                format!(
                    "x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\"",
                    initial.position.x, initial.position.y, initial.width, initial.height
                ),
            ),
            ShapeKind::Ellipse => (
                "ellipse",
                format!(
                    "cx=\"{:.1}\" cy=\"{:.1}\" rx=\"{:.1}\" ry=\"{:.1}\"",
                    initial.position.x, initial.position.y, initial.width, initial.height
                ),
            ),
        };
        let transform = if initial.heading != 0.0 {
            let pivot = initial.center();
            format!(
                " transform=\"rotate({} {} {})\"",
                initial.heading as i64, pivot.x as i64, pivot.y as i64
            )
        } else {
            String::new()
        };
        writeln!(
            out,
            "<{tag} id=\"{}\" {attributes} fill=\"{}\"{transform}>",
            shape.name(),
            initial.color
        )?;

        let appear = f64::from(shape.start_tick().unwrap_or(0)) / f64::from(self.speed.get());
        writeln!(
            out,
            "<set attributeName=\"visibility\" attributeType=\"xml\" begin=\"0.00\" \
             dur=\"{appear:.2}\" to=\"hidden\"/>"
        )?;
        writeln!(
            out,
            "<set attributeName=\"visibility\" attributeType=\"xml\" begin=\"{appear:.2}\" \
             to=\"visible\"/>"
        )?;

        for motion in shape.motions() {
            let directive = match motion.change() {
                Change::Rotate { .. } => {
                    let pivot = shape.state_at(motion.start()).center();
                    motion.to_svg_rotation(self.speed, pivot)
                }
                _ => motion.to_svg(shape.kind(), self.speed),
            };
            if let Some(directive) = directive {
                out.write_all(directive.as_bytes())?;
            }
        }

        writeln!(out, "</{tag}>")?;
        Ok(())
    }
}
