//! Animator Render Library
//!
//! This library turns a [`Timeline`] into output documents: the textual
//! description format, which the core reader accepts back, and animated SVG.

pub mod svg;
pub mod text;

pub use svg::SvgRenderer;
pub use text::TextRenderer;

use animator_core::Timeline;
use std::io::Write;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Result type for animator-render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for animator-render operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Animator core error: {0}")]
    Core(#[from] animator_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Playback speed in ticks per second
    pub speed: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { speed: 1 }
    }
}

impl RenderConfig {
    /// Playback speed, rejecting zero
    pub fn ticks_per_second(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.speed)
            .ok_or_else(|| Error::InvalidConfig("speed must be at least 1 tick per second".to_string()))
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Text,
    Svg,
}

impl FromStr for View {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(View::Text),
            "svg" => Ok(View::Svg),
            other => Err(Error::UnknownView(other.to_string())),
        }
    }
}

/// Renders `timeline` as `view` into `out`
pub fn render<W: Write>(
    timeline: &Timeline,
    view: View,
    config: &RenderConfig,
    out: &mut W,
) -> Result<()> {
    match view {
        View::Text => TextRenderer::new(timeline).write_to(out),
        View::Svg => SvgRenderer::new(timeline, config)?.write_to(out),
    }
}
