//! Animator CLI Tool
//!
//! Command-line interface for rendering and inspecting shape animations.

use animator_core::description;
use animator_core::{ShapeKind, Timeline, VisualState};
use animator_render::{RenderConfig, View};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "animator")]
#[command(about = "Keyframe animator - render and inspect shape animations")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an animation description
    Render {
        /// Input description file
        input: PathBuf,

        /// Output view (text or svg)
        #[arg(long, default_value = "text")]
        view: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Playback speed in ticks per second
        #[arg(long, default_value = "1")]
        speed: u32,
    },

    /// Show canvas, layers and per-shape counts
    Info {
        /// Input description file
        input: PathBuf,
    },

    /// Print every shape's state at one tick
    State {
        /// Input description file
        input: PathBuf,

        /// Tick to query
        #[arg(long)]
        tick: u32,

        /// Play every tick from 0 instead of computing the tick directly
        #[arg(long)]
        replay: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            view,
            output,
            speed,
        } => render_description(&input, &view, output, speed)?,

        Commands::Info { input } => print_info(&load(&input)?),

        Commands::State {
            input,
            tick,
            replay,
            json,
        } => print_state(&input, tick, replay, json)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn load(input: &Path) -> Result<Timeline> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open description {}", input.display()))?;
    let timeline = description::read(BufReader::new(file))
        .with_context(|| format!("Failed to read description {}", input.display()))?;
    info!(
        shapes = timeline.shapes().len(),
        last_tick = timeline.last_tick(),
        "loaded {}",
        input.display()
    );
    Ok(timeline)
}

fn render_description(input: &Path, view: &str, output: Option<PathBuf>, speed: u32) -> Result<()> {
    let timeline = load(input)?;
    let view: View = view.parse().context("Invalid view")?;
    let config = RenderConfig { speed };

    let mut out: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).context("Failed to create output file")?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    animator_render::render(&timeline, view, &config, &mut out).context("Failed to render")?;
    out.flush().context("Failed to flush output")?;

    if let Some(path) = output {
        info!("wrote {view:?} output to {}", path.display());
    }
    Ok(())
}

fn print_info(timeline: &Timeline) {
    let bounds = timeline.bounds();
    println!("=== Animation ===");
    println!(
        "Canvas: {}x{} at ({}, {})",
        bounds.width, bounds.height, bounds.x, bounds.y
    );
    println!("Last tick: {}", timeline.last_tick());
    println!("Layers: {}", timeline.layer_count());

    println!("\n=== Layers ===");
    for (layer, shapes) in timeline.shapes_by_layer().iter().enumerate() {
        let names: Vec<&str> = shapes.keys().map(String::as_str).collect();
        println!("  [{layer}] {}", names.join(", "));
    }

    println!("\n=== Shapes ===");
    for shape in timeline.shapes().values() {
        let span = match (shape.start_tick(), shape.end_tick()) {
            (Some(start), Some(end)) => format!("ticks {start}-{end}"),
            _ => "no keyframes".to_string(),
        };
        println!(
            "  {} ({}): {}, {} keyframes, {} motions",
            shape.name(),
            shape.kind(),
            span,
            shape.keyframes().count(),
            shape.motions().count()
        );
    }
}

#[derive(Serialize)]
struct ShapeState {
    name: String,
    kind: ShapeKind,
    layer: usize,
    visible: bool,
    state: VisualState,
}

fn print_state(input: &Path, tick: u32, replay: bool, json: bool) -> Result<()> {
    let mut timeline = load(input)?;
    if replay {
        for t in 0..=tick {
            timeline.update(t);
        }
    } else {
        timeline.set_state_to(tick);
    }

    let states: Vec<ShapeState> = timeline
        .shapes()
        .into_values()
        .map(|shape| ShapeState {
            name: shape.name().to_string(),
            kind: shape.kind(),
            layer: shape.layer(),
            visible: shape.is_visible(),
            state: *shape.state(),
        })
        .collect();

    if json {
        let document =
            serde_json::to_string_pretty(&states).context("Failed to serialize shape states")?;
        println!("{document}");
        return Ok(());
    }

    println!("Tick {tick}:");
    for entry in &states {
        let s = &entry.state;
        println!(
            "  {} {}: ({:.1}, {:.1}) {:.1}x{:.1} {} heading {:.1}{}",
            entry.kind,
            entry.name,
            s.position.x,
            s.position.y,
            s.width,
            s.height,
            s.color,
            s.heading,
            if entry.visible { "" } else { " (hidden)" }
        );
    }
    Ok(())
}
