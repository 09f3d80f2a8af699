#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for generating, exporting and playing ridgeline landscapes.

mod export;
mod playback;
mod source;

use std::{
    io::Read,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ridgeline_config::{decode_share_code, encode_share_code, Presets, MAX_RIDGE_POINTS};
use ridgeline_core::{Branching, BranchingSchedule, Command, Depth, Event};
use ridgeline_landscape::{self as landscape, query};
use ridgeline_rendering::{
    compose_scene, Presentation, RenderMode, RenderingBackend, Scene, Viewport,
};
use ridgeline_system_ridge_generation::{generate_ridge, projected_point_count, RidgeRequest};
use tracing_subscriber::EnvFilter;

use crate::{
    export::{run_export, ExportManifest, ExportSettings, SvgFrameSink},
    playback::HeadlessBackend,
    source::SourceArgs,
};

#[derive(Parser, Debug)]
#[command(name = "ridgeline")]
#[command(about = "Procedural mountain ridge-line generator and parallax animator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List builtin presets, or print one as TOML.
    Presets {
        /// Preset to print in full.
        #[arg(long)]
        show: Option<String>,
    },
    /// Generate a single unit-space ridge and print it as JSON.
    Ridge {
        /// Interior points inserted per subdivision step.
        #[arg(long, default_value_t = 3)]
        branching: u32,
        /// Number of subdivision levels.
        #[arg(long, default_value_t = 2)]
        depth: u32,
        /// Seed of the ridge's random stream.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Branching schedule for deeper levels.
        #[arg(long, value_enum, default_value_t = ScheduleArg::Constant)]
        schedule: ScheduleArg,
    },
    /// Export a deterministic frame sequence as SVG files.
    Export {
        /// Output directory.
        #[arg(long)]
        out: PathBuf,
        /// Number of frames to export.
        #[arg(long, default_value_t = 300)]
        frames: u64,
        /// Frame rate recorded in the manifest.
        #[arg(long, default_value_t = 30)]
        fps: u32,
        /// Frame width in pixels.
        #[arg(long, default_value_t = 1920.0)]
        width: f32,
        /// Frame height in pixels.
        #[arg(long, default_value_t = 1080.0)]
        height: f32,
        /// Render with the interactive sky and haze instead of the video style.
        #[arg(long)]
        interactive: bool,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Play the animation in real time without a window, logging recycles.
    Play {
        /// Playback duration in seconds.
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,
        /// Frames per second.
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Viewport width in pixels.
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        /// Viewport height in pixels.
        #[arg(long, default_value_t = 720.0)]
        height: f32,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Convert configurations to and from single-line share codes.
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
}

#[derive(Subcommand, Debug)]
enum ShareAction {
    /// Print the share code of a configuration.
    Encode {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the configuration behind a share code as TOML.
    Decode {
        /// Share code; read from standard input when omitted.
        code: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScheduleArg {
    Constant,
    Tapered,
}

impl From<ScheduleArg> for BranchingSchedule {
    fn from(value: ScheduleArg) -> Self {
        match value {
            ScheduleArg::Constant => Self::Constant,
            ScheduleArg::Tapered => Self::Tapered,
        }
    }
}

/// Entry point for the ridgeline command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Presets { show } => list_presets(show.as_deref()),
        Commands::Ridge {
            branching,
            depth,
            seed,
            schedule,
        } => print_ridge(branching, depth, seed, schedule.into()),
        Commands::Export {
            out,
            frames,
            fps,
            width,
            height,
            interactive,
            source,
        } => export_frames(&out, frames, fps, Viewport::new(width, height)?, interactive, &source),
        Commands::Play {
            seconds,
            fps,
            width,
            height,
            source,
        } => play(seconds, fps, Viewport::new(width, height)?, &source),
        Commands::Share { action } => share(action),
    }
}

fn list_presets(show: Option<&str>) -> Result<()> {
    let presets = Presets::builtin()?;

    if let Some(name) = show {
        print!("{}", presets.require(name)?.to_toml_string()?);
        return Ok(());
    }

    for preset in presets.iter() {
        let config = &preset.config;
        println!(
            "{:<20} mountains={:<3} points_per_depth={:<2} depth={:<2} speed={}",
            preset.name,
            config.number_of_mountains,
            config.max_points_per_depth,
            config.depth,
            config.speed
        );
    }
    Ok(())
}

fn print_ridge(branching: u32, depth: u32, seed: u64, schedule: BranchingSchedule) -> Result<()> {
    let branching = Branching::new(branching)?;
    let depth = Depth::new(depth);
    let points = projected_point_count(branching, depth, schedule);
    if points > MAX_RIDGE_POINTS {
        bail!("ridge would contain {points} points, above the limit of {MAX_RIDGE_POINTS}");
    }

    let ridge = generate_ridge(RidgeRequest::new(branching, depth, schedule, seed));
    println!("{}", serde_json::to_string_pretty(&ridge)?);
    Ok(())
}

fn export_frames(
    out: &Path,
    frames: u64,
    fps: u32,
    viewport: Viewport,
    interactive: bool,
    source: &SourceArgs,
) -> Result<()> {
    let resolved = source.resolve()?;
    let _ = resolved
        .validated
        .check_aspect_ratio(viewport.aspect_ratio())
        .context("viewport cannot be exported")?;
    let mut landscape = resolved.landscape();
    let manifest = ExportManifest {
        source: resolved.label.clone(),
        field_seed: resolved.field_seed,
        fps,
        width: viewport.width(),
        height: viewport.height(),
        frame_count: frames,
        music_track: resolved.validated.music_track.clone(),
    };
    let mut sink = SvgFrameSink::create(out, manifest)?;
    let mode = if interactive {
        RenderMode::Interactive
    } else {
        RenderMode::Export
    };

    let summary = run_export(
        &mut landscape,
        &resolved.validated.style,
        ExportSettings {
            frames,
            viewport,
            mode,
        },
        &mut sink,
    )?;
    println!(
        "wrote {} frames to {} ({} recycles)",
        summary.frames,
        out.display(),
        summary.recycles
    );
    Ok(())
}

fn play(seconds: f64, fps: u32, viewport: Viewport, source: &SourceArgs) -> Result<()> {
    if !(seconds.is_finite() && seconds >= 0.0) {
        bail!("playback duration must be a non-negative number of seconds");
    }

    let resolved = source.resolve()?;
    let _ = resolved
        .validated
        .check_aspect_ratio(viewport.aspect_ratio())
        .context("viewport cannot be played")?;
    let style = &resolved.validated.style;
    let mut landscape = resolved.landscape();
    let backend = HeadlessBackend::new(fps, Duration::from_secs_f64(seconds))?;
    let planned = backend.frames();

    let mut events = Vec::new();
    landscape::apply(
        &mut landscape,
        Command::ResizeViewport {
            aspect_ratio: viewport.aspect_ratio(),
        },
        &mut events,
    );
    landscape::apply(&mut landscape, Command::Rebuild, &mut events);

    let initial = compose_scene(&landscape, style, viewport, RenderMode::Interactive);
    let title = format!("ridgeline: {}", resolved.label);
    let mut frame = 0_u64;
    let mut recycles = 0_u64;

    backend.run(Presentation::new(title, initial), |elapsed, scene: &mut Scene| {
        events.clear();
        landscape::apply(&mut landscape, Command::Tick, &mut events);
        frame += 1;

        for event in &events {
            if let Event::SilhouetteRecycled { inserted, removed } = event {
                recycles += 1;
                tracing::info!(
                    target: "ridgeline::playback",
                    frame,
                    inserted = inserted.get(),
                    removed = removed.get(),
                    "playback.recycled"
                );
            }
        }

        *scene = compose_scene(&landscape, style, viewport, RenderMode::Interactive);
        tracing::trace!(
            target: "ridgeline::playback",
            frame,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            progress = query::progress(&landscape),
            revision = query::revision(&landscape),
            "playback.frame"
        );
        Ok(())
    })?;

    println!(
        "played {frame} of {planned} frames ({recycles} recycles) from field seed {}",
        resolved.field_seed
    );
    Ok(())
}

fn share(action: ShareAction) -> Result<()> {
    match action {
        ShareAction::Encode { source } => {
            let resolved = source.resolve()?;
            let mut config = resolved.raw;
            config.seed = Some(resolved.field_seed);
            println!("{}", encode_share_code(&config)?);
        }
        ShareAction::Decode { code } => {
            let code = match code {
                Some(code) => code,
                None => {
                    let mut buffer = String::new();
                    let _ = std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("failed to read share code from standard input")?;
                    buffer
                }
            };
            let config = decode_share_code(&code)?;
            let _ = config
                .validate()
                .context("shared configuration is invalid")?;
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}
