use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ridgeline_config::StyleConfig;
use ridgeline_core::{Command, Event};
use ridgeline_landscape::{self as landscape, Landscape};
use ridgeline_rendering::{compose_scene, render_svg, FrameSink, RenderMode, Scene, Viewport};
use serde::Serialize;

const LOG_TARGET: &str = "ridgeline::export";

/// Frame-by-frame export parameters.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExportSettings {
    pub(crate) frames: u64,
    pub(crate) viewport: Viewport,
    pub(crate) mode: RenderMode,
}

/// Totals reported once an export completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ExportSummary {
    pub(crate) frames: u64,
    pub(crate) wraps: u64,
    pub(crate) recycles: u64,
}

/// Drives the landscape deterministically and hands every frame to `sink`.
///
/// Each frame applies exactly one tick, including any recycling it triggers,
/// before the scene is sampled.
pub(crate) fn run_export<S>(
    landscape: &mut Landscape,
    style: &StyleConfig,
    settings: ExportSettings,
    sink: &mut S,
) -> Result<ExportSummary>
where
    S: FrameSink + ?Sized,
{
    let mut events = Vec::new();
    landscape::apply(
        landscape,
        Command::ResizeViewport {
            aspect_ratio: settings.viewport.aspect_ratio(),
        },
        &mut events,
    );
    landscape::apply(landscape, Command::Rebuild, &mut events);

    let mut summary = ExportSummary::default();
    let progress_step = (settings.frames / 100).max(1);

    for index in 0..settings.frames {
        events.clear();
        landscape::apply(landscape, Command::Tick, &mut events);
        for event in &events {
            match event {
                Event::ClockWrapped => summary.wraps += 1,
                Event::SilhouetteRecycled { .. } => summary.recycles += 1,
                _ => {}
            }
        }

        let scene = compose_scene(landscape, style, settings.viewport, settings.mode);
        sink.write_frame(index, &scene)
            .with_context(|| format!("failed to write frame {index}"))?;
        summary.frames += 1;

        let written = index + 1;
        if index == 0 || written == settings.frames || written % progress_step == 0 {
            tracing::info!(
                target: LOG_TARGET,
                frame = written,
                total = settings.frames,
                percent = written * 100 / settings.frames,
                "export.progress"
            );
        }
    }

    sink.finish().context("failed to finish export")?;
    tracing::info!(
        target: LOG_TARGET,
        frames = summary.frames,
        wraps = summary.wraps,
        recycles = summary.recycles,
        "export.completed"
    );
    Ok(summary)
}

/// Metadata written next to the exported frames.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ExportManifest {
    pub(crate) source: String,
    pub(crate) field_seed: u64,
    pub(crate) fps: u32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) frame_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) music_track: Option<String>,
}

/// Writes frames as numbered SVG documents plus a `manifest.json`.
#[derive(Debug)]
pub(crate) struct SvgFrameSink {
    directory: PathBuf,
    manifest: ExportManifest,
}

impl SvgFrameSink {
    /// Creates the output directory if needed.
    pub(crate) fn create(directory: &Path, manifest: ExportManifest) -> Result<Self> {
        fs::create_dir_all(directory)
            .with_context(|| format!("failed to create {}", directory.display()))?;
        Ok(Self {
            directory: directory.to_path_buf(),
            manifest,
        })
    }

    pub(crate) fn frame_path(&self, index: u64) -> PathBuf {
        self.directory.join(format!("frame_{index:06}.svg"))
    }
}

impl FrameSink for SvgFrameSink {
    fn write_frame(&mut self, index: u64, scene: &Scene) -> Result<()> {
        let path = self.frame_path(index);
        fs::write(&path, render_svg(scene))
            .with_context(|| format!("failed to write {}", path.display()))
    }

    fn finish(&mut self) -> Result<()> {
        let path = self.directory.join("manifest.json");
        let json = serde_json::to_vec_pretty(&self.manifest)
            .context("failed to serialise export manifest")?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}
