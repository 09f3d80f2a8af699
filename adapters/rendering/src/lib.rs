#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for ridgeline adapters.
//!
//! Adapters never read landscape internals directly. They receive a
//! declarative [`Scene`] composed from the ordered `(silhouette, nearness)`
//! pairs and draw it however their medium allows.

mod outline;
mod svg;

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use ridgeline_config::StyleConfig;
use ridgeline_core::{AspectRatio, Rect, Rgba, SilhouetteId};
use ridgeline_landscape::{query, Landscape};
use thiserror::Error;

pub use outline::{outline_path, OutlinePath, PathSegment};
pub use svg::render_svg;

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a viewport, rejecting empty or non-finite sizes.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(RenderingError::InvalidViewport { width, height })
        }
    }

    /// Horizontal extent in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Aspect ratio hint handed to the landscape.
    #[must_use]
    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::from_size(f64::from(self.width), f64::from(self.height))
    }

    /// Rectangle covering the whole viewport.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_size(f64::from(self.width), f64::from(self.height))
    }
}

/// Surface a scene is composed for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Live playback with a gradient sky and foreground haze.
    #[default]
    Interactive,
    /// Frame export with a solid sky and palette-tinted silhouettes.
    Export,
}

/// Color stop of a vertical gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position from the top (0) to the bottom (1).
    pub offset: f32,
    /// Color at the stop.
    pub color: Rgba,
}

/// Fill painted behind the mountains and through each silhouette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Background {
    /// Top-to-bottom gradient.
    Gradient([GradientStop; 3]),
    /// Single color.
    Solid(Rgba),
}

impl Background {
    /// Selects the background for `mode`.
    #[must_use]
    pub fn for_mode(style: &StyleConfig, mode: RenderMode) -> Self {
        match mode {
            RenderMode::Interactive => {
                let [top, middle, bottom] = style.background_colors;
                Self::Gradient([
                    GradientStop {
                        offset: 0.0,
                        color: top,
                    },
                    GradientStop {
                        offset: 0.5,
                        color: middle,
                    },
                    GradientStop {
                        offset: 1.0,
                        color: bottom,
                    },
                ])
            }
            RenderMode::Export => Self::Solid(style.background_color_for_video),
        }
    }
}

/// Scale and vertical offset applied to a silhouette according to its nearness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxTransform {
    /// Uniform scale factor.
    pub scale: f32,
    /// Point that stays fixed while scaling: the top-center of the viewport.
    pub anchor: Vec2,
    /// Downward translation applied after scaling.
    pub offset_y: f32,
}

impl ParallaxTransform {
    /// Computes the transform for a silhouette at `nearness`.
    ///
    /// Scale is `1 + nearness^zoom_effect * zoom_effect2` and the offset is
    /// `height * nearness^offset_effect * offset_effect2`.
    #[must_use]
    pub fn new(nearness: f64, style: &StyleConfig, viewport: Viewport) -> Self {
        let scale = 1.0 + nearness.powf(style.zoom_effect) * style.zoom_effect2;
        let offset_y = f64::from(viewport.height)
            * nearness.powf(style.offset_effect)
            * style.offset_effect2;

        Self {
            scale: scale as f32,
            anchor: Vec2::new(viewport.width * 0.5, 0.0),
            offset_y: offset_y as f32,
        }
    }

    /// Maps a viewport point through the transform.
    #[must_use]
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.anchor + (point - self.anchor) * self.scale + Vec2::new(0.0, self.offset_y)
    }

    /// Translation of the equivalent `scale * p + translation` affine map.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.anchor * (1.0 - self.scale) + Vec2::new(0.0, self.offset_y)
    }
}

/// Silhouette ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneMountain {
    /// Identity of the silhouette, stable across frames.
    pub id: SilhouetteId,
    /// Nearness in `[0, 1)`.
    pub nearness: f32,
    /// Outline in untransformed viewport coordinates.
    pub outline: OutlinePath,
    /// Parallax transform applied to the outline.
    pub transform: ParallaxTransform,
    /// Color painted over the background inside the outline.
    pub tint: Rgba,
}

/// Scene description consumed by rendering backends and frame sinks.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Drawing surface.
    pub viewport: Viewport,
    /// Sky fill, also painted through every silhouette.
    pub background: Background,
    /// Silhouettes from farthest to nearest, in painting order.
    pub mountains: Vec<SceneMountain>,
    /// Clock progress the scene was sampled at.
    pub progress: f32,
}

impl Scene {
    /// Creates a scene with no mountains.
    #[must_use]
    pub fn empty(viewport: Viewport, background: Background) -> Self {
        Self {
            viewport,
            background,
            mountains: Vec::new(),
            progress: 0.0,
        }
    }
}

/// Composes the scene for the landscape's current frame.
#[must_use]
pub fn compose_scene(
    landscape: &Landscape,
    style: &StyleConfig,
    viewport: Viewport,
    mode: RenderMode,
) -> Scene {
    let rect = viewport.rect();
    let mountains = query::render_pairs(landscape)
        .into_iter()
        .map(|pair| {
            let silhouette = pair.silhouette();
            let nearness = pair.nearness();
            let ridge: Vec<Vec2> = silhouette
                .ridge_points_in(rect)
                .map(|point| Vec2::new(point.x as f32, point.y as f32))
                .collect();

            SceneMountain {
                id: silhouette.id(),
                nearness: nearness as f32,
                outline: outline_path(&ridge, rect, style.rounded),
                transform: ParallaxTransform::new(nearness, style, viewport),
                tint: tint_for(mode, style, silhouette.color(), nearness),
            }
        })
        .collect();

    Scene {
        viewport,
        background: Background::for_mode(style, mode),
        mountains,
        progress: query::progress(landscape) as f32,
    }
}

/// Color painted over a silhouette at `nearness`.
///
/// Interactive scenes fade in the foreground color with `nearness²`; exported
/// scenes fade in the silhouette's own color with `nearness`.
#[must_use]
pub fn tint_for(mode: RenderMode, style: &StyleConfig, color: Rgba, nearness: f64) -> Rgba {
    match mode {
        RenderMode::Interactive => style
            .foreground_color
            .with_alpha((nearness * nearness) as f32),
        RenderMode::Export => color.with_alpha(nearness as f32),
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend, where it has one.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Backend that presents scenes in real time.
pub trait RenderingBackend {
    /// Runs the backend until it is requested to exit.
    ///
    /// `update_scene` is invoked once per displayed frame with the elapsed
    /// frame time and must leave the scene ready for presentation.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> AnyResult<()>;
}

/// Destination for frames produced by a deterministic export driver.
pub trait FrameSink {
    /// Writes the frame with the provided zero-based index.
    fn write_frame(&mut self, index: u64, scene: &Scene) -> AnyResult<()>;

    /// Flushes any pending output once the last frame was written.
    fn finish(&mut self) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Viewports must have a positive, finite size.
    #[error("viewport must be positive and finite (received {width}x{height})")]
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}
