#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Configuration bundle for ridgeline landscapes.
//!
//! A [`LandscapeConfig`] is loaded from a TOML file, a builtin preset or a
//! share code, and must pass [`LandscapeConfig::validate`] before its values
//! reach the landscape.

mod presets;
mod share;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use ridgeline_core::{
    AspectRatio, Branching, BranchingSchedule, Depth, FieldParameters, MountainCount, Rgba, Speed,
};
use ridgeline_landscape::widened_branching;
use ridgeline_system_palette::Palette;
use ridgeline_system_ridge_generation::projected_point_count;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use presets::{NamedPreset, Presets, BUILTIN_PRESETS};
pub use share::{decode_share_code, encode_share_code, ShareCodeError, SHARE_CODE_HEADER};

const LOG_TARGET: &str = "ridgeline::config";

/// Largest ridge, in points, a configuration may request.
///
/// Checked once before viewport widening by [`LandscapeConfig::validate`]
/// and again for a concrete viewport by [`ValidatedConfig::check_aspect_ratio`].
pub const MAX_RIDGE_POINTS: u64 = 16_384;

const DEFAULT_SPEED: f64 = 0.01;
const DEFAULT_ZOOM_EFFECT: f64 = 1.0;
const DEFAULT_ZOOM_EFFECT2: f64 = 1.5;
const DEFAULT_OFFSET_EFFECT: f64 = 3.0;
const DEFAULT_OFFSET_EFFECT2: f64 = 1.0;

/// Raw, unvalidated landscape configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LandscapeConfig {
    /// Number of silhouettes in the field.
    pub number_of_mountains: i64,
    /// Interior points inserted per subdivision step.
    pub max_points_per_depth: i64,
    /// Number of subdivision levels.
    pub depth: i64,
    /// How branching evolves at deeper levels.
    pub branching_schedule: BranchingSchedule,
    /// Progress added to the animation clock per frame.
    pub speed: f64,
    /// Exponent applied to nearness when scaling.
    pub zoom_effect: f64,
    /// Multiplier applied to the scale term.
    pub zoom_effect2: f64,
    /// Exponent applied to nearness when offsetting vertically.
    pub offset_effect: f64,
    /// Multiplier applied to the vertical offset.
    pub offset_effect2: f64,
    /// Gradient stops at 0, 0.5 and 1 for interactive backgrounds.
    pub background_colors: [Rgba; 3],
    /// Solid background used for exported frames.
    pub background_color_for_video: Rgba,
    /// Overlay color for interactive rendering and palette fallback.
    pub foreground_color: Rgba,
    /// Whether ridges are drawn with quadratic curves.
    pub rounded: bool,
    /// Identifier of an accompanying music track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_track: Option<String>,
    /// Base colors for silhouettes; empty falls back to the foreground color.
    pub mountain_palette: Vec<Rgba>,
    /// Field seed for reproducible runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            number_of_mountains: 10,
            max_points_per_depth: 3,
            depth: 2,
            branching_schedule: BranchingSchedule::Constant,
            speed: DEFAULT_SPEED,
            zoom_effect: DEFAULT_ZOOM_EFFECT,
            zoom_effect2: DEFAULT_ZOOM_EFFECT2,
            offset_effect: DEFAULT_OFFSET_EFFECT,
            offset_effect2: DEFAULT_OFFSET_EFFECT2,
            background_colors: [
                Rgba::from_rgba_u8(0x08, 0x9e, 0xff, 0xff),
                Rgba::from_rgba_u8(0xc2, 0xff, 0x3e, 0xff),
                Rgba::WHITE,
            ],
            background_color_for_video: Rgba::from_rgba_u8(0x1f, 0x80, 0xa6, 0xff),
            foreground_color: Rgba::BLACK,
            rounded: true,
            music_track: None,
            mountain_palette: Vec::new(),
            seed: None,
        }
    }
}

/// How out-of-range values are treated during validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Reject the configuration.
    #[default]
    Strict,
    /// Replace offending values with the nearest acceptable value.
    Clamp,
}

/// Presentation values consumed by renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleConfig {
    /// Exponent applied to nearness when scaling.
    pub zoom_effect: f64,
    /// Multiplier applied to the scale term.
    pub zoom_effect2: f64,
    /// Exponent applied to nearness when offsetting vertically.
    pub offset_effect: f64,
    /// Multiplier applied to the vertical offset.
    pub offset_effect2: f64,
    /// Gradient stops at 0, 0.5 and 1.
    pub background_colors: [Rgba; 3],
    /// Solid background for exported frames.
    pub background_color_for_video: Rgba,
    /// Overlay color for interactive rendering.
    pub foreground_color: Rgba,
    /// Whether ridges are drawn with quadratic curves.
    pub rounded: bool,
    /// Base colors for silhouettes, never empty.
    pub palette: Palette,
}

/// Configuration whose values are safe to hand to the landscape.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedConfig {
    /// Field shape.
    pub parameters: FieldParameters,
    /// Per-frame clock increment.
    pub speed: Speed,
    /// Presentation values.
    pub style: StyleConfig,
    /// Field seed, when one was configured.
    pub seed: Option<u64>,
    /// Identifier of an accompanying music track.
    pub music_track: Option<String>,
}

impl ValidatedConfig {
    /// Rejects viewports whose widened ridges would exceed [`MAX_RIDGE_POINTS`].
    ///
    /// Returns the projected number of points per ridge when it fits.
    pub fn check_aspect_ratio(&self, aspect_ratio: AspectRatio) -> Result<u64, ConfigError> {
        let branching = widened_branching(self.parameters.branching(), aspect_ratio);
        let points =
            projected_point_count(branching, self.parameters.depth(), self.parameters.schedule());
        if points > MAX_RIDGE_POINTS {
            return Err(ConfigError::ViewportTooWide {
                aspect_ratio: aspect_ratio.get(),
                points,
                limit: MAX_RIDGE_POINTS,
            });
        }
        Ok(points)
    }
}

impl LandscapeConfig {
    /// Parses a configuration from TOML text. Missing keys take their default values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(
            target: LOG_TARGET,
            path = %path.display(),
            "config.loaded=file"
        );
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration, rejecting any out-of-range value.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        self.validate_with(ValidationPolicy::Strict)
    }

    /// Validates the configuration under the provided policy.
    ///
    /// The ridge density limit applies under both policies; clamping lowers
    /// the depth until the projected ridge fits.
    pub fn validate_with(&self, policy: ValidationPolicy) -> Result<ValidatedConfig, ConfigError> {
        let count = bounded_u32("number_of_mountains", self.number_of_mountains, 1, policy)?;
        let branching = bounded_u32("max_points_per_depth", self.max_points_per_depth, 1, policy)?;
        let mut depth = bounded_u32("depth", self.depth, 0, policy)?;

        let branching = Branching::new(branching)?;
        let points = projected_point_count(branching, Depth::new(depth), self.branching_schedule);
        if points > MAX_RIDGE_POINTS {
            if policy == ValidationPolicy::Strict {
                return Err(ConfigError::RidgeTooDense {
                    points,
                    limit: MAX_RIDGE_POINTS,
                });
            }
            depth = deepest_fitting_depth(branching, depth, self.branching_schedule);
            tracing::warn!(target: LOG_TARGET, field = "depth", value = depth, "config.clamped");
        }

        let speed = match Speed::new(self.speed) {
            Ok(speed) => speed,
            Err(error) if policy == ValidationPolicy::Strict => return Err(error.into()),
            Err(_) => {
                let clamped = if self.speed.is_finite() { 0.0 } else { DEFAULT_SPEED };
                tracing::warn!(
                    target: LOG_TARGET,
                    field = "speed",
                    value = clamped,
                    "config.clamped"
                );
                Speed::new(clamped)?
            }
        };

        let style = StyleConfig {
            zoom_effect: finite(
                "zoom_effect",
                self.zoom_effect,
                DEFAULT_ZOOM_EFFECT,
                policy,
            )?,
            zoom_effect2: finite(
                "zoom_effect2",
                self.zoom_effect2,
                DEFAULT_ZOOM_EFFECT2,
                policy,
            )?,
            offset_effect: finite(
                "offset_effect",
                self.offset_effect,
                DEFAULT_OFFSET_EFFECT,
                policy,
            )?,
            offset_effect2: finite(
                "offset_effect2",
                self.offset_effect2,
                DEFAULT_OFFSET_EFFECT2,
                policy,
            )?,
            background_colors: self.background_colors,
            background_color_for_video: self.background_color_for_video,
            foreground_color: self.foreground_color,
            rounded: self.rounded,
            palette: Palette::with_fallback(self.mountain_palette.clone(), self.foreground_color),
        };

        Ok(ValidatedConfig {
            parameters: FieldParameters::new(
                MountainCount::new(count)?,
                branching,
                Depth::new(depth),
                self.branching_schedule,
            ),
            speed,
            style,
            seed: self.seed,
            music_track: self.music_track.clone(),
        })
    }
}

/// Deepest level, at most `depth`, whose ridges stay within [`MAX_RIDGE_POINTS`].
///
/// Point counts never shrink as depth grows, so a bisection finds it. Depth
/// zero always fits with its two endpoints.
fn deepest_fitting_depth(branching: Branching, depth: u32, schedule: BranchingSchedule) -> u32 {
    let fits = |depth| {
        projected_point_count(branching, Depth::new(depth), schedule) <= MAX_RIDGE_POINTS
    };
    let (mut low, mut high) = (0, depth);
    while low < high {
        let middle = low + (high - low).div_ceil(2);
        if fits(middle) {
            low = middle;
        } else {
            high = middle - 1;
        }
    }
    low
}

fn bounded_u32(
    field: &'static str,
    value: i64,
    minimum: u32,
    policy: ValidationPolicy,
) -> Result<u32, ConfigError> {
    if value < i64::from(minimum) {
        if policy == ValidationPolicy::Strict {
            return Err(ConfigError::BelowMinimum {
                field,
                value,
                minimum,
            });
        }
        tracing::warn!(target: LOG_TARGET, field, value = minimum, "config.clamped");
        return Ok(minimum);
    }

    match u32::try_from(value) {
        Ok(value) => Ok(value),
        Err(_) if policy == ValidationPolicy::Strict => Err(ConfigError::AboveMaximum {
            field,
            value,
            maximum: u32::MAX,
        }),
        Err(_) => {
            tracing::warn!(target: LOG_TARGET, field, value = u32::MAX, "config.clamped");
            Ok(u32::MAX)
        }
    }
}

fn finite(
    field: &'static str,
    value: f64,
    fallback: f64,
    policy: ValidationPolicy,
) -> Result<f64, ConfigError> {
    if value.is_finite() {
        return Ok(value);
    }
    if policy == ValidationPolicy::Strict {
        return Err(ConfigError::NonFinite { field, value });
    }
    tracing::warn!(target: LOG_TARGET, field, value = fallback, "config.clamped");
    Ok(fallback)
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file could not be read.
    #[error("failed to read configuration from {path:?}: {source}")]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// TOML text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// Configuration could not be rendered as TOML.
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
    /// Builtin presets could not be parsed.
    #[error("failed to parse presets: {0}")]
    Presets(#[from] serde_json::Error),
    /// A named preset does not exist.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    /// An integer field was below its documented minimum.
    #[error("{field} must be at least {minimum} (received {value})")]
    BelowMinimum {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: i64,
        /// Smallest accepted value.
        minimum: u32,
    },
    /// An integer field did not fit the supported range.
    #[error("{field} must be at most {maximum} (received {value})")]
    AboveMaximum {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: i64,
        /// Largest accepted value.
        maximum: u32,
    },
    /// A floating-point field was NaN or infinite.
    #[error("{field} must be finite (received {value})")]
    NonFinite {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Ridges would contain more points than allowed.
    #[error("ridges would contain {points} points, above the limit of {limit}")]
    RidgeTooDense {
        /// Projected number of points per ridge.
        points: u64,
        /// Configured limit.
        limit: u64,
    },
    /// Widening ridges for a viewport would exceed the point limit.
    #[error(
        "aspect ratio {aspect_ratio} widens ridges to {points} points, above the limit of {limit}"
    )]
    ViewportTooWide {
        /// Width over height of the rejected viewport.
        aspect_ratio: f64,
        /// Projected number of points per widened ridge.
        points: u64,
        /// Configured limit.
        limit: u64,
    },
    /// A value was rejected by the core parameter types.
    #[error(transparent)]
    Parameter(#[from] ridgeline_core::ParameterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let validated = LandscapeConfig::default().validate().expect("defaults are valid");

        assert_eq!(validated.parameters.count().get(), 10);
        assert_eq!(validated.parameters.branching().get(), 3);
        assert_eq!(validated.parameters.depth().get(), 2);
        assert_eq!(validated.speed.get(), 0.01);
        assert_eq!(validated.style.zoom_effect, 1.0);
        assert_eq!(validated.style.zoom_effect2, 1.5);
        assert_eq!(validated.style.offset_effect, 3.0);
        assert_eq!(validated.style.offset_effect2, 1.0);
        assert_eq!(validated.style.palette.colors(), &[Rgba::BLACK]);
    }

    #[test]
    fn strict_policy_rejects_values_below_minimum() {
        let config = LandscapeConfig {
            number_of_mountains: 0,
            ..LandscapeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BelowMinimum {
                field: "number_of_mountains",
                value: 0,
                minimum: 1,
            })
        ));

        let config = LandscapeConfig {
            depth: -1,
            ..LandscapeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BelowMinimum { field: "depth", .. })
        ));
    }

    #[test]
    fn clamp_policy_raises_values_to_minimum() {
        let config = LandscapeConfig {
            number_of_mountains: -4,
            max_points_per_depth: 0,
            depth: -2,
            speed: -0.5,
            zoom_effect: f64::NAN,
            ..LandscapeConfig::default()
        };
        let validated = config
            .validate_with(ValidationPolicy::Clamp)
            .expect("clamping succeeds");

        assert_eq!(validated.parameters.count().get(), 1);
        assert_eq!(validated.parameters.branching().get(), 1);
        assert_eq!(validated.parameters.depth().get(), 0);
        assert_eq!(validated.speed.get(), 0.0);
        assert_eq!(validated.style.zoom_effect, 1.0);
    }

    #[test]
    fn dense_ridges_are_rejected_or_shallowed() {
        let config = LandscapeConfig {
            max_points_per_depth: 9,
            depth: 5,
            ..LandscapeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RidgeTooDense {
                points: 100_001,
                limit: MAX_RIDGE_POINTS,
            })
        ));

        let clamped = config
            .validate_with(ValidationPolicy::Clamp)
            .expect("clamping succeeds");
        assert_eq!(clamped.parameters.depth().get(), 4);
    }

    #[test]
    fn huge_depths_clamp_to_the_deepest_fitting_level() {
        let config = LandscapeConfig {
            max_points_per_depth: 1,
            depth: i64::MAX,
            ..LandscapeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AboveMaximum { field: "depth", .. })
        ));

        let clamped = config
            .validate_with(ValidationPolicy::Clamp)
            .expect("clamping succeeds");
        // 2^13 + 1 points fit, 2^14 + 1 do not.
        assert_eq!(clamped.parameters.depth().get(), 13);

        let tapered = LandscapeConfig {
            max_points_per_depth: i64::from(u32::MAX),
            depth: i64::from(u32::MAX),
            branching_schedule: BranchingSchedule::Tapered,
            ..LandscapeConfig::default()
        }
        .validate_with(ValidationPolicy::Clamp)
        .expect("clamping succeeds");
        assert_eq!(tapered.parameters.depth().get(), 0);
    }

    #[test]
    fn wide_viewports_are_checked_against_the_point_limit() {
        let validated = LandscapeConfig::default().validate().expect("defaults are valid");

        // Branching 3 widens to 5 at 16:9.
        assert_eq!(
            validated
                .check_aspect_ratio(AspectRatio::from_size(1920.0, 1080.0))
                .expect("fits"),
            37
        );
        assert!(matches!(
            validated.check_aspect_ratio(AspectRatio::from_size(4000.0, 1.0)),
            Err(ConfigError::ViewportTooWide {
                points: 144_024_002,
                limit: MAX_RIDGE_POINTS,
                ..
            })
        ));
    }

    #[test]
    fn strict_policy_rejects_non_finite_speed() {
        let config = LandscapeConfig {
            speed: f64::INFINITY,
            ..LandscapeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Parameter(_))));
    }
}
