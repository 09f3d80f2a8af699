#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ridgeline landscape engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative landscape, and pure systems. Adapters submit [`Command`]
//! values once per frame or whenever configuration changes, the landscape
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values so renderers know when progress moved or the field of
//! silhouettes was rebuilt or recycled.

mod color;
mod random;

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use color::{ColorParseError, Rgba};
pub use random::SeededRandomStream;

/// Commands that express all permissible landscape mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the field parameters, rebuilding the field when any of them changed.
    Configure {
        /// Parameters the field should be generated with.
        parameters: FieldParameters,
    },
    /// Updates the per-tick progress increment of the animation clock.
    SetSpeed {
        /// Progress added on every tick.
        speed: Speed,
    },
    /// Records the viewport shape used to widen future ridges.
    ResizeViewport {
        /// Width divided by height of the viewport.
        aspect_ratio: AspectRatio,
    },
    /// Discards every silhouette and generates a fresh field.
    Rebuild,
    /// Advances the animation clock by exactly one frame.
    Tick,
}

/// Events broadcast by the landscape after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Reports the clock progress after a tick.
    ProgressAdvanced {
        /// Normalised progress in `[0, 1)`.
        progress: f64,
    },
    /// Announces that the clock reached the end of a cycle and restarted at zero.
    ClockWrapped,
    /// Confirms that the field was regenerated from scratch.
    FieldRebuilt {
        /// Number of silhouettes in the regenerated field.
        count: MountainCount,
    },
    /// Confirms that the farthest slot received a new silhouette and the nearest was dropped.
    SilhouetteRecycled {
        /// Identifier of the silhouette inserted at the far end.
        inserted: SilhouetteId,
        /// Identifier of the silhouette removed from the near end.
        removed: SilhouetteId,
    },
    /// Confirms that the clock speed changed.
    SpeedChanged {
        /// Speed applied to subsequent ticks.
        speed: Speed,
    },
    /// Confirms that the viewport aspect ratio hint changed.
    ViewportResized {
        /// Aspect ratio applied to subsequent generations.
        aspect_ratio: AspectRatio,
    },
}

/// Opaque identifier assigned to a silhouette for structural identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SilhouetteId(u64);

impl SilhouetteId {
    /// Creates a new silhouette identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Two-dimensional point used for both unit-space ridges and pixel-space projections.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle expressed in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Creates a rectangle anchored at the origin.
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.min_y + self.height
    }

    /// Maps a unit-space point into the rectangle with a pure affine transform.
    #[must_use]
    pub fn map_unit(&self, point: Point) -> Point {
        Point::new(
            self.min_x + point.x * self.width,
            self.min_y + point.y * self.height,
        )
    }
}

/// Number of silhouettes kept in the field. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountainCount(NonZeroU32);

impl MountainCount {
    /// Smallest permitted silhouette count.
    pub const MIN: Self = Self(NonZeroU32::MIN);

    /// Creates a count, rejecting zero.
    pub fn new(value: u32) -> Result<Self, ParameterError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(ParameterError::ZeroMountainCount)
    }

    /// Retrieves the count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

/// Number of interior points inserted per subdivision step. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Branching(NonZeroU32);

impl Branching {
    /// Smallest permitted branching factor.
    pub const MIN: Self = Self(NonZeroU32::MIN);

    /// Creates a branching factor, rejecting zero.
    pub fn new(value: u32) -> Result<Self, ParameterError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(ParameterError::ZeroBranching)
    }

    /// Creates a branching factor, raising zero to the minimum.
    #[must_use]
    pub fn saturating(value: u32) -> Self {
        NonZeroU32::new(value).map_or(Self::MIN, Self)
    }

    /// Retrieves the branching factor.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

/// Number of recursive subdivision levels applied to a ridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Depth(u32);

impl Depth {
    /// Creates a depth value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the depth.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Governs how the branching factor evolves while descending subdivision levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchingSchedule {
    /// Every level inserts the same number of interior points.
    #[default]
    Constant,
    /// Every deeper level inserts one point fewer than its parent, never below one.
    Tapered,
}

impl BranchingSchedule {
    /// Branching factor applied one level below a level using `current`.
    #[must_use]
    pub fn next_level(self, current: Branching) -> Branching {
        match self {
            Self::Constant => current,
            Self::Tapered => Branching::saturating(current.get().saturating_sub(1)),
        }
    }
}

/// Progress added to the animation clock on every tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Speed(f64);

impl Speed {
    /// Creates a speed, rejecting negative and non-finite values.
    pub fn new(value: f64) -> Result<Self, ParameterError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(ParameterError::InvalidSpeed { speed: value })
        }
    }

    /// Retrieves the per-tick increment.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }
}

/// Viewport width divided by its height, used to keep ridge density proportional to width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio(f64);

impl AspectRatio {
    /// Square viewport.
    pub const SQUARE: Self = Self(1.0);

    /// Derives the ratio from pixel dimensions, guarding against zero heights.
    #[must_use]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::from_ratio(width / height.max(1.0))
    }

    /// Wraps a raw ratio; non-finite or non-positive values fall back to [`AspectRatio::SQUARE`].
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            Self(ratio)
        } else {
            Self::SQUARE
        }
    }

    /// Retrieves the ratio.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }
}

/// Parameters that determine the shape of every generated silhouette in the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldParameters {
    count: MountainCount,
    branching: Branching,
    depth: Depth,
    schedule: BranchingSchedule,
}

impl FieldParameters {
    /// Creates a new parameter set.
    #[must_use]
    pub const fn new(
        count: MountainCount,
        branching: Branching,
        depth: Depth,
        schedule: BranchingSchedule,
    ) -> Self {
        Self {
            count,
            branching,
            depth,
            schedule,
        }
    }

    /// Number of silhouettes in the field.
    #[must_use]
    pub const fn count(&self) -> MountainCount {
        self.count
    }

    /// Base branching factor before viewport widening.
    #[must_use]
    pub const fn branching(&self) -> Branching {
        self.branching
    }

    /// Recursion depth of every ridge.
    #[must_use]
    pub const fn depth(&self) -> Depth {
        self.depth
    }

    /// Schedule governing branching at deeper levels.
    #[must_use]
    pub const fn schedule(&self) -> BranchingSchedule {
        self.schedule
    }
}

/// Reasons a raw value cannot become a core parameter.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ParameterError {
    /// The field must contain at least one silhouette.
    #[error("number of mountains must be at least 1")]
    ZeroMountainCount,
    /// Subdivision must insert at least one point per step.
    #[error("max points per depth must be at least 1")]
    ZeroBranching,
    /// Speeds must be finite and non-negative.
    #[error("speed must be finite and non-negative (received {speed})")]
    InvalidSpeed {
        /// Rejected speed.
        speed: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        AspectRatio, Branching, BranchingSchedule, Depth, FieldParameters, MountainCount,
        ParameterError, Point, Rect, SilhouetteId, Speed,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn field_parameters_round_trip_through_bincode() {
        let parameters = FieldParameters::new(
            MountainCount::new(7).expect("non-zero"),
            Branching::new(3).expect("non-zero"),
            Depth::new(4),
            BranchingSchedule::Tapered,
        );
        assert_round_trip(&parameters);
    }

    #[test]
    fn silhouette_id_round_trips_through_bincode() {
        assert_round_trip(&SilhouetteId::new(42));
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert_eq!(
            MountainCount::new(0),
            Err(ParameterError::ZeroMountainCount)
        );
        assert_eq!(Branching::new(0), Err(ParameterError::ZeroBranching));
        assert_eq!(Branching::saturating(0), Branching::MIN);
    }

    #[test]
    fn speed_rejects_negative_and_non_finite_values() {
        assert!(Speed::new(0.01).is_ok());
        assert!(Speed::new(0.0).is_ok());
        assert!(Speed::new(-0.1).is_err());
        assert!(Speed::new(f64::INFINITY).is_err());
    }

    #[test]
    fn tapered_schedule_never_drops_below_one() {
        let three = Branching::new(3).expect("non-zero");
        assert_eq!(BranchingSchedule::Constant.next_level(three), three);
        assert_eq!(BranchingSchedule::Tapered.next_level(three).get(), 2);
        assert_eq!(
            BranchingSchedule::Tapered.next_level(Branching::MIN),
            Branching::MIN
        );
    }

    #[test]
    fn rect_maps_unit_points_affinely() {
        let rect = Rect::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(rect.map_unit(Point::new(0.0, 0.0)), Point::new(10.0, 20.0));
        assert_eq!(rect.map_unit(Point::new(1.0, 1.0)), Point::new(210.0, 120.0));
        assert_eq!(rect.map_unit(Point::new(0.5, 0.25)), Point::new(110.0, 45.0));
    }

    #[test]
    fn aspect_ratio_guards_degenerate_viewports() {
        assert_eq!(AspectRatio::from_size(1920.0, 1080.0).get(), 1920.0 / 1080.0);
        assert_eq!(AspectRatio::from_size(300.0, 0.0).get(), 300.0);
        assert_eq!(AspectRatio::from_ratio(f64::NAN), AspectRatio::SQUARE);
        assert_eq!(AspectRatio::from_ratio(-2.0), AspectRatio::SQUARE);
    }
}
