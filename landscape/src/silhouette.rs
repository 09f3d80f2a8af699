use ridgeline_core::{Branching, BranchingSchedule, Depth, Point, Rect, Rgba, SilhouetteId};

/// One generated mountain: an immutable ridge plus its display color.
///
/// Silhouettes are never regenerated in place. Parameter changes produce
/// fresh instances with new identifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct MountainSilhouette {
    id: SilhouetteId,
    branching: Branching,
    depth: Depth,
    schedule: BranchingSchedule,
    seed: u64,
    color: Rgba,
    ridge: Vec<Point>,
}

impl MountainSilhouette {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: SilhouetteId,
        branching: Branching,
        depth: Depth,
        schedule: BranchingSchedule,
        seed: u64,
        color: Rgba,
        ridge: Vec<Point>,
    ) -> Self {
        debug_assert!(ridge.len() >= 2, "ridges contain both endpoints");
        Self {
            id,
            branching,
            depth,
            schedule,
            seed,
            color,
            ridge,
        }
    }

    /// Identifier used for structural identity within the field.
    #[must_use]
    pub const fn id(&self) -> SilhouetteId {
        self.id
    }

    /// Branching factor the ridge was generated with, after viewport widening.
    #[must_use]
    pub const fn branching(&self) -> Branching {
        self.branching
    }

    /// Subdivision depth the ridge was generated with.
    #[must_use]
    pub const fn depth(&self) -> Depth {
        self.depth
    }

    /// Branching schedule the ridge was generated with.
    #[must_use]
    pub const fn schedule(&self) -> BranchingSchedule {
        self.schedule
    }

    /// Seed that drove both ridge generation and color assignment.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Display color assigned by the palette system.
    #[must_use]
    pub const fn color(&self) -> Rgba {
        self.color
    }

    /// Ridge points in unit-square coordinates.
    #[must_use]
    pub fn ridge_unit_points(&self) -> &[Point] {
        &self.ridge
    }

    /// Projects the ridge into `rect`.
    pub fn ridge_points_in(&self, rect: Rect) -> impl Iterator<Item = Point> + '_ {
        self.ridge.iter().map(move |point| rect.map_unit(*point))
    }
}
