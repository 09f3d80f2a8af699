#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic midpoint-displacement system that generates mountain ridges.
//!
//! A ridge is an ordered sequence of unit-space points running from `x = 0` to
//! `x = 1`. Two endpoint heights are drawn first; each segment is then split
//! into `branching + 1` evenly spaced pieces whose interior heights are drawn
//! between the segment's endpoint heights, and every piece is subdivided again
//! until the requested depth is exhausted.
//!
//! The recursion is expressed with an explicit work stack over a flat output
//! buffer. Segments are processed depth-first and left-to-right, so the random
//! stream is consumed in the same fixed order as a naive recursive
//! implementation and every leaf segment contributes exactly its end point.

use ridgeline_core::{Branching, BranchingSchedule, Depth, Point, SeededRandomStream};

/// Upper bound on the up-front reservation for a single ridge.
const RESERVE_LIMIT: u64 = 1 << 16;

/// Inputs that fully determine a generated ridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RidgeRequest {
    branching: Branching,
    depth: Depth,
    schedule: BranchingSchedule,
    seed: u64,
}

impl RidgeRequest {
    /// Creates a request for a ridge with the provided shape parameters.
    #[must_use]
    pub const fn new(
        branching: Branching,
        depth: Depth,
        schedule: BranchingSchedule,
        seed: u64,
    ) -> Self {
        Self {
            branching,
            depth,
            schedule,
            seed,
        }
    }

    /// Interior points inserted at the top subdivision level.
    #[must_use]
    pub const fn branching(&self) -> Branching {
        self.branching
    }

    /// Number of subdivision levels.
    #[must_use]
    pub const fn depth(&self) -> Depth {
        self.depth
    }

    /// Schedule applied when descending levels.
    #[must_use]
    pub const fn schedule(&self) -> BranchingSchedule {
        self.schedule
    }

    /// Seed of the random stream driving the ridge heights.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    start: Point,
    end: Point,
    branching: Branching,
    remaining_depth: u32,
}

/// Pure system that turns [`RidgeRequest`] values into ridge point sequences.
///
/// The generator keeps its scratch buffers between calls so repeated
/// generation does not reallocate.
#[derive(Debug, Default)]
pub struct RidgeGenerator {
    pending: Vec<Segment>,
    chain: Vec<Point>,
}

impl RidgeGenerator {
    /// Creates a generator with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the ridge described by `request` into `out`, replacing its contents.
    ///
    /// The output always starts at `x = 0`, ends at `x = 1` and is strictly
    /// increasing in `x`. Output size grows roughly as `(branching + 1)^depth`;
    /// callers are responsible for bounding the request.
    pub fn generate(&mut self, request: RidgeRequest, out: &mut Vec<Point>) {
        out.clear();
        self.pending.clear();

        let expected =
            projected_point_count(request.branching, request.depth, request.schedule);
        out.reserve(usize::try_from(expected.min(RESERVE_LIMIT)).unwrap_or(0));

        let mut stream = SeededRandomStream::new(request.seed);
        let start = Point::new(0.0, stream.next_unit());
        let end = Point::new(1.0, stream.next_unit());

        out.push(start);
        self.pending.push(Segment {
            start,
            end,
            branching: request.branching,
            remaining_depth: request.depth.get(),
        });

        while let Some(segment) = self.pending.pop() {
            if segment.remaining_depth == 0 {
                out.push(segment.end);
                continue;
            }

            self.subdivide(segment, &mut stream);
            let child_branching = request.schedule.next_level(segment.branching);
            let child_depth = segment.remaining_depth - 1;

            // Reversed so the leftmost child is popped first.
            self.pending
                .extend(self.chain.windows(2).rev().map(|pair| Segment {
                    start: pair[0],
                    end: pair[1],
                    branching: child_branching,
                    remaining_depth: child_depth,
                }));
        }
    }

    /// Fills the chain buffer with `[start, mid_1, .., mid_k, end]` for the segment.
    fn subdivide(&mut self, segment: Segment, stream: &mut SeededRandomStream) {
        let Segment { start, end, .. } = segment;
        let count = segment.branching.get();
        let min_y = start.y.min(end.y);
        let max_y = start.y.max(end.y);
        let step = (end.x - start.x) / (f64::from(count) + 1.0);

        self.chain.clear();
        self.chain.push(start);
        for index in 1..=count {
            let x = start.x + f64::from(index) * step;
            let y = stream.next_in_range(min_y, max_y);
            self.chain.push(Point::new(x, y));
        }
        self.chain.push(end);
    }
}

/// Convenience wrapper that generates a ridge with a throwaway generator.
#[must_use]
pub fn generate_ridge(request: RidgeRequest) -> Vec<Point> {
    let mut points = Vec::new();
    RidgeGenerator::new().generate(request, &mut points);
    points
}

/// Computes how many points [`RidgeGenerator::generate`] produces for the given shape.
///
/// Saturates at `u64::MAX` for shapes too large to represent.
#[must_use]
pub fn projected_point_count(
    branching: Branching,
    depth: Depth,
    schedule: BranchingSchedule,
) -> u64 {
    let mut leaves: u64 = 1;
    let mut level_branching = branching;

    for level in 0..depth.get() {
        if schedule.next_level(level_branching) == level_branching {
            // Branching is now fixed, so the remaining levels collapse into a power.
            let remaining = depth.get() - level;
            let factor = u64::from(level_branching.get()) + 1;
            leaves = factor
                .checked_pow(remaining)
                .and_then(|tail| leaves.checked_mul(tail))
                .unwrap_or(u64::MAX);
            break;
        }

        leaves = leaves.saturating_mul(u64::from(level_branching.get()) + 1);
        if leaves == u64::MAX {
            break;
        }
        level_branching = schedule.next_level(level_branching);
    }

    leaves.saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branching(value: u32) -> Branching {
        Branching::new(value).expect("non-zero branching")
    }

    #[test]
    fn projected_count_matches_closed_form_for_constant_schedule() {
        for k in 1..=4 {
            for d in 0..=4 {
                let expected = (u64::from(k) + 1).pow(d) + 1;
                assert_eq!(
                    projected_point_count(branching(k), Depth::new(d), BranchingSchedule::Constant),
                    expected,
                    "k={k} d={d}"
                );
            }
        }
    }

    #[test]
    fn projected_count_tapers_branching_per_level() {
        // 3 top-level segments, each split in two below.
        assert_eq!(
            projected_point_count(branching(2), Depth::new(2), BranchingSchedule::Tapered),
            7
        );
        // 4 * 3 * 2 * 2 leaves.
        assert_eq!(
            projected_point_count(branching(3), Depth::new(4), BranchingSchedule::Tapered),
            49
        );
    }

    #[test]
    fn projected_count_saturates() {
        assert_eq!(
            projected_point_count(branching(1_000), Depth::new(40), BranchingSchedule::Constant),
            u64::MAX
        );
    }
}
