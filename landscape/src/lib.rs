#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative landscape state: the animation clock, the ordered mountain
//! field and the recycling policy that ties them together.
//!
//! All mutation flows through [`apply`]; adapters observe the landscape via
//! the emitted [`Event`] values, the [`query`] module and the revision counter.

mod clock;
mod field;
mod seeds;
mod silhouette;

use ridgeline_core::{AspectRatio, Command, Event, FieldParameters, Speed};
use ridgeline_system_palette::{Palette, PaletteAssigner};

use crate::field::SilhouetteFactory;

pub use clock::{AnimationClock, ClockTick};
pub use field::{nearness, widened_branching, MountainField, Recycled};
pub use seeds::{derive_silhouette_seed, SeedSequence};
pub use silhouette::MountainSilhouette;

const LOG_TARGET: &str = "ridgeline::landscape";

/// Everything required to construct a [`Landscape`].
#[derive(Clone, Debug)]
pub struct LandscapeSettings {
    /// Shape of the field and of every generated ridge.
    pub parameters: FieldParameters,
    /// Progress added to the clock on every tick.
    pub speed: Speed,
    /// Base colors silhouettes are tinted from.
    pub palette: Palette,
    /// Tonal perturbation applied on top of the base colors.
    pub assigner: PaletteAssigner,
    /// Seed all silhouette seeds are derived from.
    pub field_seed: u64,
}

/// Authoritative landscape state.
#[derive(Debug)]
pub struct Landscape {
    parameters: FieldParameters,
    aspect_ratio: AspectRatio,
    clock: AnimationClock,
    field: MountainField,
    factory: SilhouetteFactory,
    revision: u64,
}

impl Landscape {
    /// Creates a landscape whose field stays empty until the first [`Command::Rebuild`].
    #[must_use]
    pub fn new(settings: LandscapeSettings) -> Self {
        let LandscapeSettings {
            parameters,
            speed,
            palette,
            assigner,
            field_seed,
        } = settings;

        Self {
            parameters,
            aspect_ratio: AspectRatio::SQUARE,
            clock: AnimationClock::new(speed),
            field: MountainField::new(),
            factory: SilhouetteFactory::new(palette, assigner, field_seed),
            revision: 0,
        }
    }

    fn rebuild(&mut self, out_events: &mut Vec<Event>) {
        self.field
            .rebuild(&mut self.factory, &self.parameters, self.aspect_ratio);
        self.clock.reset();
        self.touch();

        tracing::info!(
            target: LOG_TARGET,
            count = self.parameters.count().get(),
            branching = self.parameters.branching().get(),
            depth = self.parameters.depth().get(),
            aspect_ratio = self.aspect_ratio.get(),
            "field.rebuilt"
        );
        out_events.push(Event::FieldRebuilt {
            count: self.parameters.count(),
        });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        let outcome = self.clock.tick();
        self.touch();
        out_events.push(Event::ProgressAdvanced {
            progress: self.clock.progress(),
        });

        if outcome == ClockTick::Advanced {
            return;
        }
        out_events.push(Event::ClockWrapped);

        if let Some(Recycled { inserted, removed }) =
            self.field
                .recycle(&mut self.factory, &self.parameters, self.aspect_ratio)
        {
            tracing::debug!(
                target: LOG_TARGET,
                inserted = inserted.get(),
                removed = removed.get(),
                "field.recycled"
            );
            out_events.push(Event::SilhouetteRecycled { inserted, removed });
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Applies the provided command to the landscape, pushing resulting events into `out_events`.
pub fn apply(landscape: &mut Landscape, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Configure { parameters } => {
            if parameters == landscape.parameters {
                return;
            }
            landscape.parameters = parameters;
            landscape.rebuild(out_events);
        }
        Command::SetSpeed { speed } => {
            landscape.clock.set_speed(speed);
            landscape.touch();
            out_events.push(Event::SpeedChanged { speed });
        }
        Command::ResizeViewport { aspect_ratio } => {
            if aspect_ratio == landscape.aspect_ratio {
                return;
            }
            landscape.aspect_ratio = aspect_ratio;
            landscape.touch();
            out_events.push(Event::ViewportResized { aspect_ratio });
        }
        Command::Rebuild => landscape.rebuild(out_events),
        Command::Tick => landscape.tick(out_events),
    }
}

/// Read-only access to landscape state.
pub mod query {
    use ridgeline_core::{AspectRatio, FieldParameters, Speed};
    use ridgeline_system_palette::Palette;

    use super::{field, Landscape, MountainSilhouette};

    /// Normalised clock progress in `[0, 1)`.
    #[must_use]
    pub fn progress(landscape: &Landscape) -> f64 {
        landscape.clock.progress()
    }

    /// Per-tick progress increment.
    #[must_use]
    pub fn speed(landscape: &Landscape) -> Speed {
        landscape.clock.speed()
    }

    /// Aspect ratio hint applied to newly generated silhouettes.
    #[must_use]
    pub fn aspect_ratio(landscape: &Landscape) -> AspectRatio {
        landscape.aspect_ratio
    }

    /// Parameters the field is generated with.
    #[must_use]
    pub fn parameters(landscape: &Landscape) -> FieldParameters {
        landscape.parameters
    }

    /// Palette silhouettes are tinted from.
    #[must_use]
    pub fn palette(landscape: &Landscape) -> &Palette {
        landscape.factory.palette()
    }

    /// Seed every silhouette seed is derived from.
    #[must_use]
    pub fn field_seed(landscape: &Landscape) -> u64 {
        landscape.factory.field_seed()
    }

    /// Counter bumped on every state change, for consumers that poll instead of reading events.
    #[must_use]
    pub fn revision(landscape: &Landscape) -> u64 {
        landscape.revision
    }

    /// Silhouettes ordered from farthest to nearest.
    pub fn silhouettes(landscape: &Landscape) -> impl Iterator<Item = &MountainSilhouette> {
        landscape.field.iter()
    }

    /// Number of silhouettes currently in the field.
    #[must_use]
    pub fn silhouette_count(landscape: &Landscape) -> usize {
        landscape.field.len()
    }

    /// Ordered `(silhouette, nearness)` pairs for the current frame.
    #[must_use]
    pub fn render_pairs(landscape: &Landscape) -> Vec<RenderPair<'_>> {
        let count = landscape.field.len();
        let progress = landscape.clock.progress();
        landscape
            .field
            .iter()
            .enumerate()
            .map(|(index, silhouette)| RenderPair {
                silhouette,
                nearness: field::nearness(index, progress, count),
            })
            .collect()
    }

    /// A silhouette paired with its parallax nearness.
    #[derive(Clone, Copy, Debug)]
    pub struct RenderPair<'a> {
        silhouette: &'a MountainSilhouette,
        nearness: f64,
    }

    impl<'a> RenderPair<'a> {
        /// Silhouette to draw.
        #[must_use]
        pub fn silhouette(&self) -> &'a MountainSilhouette {
            self.silhouette
        }

        /// Nearness in `[0, 1)`; larger values are closer to the viewer.
        #[must_use]
        pub fn nearness(&self) -> f64 {
            self.nearness
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridgeline_core::{Branching, BranchingSchedule, Depth, MountainCount, Rgba};

    fn landscape(count: u32, speed: f64) -> Landscape {
        Landscape::new(LandscapeSettings {
            parameters: FieldParameters::new(
                MountainCount::new(count).expect("non-zero count"),
                Branching::new(1).expect("non-zero branching"),
                Depth::new(1),
                BranchingSchedule::Constant,
            ),
            speed: Speed::new(speed).expect("valid speed"),
            palette: Palette::with_fallback(Vec::new(), Rgba::WHITE),
            assigner: PaletteAssigner::default(),
            field_seed: 5,
        })
    }

    #[test]
    fn field_starts_empty() {
        let landscape = landscape(3, 0.1);
        assert_eq!(query::silhouette_count(&landscape), 0);
        assert!(query::render_pairs(&landscape).is_empty());
        assert_eq!(query::revision(&landscape), 0);
    }

    #[test]
    fn wrap_without_field_does_not_recycle() {
        let mut landscape = landscape(3, 1.0);
        let mut events = Vec::new();
        apply(&mut landscape, Command::Tick, &mut events);

        assert_eq!(
            events,
            vec![Event::ProgressAdvanced { progress: 0.0 }, Event::ClockWrapped]
        );
    }

    #[test]
    fn unchanged_configuration_is_ignored() {
        let mut landscape = landscape(3, 0.1);
        let mut events = Vec::new();
        let parameters = query::parameters(&landscape);
        apply(&mut landscape, Command::Configure { parameters }, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::revision(&landscape), 0);
    }

    #[test]
    fn resizing_does_not_rebuild() {
        let mut landscape = landscape(2, 0.1);
        let mut events = Vec::new();
        apply(&mut landscape, Command::Rebuild, &mut events);
        let before: Vec<_> = query::silhouettes(&landscape)
            .map(MountainSilhouette::id)
            .collect();

        events.clear();
        let aspect_ratio = AspectRatio::from_size(1920.0, 1080.0);
        apply(&mut landscape, Command::ResizeViewport { aspect_ratio }, &mut events);

        let after: Vec<_> = query::silhouettes(&landscape)
            .map(MountainSilhouette::id)
            .collect();
        assert_eq!(before, after);
        assert_eq!(events, vec![Event::ViewportResized { aspect_ratio }]);
        assert_eq!(query::aspect_ratio(&landscape), aspect_ratio);
    }
}
