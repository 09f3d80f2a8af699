use std::collections::VecDeque;

use ridgeline_core::{AspectRatio, Branching, FieldParameters, SilhouetteId};
use ridgeline_system_palette::{Palette, PaletteAssigner};
use ridgeline_system_ridge_generation::{RidgeGenerator, RidgeRequest};

use crate::{seeds::SeedSequence, silhouette::MountainSilhouette};

/// Builds fresh silhouettes, owning every stateful collaborator generation needs.
#[derive(Debug)]
pub(crate) struct SilhouetteFactory {
    generator: RidgeGenerator,
    assigner: PaletteAssigner,
    palette: Palette,
    seeds: SeedSequence,
    next_id: u64,
}

impl SilhouetteFactory {
    pub(crate) fn new(palette: Palette, assigner: PaletteAssigner, field_seed: u64) -> Self {
        Self {
            generator: RidgeGenerator::new(),
            assigner,
            palette,
            seeds: SeedSequence::new(field_seed),
            next_id: 0,
        }
    }

    pub(crate) fn palette(&self) -> &Palette {
        &self.palette
    }

    pub(crate) fn field_seed(&self) -> u64 {
        self.seeds.field_seed()
    }

    fn create(
        &mut self,
        parameters: &FieldParameters,
        aspect_ratio: AspectRatio,
    ) -> MountainSilhouette {
        let seed = self.seeds.next_seed();
        let id = SilhouetteId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let branching = widened_branching(parameters.branching(), aspect_ratio);
        let request =
            RidgeRequest::new(branching, parameters.depth(), parameters.schedule(), seed);
        let mut ridge = Vec::new();
        self.generator.generate(request, &mut ridge);

        MountainSilhouette::new(
            id,
            branching,
            parameters.depth(),
            parameters.schedule(),
            seed,
            self.assigner.color_for(seed, &self.palette),
            ridge,
        )
    }
}

/// Identifiers exchanged by a single recycling step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recycled {
    /// Silhouette inserted at the far end of the field.
    pub inserted: SilhouetteId,
    /// Silhouette dropped from the near end of the field.
    pub removed: SilhouetteId,
}

/// Ordered silhouettes, farthest first.
///
/// Index 0 is the farthest silhouette and the last index the nearest, so
/// nearness grows with the index.
#[derive(Clone, Debug, Default)]
pub struct MountainField {
    silhouettes: VecDeque<MountainSilhouette>,
}

impl MountainField {
    /// Creates an empty field awaiting its first rebuild.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of silhouettes currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.silhouettes.len()
    }

    /// Reports whether the field still awaits its first rebuild.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.silhouettes.is_empty()
    }

    /// Silhouettes ordered from farthest to nearest.
    pub fn iter(&self) -> impl Iterator<Item = &MountainSilhouette> {
        self.silhouettes.iter()
    }

    /// Silhouette at `index`, counted from the farthest.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MountainSilhouette> {
        self.silhouettes.get(index)
    }

    pub(crate) fn rebuild(
        &mut self,
        factory: &mut SilhouetteFactory,
        parameters: &FieldParameters,
        aspect_ratio: AspectRatio,
    ) {
        let count = parameters.count().get() as usize;
        self.silhouettes.clear();
        self.silhouettes.reserve(count);
        for _ in 0..count {
            self.silhouettes
                .push_back(factory.create(parameters, aspect_ratio));
        }
    }

    pub(crate) fn recycle(
        &mut self,
        factory: &mut SilhouetteFactory,
        parameters: &FieldParameters,
        aspect_ratio: AspectRatio,
    ) -> Option<Recycled> {
        if self.silhouettes.is_empty() {
            return None;
        }

        let fresh = factory.create(parameters, aspect_ratio);
        let inserted = fresh.id();
        self.silhouettes.push_front(fresh);
        let removed = self.silhouettes.pop_back()?.id();

        Some(Recycled { inserted, removed })
    }
}

/// Widens `branching` so ridge density stays proportional to the viewport width.
///
/// Yields `max(branching, round(branching * aspect_ratio))`.
#[must_use]
pub fn widened_branching(branching: Branching, aspect_ratio: AspectRatio) -> Branching {
    let base = branching.get();
    let scaled = (f64::from(base) * aspect_ratio.get()).round();
    // Float to integer casts saturate, so huge ratios clamp to u32::MAX.
    Branching::saturating(base.max(scaled as u32))
}

/// Parallax nearness of the silhouette at `index` in a field of `count`.
///
/// Computes `(index + (progress mod 1)) / count`. A `count` of zero is an
/// invalid configuration and is treated as one.
#[must_use]
pub fn nearness(index: usize, progress: f64, count: usize) -> f64 {
    debug_assert!(count > 0, "fields hold at least one silhouette");
    (index as f64 + progress.rem_euclid(1.0)) / count.max(1) as f64
}
