use sha2::{Digest, Sha256};

/// Deterministic sequence of silhouette seeds derived from a single field seed.
///
/// Seed `n` is the first eight bytes (little-endian) of
/// `SHA-256(field_seed_le || n_le)`, so every run of a landscape is
/// replayable from its field seed alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedSequence {
    field_seed: u64,
    generation: u64,
}

impl SeedSequence {
    /// Starts a sequence at generation zero.
    #[must_use]
    pub const fn new(field_seed: u64) -> Self {
        Self {
            field_seed,
            generation: 0,
        }
    }

    /// Seed the whole sequence is derived from.
    #[must_use]
    pub const fn field_seed(&self) -> u64 {
        self.field_seed
    }

    /// Number of seeds handed out so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the next silhouette seed.
    pub fn next_seed(&mut self) -> u64 {
        let seed = derive_silhouette_seed(self.field_seed, self.generation);
        self.generation = self.generation.wrapping_add(1);
        seed
    }
}

/// Derives the seed of the silhouette generated at `generation`.
#[must_use]
pub fn derive_silhouette_seed(field_seed: u64, generation: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(field_seed.to_le_bytes());
    hasher.update(generation.to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
