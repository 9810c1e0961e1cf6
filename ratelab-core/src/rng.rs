//! Deterministic seeding for series generation.
//!
//! The dashboard's original generator drew from an unseeded random source, so
//! identical inputs produced different series on every call. Here the master
//! seed is expanded into a per-window sub-seed via BLAKE3 over
//! `(master_seed, range.start, range.end)`: regenerating the same window
//! replays the exact series, while shifting either bound by a single day
//! decorrelates the whole curve.

use crate::domain::DateRange;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Master seed for series generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSeed(pub u64);

impl SeriesSeed {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Derive the sub-seed for a specific analysis window.
    ///
    /// Derivation is hash-based, so it does not depend on how many windows
    /// were generated before this one.
    pub fn sub_seed(&self, range: &DateRange) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.0.to_le_bytes());
        hasher.update(range.start().to_string().as_bytes());
        hasher.update(range.end().to_string().as_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap())
    }

    /// Create a seeded `StdRng` for generating over `range`.
    pub fn rng_for(&self, range: &DateRange) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(range))
    }
}

impl Default for SeriesSeed {
    fn default() -> Self {
        // Arbitrary fixed default so the demo dashboard renders the same
        // series across restarts.
        Self(0x7261_7465_6c61_6221)
    }
}
