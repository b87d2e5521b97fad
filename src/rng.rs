//! Deterministic random streams for ensemble runs.
//!
//! Each Monte Carlo run gets its own ChaCha stream seeded from
//! (master seed, run index), so a run draws the same numbers no matter which
//! worker executes it or in what order runs finish.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
pub struct RunStreams {
    master_seed: u64,
}

impl RunStreams {
    pub fn new(seed: u64) -> Self {
        Self { master_seed: seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Generator owned by a single run.
    pub fn for_run(&self, run_index: usize) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive_seed(run_index as u64))
    }

    fn derive_seed(&self, run_index: u64) -> u64 {
        let mut seed = self.master_seed;
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^= run_index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^ (seed >> 29)
    }
}

impl Default for RunStreams {
    fn default() -> Self {
        Self::new(42)
    }
}
