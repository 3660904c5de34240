//! Seeded random sources.
//!
//! Every search run draws from exactly one generator, created here and
//! threaded through every call that needs randomness.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The random generator type used by search runs.
pub type FoldRng = StdRng;

/// Creates a deterministic generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> FoldRng {
    StdRng::seed_from_u64(seed)
}
