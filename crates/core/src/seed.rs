//! Seed mixing and the random-source seam shared by maze generation and the agent.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Stream tags keep the maze and the agent on independent sequences of one session seed.
pub const MAZE_STREAM: u64 = 1;
pub const AGENT_STREAM: u64 = 2;

/// Uniform choice among `len` candidates. `len` is always non-zero at call sites.
pub trait RandomSource {
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }
}

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn stream_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    seeded_rng(mix_seed_stream(seed, stream))
}

pub fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}
