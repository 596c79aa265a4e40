//! RNG module - deterministic kind selection
//!
//! Every spawned kind is an independent uniform draw over the seven kinds.
//! There is no bag: repeats and droughts are possible, exactly as in the
//! classic arcade rules. A simple LCG keeps games reproducible from a seed.

use crate::types::BlockKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform roller over [`BlockKind::ALL`]
#[derive(Debug, Clone)]
pub struct KindRoller {
    rng: SimpleRng,
    seed: u32,
}

impl KindRoller {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    /// Draw the next kind
    pub fn roll(&mut self) -> BlockKind {
        let idx = self.rng.next_range(BlockKind::ALL.len() as u32) as usize;
        BlockKind::ALL[idx]
    }

    /// Seed the roller was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for KindRoller {
    fn default() -> Self {
        Self::new(1)
    }
}
