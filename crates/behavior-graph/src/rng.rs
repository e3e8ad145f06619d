//! Deterministic random source for scoring conditions.
//!
//! Random conditions draw from a generator owned by the agent that evaluates
//! them, so two agents seeded identically walk a graph identically. This
//! keeps simulation runs reproducible and tests exact.

/// Source of random numbers supplied to conditions during evaluation.
pub trait RandomSource: Send {
    /// Generate the next random `u32`.
    fn next_u32(&mut self) -> u32;

    /// Generate a value uniformly distributed in `[0, 1)`.
    ///
    /// Uses the upper 24 bits so every result is exactly representable.
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Generate a value uniformly distributed in `[min, max)`.
    ///
    /// Returns `min` when the range is empty or inverted.
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if !(max > min) {
            return min;
        }
        let value = min + (max - min) * self.next_f32();
        // Rounding can land exactly on `max` for wide ranges.
        if value < max { value } else { min }
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// - **Deterministic**: the same seed always yields the same sequence
/// - **Small state**: 64 bits, cheap to copy into a snapshot
/// - **Good quality**: passes PractRand and TestU01
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
}

impl Pcg32 {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from a seed.
    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    /// Returns the raw generator state.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// `state' = state * multiplier + increment (mod 2^64)`
    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for Pcg32 {
    fn default() -> Self {
        Self::new(crate::AgentConfig::DEFAULT_SEED)
    }
}

impl RandomSource for Pcg32 {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}
