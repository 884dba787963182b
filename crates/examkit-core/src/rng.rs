//! Seeded xorshift32 generator.
//!
//! Same seed, same sequence, on every platform. One instance belongs to one
//! shuffle call and is dropped afterwards.

use crate::seed::hash_string_to_seed;

/// Replacement state for a zero seed; xorshift never leaves zero.
const ZERO_STATE_REPLACEMENT: u32 = 0x9e37_79b9;

/// Deterministic stream of draws in `[0, 1)`.
#[derive(Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator from a textual seed.
    pub fn new(seed: &str) -> Self {
        Self::from_u32(hash_string_to_seed(seed))
    }

    /// Create a generator from a numeric seed.
    pub fn from_u32(seed: u32) -> Self {
        let state = if seed == 0 {
            ZERO_STATE_REPLACEMENT
        } else {
            seed
        };
        Self { state }
    }

    /// Advance the state and return the raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Advance the state and return a draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}
