//! Random Replacement Policy.
//!
//! This policy evicts a uniformly chosen way of the set. It uses a xorshift
//! generator seeded from configuration, so a given seed always produces the
//! same sequence of victims.

use super::ReplacementPolicy;

/// Random policy state.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    ways: usize,
    seed: u64,
    state: u64,
}

impl RandomPolicy {
    /// Creates a new random policy.
    ///
    /// # Arguments
    ///
    /// * `ways` - The associativity of the cache.
    /// * `seed` - Initial generator state; must be non-zero, since xorshift
    ///   never leaves the all-zero state.
    pub fn new(ways: usize, seed: u64) -> Self {
        debug_assert!(seed != 0, "xorshift seed must be non-zero");
        Self {
            ways,
            seed,
            state: seed,
        }
    }

    fn next_state(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// The set index does not influence the draw.
    fn victim(&mut self, _set: usize) -> usize {
        (self.next_state() % self.ways as u64) as usize
    }

    fn reset(&mut self) {
        self.state = self.seed;
    }
}
