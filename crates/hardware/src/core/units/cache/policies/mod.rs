//! Cache Replacement Policies.
//!
//! Selects the way a line fill overwrites. The instruction cache keeps no
//! recency state, so the only shipped policy is a seeded pseudo-random draw;
//! the trait exists so tests can pin the victim way.

/// Seeded random replacement policy.
pub mod random;

pub use random::RandomPolicy;

/// Trait for cache replacement policies.
pub trait ReplacementPolicy: Send + Sync {
    /// Selects the way to overwrite in `set`.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    ///
    /// # Returns
    ///
    /// A way index below [`NUM_WAYS`](crate::common::constants::NUM_WAYS).
    fn victim(&mut self, set: usize) -> usize;

    /// Returns the policy to its power-on state.
    fn reset(&mut self);
}
