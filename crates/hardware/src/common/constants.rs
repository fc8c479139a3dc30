//! Global constants.
//!
//! This module defines fixed properties of the fetch path that are not
//! configurable:
//! 1. **Associativity:** Every set holds exactly `NUM_WAYS` lines.
//! 2. **Address Width:** Fetch addresses are 32 bits and word aligned.

/// Number of ways in every cache set.
pub const NUM_WAYS: usize = 4;

/// Width of a fetch address in bits.
pub const ADDR_BITS: u32 = 32;

/// Size of an instruction word in bytes.
pub const WORD_BYTES: u32 = 4;

/// Number of low address bits ignored by the cache (byte-within-word).
pub const WORD_SHIFT: u32 = 2;
