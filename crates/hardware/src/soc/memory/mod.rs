//! Backing memory behind the instruction cache.
//!
//! This module provides:
//! 1. **Interface:** The `BackingStore` trait the fill controller reads words through.
//! 2. **Storage:** `WordMemory`, a word-addressed read-only array loaded from a program image.
//!
//! Timing is not the store's concern: the fill controller issues an address
//! one tick and samples the word the next, and it alone paces the reads.

/// Word-addressed memory array with image loading.
pub mod word_memory;

pub use self::word_memory::WordMemory;

use crate::common::addr::FetchAddr;

/// Read-only, single-word-per-access memory with a fixed one-tick latency.
///
/// The fill controller calls [`read_word`](BackingStore::read_word) in the
/// tick after it issued `addr`, so an implementation only has to return the
/// stored value. Implementations must be deterministic: the same address
/// returns the same word until the store is modified out of band.
pub trait BackingStore {
    /// Returns the 32-bit word at `addr`. The two low address bits are ignored.
    fn read_word(&mut self, addr: FetchAddr) -> u32;
}

impl<T: BackingStore + ?Sized> BackingStore for Box<T> {
    fn read_word(&mut self, addr: FetchAddr) -> u32 {
        (**self).read_word(addr)
    }
}

impl<T: BackingStore + ?Sized> BackingStore for &mut T {
    fn read_word(&mut self, addr: FetchAddr) -> u32 {
        (**self).read_word(addr)
    }
}
