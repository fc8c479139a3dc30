//! Fetch address types.
//!
//! This module defines the strong address type used on the fetch path and the
//! cache geometry that carves it into fields. It provides the following:
//! 1. **Type Safety:** `FetchAddr` keeps byte addresses distinct from set, way and offset indices.
//! 2. **Decomposition:** `CacheGeometry` splits an address into tag, set index and block offset.
//! 3. **Composition:** The inverse mapping, used by the fill controller to address individual words.

use std::fmt;

use super::constants::{ADDR_BITS, WORD_SHIFT};
use super::error::ConfigError;

/// A 32-bit byte address presented by the fetch stage.
///
/// The two low bits select a byte within a word and are ignored by the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchAddr(pub u32);

impl FetchAddr {
    /// Creates a new fetch address from a raw 32-bit value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }

    /// Returns the word index of this address (byte address with the low bits dropped).
    #[inline(always)]
    pub const fn word_index(self) -> u32 {
        self.0 >> WORD_SHIFT
    }
}

impl From<u32> for FetchAddr {
    fn from(addr: u32) -> Self {
        Self(addr)
    }
}

impl fmt::Display for FetchAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// The tag, set index and block offset of a fetch address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddrFields {
    /// High address bits stored alongside a line to identify it.
    pub tag: u32,
    /// Index of the set the address maps to.
    pub set: usize,
    /// Word position within the block.
    pub offset: usize,
}

/// Validated shape of the cache: number of sets and words per block.
///
/// Both quantities are powers of two, so every field of an address is a
/// contiguous bit range. Associativity is fixed at
/// [`NUM_WAYS`](super::constants::NUM_WAYS) and is not part of the geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheGeometry {
    num_sets: usize,
    block_words: usize,
    set_bits: u32,
    offset_bits: u32,
}

impl CacheGeometry {
    /// Validates and builds a geometry.
    ///
    /// # Arguments
    ///
    /// * `num_sets` - Number of sets; must be a non-zero power of two.
    /// * `block_words` - Words per line; must be a non-zero power of two.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] for a malformed parameter and
    /// [`ConfigError::NoTagBits`] when the set and offset fields would consume
    /// the whole address.
    pub fn new(num_sets: usize, block_words: usize) -> Result<Self, ConfigError> {
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "num_sets",
                value: num_sets,
            });
        }
        if !block_words.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "block_words",
                value: block_words,
            });
        }

        let set_bits = num_sets.trailing_zeros();
        let offset_bits = block_words.trailing_zeros();
        if set_bits + offset_bits + WORD_SHIFT >= ADDR_BITS {
            return Err(ConfigError::NoTagBits {
                set_bits,
                offset_bits,
            });
        }

        Ok(Self {
            num_sets,
            block_words,
            set_bits,
            offset_bits,
        })
    }

    /// Number of sets in the cache.
    #[inline(always)]
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Number of 32-bit words in a line.
    #[inline(always)]
    pub const fn block_words(&self) -> usize {
        self.block_words
    }

    /// Width of the set index field.
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Width of the block offset field.
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Width of the tag field: whatever remains of the 32-bit address.
    pub const fn tag_bits(&self) -> u32 {
        ADDR_BITS - self.set_bits - self.offset_bits - WORD_SHIFT
    }

    /// Splits an address into tag, set index and block offset.
    #[inline]
    pub const fn decompose(&self, addr: FetchAddr) -> AddrFields {
        let word = addr.word_index();
        let offset = word & (self.block_words as u32 - 1);
        let set = (word >> self.offset_bits) & (self.num_sets as u32 - 1);
        let tag = word >> (self.offset_bits + self.set_bits);
        AddrFields {
            tag,
            set: set as usize,
            offset: offset as usize,
        }
    }

    /// Rebuilds the word-aligned address of `offset` within the line named by `tag` and `set`.
    #[inline]
    pub const fn compose(&self, tag: u32, set: usize, offset: usize) -> FetchAddr {
        let word = (tag << (self.offset_bits + self.set_bits))
            | ((set as u32) << self.offset_bits)
            | offset as u32;
        FetchAddr(word << WORD_SHIFT)
    }

    /// Returns the address of word `offset` in the same line as `addr`.
    pub const fn word_in_line(&self, addr: FetchAddr, offset: usize) -> FetchAddr {
        let fields = self.decompose(addr);
        self.compose(fields.tag, fields.set, offset)
    }
}
