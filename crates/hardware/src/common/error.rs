//! Error definitions.
//!
//! The tick path of the cache and fill controller has no failure modes, so
//! errors only arise at the edges of the model:
//! 1. **Configuration:** Parsing and validating a [`Config`](crate::config::Config).
//! 2. **Images:** Loading program bytes into a [`WordMemory`](crate::soc::memory::WordMemory).

use thiserror::Error;

/// Errors raised while building or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid JSON for [`Config`](crate::config::Config).
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A geometry parameter must be a non-zero power of two.
    #[error("`{field}` must be a non-zero power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied.
        value: usize,
    },

    /// Set and offset bits consume the whole address, leaving no tag.
    #[error("geometry leaves no tag bits ({set_bits} set bits + {offset_bits} offset bits)")]
    NoTagBits {
        /// Bits used by the set index.
        set_bits: u32,
        /// Bits used by the block offset.
        offset_bits: u32,
    },

    /// The fill controller needs at least one cycle to issue its first read.
    #[error("`delay_cycles` must be at least 1")]
    ZeroDelay,

    /// A cache and a fill controller built separately disagree on a parameter.
    #[error("cache and fill controller disagree on {0}")]
    PartsMismatch(&'static str),
}

/// Errors raised while loading an image into backing memory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    /// The image length is not a whole number of 32-bit words.
    #[error("image length {0} is not a multiple of 4 bytes")]
    RaggedLength(usize),

    /// The load address is not word aligned.
    #[error("load address {0:#010x} is not word aligned")]
    Misaligned(u32),

    /// The image does not fit inside the memory at the requested address.
    #[error("image of {len} bytes at {addr:#010x} does not fit in memory")]
    OutOfBounds {
        /// Requested load address.
        addr: u32,
        /// Image length in bytes.
        len: usize,
    },
}
