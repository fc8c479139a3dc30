//! Configuration system for the instruction fetch model.
//!
//! This module defines the configuration structures used to parameterize the
//! cache and its fill controller. It provides:
//! 1. **Defaults:** The baseline geometry (8 sets, 4-word lines) and a 5-cycle fill delay.
//! 2. **Structures:** Cache geometry, replacement seed and fill timing settings.
//! 3. **Enums:** The fill ordering mode.
//!
//! Configuration is supplied as JSON or built with `Config::default()`.
//! The cache and fill controller constructors take the [`CacheGeometry`] returned by
//! [`Config::validate`], so a model is never built from unchecked values.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::addr::CacheGeometry;
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Number of sets in the cache.
    pub const NUM_SETS: usize = 8;

    /// Number of 32-bit words per cache line.
    pub const BLOCK_WORDS: usize = 4;

    /// Seed of the replacement way generator.
    pub const REPLACEMENT_SEED: u64 = 123_456_789;

    /// Cycles between accepting a miss and the first word arriving.
    ///
    /// Models the fixed activation latency of the backing memory.
    pub const DELAY_CYCLES: u32 = 5;
}

/// Order in which the words of a missed line are fetched and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FillOrder {
    /// Fetch the missed word first, then the rest of the line wrapping around
    /// the end of the block.
    #[default]
    #[serde(alias = "CWF")]
    CriticalWordFirst,
    /// Fetch words strictly in offset order, regardless of which one missed.
    Sequential,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use icache_core::config::{Config, FillOrder};
///
/// let config = Config::default();
/// assert_eq!(config.cache.num_sets, 8);
/// assert_eq!(config.fill.order, FillOrder::CriticalWordFirst);
/// ```
///
/// Deserializing from JSON; omitted fields fall back to their defaults:
///
/// ```
/// use icache_core::config::{Config, FillOrder};
///
/// let json = r#"{
///     "cache": { "num_sets": 16, "block_words": 8 },
///     "fill": { "delay_cycles": 3, "order": "Sequential" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache.num_sets, 16);
/// assert_eq!(config.cache.replacement_seed, 123_456_789);
/// assert_eq!(config.fill.order, FillOrder::Sequential);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Cache geometry and replacement
    #[serde(default)]
    pub cache: CacheConfig,
    /// Fill controller timing and ordering
    #[serde(default)]
    pub fill: FillConfig,
}

/// Cache geometry and replacement settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Number of sets (power of two).
    #[serde(default = "CacheConfig::default_num_sets")]
    pub num_sets: usize,

    /// Number of 32-bit words in a line (power of two).
    #[serde(default = "CacheConfig::default_block_words")]
    pub block_words: usize,

    /// Seed for the random replacement generator. A zero seed is replaced by
    /// the default, since the generator would otherwise be stuck at zero.
    #[serde(default = "CacheConfig::default_replacement_seed")]
    pub replacement_seed: u64,
}

impl CacheConfig {
    fn default_num_sets() -> usize {
        defaults::NUM_SETS
    }

    fn default_block_words() -> usize {
        defaults::BLOCK_WORDS
    }

    fn default_replacement_seed() -> u64 {
        defaults::REPLACEMENT_SEED
    }

    /// Returns the seed the replacement generator should start from.
    pub const fn effective_seed(&self) -> u64 {
        if self.replacement_seed == 0 {
            defaults::REPLACEMENT_SEED
        } else {
            self.replacement_seed
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            num_sets: defaults::NUM_SETS,
            block_words: defaults::BLOCK_WORDS,
            replacement_seed: defaults::REPLACEMENT_SEED,
        }
    }
}

/// Fill controller settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FillConfig {
    /// Cycles from miss acceptance to the first delivered word.
    #[serde(default = "FillConfig::default_delay_cycles")]
    pub delay_cycles: u32,

    /// Word ordering within a line fill.
    #[serde(default)]
    pub order: FillOrder,
}

impl FillConfig {
    fn default_delay_cycles() -> u32 {
        defaults::DELAY_CYCLES
    }
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            delay_cycles: defaults::DELAY_CYCLES,
            order: FillOrder::default(),
        }
    }
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any error
    /// produced by [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        let _ = config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks every parameter and returns the resulting cache geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] or [`ConfigError::NoTagBits`]
    /// for a bad geometry and [`ConfigError::ZeroDelay`] for a zero fill delay.
    pub fn validate(&self) -> Result<CacheGeometry, ConfigError> {
        if self.fill.delay_cycles == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        CacheGeometry::new(self.cache.num_sets, self.cache.block_words)
    }
}
