//! Common types shared by the cache, the fill controller and the backing store.
//!
//! This module provides:
//! 1. **Address Types:** The `FetchAddr` newtype and the `CacheGeometry` that decomposes it.
//! 2. **Constants:** Fixed associativity and address-width constants.
//! 3. **Error Handling:** Configuration and image loading errors.

/// Address type definitions and tag/set/offset decomposition.
pub mod addr;

/// Constants shared across the fetch path.
pub mod constants;

/// Error types.
pub mod error;

pub use addr::{AddrFields, CacheGeometry, FetchAddr};
pub use constants::NUM_WAYS;
pub use error::{ConfigError, ImageError};
