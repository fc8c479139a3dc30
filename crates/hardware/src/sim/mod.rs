//! Simulation drivers.
//!
//! This module provides the synchronous `FetchUnit`, which composes the cache,
//! the fill controller and a backing store and steps them one tick at a time.

/// Lock-step composition of cache, fill controller and backing store.
pub mod fetch_unit;

pub use fetch_unit::{FetchUnit, Fetched, TickTrace};
