//! Fetch-path hardware blocks.
//!
//! This module contains the per-tick signal definitions shared by the blocks
//! and the functional units themselves: the instruction cache and its line
//! fill controller.

/// Signal bundles exchanged between the fetch stage, cache and fill controller.
pub mod signals;

/// Functional units (instruction cache, fill controller).
pub mod units;
