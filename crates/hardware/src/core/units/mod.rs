//! Functional units of the fetch path.
//!
//! This module contains the instruction cache store and the fill controller
//! that populates it from backing memory.

/// Set-associative instruction cache with random replacement.
pub mod cache;

/// Critical-word-first line fill controller.
pub mod fill;
