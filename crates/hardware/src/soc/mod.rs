//! System-side components.
//!
//! This module organizes what sits behind the fill controller: the backing
//! memory interface and its word-array implementation.

/// Backing store trait and word memory.
pub mod memory;
