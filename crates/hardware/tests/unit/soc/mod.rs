//! Backing memory tests.
