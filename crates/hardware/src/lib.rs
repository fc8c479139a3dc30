//! Instruction fetch memory subsystem model.
//!
//! This crate implements a cycle-accurate model of a blocking instruction
//! cache and the controller that fills it from a fixed-latency backing store:
//! 1. **Cache:** Set-associative store with four ways per set, random replacement and hit/miss counters.
//! 2. **Fill:** A state machine that waits out the memory latency and streams a line critical-word-first.
//! 3. **Memory:** The `BackingStore` interface and a word-array implementation.
//! 4. **Simulation:** `FetchUnit`, which steps all three in lock step with reset priority.
//! 5. **Configuration:** JSON-deserializable geometry, timing and replacement settings.
//!
//! # Example
//!
//! ```
//! use icache_core::common::FetchAddr;
//! use icache_core::soc::memory::WordMemory;
//! use icache_core::{Config, FetchUnit};
//!
//! let memory = WordMemory::from_words(FetchAddr(0), (0..64).collect());
//! let mut unit = FetchUnit::new(&Config::default(), memory).unwrap();
//!
//! let cold = unit.fetch_blocking(FetchAddr(0x10));
//! assert_eq!(cold.instruction, 4);
//! assert_eq!(cold.ticks, 10);
//!
//! let warm = unit.fetch_blocking(FetchAddr(0x14));
//! assert_eq!(warm.instruction, 5);
//! assert_eq!(warm.ticks, 1);
//! ```

/// Common types (addresses, geometry, constants, errors).
pub mod common;
/// Configuration (defaults, fill order, validation).
pub mod config;
/// Fetch-path hardware (signals, cache, fill controller).
pub mod core;
/// Lock-step simulation of the fetch subsystem.
pub mod sim;
/// Backing memory.
pub mod soc;
/// Hit and miss statistics.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Instruction cache store.
pub use crate::core::units::cache::InstructionCache;
/// Line fill controller.
pub use crate::core::units::fill::FillController;
/// Cache, controller and memory stepped together; construct with `FetchUnit::new`.
pub use crate::sim::FetchUnit;
