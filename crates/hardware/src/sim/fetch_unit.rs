//! Instruction fetch unit.
//!
//! This module ties the cache, the fill controller and a backing store into a
//! single synchronous block. Each call to [`FetchUnit::tick`]:
//! 1. **Samples reset:** A raised reset returns every component to its power-on state.
//! 2. **Looks up:** The cache evaluates the fetch request against committed state.
//! 3. **Fills:** The fill controller sees the cache's `read_request`, advances its
//!    state machine and may deliver one word.
//! 4. **Commits:** The delivered word is written into the cache, visible from the next tick.

use tracing::info;

use crate::common::addr::FetchAddr;
use crate::common::error::ConfigError;
use crate::config::Config;
use crate::core::signals::{FetchResponse, FillWord, MissRequest, TickInputs};
use crate::core::units::cache::{InstructionCache, Lookup};
use crate::core::units::fill::FillController;
use crate::soc::memory::BackingStore;
use crate::stats::CacheStats;

/// Signals observed during the most recent tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickTrace {
    /// Tick number, counted from construction.
    pub tick: u64,
    /// Response driven to the fetch stage.
    pub response: FetchResponse,
    /// Whether the cache raised a new miss this tick.
    pub miss: bool,
    /// `read_request`/`read_address` as seen by the fill controller.
    pub read_request: Option<MissRequest>,
    /// Address issued to the backing store this tick.
    pub memory_read: Option<FetchAddr>,
    /// `data_ready`/`data_in` pulse delivered this tick.
    pub fill_word: Option<FillWord>,
}

/// Result of [`FetchUnit::fetch_blocking`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fetched {
    /// The fetched word.
    pub instruction: u32,
    /// Ticks spent, including the tick that returned `ready`.
    pub ticks: u64,
}

/// Cache, fill controller and backing store advanced in lock step.
#[derive(Debug)]
pub struct FetchUnit<M> {
    cache: InstructionCache,
    fill: FillController,
    memory: M,
    cycles: u64,
    last: TickTrace,
}

impl<M: BackingStore> FetchUnit<M> {
    /// Validates `config` and builds a fetch unit over `memory`.
    ///
    /// # Errors
    ///
    /// Returns any error produced by [`Config::validate`].
    pub fn new(config: &Config, memory: M) -> Result<Self, ConfigError> {
        Self::from_parts(
            InstructionCache::from_config(config)?,
            FillController::from_config(config)?,
            memory,
        )
    }

    /// Builds a fetch unit from already constructed components.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PartsMismatch`] if the cache and the controller
    /// were built with different geometries or fill orders.
    pub fn from_parts(
        cache: InstructionCache,
        fill: FillController,
        memory: M,
    ) -> Result<Self, ConfigError> {
        if cache.geometry() != fill.geometry() {
            return Err(ConfigError::PartsMismatch("geometry"));
        }
        if cache.order() != fill.order() {
            return Err(ConfigError::PartsMismatch("fill order"));
        }
        Ok(Self {
            cache,
            fill,
            memory,
            cycles: 0,
            last: TickTrace::default(),
        })
    }

    /// Advances the whole unit by one tick.
    pub fn tick(&mut self, inputs: TickInputs) -> FetchResponse {
        let tick = self.cycles;
        self.cycles += 1;

        if inputs.reset {
            self.reset();
            self.last = TickTrace {
                tick,
                ..TickTrace::default()
            };
            return FetchResponse::stall();
        }

        let lookup = self.cache.lookup(inputs.fetch);
        let read_request = self.cache.read_request();
        let fill_word = self.fill.tick(read_request, &mut self.memory);
        if let Some(word) = fill_word {
            self.cache.commit_fill(word);
        }

        let response = lookup.response();
        self.last = TickTrace {
            tick,
            response,
            miss: matches!(lookup, Lookup::Miss(_)),
            read_request,
            memory_read: self.fill.issued(),
            fill_word,
        };
        response
    }

    /// Presents `addr` every tick until the cache answers, honouring the
    /// requirement that the request stay stable until `ready`.
    pub fn fetch_blocking(&mut self, addr: FetchAddr) -> Fetched {
        let mut ticks = 0;
        loop {
            ticks += 1;
            let response = self.tick(TickInputs::fetch(addr));
            if response.ready {
                return Fetched {
                    instruction: response.instruction,
                    ticks,
                };
            }
        }
    }

    /// Returns the cache and the controller to their power-on state.
    ///
    /// Any fill in progress is dropped; no partially written line is left valid.
    pub fn reset(&mut self) {
        info!(
            busy = self.cache.is_busy(),
            state = ?self.fill.state(),
            "fetch unit reset"
        );
        self.cache.reset();
        self.fill.reset();
    }

    /// Whether a fill is outstanding.
    pub const fn is_busy(&self) -> bool {
        self.cache.is_busy()
    }

    /// Signals of the most recent tick.
    pub const fn last_tick(&self) -> &TickTrace {
        &self.last
    }

    /// Ticks elapsed since construction. Not cleared by reset.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Cache hit and miss counters.
    pub const fn stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// The cache.
    pub const fn cache(&self) -> &InstructionCache {
        &self.cache
    }

    /// The fill controller.
    pub const fn fill(&self) -> &FillController {
        &self.fill
    }

    /// The backing store.
    pub const fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutable access to the backing store, for loading images between runs.
    pub const fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Consumes the unit, returning the backing store.
    pub fn into_memory(self) -> M {
        self.memory
    }
}
