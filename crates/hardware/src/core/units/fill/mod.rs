//! Line Fill Controller.
//!
//! This module implements the state machine that turns one cache miss into a
//! timed burst of backing-store reads. It performs:
//! 1. **Acceptance:** Latches the address of a raised `read_request` while idle.
//! 2. **Delay:** Waits out the fixed activation latency of the backing memory.
//! 3. **Streaming:** Reads one word per tick, issuing each address one tick
//!    before its data is returned, in the configured [`FillOrder`].
//!
//! The controller never touches cache storage. It hands each word back as a
//! [`FillWord`] and the cache commits it.
//!
//! # Timing
//!
//! With a delay of `D` cycles, a miss accepted in tick `t` has its first word
//! delivered in tick `t + D` and its last in tick `t + D + block_words - 1`.
//! The first memory read is issued in tick `t + D - 1`.

/// Fill word ordering.
pub mod order;

use tracing::{debug, trace};

pub use self::order::OffsetSequence;
use crate::common::addr::{CacheGeometry, FetchAddr};
use crate::common::error::ConfigError;
use crate::config::{Config, FillOrder};
use crate::core::signals::{FillWord, MissRequest};
use crate::soc::memory::BackingStore;

/// Controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillState {
    /// No request in flight.
    #[default]
    Idle,
    /// Waiting for the backing memory to become ready.
    Delay {
        /// Ticks left before the first read is issued, including the current one.
        remaining: u32,
    },
    /// Reading and delivering the words of the line.
    Streaming,
}

/// The line currently being fetched.
#[derive(Clone, Copy, Debug)]
struct Burst {
    address: FetchAddr,
    /// Offsets still to be issued.
    pending: OffsetSequence,
    delivered: usize,
}

/// A read issued to the backing store whose data returns next tick.
#[derive(Clone, Copy, Debug)]
struct InFlight {
    address: FetchAddr,
    offset: usize,
}

/// Block fill state machine: `Idle -> Delay -> Streaming -> Idle`.
#[derive(Clone, Debug)]
pub struct FillController {
    geometry: CacheGeometry,
    order: FillOrder,
    delay_cycles: u32,
    state: FillState,
    burst: Option<Burst>,
    in_flight: Option<InFlight>,
}

impl FillController {
    /// Creates an idle controller.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Cache geometry; sets the burst length.
    /// * `order` - Word ordering; must match the cache.
    /// * `delay_cycles` - Ticks from accepting a miss to delivering its first word (at least 1).
    pub fn new(geometry: CacheGeometry, order: FillOrder, delay_cycles: u32) -> Self {
        debug_assert!(delay_cycles >= 1, "fill delay must be at least one cycle");
        Self {
            geometry,
            order,
            delay_cycles: delay_cycles.max(1),
            state: FillState::Idle,
            burst: None,
            in_flight: None,
        }
    }

    /// Validates `config` and creates the controller it describes.
    ///
    /// # Errors
    ///
    /// Returns any error produced by [`Config::validate`].
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        Ok(Self::new(
            geometry,
            config.fill.order,
            config.fill.delay_cycles,
        ))
    }

    /// Advances the controller by one tick.
    ///
    /// Returns the word whose read was issued last tick, if any: this is the
    /// `data_ready` pulse and its `data_in`. A `read_request` is only
    /// sampled while idle; mid-fill it is ignored, whatever address it carries.
    pub fn tick<M>(&mut self, read_request: Option<MissRequest>, memory: &mut M) -> Option<FillWord>
    where
        M: BackingStore + ?Sized,
    {
        let delivered = match self.in_flight.take() {
            Some(read) => self.deliver(read, memory),
            None => None,
        };

        match self.state {
            FillState::Idle => {
                if let Some(request) = read_request {
                    self.accept(request);
                }
            }
            FillState::Delay { remaining } => {
                if remaining <= 1 {
                    self.issue_next();
                    self.state = FillState::Streaming;
                } else {
                    self.state = FillState::Delay {
                        remaining: remaining - 1,
                    };
                }
            }
            FillState::Streaming => {
                let done = self
                    .burst
                    .is_none_or(|burst| burst.delivered == self.geometry.block_words());
                if done {
                    if let Some(burst) = self.burst.take() {
                        debug!(addr = %burst.address, "burst complete");
                    }
                    self.state = FillState::Idle;
                } else {
                    self.issue_next();
                }
            }
        }

        delivered
    }

    /// Aborts any fill in progress and returns to `Idle`.
    pub fn reset(&mut self) {
        self.state = FillState::Idle;
        self.burst = None;
        self.in_flight = None;
    }

    /// Current state.
    pub const fn state(&self) -> FillState {
        self.state
    }

    /// Whether a fill is in progress.
    pub fn is_busy(&self) -> bool {
        self.state != FillState::Idle
    }

    /// Address of the miss being served.
    pub fn pending_address(&self) -> Option<FetchAddr> {
        self.burst.map(|burst| burst.address)
    }

    /// Memory address issued this tick, whose word is delivered next tick.
    pub fn issued(&self) -> Option<FetchAddr> {
        self.in_flight.map(|read| read.address)
    }

    /// Configured activation delay.
    pub const fn delay_cycles(&self) -> u32 {
        self.delay_cycles
    }

    /// Geometry the burst length is derived from.
    pub const fn geometry(&self) -> CacheGeometry {
        self.geometry
    }

    /// Order words are read in.
    pub const fn order(&self) -> FillOrder {
        self.order
    }

    fn accept(&mut self, request: MissRequest) {
        let critical = self.geometry.decompose(request.address).offset;
        self.burst = Some(Burst {
            address: request.address,
            pending: self.order.sequence(critical, self.geometry.block_words()),
            delivered: 0,
        });
        debug!(addr = %request.address, delay = self.delay_cycles, "miss accepted");

        if self.delay_cycles <= 1 {
            self.issue_next();
            self.state = FillState::Streaming;
        } else {
            self.state = FillState::Delay {
                remaining: self.delay_cycles - 1,
            };
        }
    }

    fn issue_next(&mut self) {
        let Some(burst) = self.burst.as_mut() else {
            return;
        };
        if let Some(offset) = burst.pending.next() {
            let address = self.geometry.word_in_line(burst.address, offset);
            trace!(addr = %address, offset, "read issued");
            self.in_flight = Some(InFlight { address, offset });
        }
    }

    fn deliver<M>(&mut self, read: InFlight, memory: &mut M) -> Option<FillWord>
    where
        M: BackingStore + ?Sized,
    {
        let burst = self.burst.as_mut()?;
        let data = memory.read_word(read.address);
        burst.delivered += 1;
        Some(FillWord {
            address: read.address,
            offset: read.offset,
            data,
            last: burst.delivered == self.geometry.block_words(),
        })
    }
}
