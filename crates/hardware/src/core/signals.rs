//! Per-tick signal bundles.
//!
//! This module defines the values exchanged between the fetch stage, the cache
//! and the fill controller on every tick:
//! 1. **Fetch Interface:** `read_enable`/`address` in, `ready`/`instruction` out.
//! 2. **Miss Interface:** The held `read_request`/`read_address` pair raised on a miss.
//! 3. **Fill Interface:** One `data_ready` pulse with its `data_in` word per delivered word.
//! 4. **Reset:** The global reset line, sampled ahead of everything else.

use crate::common::addr::FetchAddr;

/// Request presented by the fetch stage.
///
/// The requester must keep `read_enable` and `address` stable until it
/// observes `ready`; changing them earlier is a protocol violation the model
/// does not try to recover from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchRequest {
    /// Whether a lookup is requested this tick.
    pub read_enable: bool,
    /// Address of the instruction to fetch.
    pub address: FetchAddr,
}

impl FetchRequest {
    /// A lookup of `address`.
    pub const fn read(address: FetchAddr) -> Self {
        Self {
            read_enable: true,
            address,
        }
    }

    /// No lookup this tick.
    pub const fn idle() -> Self {
        Self {
            read_enable: false,
            address: FetchAddr(0),
        }
    }
}

/// Response returned to the fetch stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchResponse {
    /// High for exactly the tick in which `instruction` is valid.
    pub ready: bool,
    /// Fetched word; meaningless unless `ready` is set.
    pub instruction: u32,
}

impl FetchResponse {
    /// No data this tick: the fetch stage must hold its request.
    pub const fn stall() -> Self {
        Self {
            ready: false,
            instruction: 0,
        }
    }

    /// Data for the presented address.
    pub const fn ready(instruction: u32) -> Self {
        Self {
            ready: true,
            instruction,
        }
    }
}

/// The `read_request` line and its `read_address`, raised by the cache on a
/// miss and held until the first word of the fill arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissRequest {
    /// Full address of the lookup that missed.
    pub address: FetchAddr,
}

/// One word delivered by the fill controller: a `data_ready` pulse together
/// with its `data_in` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillWord {
    /// Memory address the word was read from.
    pub address: FetchAddr,
    /// Position of the word within its line.
    pub offset: usize,
    /// The word itself.
    pub data: u32,
    /// Set on the final word of the line.
    pub last: bool,
}

/// Everything the fetch subsystem samples at the start of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInputs {
    /// Global reset; takes priority over every other input.
    pub reset: bool,
    /// Fetch stage request.
    pub fetch: FetchRequest,
}

impl TickInputs {
    /// A lookup of `address` with reset deasserted.
    pub const fn fetch(address: FetchAddr) -> Self {
        Self {
            reset: false,
            fetch: FetchRequest::read(address),
        }
    }

    /// A tick with no lookup and reset deasserted.
    pub const fn idle() -> Self {
        Self {
            reset: false,
            fetch: FetchRequest::idle(),
        }
    }

    /// A tick with reset asserted.
    pub const fn reset() -> Self {
        Self {
            reset: true,
            fetch: FetchRequest::idle(),
        }
    }
}
