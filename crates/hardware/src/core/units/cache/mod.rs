//! Set-Associative Instruction Cache.
//!
//! This module implements the cache store of the fetch path. It performs:
//! 1. **Lookup:** Decomposes the fetch address, scans the ways of its set and serves hits.
//! 2. **Miss Handling:** Raises a single outstanding line request and latches the fill target.
//! 3. **Fill Commit:** Writes words delivered by the fill controller into a randomly chosen way.
//! 4. **Reset:** Invalidates every line and discards in-flight fill bookkeeping.
//!
//! The cache is blocking: while a fill is outstanding no lookup is served, so
//! a line is never read before all of its words have been written. Lookups
//! only ever observe state committed in earlier ticks, because the fetch unit
//! evaluates [`InstructionCache::lookup`] before
//! [`InstructionCache::commit_fill`] within a tick.

/// Cache lines and sets.
pub mod line;

/// Cache replacement policy implementations.
pub mod policies;

use tracing::{debug, trace, warn};

pub use self::line::{CacheLine, CacheSet};
use self::policies::{RandomPolicy, ReplacementPolicy};
use crate::common::addr::{AddrFields, CacheGeometry, FetchAddr};
use crate::common::constants::NUM_WAYS;
use crate::common::error::ConfigError;
use crate::config::{Config, FillOrder};
use crate::core::signals::{FetchRequest, FetchResponse, FillWord, MissRequest};
use crate::stats::CacheStats;

/// Bookkeeping for the single outstanding line fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillRequest {
    /// Address of the lookup that missed.
    pub address: FetchAddr,
    /// Set the line is filled into.
    pub target_set: usize,
    /// Tag written into the chosen way.
    pub target_tag: u32,
    /// Offset of the word that missed.
    pub critical_offset: usize,
    /// Way being overwritten; chosen when the first word arrives.
    pub target_way: Option<usize>,
    /// Offset the next word is expected at under the cache's fill order.
    pub next_offset: usize,
    /// Words written so far.
    pub words_delivered: usize,
}

impl FillRequest {
    const fn new(address: FetchAddr, fields: AddrFields, order: FillOrder, block_words: usize) -> Self {
        Self {
            address,
            target_set: fields.set,
            target_tag: fields.tag,
            critical_offset: fields.offset,
            target_way: None,
            next_offset: order.offset_at(fields.offset, 0, block_words),
            words_delivered: 0,
        }
    }
}

/// Result of presenting a request to [`InstructionCache::lookup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// `read_enable` was low; nothing happened.
    Idle,
    /// A valid line held the address.
    Hit {
        /// Way that matched.
        way: usize,
        /// Word at the requested offset.
        word: u32,
    },
    /// The address missed and a line request was raised.
    Miss(MissRequest),
    /// A fill is outstanding; the request was not serviced.
    Busy,
}

impl Lookup {
    /// Signals returned to the fetch stage for this outcome.
    pub const fn response(&self) -> FetchResponse {
        match *self {
            Self::Hit { word, .. } => FetchResponse::ready(word),
            Self::Idle | Self::Miss(_) | Self::Busy => FetchResponse::stall(),
        }
    }
}

/// Blocking set-associative instruction cache with [`NUM_WAYS`] ways per set.
pub struct InstructionCache {
    geometry: CacheGeometry,
    order: FillOrder,
    sets: Box<[CacheSet]>,
    policy: Box<dyn ReplacementPolicy>,
    pending: Option<FillRequest>,
    read_request: Option<MissRequest>,
    stats: CacheStats,
}

impl std::fmt::Debug for InstructionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstructionCache")
            .field("geometry", &self.geometry)
            .field("order", &self.order)
            .field("pending", &self.pending)
            .field("read_request", &self.read_request)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl InstructionCache {
    /// Creates an empty cache using seeded random replacement.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Validated number of sets and words per line.
    /// * `order` - Order in which fill words arrive; must match the fill controller.
    /// * `seed` - Non-zero seed of the replacement generator.
    pub fn new(geometry: CacheGeometry, order: FillOrder, seed: u64) -> Self {
        Self::with_policy(geometry, order, Box::new(RandomPolicy::new(NUM_WAYS, seed)))
    }

    /// Creates an empty cache with a caller-supplied replacement policy.
    pub fn with_policy(
        geometry: CacheGeometry,
        order: FillOrder,
        policy: Box<dyn ReplacementPolicy>,
    ) -> Self {
        let sets = (0..geometry.num_sets())
            .map(|_| CacheSet::new(geometry.block_words()))
            .collect();
        Self {
            geometry,
            order,
            sets,
            policy,
            pending: None,
            read_request: None,
            stats: CacheStats::default(),
        }
    }

    /// Validates `config` and creates the cache it describes.
    ///
    /// # Errors
    ///
    /// Returns any error produced by [`Config::validate`].
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        Ok(Self::new(
            geometry,
            config.fill.order,
            config.cache.effective_seed(),
        ))
    }

    /// Looks up the requested address against committed state.
    ///
    /// On a hit the hit counter is incremented and the word returned. On a
    /// miss the miss counter is incremented, the fill target is latched and
    /// `read_request` is raised. While a fill is outstanding nothing is
    /// serviced and no counter moves.
    pub fn lookup(&mut self, req: FetchRequest) -> Lookup {
        if !req.read_enable {
            return Lookup::Idle;
        }
        if self.pending.is_some() {
            return Lookup::Busy;
        }

        let fields = self.geometry.decompose(req.address);
        let set = &self.sets[fields.set];
        if let Some(way) = set.find(fields.tag) {
            let word = set.way(way).word(fields.offset);
            self.stats.hits += 1;
            trace!(addr = %req.address, set = fields.set, way, "hit");
            return Lookup::Hit { way, word };
        }

        self.stats.misses += 1;
        let request = MissRequest {
            address: req.address,
        };
        self.pending = Some(FillRequest::new(
            req.address,
            fields,
            self.order,
            self.geometry.block_words(),
        ));
        self.read_request = Some(request);
        debug!(
            addr = %req.address,
            set = fields.set,
            tag = fields.tag,
            offset = fields.offset,
            "miss"
        );
        Lookup::Miss(request)
    }

    /// Writes one delivered word into the line being filled.
    ///
    /// The word lands at the offset it carries. The first word of a fill
    /// selects the victim way, installs the new tag and lowers
    /// `read_request`. The word flagged `last` marks the line valid and
    /// clears the busy state.
    pub fn commit_fill(&mut self, word: FillWord) {
        let block_words = self.geometry.block_words();
        let Some(fill) = self.pending.as_mut() else {
            warn!(addr = %word.address, "fill word with no fill outstanding");
            return;
        };
        if word.offset >= block_words {
            warn!(offset = word.offset, block_words, "fill word outside the line");
            return;
        }

        let way = if let Some(way) = fill.target_way {
            way
        } else {
            let way = self.policy.victim(fill.target_set);
            fill.target_way = Some(way);
            self.sets[fill.target_set]
                .way_mut(way)
                .begin_fill(fill.target_tag);
            self.read_request = None;
            debug!(
                set = fill.target_set,
                way,
                tag = fill.target_tag,
                "fill started"
            );
            way
        };

        let set = fill.target_set;
        self.sets[set].way_mut(way).write_word(word.offset, word.data);
        fill.words_delivered += 1;
        trace!(set, way, offset = word.offset, data = word.data, "fill word");

        if !word.last {
            fill.next_offset =
                self.order
                    .offset_at(fill.critical_offset, fill.words_delivered, block_words);
            return;
        }

        if fill.words_delivered != block_words {
            warn!(
                delivered = fill.words_delivered,
                block_words, "line completed with missing words"
            );
        }
        let addr = fill.address;
        self.sets[set].way_mut(way).mark_valid();
        self.pending = None;
        debug!(addr = %addr, set, way, "fill complete");
    }

    /// Invalidates every line, zeroes the counters and discards any partial fill.
    pub fn reset(&mut self) {
        for set in &mut self.sets {
            set.invalidate_all();
        }
        self.policy.reset();
        self.pending = None;
        self.read_request = None;
        self.stats.reset();
    }

    /// The `read_request` line: raised on a miss and held until the first
    /// fill word arrives.
    pub const fn read_request(&self) -> Option<MissRequest> {
        self.read_request
    }

    /// Whether a fill is outstanding.
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Bookkeeping of the outstanding fill, if any.
    pub const fn pending_fill(&self) -> Option<&FillRequest> {
        self.pending.as_ref()
    }

    /// Returns the word at `addr` if it is cached, without touching counters.
    pub fn probe(&self, addr: FetchAddr) -> Option<u32> {
        let fields = self.geometry.decompose(addr);
        let set = &self.sets[fields.set];
        set.find(fields.tag).map(|way| set.way(way).word(fields.offset))
    }

    /// Number of valid ways whose tag matches `addr`.
    pub fn matching_ways(&self, addr: FetchAddr) -> usize {
        let fields = self.geometry.decompose(addr);
        self.sets[fields.set].count_matches(fields.tag)
    }

    /// Set `index` of the array.
    pub fn set(&self, index: usize) -> &CacheSet {
        &self.sets[index]
    }

    /// Hit and miss counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Geometry the cache was built with.
    pub const fn geometry(&self) -> CacheGeometry {
        self.geometry
    }

    /// Fill ordering the cache expects.
    pub const fn order(&self) -> FillOrder {
        self.order
    }
}
