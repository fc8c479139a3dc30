//! Cache statistics collection and reporting.
//!
//! This module tracks the two performance counters of the instruction cache:
//! 1. **Hits:** Lookups served from a valid line.
//! 2. **Misses:** Lookups that raised a line fill.
//!
//! Lookups that arrive while a fill is outstanding are neither: they are
//! stalled and counted by whoever drives the fetch stage.

/// Hit and miss counters.
///
/// Both counters only grow until the cache is reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from a valid line.
    pub hits: u64,
    /// Lookups that started a line fill.
    pub misses: u64,
}

impl CacheStats {
    /// Total lookups that resolved as a hit or a miss.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit, or 0.0 before any access.
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    /// Zeroes both counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Formats the report printed by [`CacheStats::print`].
    pub fn report(&self) -> String {
        format!(
            "==========================================================\n\
             INSTRUCTION CACHE STATISTICS\n\
             ==========================================================\n\
             icache.accesses          {}\n\
             icache.hits              {}\n\
             icache.misses            {}\n\
             icache.hit_rate          {:.2}%\n\
             ----------------------------------------------------------",
            self.accesses(),
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        println!("{}", self.report());
    }
}
