use icache_core::common::FetchAddr;
use icache_core::config::{Config, FillOrder};
use icache_core::core::signals::TickInputs;
use icache_core::core::units::cache::policies::ReplacementPolicy;
use icache_core::sim::TickTrace;
use icache_core::soc::memory::BackingStore;
use icache_core::{FetchUnit, FillController, InstructionCache};
use tracing_subscriber::EnvFilter;

use super::mocks::memory::PatternMemory;

/// Installs a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Replacement policy that always evicts the same way.
#[derive(Debug)]
pub struct FixedWay(pub usize);

impl ReplacementPolicy for FixedWay {
    fn victim(&mut self, _set: usize) -> usize {
        self.0
    }

    fn reset(&mut self) {}
}

/// Replacement policy that walks the ways round-robin, starting at way 0.
#[derive(Debug, Default)]
pub struct RoundRobin(pub usize);

impl ReplacementPolicy for RoundRobin {
    fn victim(&mut self, _set: usize) -> usize {
        let way = self.0 % 4;
        self.0 += 1;
        way
    }

    fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Default configuration with the given fill delay and ordering.
pub fn config(delay_cycles: u32, order: FillOrder) -> Config {
    let mut config = Config::default();
    config.fill.delay_cycles = delay_cycles;
    config.fill.order = order;
    config
}

/// Fetch unit over a fresh [`PatternMemory`].
pub fn pattern_unit(config: &Config) -> FetchUnit<PatternMemory> {
    init_tracing();
    FetchUnit::new(config, PatternMemory::new()).unwrap()
}

/// Fetch unit whose cache uses `policy` for replacement.
pub fn unit_with_policy<M: BackingStore>(
    config: &Config,
    policy: Box<dyn ReplacementPolicy>,
    memory: M,
) -> FetchUnit<M> {
    init_tracing();
    let geometry = config.validate().unwrap();
    let cache = InstructionCache::with_policy(geometry, config.fill.order, policy);
    let fill = FillController::from_config(config).unwrap();
    FetchUnit::from_parts(cache, fill, memory).unwrap()
}

/// Ticks `n` times with the same inputs, returning the signals of each tick.
pub fn run_ticks<M: BackingStore>(
    unit: &mut FetchUnit<M>,
    inputs: TickInputs,
    n: usize,
) -> Vec<TickTrace> {
    (0..n)
        .map(|_| {
            let _ = unit.tick(inputs);
            *unit.last_tick()
        })
        .collect()
}

/// Number of ticks a cold fetch takes, including the tick that returns `ready`.
pub fn cold_fetch_ticks(config: &Config) -> u64 {
    u64::from(config.fill.delay_cycles) + config.cache.block_words as u64 + 1
}

/// Addresses of every word in the line holding `addr`, in ascending order.
pub fn line_words(config: &Config, addr: FetchAddr) -> Vec<FetchAddr> {
    let geometry = config.validate().unwrap();
    (0..geometry.block_words())
        .map(|offset| geometry.word_in_line(addr, offset))
        .collect()
}
