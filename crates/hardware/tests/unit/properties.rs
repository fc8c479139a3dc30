//! Property Tests.
//!
//! Randomized checks of address decomposition, fill ordering and the
//! end-to-end fetch contract.

use icache_core::common::{CacheGeometry, FetchAddr};
use icache_core::config::FillOrder;
use icache_core::core::signals::TickInputs;
use proptest::prelude::*;

use crate::common::harness::{cold_fetch_ticks, config, pattern_unit};
use crate::common::mocks::memory::pattern;

fn geometry() -> impl Strategy<Value = CacheGeometry> {
    (0u32..8, 0u32..6).prop_map(|(set_bits, offset_bits)| {
        CacheGeometry::new(1 << set_bits, 1 << offset_bits).unwrap()
    })
}

fn order() -> impl Strategy<Value = FillOrder> {
    prop_oneof![Just(FillOrder::CriticalWordFirst), Just(FillOrder::Sequential)]
}

proptest! {
    #[test]
    fn compose_inverts_decompose(g in geometry(), addr in any::<u32>()) {
        let fields = g.decompose(FetchAddr(addr));
        prop_assert!(fields.set < g.num_sets());
        prop_assert!(fields.offset < g.block_words());
        prop_assert_eq!(g.compose(fields.tag, fields.set, fields.offset), FetchAddr(addr & !3));
    }

    #[test]
    fn fill_sequence_is_a_permutation(
        g in geometry(),
        order in order(),
        critical_seed in any::<usize>(),
    ) {
        let critical = critical_seed % g.block_words();
        let offsets: Vec<usize> = order.sequence(critical, g.block_words()).collect();

        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..g.block_words()).collect::<Vec<_>>());

        let first = match order {
            FillOrder::CriticalWordFirst => critical,
            FillOrder::Sequential => 0,
        };
        prop_assert_eq!(offsets[0], first);
    }

    #[test]
    fn cold_fetch_returns_memory_word_then_hits(
        addr in any::<u32>(),
        delay in 1u32..8,
        order in order(),
    ) {
        let config = config(delay, order);
        let mut unit = pattern_unit(&config);
        let addr = FetchAddr(addr);

        let cold = unit.fetch_blocking(addr);
        prop_assert_eq!(cold.instruction, pattern(addr));
        prop_assert_eq!(cold.ticks, cold_fetch_ticks(&config));
        prop_assert_eq!(unit.memory().reads.len(), config.cache.block_words);

        let warm = unit.tick(TickInputs::fetch(addr));
        prop_assert!(warm.ready);
        prop_assert_eq!(warm.instruction, pattern(addr));
        prop_assert_eq!(unit.stats().misses, 1);
        prop_assert_eq!(unit.stats().hits, 2);
    }
}
