//! Instruction Cache Store Tests.
//!
//! Drives `InstructionCache` directly, playing the fill controller by hand
//! through `commit_fill`. Covers hit/miss accounting, the busy rule, victim
//! selection, line validity and the single-match invariant.

use icache_core::common::{CacheGeometry, FetchAddr};
use icache_core::config::FillOrder;
use icache_core::core::signals::{FetchRequest, FetchResponse, FillWord, MissRequest};
use icache_core::core::units::cache::policies::ReplacementPolicy;
use icache_core::core::units::cache::{InstructionCache, Lookup};
use pretty_assertions::assert_eq;

use crate::common::harness::{FixedWay, RoundRobin};
use crate::common::mocks::memory::pattern;

fn geometry() -> CacheGeometry {
    CacheGeometry::new(8, 4).unwrap()
}

fn cache_with(policy: Box<dyn ReplacementPolicy>) -> InstructionCache {
    InstructionCache::with_policy(geometry(), FillOrder::CriticalWordFirst, policy)
}

/// Delivers the first `count` words of the fill for `addr` in the order the
/// controller would.
fn deliver(cache: &mut InstructionCache, addr: FetchAddr, count: usize) {
    let g = cache.geometry();
    let critical = g.decompose(addr).offset;
    for (step, offset) in cache
        .order()
        .sequence(critical, g.block_words())
        .take(count)
        .enumerate()
    {
        let address = g.word_in_line(addr, offset);
        cache.commit_fill(FillWord {
            address,
            offset,
            data: pattern(address),
            last: step + 1 == g.block_words(),
        });
    }
}

/// Misses on `addr` and delivers its whole line.
fn install(cache: &mut InstructionCache, addr: FetchAddr) {
    assert!(matches!(cache.lookup(FetchRequest::read(addr)), Lookup::Miss(_)));
    deliver(cache, addr, 4);
}

#[test]
fn cold_lookup_misses_and_raises_request() {
    let mut cache = cache_with(Box::new(FixedWay(0)));
    let addr = FetchAddr(0x10);

    let outcome = cache.lookup(FetchRequest::read(addr));
    assert_eq!(outcome, Lookup::Miss(MissRequest { address: addr }));
    assert_eq!(outcome.response(), FetchResponse::stall());
    assert_eq!(cache.read_request(), Some(MissRequest { address: addr }));
    assert!(cache.is_busy());
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.stats().hits, 0);

    let pending = cache.pending_fill().unwrap();
    assert_eq!(pending.target_set, 1);
    assert_eq!(pending.target_tag, 0);
    assert_eq!(pending.critical_offset, 0);
}

#[test]
fn lookups_while_busy_are_not_serviced_or_counted() {
    let mut cache = cache_with(Box::new(FixedWay(0)));
    let _ = cache.lookup(FetchRequest::read(FetchAddr(0x10)));

    for addr in [0x10, 0x200, 0x14] {
        assert_eq!(cache.lookup(FetchRequest::read(FetchAddr(addr))), Lookup::Busy);
    }
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.stats().hits, 0);
    assert_eq!(
        cache.read_request(),
        Some(MissRequest {
            address: FetchAddr(0x10)
        })
    );
}

#[test]
fn read_enable_low_does_nothing() {
    let mut cache = cache_with(Box::new(FixedWay(0)));
    assert_eq!(cache.lookup(FetchRequest::idle()), Lookup::Idle);
    assert_eq!(cache.stats().accesses(), 0);
    assert!(!cache.is_busy());
}

#[test]
fn filled_line_serves_every_offset() {
    let mut cache = cache_with(Box::new(FixedWay(3)));
    install(&mut cache, FetchAddr(0x18));
    assert!(!cache.is_busy());

    for addr in [0x10, 0x14, 0x18, 0x1C] {
        let addr = FetchAddr(addr);
        assert_eq!(
            cache.lookup(FetchRequest::read(addr)),
            Lookup::Hit {
                way: 3,
                word: pattern(addr)
            }
        );
    }
    assert_eq!(cache.stats().hits, 4);
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn request_drops_on_first_word_and_line_is_invalid_until_last() {
    let mut cache = cache_with(Box::new(FixedWay(1)));
    let addr = FetchAddr(0x24);
    let _ = cache.lookup(FetchRequest::read(addr));

    deliver(&mut cache, addr, 1);
    assert_eq!(cache.read_request(), None);
    assert!(cache.is_busy());
    assert_eq!(cache.pending_fill().unwrap().target_way, Some(1));

    deliver_remaining(&mut cache, addr, 1, 2);
    assert_eq!(cache.probe(addr), None);
    assert!(!cache.set(2).way(1).is_valid());

    deliver_remaining(&mut cache, addr, 3, 1);
    assert!(!cache.is_busy());
    assert!(cache.set(2).way(1).is_valid());
    assert_eq!(cache.probe(addr), Some(pattern(addr)));
}

/// Delivers `count` words starting at step `from` of the fill for `addr`.
fn deliver_remaining(cache: &mut InstructionCache, addr: FetchAddr, from: usize, count: usize) {
    let g = cache.geometry();
    let critical = g.decompose(addr).offset;
    let steps = cache.order().sequence(critical, g.block_words()).enumerate();
    for (step, offset) in steps.skip(from).take(count) {
        let address = g.word_in_line(addr, offset);
        cache.commit_fill(FillWord {
            address,
            offset,
            data: pattern(address),
            last: step + 1 == g.block_words(),
        });
    }
}

#[test]
fn critical_word_is_written_at_its_own_offset() {
    let mut cache = cache_with(Box::new(FixedWay(0)));
    let addr = FetchAddr(0x1C);
    install(&mut cache, addr);

    let line = cache.set(1).way(0);
    let expected: Vec<u32> = [0x10, 0x14, 0x18, 0x1C]
        .into_iter()
        .map(|a| pattern(FetchAddr(a)))
        .collect();
    assert_eq!(line.words(), expected.as_slice());
    assert_eq!(line.tag(), 0);
}

#[test]
fn fifth_tag_in_a_set_evicts_the_chosen_way() {
    let mut cache = cache_with(Box::new(RoundRobin::default()));
    // Set 0 lines: one per tag, 0x80 bytes apart.
    let lines: Vec<_> = (0..5).map(|t| FetchAddr(t * 0x80)).collect();
    for &line in &lines {
        install(&mut cache, line);
    }

    // Round-robin reused way 0 for the fifth line, evicting the first.
    assert_eq!(cache.probe(lines[0]), None);
    for &line in &lines[1..] {
        assert_eq!(cache.probe(line), Some(pattern(line)));
    }
    assert_eq!(cache.set(0).way(0).tag(), 4);
}

#[test]
fn random_replacement_never_duplicates_a_tag() {
    let mut cache = InstructionCache::new(geometry(), FillOrder::CriticalWordFirst, 0xC0FFEE);
    // Six tags competing for set 2, revisited so evicted lines are refilled.
    let lines: Vec<_> = (0..6).map(|t| FetchAddr(0x20 + t * 0x80)).collect();

    for round in 0..40 {
        let addr = lines[(round * 7) % lines.len()];
        match cache.lookup(FetchRequest::read(addr)) {
            Lookup::Miss(_) => deliver(&mut cache, addr, 4),
            Lookup::Hit { word, .. } => assert_eq!(word, pattern(addr)),
            other => panic!("unexpected lookup outcome {other:?}"),
        }
        for &line in &lines {
            assert!(cache.matching_ways(line) <= 1, "duplicate tag for {line}");
        }
    }
}

#[test]
fn probe_does_not_count() {
    let mut cache = cache_with(Box::new(FixedWay(0)));
    install(&mut cache, FetchAddr(0x40));
    let before = *cache.stats();
    assert_eq!(cache.probe(FetchAddr(0x44)), Some(pattern(FetchAddr(0x44))));
    assert_eq!(cache.probe(FetchAddr(0x1000)), None);
    assert_eq!(*cache.stats(), before);
}

#[test]
fn repeated_hits_leave_contents_untouched() {
    let mut cache = cache_with(Box::new(FixedWay(2)));
    install(&mut cache, FetchAddr(0x30));
    let snapshot = cache.set(3).clone();

    for _ in 0..10 {
        let _ = cache.lookup(FetchRequest::read(FetchAddr(0x34)));
    }
    assert_eq!(cache.set(3), &snapshot);
    assert_eq!(cache.read_request(), None);
    assert_eq!(cache.stats().hits, 10);
}

#[test]
fn reset_invalidates_and_zeroes_counters() {
    let mut cache = cache_with(Box::new(FixedWay(0)));
    install(&mut cache, FetchAddr(0x10));
    let _ = cache.lookup(FetchRequest::read(FetchAddr(0x10)));
    let _ = cache.lookup(FetchRequest::read(FetchAddr(0x400)));
    deliver(&mut cache, FetchAddr(0x400), 2);

    cache.reset();
    assert!(!cache.is_busy());
    assert_eq!(cache.read_request(), None);
    assert_eq!(cache.stats().accesses(), 0);
    for set in 0..8 {
        assert!(cache.set(set).ways().iter().all(|line| !line.is_valid()));
    }
    assert!(matches!(
        cache.lookup(FetchRequest::read(FetchAddr(0x10))),
        Lookup::Miss(_)
    ));
}

#[test]
fn sequential_order_fills_from_offset_zero() {
    let mut cache =
        InstructionCache::with_policy(geometry(), FillOrder::Sequential, Box::new(FixedWay(0)));
    let addr = FetchAddr(0x1C);
    let _ = cache.lookup(FetchRequest::read(addr));
    assert_eq!(cache.pending_fill().unwrap().next_offset, 0);
    deliver(&mut cache, addr, 4);
    assert_eq!(cache.probe(addr), Some(pattern(addr)));
}
