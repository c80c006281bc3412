//! Per-collection uid allocation.
//!
//! A uid is a positive `i64` handed out by the gateway, unique within one collection for
//! the life of the process. Allocation is independent of the store: counters are never
//! persisted and never reconciled with documents already stored, so they restart at 1 on
//! every launch (the gateway clears user collections at startup to match).
//!
//! Uids are unique and increasing but not necessarily contiguous. A uid allocated for an
//! insert that then fails is simply never used.

use dashmap::DashMap;
use std::{
    fmt::Debug,
    sync::atomic::{AtomicI64, Ordering},
};

/// A monotonic per-key sequence generator.
///
/// Implementations must be safe to call concurrently: two calls for the same collection
/// never return the same value, and no increment is ever lost.
pub trait UidAllocator: Send + Sync + Debug {
    /// Returns the next uid for `collection`. The first call for a name returns 1.
    fn allocate(&self, collection: &str) -> i64;

    /// Forgets every counter, so the next allocation for any name returns 1 again.
    fn reset(&self);
}

/// [`UidAllocator`] backed by a concurrent map of atomic counters.
///
/// The map's entry API decides which of two racing first writers creates a counter;
/// both then increment the same one.
#[derive(Debug, Default)]
pub struct InMemoryUidAllocator {
    counters: DashMap<String, AtomicI64>,
}

impl InMemoryUidAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last uid handed out for `collection`, if any.
    pub fn current(&self, collection: &str) -> Option<i64> {
        self.counters
            .get(collection)
            .map(|counter| counter.load(Ordering::SeqCst))
    }
}

impl UidAllocator for InMemoryUidAllocator {
    fn allocate(&self, collection: &str) -> i64 {
        // Fast path avoids allocating the key for names already seen.
        if let Some(counter) = self.counters.get(collection) {
            return counter.fetch_add(1, Ordering::SeqCst) + 1;
        }

        self.counters
            .entry(collection.to_string())
            .or_insert_with(|| AtomicI64::new(0))
            .fetch_add(1, Ordering::SeqCst)
            + 1
    }

    fn reset(&self) {
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, sync::Arc, thread};

    #[test]
    fn first_allocation_is_one_and_increments() {
        let allocator = InMemoryUidAllocator::new();

        assert_eq!(allocator.current("widgets"), None);
        assert_eq!(allocator.allocate("widgets"), 1);
        assert_eq!(allocator.allocate("widgets"), 2);
        assert_eq!(allocator.allocate("widgets"), 3);
        assert_eq!(allocator.current("widgets"), Some(3));
    }

    #[test]
    fn collections_count_independently() {
        let allocator = InMemoryUidAllocator::new();

        assert_eq!(allocator.allocate("a"), 1);
        assert_eq!(allocator.allocate("b"), 1);
        assert_eq!(allocator.allocate("a"), 2);
        assert_eq!(allocator.allocate("b"), 2);
        assert_eq!(allocator.allocate("c"), 1);
    }

    #[test]
    fn reset_restarts_every_sequence() {
        let allocator = InMemoryUidAllocator::new();
        allocator.allocate("a");
        allocator.allocate("a");
        allocator.allocate("b");

        allocator.reset();

        assert_eq!(allocator.current("a"), None);
        assert_eq!(allocator.allocate("a"), 1);
        assert_eq!(allocator.allocate("b"), 1);
    }

    #[test]
    fn concurrent_allocations_form_a_gapless_range() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 500;

        let allocator = Arc::new(InMemoryUidAllocator::new());

        let handles = (0..THREADS)
            .map(|_| {
                let allocator = allocator.clone();
                thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| allocator.allocate("contended"))
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();

        let mut seen = HashSet::new();
        for handle in handles {
            for uid in handle.join().unwrap() {
                assert!(seen.insert(uid), "uid {uid} handed out twice");
            }
        }

        let total = (THREADS * PER_THREAD) as i64;
        assert_eq!(seen, (1..=total).collect::<HashSet<_>>());
        assert_eq!(allocator.current("contended"), Some(total));
    }

    #[test]
    fn usable_as_trait_object() {
        let allocator: Box<dyn UidAllocator> = Box::new(InMemoryUidAllocator::new());

        assert_eq!(allocator.allocate("x"), 1);
        allocator.reset();
        assert_eq!(allocator.allocate("x"), 1);
    }
}
