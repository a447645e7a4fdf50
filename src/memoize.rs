//! Generic function memoization.
//!
//! Two flavors are provided:
//!
//! - [`Memoizer`]: bounded-or-unbounded memoization of a pure `K -> V`
//!   function, backed by a [`dashmap::DashMap`] so concurrent readers
//!   (BestOfK/MCTS workers) never block each other on a hit.
//! - [`StreamMemo`]: a stream-to-list adapter for functions that return a
//!   lazy iterator. The first call materializes the iterator into a
//!   shared `Vec`; subsequent calls for the same key return cheap clones
//!   of that `Vec`'s `Arc`. This is what lets [`crate::covers::Cover`]
//!   promise "cover results must be stable for a given reference ontology"
//!   without re-walking the preorder on every call.

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Memoizes a pure function `K -> V`. `max_size = None` means unbounded;
/// `Some(n)` evicts an arbitrary entry once the map exceeds `n` keys (a
/// simple cap, not a true LRU — the covers this backs are idempotent and
/// cheap enough to recompute on a rare eviction miss).
pub struct Memoizer<K, V> {
    map: DashMap<K, V>,
    max_size: Option<usize>,
}

impl<K: Eq + Hash + Clone, V: Clone> Memoizer<K, V> {
    pub fn unbounded() -> Self {
        Memoizer {
            map: DashMap::new(),
            max_size: None,
        }
    }

    pub fn bounded(max_size: usize) -> Self {
        Memoizer {
            map: DashMap::new(),
            max_size: Some(max_size),
        }
    }

    /// Return the memoized value for `key`, computing and storing it via
    /// `f` on a miss.
    pub fn get_or_compute<F: FnOnce() -> V>(&self, key: K, f: F) -> V {
        if let Some(v) = self.map.get(&key) {
            return v.clone();
        }
        let value = f();
        if let Some(max) = self.max_size {
            if self.map.len() >= max {
                // Evict an arbitrary entry to keep the map bounded.
                if let Some(evict_key) = self.map.iter().next().map(|e| e.key().clone()) {
                    self.map.remove(&evict_key);
                }
            }
        }
        self.map.insert(key, value.clone());
        value
    }

    pub fn invalidate(&self, key: &K) {
        self.map.remove(key);
    }

    pub fn clear(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Adapts an iterator-returning function into one that memoizes a
/// materialized list, so callers that need to scan a result set twice
/// don't have to re-run the underlying (possibly expensive, oracle-backed)
/// computation.
pub struct StreamMemo<K, V> {
    inner: Memoizer<K, Arc<Vec<V>>>,
}

impl<K: Eq + Hash + Clone, V: Clone> StreamMemo<K, V> {
    pub fn unbounded() -> Self {
        StreamMemo {
            inner: Memoizer::unbounded(),
        }
    }

    pub fn bounded(max_size: usize) -> Self {
        StreamMemo {
            inner: Memoizer::bounded(max_size),
        }
    }

    /// Materialize `f()`'s iterator once per `key`, returning a cheap
    /// `Arc` clone of the cached list thereafter.
    pub fn get_or_stream<I, F>(&self, key: K, f: F) -> Arc<Vec<V>>
    where
        I: Iterator<Item = V>,
        F: FnOnce() -> I,
    {
        self.inner
            .get_or_compute(key, || Arc::new(f().collect::<Vec<_>>()))
    }

    pub fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn memoizer_computes_once_per_key() {
        let calls = AtomicUsize::new(0);
        let memo: Memoizer<u32, u32> = Memoizer::unbounded();
        let compute = |n: u32| {
            calls.fetch_add(1, Ordering::SeqCst);
            n * 2
        };
        assert_eq!(memo.get_or_compute(5, || compute(5)), 10);
        assert_eq!(memo.get_or_compute(5, || compute(5)), 10);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stream_memo_materializes_once() {
        let calls = AtomicUsize::new(0);
        let memo: StreamMemo<&str, i32> = StreamMemo::unbounded();
        let make = || {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![1, 2, 3].into_iter()
        };
        let first = memo.get_or_stream("k", make);
        let second = memo.get_or_stream("k", make);
        assert_eq!(*first, vec![1, 2, 3]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
