//! The reasoner oracle boundary and the reference-counted, diffing
//! [`ReasonerCache`] facade in front of it.

use crate::axiom::Axiom;
use crate::concept::Concept;
use crate::error::{OwlError, OwlResult};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// A live handle to a classified reasoner instance, bound to a snapshot of
/// axioms at the time `classify` was called.
pub trait ReasonerHandle: Send {
    /// Apply an in-place delta to the reasoner's axiom set.
    fn flush(&mut self, additions: &[Axiom], removals: &[Axiom]) -> OwlResult<()>;

    fn is_consistent(&mut self) -> OwlResult<bool>;

    fn is_entailed(&mut self, axiom: &Axiom) -> OwlResult<bool>;

    fn is_satisfiable(&mut self, concept: &Concept) -> OwlResult<bool>;

    /// Release any external resources. Called exactly once, when the last
    /// handle to a given reasoner instance is dropped.
    fn dispose(&mut self);
}

/// A reasoner oracle: given a snapshot of axioms, produces a handle to a
/// classified reasoner instance. Implementations may be a remote OWL-API
/// bridge, an in-process DL reasoner, or (for tests) [`crate::local_oracle::LocalOracle`].
pub trait ReasonerOracle: Send + Sync {
    fn classify(&self, axioms: &HashSet<Axiom>) -> OwlResult<Box<dyn ReasonerHandle>>;
}

struct ReasonerCacheInner {
    oracle: Arc<dyn ReasonerOracle>,
    handle: Option<Box<dyn ReasonerHandle>>,
    current: HashSet<Axiom>,
}

impl Drop for ReasonerCacheInner {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.dispose();
        }
    }
}

/// Reference-counted wrapper around an external reasoner. Diffs the axiom
/// set between calls so only the symmetric difference is sent to
/// `flush`, avoiding a full re-classification on every query. Cloning a
/// `ReasonerCache` shares the same hot
/// instance and the same single-writer lock — callers that want
/// concurrent oracle access must call [`ReasonerCache::clone_with_separate_cache`].
#[derive(Clone)]
pub struct ReasonerCache {
    inner: Arc<Mutex<ReasonerCacheInner>>,
}

impl ReasonerCache {
    pub fn new(oracle: Arc<dyn ReasonerOracle>) -> Self {
        ReasonerCache {
            inner: Arc::new(Mutex::new(ReasonerCacheInner {
                oracle,
                handle: None,
                current: HashSet::new(),
            })),
        }
    }

    /// A fresh, independent cache over the same oracle implementation —
    /// used by `BestOfKWeakening`/`MctsWeakening` workers so their oracle
    /// calls don't serialize against each other or the main ontology.
    pub fn clone_with_separate_cache(&self) -> Self {
        let oracle = self.inner.lock().oracle.clone();
        ReasonerCache::new(oracle)
    }

    /// Run `f` against a hot reasoner handle classified over `axioms`,
    /// creating the handle on first use and flushing only the delta on
    /// subsequent calls.
    pub fn with_reasoner<T>(
        &self,
        axioms: &HashSet<Axiom>,
        f: impl FnOnce(&mut dyn ReasonerHandle) -> OwlResult<T>,
    ) -> OwlResult<T> {
        let mut inner = self.inner.lock();
        if inner.handle.is_none() {
            let handle = inner.oracle.classify(axioms)?;
            inner.handle = Some(handle);
            inner.current = axioms.clone();
        } else {
            let additions: Vec<Axiom> = axioms.difference(&inner.current).cloned().collect();
            let removals: Vec<Axiom> = inner.current.difference(axioms).cloned().collect();
            if !additions.is_empty() || !removals.is_empty() {
                let handle = inner.handle.as_deref_mut().unwrap();
                handle.flush(&additions, &removals)?;
                inner.current = axioms.clone();
            }
        }
        let handle = inner
            .handle
            .as_deref_mut()
            .ok_or_else(|| OwlError::OracleError("no live reasoner handle".into()))?;
        f(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_oracle::LocalOracle;

    #[test]
    fn reasoner_cache_diffs_between_calls() {
        let oracle = Arc::new(LocalOracle::default());
        let cache = ReasonerCache::new(oracle);
        let mut axioms: HashSet<Axiom> = HashSet::new();
        let a = Axiom::SubClassOf(Concept::Top, Concept::Top);
        axioms.insert(a.clone());

        let r1 = cache
            .with_reasoner(&axioms, |h| h.is_consistent())
            .unwrap();
        assert!(r1);

        axioms.insert(Axiom::SubClassOf(Concept::Bottom, Concept::Top));
        let r2 = cache
            .with_reasoner(&axioms, |h| h.is_consistent())
            .unwrap();
        assert!(r2);
    }

    #[test]
    fn separate_cache_gets_independent_handle() {
        let oracle = Arc::new(LocalOracle::default());
        let cache = ReasonerCache::new(oracle);
        let axioms: HashSet<Axiom> = HashSet::new();
        cache.with_reasoner(&axioms, |h| h.is_consistent()).unwrap();

        let other = cache.clone_with_separate_cache();
        // Independent: has not yet classified, so its own first call
        // bootstraps a fresh handle rather than reusing `cache`'s.
        assert!(other.with_reasoner(&axioms, |h| h.is_consistent()).unwrap());
    }
}
