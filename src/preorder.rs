//! `PreorderCache<T>`: an incrementally-closed cache over an oracle-backed
//! preorder (subsumption, role hierarchy, ...). At all times the known
//! part is reflexive and transitively closed, and the possible part is
//! exactly the pairs not yet refuted and not yet implied by the known
//! part.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub struct PreorderCache<T: Eq + Hash + Clone> {
    domain: Vec<T>,
    known_succ: HashMap<T, HashSet<T>>,
    known_pred: HashMap<T, HashSet<T>>,
    possible_succ: HashMap<T, HashSet<T>>,
    possible_pred: HashMap<T, HashSet<T>>,
}

impl<T: Eq + Hash + Clone> Default for PreorderCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> PreorderCache<T> {
    pub fn new() -> Self {
        PreorderCache {
            domain: Vec::new(),
            known_succ: HashMap::new(),
            known_pred: HashMap::new(),
            possible_succ: HashMap::new(),
            possible_pred: HashMap::new(),
        }
    }

    /// Insert `x` into the domain if it isn't already present: `x` starts
    /// as its own sole known neighbor, with every other domain element
    /// possible in both directions.
    pub fn ensure(&mut self, x: &T) {
        if self.known_succ.contains_key(x) {
            return;
        }
        let mut self_set = HashSet::new();
        self_set.insert(x.clone());
        self.known_succ.insert(x.clone(), self_set.clone());
        self.known_pred.insert(x.clone(), self_set);

        let existing: HashSet<T> = self.domain.iter().cloned().collect();
        self.possible_succ.insert(x.clone(), existing.clone());
        self.possible_pred.insert(x.clone(), existing);

        for other in &self.domain {
            self.possible_succ.get_mut(other).unwrap().insert(x.clone());
            self.possible_pred.get_mut(other).unwrap().insert(x.clone());
        }
        self.domain.push(x.clone());
    }

    pub fn domain(&self) -> &[T] {
        &self.domain
    }

    /// `a ≤ b`? Consults `oracle` on neither a known-true nor known-false
    /// answer, caching the result and propagating transitive closure.
    pub fn query<E>(
        &mut self,
        a: &T,
        b: &T,
        oracle: impl FnOnce(&T, &T) -> Result<bool, E>,
    ) -> Result<bool, E> {
        self.ensure(a);
        self.ensure(b);
        if self.known_succ[a].contains(b) {
            return Ok(true);
        }
        if !self.possible_succ[a].contains(b) {
            return Ok(false);
        }
        let holds = oracle(a, b)?;
        if holds {
            self.assert(a, b);
        } else {
            self.deny(a, b);
        }
        Ok(holds)
    }

    fn link_known(&mut self, a: &T, b: &T) {
        self.known_succ.get_mut(a).unwrap().insert(b.clone());
        self.known_pred.get_mut(b).unwrap().insert(a.clone());
        self.possible_succ.get_mut(a).unwrap().remove(b);
        self.possible_pred.get_mut(b).unwrap().remove(a);
    }

    /// Force `a ≤ b` into the known relation, closing transitively.
    pub fn assert(&mut self, a: &T, b: &T) {
        self.ensure(a);
        self.ensure(b);
        if self.known_succ[a].contains(b) {
            return;
        }
        self.link_known(a, b);
        let preds: Vec<T> = self.known_pred[a].iter().cloned().collect();
        let succs: Vec<T> = self.known_succ[b].iter().cloned().collect();
        for p in &preds {
            for s in &succs {
                if !self.known_succ[p].contains(s) {
                    self.link_known(p, s);
                }
            }
        }
    }

    /// Force `a ≤ b` out of the possible relation, propagating the
    /// removal to every pair `(p, s)` with `p` a known predecessor of `a`
    /// and `s` a known successor of `b`.
    pub fn deny(&mut self, a: &T, b: &T) {
        self.ensure(a);
        self.ensure(b);
        let preds: Vec<T> = self.known_pred[a].iter().cloned().collect();
        let succs: Vec<T> = self.known_succ[b].iter().cloned().collect();
        for p in &preds {
            for s in &succs {
                self.possible_succ.get_mut(p).unwrap().remove(s);
                self.possible_pred.get_mut(s).unwrap().remove(p);
            }
        }
    }

    pub fn known_strict_succ<'a>(&'a self, x: &T) -> impl Iterator<Item = &'a T> + 'a {
        self.known_succ[x].iter().filter(move |y| *y != x)
    }

    pub fn known_strict_pred<'a>(&'a self, x: &T) -> impl Iterator<Item = &'a T> + 'a {
        self.known_pred[x].iter().filter(move |y| *y != x)
    }

    pub fn possible_strict_succ<'a>(&'a self, x: &T) -> impl Iterator<Item = &'a T> + 'a {
        self.possible_succ[x].iter()
    }

    pub fn possible_strict_pred<'a>(&'a self, x: &T) -> impl Iterator<Item = &'a T> + 'a {
        self.possible_pred[x].iter()
    }

    pub fn is_known_leq(&self, a: &T, b: &T) -> bool {
        self.known_succ.get(a).is_some_and(|s| s.contains(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitive_closure_propagates() {
        let mut cache: PreorderCache<&str> = PreorderCache::new();
        cache.assert(&"a", &"b");
        cache.assert(&"b", &"c");
        assert!(cache.is_known_leq(&"a", &"c"));
    }

    #[test]
    fn denial_removes_possibility_for_descendants() {
        let mut cache: PreorderCache<&str> = PreorderCache::new();
        cache.ensure(&"a");
        cache.ensure(&"b");
        cache.assert(&"x", &"a");
        cache.assert(&"b", &"y");
        cache.deny(&"a", &"b");
        assert!(!cache.possible_strict_succ(&"x").any(|v| *v == "y"));
    }

    #[test]
    fn query_consults_oracle_once_then_caches() {
        let mut cache: PreorderCache<&str> = PreorderCache::new();
        let mut calls = 0;
        let result: Result<bool, ()> = cache.query(&"a", &"b", |_, _| {
            calls += 1;
            Ok(true)
        });
        assert_eq!(result, Ok(true));
        assert!(cache.is_known_leq(&"a", &"b"));
        assert_eq!(calls, 1);
    }
}
