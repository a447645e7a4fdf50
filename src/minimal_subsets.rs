//! Find (all) minimal subsets of a universe satisfying a monotone
//! predicate `P` (`P(S) ⟹ P(S') for all S' ⊇ S`), plus minimal hitting
//! sets. Search runs over index sets (`usize`) internally so it applies
//! to any element type without requiring an `Ord` bound on it.

use crate::set_of_sets::SetOfSets;
use std::collections::VecDeque;

/// QuickXPlain/Progression: the classic recursive divide-and-conquer
/// search for a single minimal conflict. `background` is assumed already
/// forced in; the result is a minimal subset of `candidates` such that
/// `predicate(background ∪ result)` holds, given that
/// `predicate(background ∪ candidates)` holds and `predicate(background)`
/// does not.
fn quick_xplain<E>(
    background: &[usize],
    candidates: &[usize],
    predicate: &mut impl FnMut(&[usize]) -> Result<bool, E>,
) -> Result<Vec<usize>, E> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }
    let mut combined = background.to_vec();
    combined.extend_from_slice(candidates);
    if predicate(background)? {
        return Ok(Vec::new());
    }
    if candidates.len() == 1 {
        return Ok(candidates.to_vec());
    }
    let mid = candidates.len() / 2;
    let (c1, c2) = candidates.split_at(mid);

    let mut b_plus_c1 = background.to_vec();
    b_plus_c1.extend_from_slice(c1);
    let d1 = quick_xplain(&b_plus_c1, c2, predicate)?;

    let mut b_plus_d1 = background.to_vec();
    b_plus_d1.extend_from_slice(&d1);
    let d2 = quick_xplain(&b_plus_d1, c1, predicate)?;

    let mut result = d1;
    result.extend(d2);
    Ok(result)
}

/// A monotone-predicate search scoped to a fixed universe of elements.
pub struct MinimalSubsets<'a, T> {
    universe: &'a [T],
}

impl<'a, T: Clone> MinimalSubsets<'a, T> {
    pub fn new(universe: &'a [T]) -> Self {
        MinimalSubsets { universe }
    }

    fn indices(&self) -> Vec<usize> {
        (0..self.universe.len()).collect()
    }

    fn materialize(&self, indices: &[usize]) -> Vec<T> {
        indices.iter().map(|&i| self.universe[i].clone()).collect()
    }

    fn index_predicate<E>(
        &self,
        mut predicate: impl FnMut(&[T]) -> Result<bool, E>,
    ) -> impl FnMut(&[usize]) -> Result<bool, E> + '_ {
        move |idx: &[usize]| predicate(&self.materialize(idx))
    }

    /// A single minimal subset satisfying `predicate`, or `None` if the
    /// whole universe does not.
    pub fn single_minimal<E>(
        &self,
        mut predicate: impl FnMut(&[T]) -> Result<bool, E>,
    ) -> Result<Option<Vec<T>>, E> {
        let universe_holds = predicate(self.universe)?;
        if !universe_holds {
            return Ok(None);
        }
        let mut wrapped = self.index_predicate(predicate);
        let result = quick_xplain(&[], &self.indices(), &mut wrapped)?;
        Ok(Some(self.materialize(&result)))
    }

    /// Up to `k` distinct minimal subsets, found by re-running
    /// QuickXPlain over `k` shuffled orderings of the universe and
    /// deduplicating.
    pub fn many_minimal<E>(
        &self,
        k: usize,
        mut predicate: impl FnMut(&[T]) -> Result<bool, E>,
    ) -> Result<Vec<Vec<T>>, E>
    where
        T: Ord + std::hash::Hash,
    {
        if !predicate(self.universe)? {
            return Ok(Vec::new());
        }
        let mut found: SetOfSets<usize> = SetOfSets::new();
        let mut results = Vec::new();
        let base = self.indices();
        for attempt in 0..k.max(1) {
            let mut order = base.clone();
            rotate(&mut order, attempt);
            let mut wrapped = self.index_predicate(&mut predicate);
            let mset = quick_xplain(&[], &order, &mut wrapped)?;
            if found.insert(mset.clone()) {
                results.push(self.materialize(&mset));
            }
        }
        Ok(results)
    }

    /// Every minimal subset satisfying `predicate`, found by a Reiter-style
    /// hitting-set tree: each discovered minimal set branches into one
    /// child per element (excluding that element), pruned whenever the
    /// current path already contains a previously found minimal set.
    pub fn all_minimal<E>(
        &self,
        mut predicate: impl FnMut(&[T]) -> Result<bool, E>,
    ) -> Result<Vec<Vec<T>>, E> {
        let mut found: Vec<Vec<usize>> = Vec::new();
        let mut queue: VecDeque<Vec<usize>> = VecDeque::new();
        queue.push_back(Vec::new());

        while let Some(excluded) = queue.pop_front() {
            if found.iter().any(|m| m.iter().all(|e| excluded.contains(e))) {
                continue;
            }
            let candidates: Vec<usize> = self
                .indices()
                .into_iter()
                .filter(|i| !excluded.contains(i))
                .collect();
            if !predicate(&self.materialize(&candidates))? {
                continue;
            }
            let mut wrapped = self.index_predicate(&mut predicate);
            let mset = quick_xplain(&[], &candidates, &mut wrapped)?;
            if mset.is_empty() || found.iter().any(|m| *m == mset) {
                continue;
            }
            for elem in &mset {
                let mut child = excluded.clone();
                child.push(*elem);
                queue.push_back(child);
            }
            found.push(mset);
        }
        Ok(found.into_iter().map(|m| self.materialize(&m)).collect())
    }
}

fn rotate(v: &mut [usize], by: usize) {
    if v.is_empty() {
        return;
    }
    let by = by % v.len();
    v.rotate_left(by);
}

/// Minimal hitting sets of a family of sets: every minimal `H` such that
/// `H` intersects every set in `families`.
pub fn minimal_hitting_sets<T: Clone + Eq + std::hash::Hash>(families: &[Vec<T>]) -> Vec<Vec<T>> {
    let universe: Vec<T> = {
        let mut seen = std::collections::HashSet::new();
        let mut u = Vec::new();
        for f in families {
            for e in f {
                if seen.insert(e.clone()) {
                    u.push(e.clone());
                }
            }
        }
        u
    };
    let search = MinimalSubsets::new(&universe);
    // A hitting set H satisfies P(H) iff H intersects every family — a
    // monotone predicate: adding elements can only add intersections.
    let predicate = |candidate: &[T]| -> Result<bool, std::convert::Infallible> {
        let set: std::collections::HashSet<&T> = candidate.iter().collect();
        Ok(families.iter().all(|f| f.iter().any(|e| set.contains(e))))
    };
    search.all_minimal(predicate).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_minimal_finds_smallest_conflict() {
        let universe = vec![1, 2, 3, 4];
        let search = MinimalSubsets::new(&universe);
        // predicate holds iff the subset contains both 2 and 3.
        let predicate =
            |s: &[i32]| -> Result<bool, std::convert::Infallible> { Ok(s.contains(&2) && s.contains(&3)) };
        let result = search.single_minimal(predicate).unwrap().unwrap();
        let mut sorted = result;
        sorted.sort();
        assert_eq!(sorted, vec![2, 3]);
    }

    #[test]
    fn single_minimal_is_none_when_universe_fails() {
        let universe = vec![1, 2];
        let search = MinimalSubsets::new(&universe);
        let predicate = |_: &[i32]| -> Result<bool, std::convert::Infallible> { Ok(false) };
        assert!(search.single_minimal(predicate).unwrap().is_none());
    }

    #[test]
    fn all_minimal_finds_every_disjoint_conflict() {
        let universe = vec![1, 2, 3, 4];
        let search = MinimalSubsets::new(&universe);
        // holds iff subset contains {1,2} or {3,4}.
        let predicate = |s: &[i32]| -> Result<bool, std::convert::Infallible> {
            let has = |a: i32, b: i32| s.contains(&a) && s.contains(&b);
            Ok(has(1, 2) || has(3, 4))
        };
        let mut results = search.all_minimal(predicate).unwrap();
        for r in &mut results {
            r.sort();
        }
        results.sort();
        assert_eq!(results, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn minimal_hitting_sets_of_two_disjoint_pairs() {
        let families = vec![vec![1, 2], vec![3, 4]];
        let mut hs = minimal_hitting_sets(&families);
        for h in &mut hs {
            h.sort();
        }
        hs.sort();
        assert!(hs.contains(&vec![1, 3]));
        assert!(hs.contains(&vec![2, 4]));
    }
}
