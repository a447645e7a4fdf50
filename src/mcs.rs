//! Maximal consistent subsets, found as the complements of minimal
//! correction sets via a pruned BFS over "axioms already removed".

use crate::minimal_subsets::MinimalSubsets;
use crate::set_of_sets::SetOfSets;
use std::collections::VecDeque;

pub struct MaximalConsistentSubsets<'a, T> {
    universe: &'a [T],
}

impl<'a, T: Clone> MaximalConsistentSubsets<'a, T> {
    pub fn new(universe: &'a [T]) -> Self {
        MaximalConsistentSubsets { universe }
    }

    fn materialize(&self, indices: &[usize]) -> Vec<T> {
        indices.iter().map(|&i| self.universe[i].clone()).collect()
    }

    /// Returns `(removed, complement)` pairs: `removed` is a minimal
    /// correction set and `complement = universe \ removed` is the
    /// corresponding maximal consistent subset.
    fn search<E>(
        &self,
        mut predicate: impl FnMut(&[T]) -> Result<bool, E>,
        stop_at_first: bool,
        largest_only: bool,
    ) -> Result<Vec<(Vec<usize>, Vec<usize>)>, E> {
        let n = self.universe.len();
        let mut queue: VecDeque<(usize, Vec<usize>)> = VecDeque::new();
        queue.push_back((0, Vec::new()));
        let mut correction_sets: SetOfSets<usize> = SetOfSets::new();
        let mut results: Vec<(Vec<usize>, Vec<usize>)> = Vec::new();
        let mut best_size: Option<usize> = None;

        while let Some((k, removed)) = queue.pop_front() {
            if correction_sets.contains_subset(&removed) {
                continue;
            }
            if let Some(best) = best_size {
                if largest_only && removed.len() > best {
                    continue;
                }
            }
            let complement: Vec<usize> = (0..n).filter(|i| !removed.contains(i)).collect();
            let complement_axioms = self.materialize(&complement);
            if predicate(&complement_axioms)? {
                correction_sets.insert(removed.clone());
                if best_size.map_or(true, |b| removed.len() < b) {
                    best_size = Some(removed.len());
                }
                results.push((removed, complement));
                if stop_at_first {
                    return Ok(results);
                }
                continue;
            }
            for i in k..n {
                if removed.contains(&i) {
                    continue;
                }
                let mut child = removed.clone();
                child.push(i);
                queue.push_back((i + 1, child));
            }
        }
        Ok(results)
    }

    pub fn maximal_consistent_subsets<E>(
        &self,
        predicate: impl FnMut(&[T]) -> Result<bool, E>,
    ) -> Result<Vec<Vec<T>>, E> {
        let found = self.search(predicate, false, false)?;
        Ok(found.into_iter().map(|(_, c)| self.materialize(&c)).collect())
    }

    pub fn some_mcs<E>(
        &self,
        predicate: impl FnMut(&[T]) -> Result<bool, E>,
    ) -> Result<Option<Vec<T>>, E> {
        let found = self.search(predicate, true, false)?;
        Ok(found.into_iter().next().map(|(_, c)| self.materialize(&c)))
    }

    pub fn largest_mcs<E>(
        &self,
        predicate: impl FnMut(&[T]) -> Result<bool, E>,
    ) -> Result<Option<Vec<T>>, E> {
        let found = self.search(predicate, false, true)?;
        Ok(found
            .into_iter()
            .max_by_key(|(_, c)| c.len())
            .map(|(_, c)| self.materialize(&c)))
    }

    pub fn minimal_correction_subsets<E>(
        &self,
        predicate: impl FnMut(&[T]) -> Result<bool, E>,
    ) -> Result<Vec<Vec<T>>, E> {
        let found = self.search(predicate, false, false)?;
        Ok(found.into_iter().map(|(r, _)| self.materialize(&r)).collect())
    }

    /// A single minimal unsatisfiable subset, given a predicate that
    /// tests whether a subset is *inconsistent* (monotone: superset of an
    /// inconsistent subset is inconsistent).
    pub fn minimal_unsatisfiable_subset<E>(
        &self,
        predicate_inconsistent: impl FnMut(&[T]) -> Result<bool, E>,
    ) -> Result<Option<Vec<T>>, E> {
        MinimalSubsets::new(self.universe).single_minimal(predicate_inconsistent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consistent(s: &[i32]) -> Result<bool, std::convert::Infallible> {
        // inconsistent iff both 1 and 2 are present.
        Ok(!(s.contains(&1) && s.contains(&2)))
    }

    #[test]
    fn maximal_consistent_subsets_exclude_one_of_the_conflicting_pair() {
        let universe = vec![1, 2, 3];
        let search = MaximalConsistentSubsets::new(&universe);
        let mut results = search.maximal_consistent_subsets(consistent).unwrap();
        for r in &mut results {
            r.sort();
        }
        results.sort();
        assert_eq!(results, vec![vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn largest_mcs_picks_the_smaller_correction_set() {
        let universe = vec![1, 2, 3];
        let search = MaximalConsistentSubsets::new(&universe);
        let mut largest = search.largest_mcs(consistent).unwrap().unwrap();
        largest.sort();
        assert_eq!(largest.len(), 2);
    }

    #[test]
    fn minimal_unsatisfiable_subset_finds_the_conflicting_pair() {
        let universe = vec![1, 2, 3];
        let search = MaximalConsistentSubsets::new(&universe);
        let inconsistent = |s: &[i32]| -> Result<bool, std::convert::Infallible> {
            Ok(s.contains(&1) && s.contains(&2))
        };
        let mut mus = search.minimal_unsatisfiable_subset(inconsistent).unwrap().unwrap();
        mus.sort();
        assert_eq!(mus, vec![1, 2]);
    }
}
