//! Weakening: repeatedly replace a "bad" axiom with one of its weaker
//! refinements (syntax-directed, via [`AxiomWeakener`]) until the goal
//! holds, instead of discarding information outright the way `Removal`
//! and the MCS strategies do.

use super::{choose_bad_axiom, BadAxiomStrategy, CancelToken, RepairGoal, RepairStrategy};
use crate::axiom::{Axiom, AxiomRecord};
use crate::axiom_refinement::AxiomWeakener;
use crate::error::{RepairError, RepairResult};
use crate::mcs::MaximalConsistentSubsets;
use crate::ontology::OntologyCore;
use crate::progress::ProgressSink;
use crate::refinement::RefinementFlags;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

/// How many shuffled-order MCS samples `SomeMcs`/`IntersectionOfSomeMcs`
/// draw before settling on a reference.
const REF_SAMPLE_SIZE: usize = 4;

/// Which maximal consistent subset of the refutable axioms is pinned down
/// as the reference ontology before weakening starts (only consulted when
/// [`Weakening::enhance_ref`] is set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefOntologyStrategy {
    /// The first correction set the BFS finds, in universe order.
    OneMcs,
    /// Uniformly random among every maximal consistent subset.
    RandomMcs,
    /// The first correction set found under a freshly shuffled universe
    /// order — a single sample, cheaper than enumerating all MCSes.
    SomeMcs,
    /// The MCS with the fewest axioms removed.
    LargestMcs,
    /// The intersection of every maximal consistent subset: axioms that
    /// survive in all of them.
    IntersectionOfMcs,
    /// The intersection of a sample of shuffled-order MCSes, rather than
    /// the exhaustive enumeration `IntersectionOfMcs` requires.
    IntersectionOfSomeMcs,
}

/// Builds a fresh consistency-under-`goal` predicate closure over `core`,
/// so it can be handed to more than one MCS search without the first
/// call consuming it.
fn goal_predicate<'a>(
    core: &'a OntologyCore,
    goal: &'a RepairGoal,
) -> impl FnMut(&[Arc<AxiomRecord>]) -> RepairResult<bool> + 'a {
    move |subset: &[Arc<AxiomRecord>]| -> RepairResult<bool> {
        let refutable: HashSet<Arc<AxiomRecord>> = subset.iter().cloned().collect();
        let probe = core.clone_with_refutable(refutable);
        goal.holds(&probe)
    }
}

/// Axioms common to every member of `sets`. `None` if `sets` is empty
/// (no MCS was found to intersect).
fn intersect_all(sets: Vec<Vec<Arc<AxiomRecord>>>) -> Option<Vec<Arc<AxiomRecord>>> {
    let mut iter = sets.into_iter();
    let first: HashSet<Arc<AxiomRecord>> = iter.next()?.into_iter().collect();
    let common = iter.fold(first, |acc, set| {
        let set: HashSet<Arc<AxiomRecord>> = set.into_iter().collect();
        acc.intersection(&set).cloned().collect()
    });
    Some(common.into_iter().collect())
}

pub struct Weakening {
    bad_axiom_strategy: BadAxiomStrategy,
    ref_strategy: RefOntologyStrategy,
    enhance_ref: bool,
    flags: RefinementFlags,
    max_rounds: usize,
    rng: StdRng,
}

impl Weakening {
    pub fn new(
        bad_axiom_strategy: BadAxiomStrategy,
        ref_strategy: RefOntologyStrategy,
        enhance_ref: bool,
        flags: RefinementFlags,
        max_rounds: usize,
        seed: u64,
    ) -> Self {
        Weakening {
            bad_axiom_strategy,
            ref_strategy,
            enhance_ref,
            flags,
            max_rounds,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One MCS found under a freshly shuffled ordering of `universe`.
    fn shuffled_mcs(
        &mut self,
        universe: &[Arc<AxiomRecord>],
        core: &OntologyCore,
        goal: &RepairGoal,
    ) -> RepairResult<Option<Vec<Arc<AxiomRecord>>>> {
        use rand::seq::SliceRandom;
        let mut shuffled = universe.to_vec();
        shuffled.shuffle(&mut self.rng);
        MaximalConsistentSubsets::new(&shuffled).some_mcs(goal_predicate(core, goal))
    }

    /// Promote whichever MCS `ref_strategy` names from refutable to
    /// static, so later rounds treat it as fixed ground and only ever
    /// refine axioms outside it. A no-op if no MCS satisfying the current
    /// goal exists (weakening then proceeds unpinned).
    fn pin_reference(&mut self, core: &mut OntologyCore, goal: &RepairGoal) -> RepairResult<()> {
        let universe: Vec<Arc<AxiomRecord>> = core.refutable_axioms().iter().cloned().collect();
        let reference = match self.ref_strategy {
            RefOntologyStrategy::OneMcs => {
                MaximalConsistentSubsets::new(&universe).some_mcs(goal_predicate(core, goal))?
            }
            RefOntologyStrategy::LargestMcs => {
                MaximalConsistentSubsets::new(&universe).largest_mcs(goal_predicate(core, goal))?
            }
            RefOntologyStrategy::RandomMcs => {
                use rand::seq::SliceRandom;
                let all = MaximalConsistentSubsets::new(&universe)
                    .maximal_consistent_subsets(goal_predicate(core, goal))?;
                all.choose(&mut self.rng).cloned()
            }
            RefOntologyStrategy::SomeMcs => self.shuffled_mcs(&universe, core, goal)?,
            RefOntologyStrategy::IntersectionOfMcs => {
                let all = MaximalConsistentSubsets::new(&universe)
                    .maximal_consistent_subsets(goal_predicate(core, goal))?;
                intersect_all(all)
            }
            RefOntologyStrategy::IntersectionOfSomeMcs => {
                let mut samples = Vec::new();
                for _ in 0..REF_SAMPLE_SIZE {
                    if let Some(mcs) = self.shuffled_mcs(&universe, core, goal)? {
                        samples.push(mcs);
                    }
                }
                intersect_all(samples)
            }
        };
        if let Some(reference) = reference {
            for record in reference {
                core.promote_to_static(&record);
            }
        }
        Ok(())
    }
}

impl RepairStrategy for Weakening {
    fn repair(
        &mut self,
        core: &mut OntologyCore,
        goal: &RepairGoal,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> RepairResult<()> {
        if self.enhance_ref {
            self.pin_reference(core, goal)?;
        }

        let mut rounds = 0usize;
        while !goal.holds(core)? {
            cancel.check()?;
            rounds += 1;
            if rounds > self.max_rounds {
                return Err(RepairError::ResourceExhausted);
            }

            let bad = choose_bad_axiom(core, goal, self.bad_axiom_strategy, &mut self.rng)?
                .ok_or(RepairError::NotReparable)?;
            let weaker = AxiomWeakener::new(core, self.flags).weaker_axioms(&bad.axiom)?;
            let candidates: Vec<Axiom> =
                weaker.into_iter().filter(|a| a != &bad.axiom).collect();
            if candidates.is_empty() {
                return Err(RepairError::NotReparable);
            }
            let chosen = candidates[self.rng.gen_range(0..candidates.len())].clone();
            progress.report(format!("weakening `{}` to `{}`", bad.axiom, chosen));
            core.replace(&bad, [chosen]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::Concept;
    use crate::entities::{Class, NamedIndividual};
    use crate::local_oracle::LocalOracle;
    use crate::oracle::ReasonerCache;
    use crate::repair::apply;

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    #[test]
    fn weakening_repairs_unsat_singleton_without_losing_all_information() {
        let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
        core.add(Axiom::SubClassOf(atom("A"), atom("B")));
        core.add(Axiom::SubClassOf(
            atom("A"),
            Concept::Complement(Box::new(atom("B"))),
        ));
        core.add(Axiom::ClassAssertion(
            atom("A"),
            NamedIndividual::new("http://example.org/a"),
        ));

        let goal = RepairGoal::Consistency;
        let mut strategy = Weakening::new(
            BadAxiomStrategy::InOneMus,
            RefOntologyStrategy::OneMcs,
            false,
            RefinementFlags::default(),
            32,
            3,
        );
        apply(
            &mut core,
            &goal,
            &mut strategy,
            &crate::progress::NullProgressSink,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(core.is_consistent().unwrap());
        // Weakening never discards an axiom outright, it only replaces it.
        assert_eq!(core.len(), 3);
    }

    #[test]
    fn enhance_ref_pins_an_mcs_to_static_before_weakening() {
        let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
        core.add(Axiom::SubClassOf(atom("A"), atom("B")));
        core.add(Axiom::SubClassOf(
            atom("A"),
            Concept::Complement(Box::new(atom("B"))),
        ));
        core.add(Axiom::ClassAssertion(
            atom("A"),
            NamedIndividual::new("http://example.org/a"),
        ));

        let goal = RepairGoal::Consistency;
        let mut strategy = Weakening::new(
            BadAxiomStrategy::Random,
            RefOntologyStrategy::LargestMcs,
            true,
            RefinementFlags::default(),
            32,
            9,
        );
        apply(
            &mut core,
            &goal,
            &mut strategy,
            &crate::progress::NullProgressSink,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(core.is_consistent().unwrap());
        assert!(!core.static_axioms().is_empty());
    }

    #[test]
    fn intersection_of_mcs_pins_axioms_common_to_every_correction_set() {
        // Three pairwise-disjoint classes, one individual asserted in all
        // three: { C1, C2, C3 } pairwise disjoint plus one ClassAssertion
        // per class gives three size-1 MCSes (drop exactly one
        // ClassAssertion each), so their intersection is empty and
        // `enhance_ref` should leave every refutable axiom unpinned.
        let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
        let a = NamedIndividual::new("http://example.org/a");
        core.add(Axiom::DisjointClasses(vec![atom("C1"), atom("C2"), atom("C3")]));
        core.add(Axiom::ClassAssertion(atom("C1"), a.clone()));
        core.add(Axiom::ClassAssertion(atom("C2"), a.clone()));
        core.add(Axiom::ClassAssertion(atom("C3"), a));

        let goal = RepairGoal::Consistency;
        let mut strategy = Weakening::new(
            BadAxiomStrategy::Random,
            RefOntologyStrategy::IntersectionOfMcs,
            true,
            RefinementFlags::default(),
            64,
            5,
        );
        apply(
            &mut core,
            &goal,
            &mut strategy,
            &crate::progress::NullProgressSink,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(core.is_consistent().unwrap());
    }

    #[test]
    fn random_mcs_reference_strategy_repairs_unsat_singleton() {
        let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
        core.add(Axiom::SubClassOf(atom("A"), atom("B")));
        core.add(Axiom::SubClassOf(
            atom("A"),
            Concept::Complement(Box::new(atom("B"))),
        ));
        core.add(Axiom::ClassAssertion(
            atom("A"),
            NamedIndividual::new("http://example.org/a"),
        ));

        let goal = RepairGoal::Consistency;
        let mut strategy = Weakening::new(
            BadAxiomStrategy::Random,
            RefOntologyStrategy::RandomMcs,
            true,
            RefinementFlags::default(),
            32,
            7,
        );
        apply(
            &mut core,
            &goal,
            &mut strategy,
            &crate::progress::NullProgressSink,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(core.is_consistent().unwrap());
    }
}
