//! BestOfKWeakening: run `k` independent [`Weakening`] attempts in
//! parallel (each with its own seed and its own oracle cache, so workers
//! never serialize against each other), then keep whichever repaired
//! ontology scores best under [`quality_score`].

use super::weakening::{RefOntologyStrategy, Weakening};
use super::{apply, quality_score, BadAxiomStrategy, CancelToken, RepairGoal, RepairStrategy};
use crate::error::{RepairError, RepairResult};
use crate::ontology::OntologyCore;
use crate::progress::{NullProgressSink, ProgressSink};
use crate::refinement::RefinementFlags;
use rayon::prelude::*;

pub struct BestOfKWeakening {
    k: usize,
    bad_axiom_strategy: BadAxiomStrategy,
    ref_strategy: RefOntologyStrategy,
    enhance_ref: bool,
    flags: RefinementFlags,
    max_rounds: usize,
    seed: u64,
}

impl BestOfKWeakening {
    pub fn new(
        k: usize,
        bad_axiom_strategy: BadAxiomStrategy,
        ref_strategy: RefOntologyStrategy,
        enhance_ref: bool,
        flags: RefinementFlags,
        max_rounds: usize,
        seed: u64,
    ) -> Self {
        BestOfKWeakening {
            k,
            bad_axiom_strategy,
            ref_strategy,
            enhance_ref,
            flags,
            max_rounds,
            seed,
        }
    }

    /// Like [`BestOfKWeakening::new`], but sizes `k` to the available
    /// parallelism instead of taking it explicitly — workers beyond that
    /// count would only contend for cores rayon has already saturated.
    pub fn with_default_k(
        bad_axiom_strategy: BadAxiomStrategy,
        ref_strategy: RefOntologyStrategy,
        enhance_ref: bool,
        flags: RefinementFlags,
        max_rounds: usize,
        seed: u64,
    ) -> Self {
        BestOfKWeakening::new(
            num_cpus::get(),
            bad_axiom_strategy,
            ref_strategy,
            enhance_ref,
            flags,
            max_rounds,
            seed,
        )
    }
}

impl RepairStrategy for BestOfKWeakening {
    fn repair(
        &mut self,
        core: &mut OntologyCore,
        goal: &RepairGoal,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> RepairResult<()> {
        let bad_axiom_strategy = self.bad_axiom_strategy;
        let ref_strategy = self.ref_strategy;
        let enhance_ref = self.enhance_ref;
        let flags = self.flags;
        let max_rounds = self.max_rounds;
        let base_seed = self.seed;

        let attempts: Vec<RepairResult<OntologyCore>> = (0..self.k)
            .into_par_iter()
            .map(|i| -> RepairResult<OntologyCore> {
                cancel.check()?;
                let mut worker_core = core.clone_with_separate_cache();
                let mut worker_strategy = Weakening::new(
                    bad_axiom_strategy,
                    ref_strategy,
                    enhance_ref,
                    flags,
                    max_rounds,
                    base_seed.wrapping_add(i as u64),
                );
                apply(
                    &mut worker_core,
                    goal,
                    &mut worker_strategy,
                    &NullProgressSink,
                    cancel,
                )?;
                Ok(worker_core)
            })
            .collect();

        let mut best: Option<(OntologyCore, u64)> = None;
        let mut last_err: Option<RepairError> = None;
        for attempt in attempts {
            match attempt {
                Ok(candidate) => {
                    let score = quality_score(&candidate)?;
                    let replace = best.as_ref().map(|(_, s)| score > *s).unwrap_or(true);
                    if replace {
                        best = Some((candidate, score));
                    }
                }
                Err(RepairError::Cancelled) => return Err(RepairError::Cancelled),
                Err(e) => last_err = Some(e),
            }
        }

        match best {
            Some((candidate, score)) => {
                progress.report(format!(
                    "best of {} weakening workers scored {score}",
                    self.k
                ));
                *core = candidate;
                Ok(())
            }
            None => Err(last_err.unwrap_or(RepairError::NotReparable)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::Axiom;
    use crate::concept::Concept;
    use crate::entities::{Class, NamedIndividual};
    use crate::local_oracle::LocalOracle;
    use crate::oracle::ReasonerCache;
    use std::sync::Arc;

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    #[test]
    fn best_of_k_repairs_unsat_singleton() {
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
        let mut strategy = BestOfKWeakening::new(
            4,
            BadAxiomStrategy::InOneMus,
            RefOntologyStrategy::OneMcs,
            false,
            RefinementFlags::default(),
            32,
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
}
