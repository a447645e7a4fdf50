//! RandomMcs: compute one maximal consistent subset of the refutable
//! axioms (per [`McsComputationStrategy`]) and keep it, discarding every
//! refutable axiom outside it in a single step.

use super::{CancelToken, McsComputationStrategy, RepairGoal, RepairStrategy};
use crate::axiom::AxiomRecord;
use crate::error::{RepairError, RepairResult};
use crate::mcs::MaximalConsistentSubsets;
use crate::ontology::OntologyCore;
use crate::progress::ProgressSink;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

pub struct RandomMcs {
    strategy: McsComputationStrategy,
    rng: StdRng,
}

impl RandomMcs {
    pub fn new(strategy: McsComputationStrategy, seed: u64) -> Self {
        RandomMcs {
            strategy,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RepairStrategy for RandomMcs {
    fn repair(
        &mut self,
        core: &mut OntologyCore,
        goal: &RepairGoal,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> RepairResult<()> {
        cancel.check()?;
        let universe: Vec<Arc<AxiomRecord>> = core.refutable_axioms().iter().cloned().collect();
        let predicate = |subset: &[Arc<AxiomRecord>]| -> RepairResult<bool> {
            let refutable: HashSet<Arc<AxiomRecord>> = subset.iter().cloned().collect();
            let probe = core.clone_with_refutable(refutable);
            goal.holds(&probe)
        };
        let search = MaximalConsistentSubsets::new(&universe);

        let chosen = match self.strategy {
            McsComputationStrategy::OneMcs => search.some_mcs(predicate)?,
            McsComputationStrategy::SomeMcs | McsComputationStrategy::AllMcs => {
                let all = search.maximal_consistent_subsets(predicate)?;
                all.choose(&mut self.rng).cloned()
            }
        };
        let kept = chosen.ok_or(RepairError::NotReparable)?;
        let kept_set: HashSet<Arc<AxiomRecord>> = kept.into_iter().collect();

        for record in universe {
            if !kept_set.contains(&record) {
                progress.report(format!("dropping axiom outside chosen MCS: {}", record.axiom));
                core.remove(&record);
            }
        }
        Ok(())
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
    use crate::repair::apply;

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    #[test]
    fn random_mcs_repairs_unsat_singleton() {
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
        let mut strategy = RandomMcs::new(McsComputationStrategy::AllMcs, 11);
        apply(
            &mut core,
            &goal,
            &mut strategy,
            &crate::progress::NullProgressSink,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(core.is_consistent().unwrap());
        assert_eq!(core.len(), 2);
    }
}
