//! BestMcs: enumerate every maximal consistent subset of the refutable
//! axioms and keep whichever one scores highest under [`quality_score`].
//! Strictly more thorough (and more expensive) than [`super::RandomMcs`],
//! which is happy with any single MCS.

use super::{quality_score, CancelToken, RepairGoal, RepairStrategy};
use crate::axiom::AxiomRecord;
use crate::error::{RepairError, RepairResult};
use crate::mcs::MaximalConsistentSubsets;
use crate::ontology::OntologyCore;
use crate::progress::ProgressSink;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Default)]
pub struct BestMcs;

impl BestMcs {
    pub fn new() -> Self {
        BestMcs
    }
}

impl RepairStrategy for BestMcs {
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
        let candidates = search.maximal_consistent_subsets(predicate)?;
        if candidates.is_empty() {
            return Err(RepairError::NotReparable);
        }

        let mut best: Option<(Vec<Arc<AxiomRecord>>, u64)> = None;
        for mcs in candidates {
            cancel.check()?;
            let refutable: HashSet<Arc<AxiomRecord>> = mcs.iter().cloned().collect();
            let probe = core.clone_with_refutable(refutable);
            let score = quality_score(&probe)?;
            if best.as_ref().map(|(_, s)| score > *s).unwrap_or(true) {
                best = Some((mcs, score));
            }
        }
        let (kept, score) = best.ok_or(RepairError::NotReparable)?;
        progress.report(format!("keeping best MCS, quality score {score}"));
        let kept_set: HashSet<Arc<AxiomRecord>> = kept.into_iter().collect();

        for record in universe {
            if !kept_set.contains(&record) {
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
    fn best_mcs_repairs_unsat_singleton() {
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
        let mut strategy = BestMcs::new();
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
        // The best-scoring MCS keeps both SubClassOf axioms (they entail a
        // SubClassOf fact) over the singleton that keeps only the
        // ClassAssertion.
        assert!(core
            .all_axioms()
            .contains(&Axiom::SubClassOf(atom("A"), atom("B"))));
    }
}
