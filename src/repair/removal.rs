//! Removal: repeatedly discard a "bad" axiom, chosen by [`BadAxiomStrategy`],
//! until the goal predicate holds. The simplest repair: no replacement is
//! ever offered for a discarded axiom, so information loss is total for
//! whatever gets picked.

use super::{choose_bad_axiom, BadAxiomStrategy, CancelToken, RepairGoal, RepairStrategy};
use crate::error::{RepairError, RepairResult};
use crate::ontology::OntologyCore;
use crate::progress::ProgressSink;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Removal {
    strategy: BadAxiomStrategy,
    rng: StdRng,
}

impl Removal {
    pub fn new(strategy: BadAxiomStrategy, seed: u64) -> Self {
        Removal {
            strategy,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RepairStrategy for Removal {
    fn repair(
        &mut self,
        core: &mut OntologyCore,
        goal: &RepairGoal,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> RepairResult<()> {
        while !goal.holds(core)? {
            cancel.check()?;
            let bad = choose_bad_axiom(core, goal, self.strategy, &mut self.rng)?
                .ok_or(RepairError::NotReparable)?;
            progress.report(format!("removing axiom: {}", bad.axiom));
            core.remove(&bad);
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
    use crate::repair::{apply, CancelToken, RepairGoal};
    use std::sync::Arc;

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    /// S1: {A ⊑ B, A ⊑ ¬B, a:A}, consistency. This is a minimal unsatisfiable
    /// set of size 3, so removing any single member repairs it — Removal
    /// must end with exactly two axioms left and consistency restored.
    #[test]
    fn removal_repairs_unsat_singleton() {
        let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
        core.add(Axiom::SubClassOf(atom("A"), atom("B")));
        core.add(Axiom::SubClassOf(
            atom("A"),
            Concept::Complement(Box::new(atom("B"))),
        ));
        let individual = NamedIndividual::new("http://example.org/a");
        core.add(Axiom::ClassAssertion(atom("A"), individual));

        let goal = RepairGoal::Consistency;
        let mut strategy = Removal::new(BadAxiomStrategy::Random, 7);
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
