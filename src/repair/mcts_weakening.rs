//! MctsWeakening: drive the generic [`MctsTree`] over a state space of
//! "replace one refutable axiom with one of its weaker refinements,"
//! re-searching from the current ontology after every move actually
//! taken. Slower per repaired axiom than [`super::Weakening`] but looks
//! ahead several moves instead of committing to the first workable one.

use super::{quality_score, CancelToken, RepairGoal, RepairStrategy};
use crate::axiom::{Axiom, AxiomRecord};
use crate::axiom_refinement::AxiomWeakener;
use crate::error::{RepairError, RepairResult};
use crate::mcts::{GameState, MctsConfig, MctsTree};
use crate::ontology::OntologyCore;
use crate::progress::ProgressSink;
use crate::refinement::RefinementFlags;
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq, Hash)]
struct WeakeningMove {
    target: Arc<AxiomRecord>,
    replacement: Axiom,
}

#[derive(Clone)]
struct WeakeningState {
    core: OntologyCore,
    goal: RepairGoal,
    flags: RefinementFlags,
    depth: u32,
    max_depth: u32,
}

impl GameState for WeakeningState {
    type Move = WeakeningMove;

    fn legal_moves(&self) -> Vec<WeakeningMove> {
        if self.is_terminal() {
            return Vec::new();
        }
        let weakener = AxiomWeakener::new(&self.core, self.flags);
        let mut moves = Vec::new();
        for record in self.core.refutable_axioms() {
            let Ok(candidates) = weakener.weaker_axioms(&record.axiom) else {
                continue;
            };
            for candidate in candidates {
                if candidate != record.axiom {
                    moves.push(WeakeningMove {
                        target: record.clone(),
                        replacement: candidate,
                    });
                }
            }
        }
        moves
    }

    fn apply_move(&self, mv: &WeakeningMove) -> Self {
        let mut next = self.clone();
        next.core.replace(&mv.target, [mv.replacement.clone()]);
        next.depth += 1;
        next
    }

    fn is_terminal(&self) -> bool {
        self.depth >= self.max_depth || self.goal.holds(&self.core).unwrap_or(true)
    }

    /// `0.0` while the goal doesn't hold (inconsistent states are never
    /// rewarded, however much residual structure they entail — the
    /// explosion principle would otherwise make them look maximally
    /// informative). Once the goal holds, `1.0` plus a bounded quality
    /// bonus so the search still prefers the better of two repairs.
    fn evaluate(&self) -> f64 {
        match self.goal.holds(&self.core) {
            Ok(true) => {
                let score = quality_score(&self.core).unwrap_or(0) as f64;
                1.0 + score / (1.0 + score)
            }
            _ => 0.0,
        }
    }
}

pub struct MctsWeakening {
    flags: RefinementFlags,
    max_depth: u32,
    iterations: usize,
    config: MctsConfig,
}

impl MctsWeakening {
    pub fn new(flags: RefinementFlags, max_depth: u32, iterations: usize, config: MctsConfig) -> Self {
        MctsWeakening {
            flags,
            max_depth,
            iterations,
            config,
        }
    }
}

impl RepairStrategy for MctsWeakening {
    fn repair(
        &mut self,
        core: &mut OntologyCore,
        goal: &RepairGoal,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> RepairResult<()> {
        while !goal.holds(core)? {
            cancel.check()?;
            let root = WeakeningState {
                core: core.clone_shared(),
                goal: goal.clone(),
                flags: self.flags,
                depth: 0,
                max_depth: self.max_depth,
            };
            let mut tree = MctsTree::new(root, self.config);
            for _ in 0..self.iterations {
                cancel.check()?;
                tree.run_iteration();
            }
            let mv = tree.best_move().ok_or(RepairError::NotReparable)?;
            progress.report(format!(
                "mcts weakening `{}` to `{}`",
                mv.target.axiom, mv.replacement
            ));
            core.replace(&mv.target, [mv.replacement]);
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
    fn mcts_weakening_repairs_unsat_singleton() {
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
        let mut strategy = MctsWeakening::new(RefinementFlags::default(), 3, 64, MctsConfig::default());
        apply(
            &mut core,
            &goal,
            &mut strategy,
            &crate::progress::NullProgressSink,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(core.is_consistent().unwrap());
        assert_eq!(core.len(), 3);
    }
}
