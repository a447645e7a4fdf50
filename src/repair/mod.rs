//! Repair: drive an inconsistent/incoherent ontology to a state where a
//! goal predicate holds, via one of several interchangeable strategies.
//!
//! Every strategy shares the same entry skeleton ([`apply`]): bail out if
//! the static axioms alone already violate the goal, return immediately
//! if the goal already holds, otherwise hand off to the strategy.

mod best_mcs;
mod best_of_k;
mod mcts_weakening;
mod random_mcs;
mod removal;
mod weakening;

pub use best_mcs::BestMcs;
pub use best_of_k::BestOfKWeakening;
pub use mcts_weakening::MctsWeakening;
pub use random_mcs::RandomMcs;
pub use removal::Removal;
pub use weakening::{RefOntologyStrategy, Weakening};

use crate::axiom::{Axiom, AxiomRecord};
use crate::concept::Concept;
use crate::entities::Class;
use crate::error::{RepairError, RepairResult};
use crate::mcs::MaximalConsistentSubsets;
use crate::minimal_subsets::MinimalSubsets;
use crate::ontology::OntologyCore;
use crate::progress::ProgressSink;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a repair run is trying to achieve.
#[derive(Clone)]
pub enum RepairGoal {
    /// The ontology has at least one model.
    Consistency,
    /// Every named class in the signature is satisfiable.
    Coherence,
    /// A specific axiom is no longer entailed.
    EntailmentRemoval(Axiom),
    /// A specific concept is satisfiable.
    ConceptSatisfiability(Concept),
}

impl RepairGoal {
    pub fn holds(&self, core: &OntologyCore) -> RepairResult<bool> {
        match self {
            RepairGoal::Consistency => Ok(core.is_consistent()?),
            RepairGoal::Coherence => {
                for class in core.signature().classes {
                    if class.is_thing() || class.is_nothing() {
                        continue;
                    }
                    if !core.is_satisfiable(&Concept::Atomic(class))? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            RepairGoal::EntailmentRemoval(axiom) => Ok(!core.is_entailed(axiom)?),
            RepairGoal::ConceptSatisfiability(concept) => Ok(core.is_satisfiable(concept)?),
        }
    }

    /// True when the goal already holds using only the static axioms —
    /// if it doesn't, no repair of the refutable axioms can fix it.
    pub fn holds_on_static(&self, core: &OntologyCore) -> RepairResult<bool> {
        let static_only = core.clone_with_refutable(HashSet::new());
        self.holds(&static_only)
    }
}

/// Cooperative cancellation, checked at iteration boundaries by every
/// strategy's main loop.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> RepairResult<()> {
        if self.is_cancelled() {
            Err(RepairError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A pluggable repair algorithm.
pub trait RepairStrategy {
    fn repair(
        &mut self,
        core: &mut OntologyCore,
        goal: &RepairGoal,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> RepairResult<()>;
}

/// The shared entry skeleton every strategy is driven through.
pub fn apply(
    core: &mut OntologyCore,
    goal: &RepairGoal,
    strategy: &mut dyn RepairStrategy,
    progress: &dyn ProgressSink,
    cancel: &CancelToken,
) -> RepairResult<()> {
    if !goal.holds_on_static(core)? {
        return Err(RepairError::NotReparable);
    }
    if goal.holds(core)? {
        progress.report("goal already satisfied; nothing to repair".to_string());
        return Ok(());
    }
    strategy.repair(core, goal, progress, cancel)
}

/// Which axiom a removal-based strategy discards next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadAxiomStrategy {
    Random,
    NotInSomeMcs,
    NotInLargestMcs,
    NotInOneMcs,
    InLeastMcs,
    InSomeMus,
    InOneMus,
    InMostMus,
}

/// How many correction sets / unsatisfiable subsets a "some"/"most"
/// sample draws from before picking the most frequent axiom — the
/// canonical meaning is "most frequent axiom over the chosen sample";
/// the strategy name only changes which sample is drawn.
const SAMPLE_SIZE: usize = 4;

fn goal_holds_on_subset(
    core: &OntologyCore,
    goal: &RepairGoal,
    subset: &[Arc<AxiomRecord>],
) -> RepairResult<bool> {
    let refutable: HashSet<Arc<AxiomRecord>> = subset.iter().cloned().collect();
    let probe = core.clone_with_refutable(refutable);
    goal.holds(&probe)
}

fn most_frequent<'a>(
    universe: &'a [Arc<AxiomRecord>],
    samples: &[Vec<Arc<AxiomRecord>>],
) -> Option<&'a Arc<AxiomRecord>> {
    let mut counts: HashMap<&Arc<AxiomRecord>, usize> = HashMap::new();
    for sample in samples {
        for record in sample {
            *counts.entry(record).or_insert(0) += 1;
        }
    }
    universe
        .iter()
        .max_by_key(|r| counts.get(r).copied().unwrap_or(0))
}

/// Choose the axiom a removal/weakening strategy should act on next,
/// given the sampling policy in `strategy`.
pub fn choose_bad_axiom(
    core: &OntologyCore,
    goal: &RepairGoal,
    strategy: BadAxiomStrategy,
    rng: &mut impl Rng,
) -> RepairResult<Option<Arc<AxiomRecord>>> {
    let universe: Vec<Arc<AxiomRecord>> = core.refutable_axioms().iter().cloned().collect();
    if universe.is_empty() {
        return Ok(None);
    }

    let predicate = |subset: &[Arc<AxiomRecord>]| -> RepairResult<bool> {
        goal_holds_on_subset(core, goal, subset)
    };
    let violates = |subset: &[Arc<AxiomRecord>]| -> RepairResult<bool> { Ok(!predicate(subset)?) };

    match strategy {
        BadAxiomStrategy::Random => {
            let idx = rng.gen_range(0..universe.len());
            Ok(Some(universe[idx].clone()))
        }
        BadAxiomStrategy::NotInOneMcs => {
            let search = MaximalConsistentSubsets::new(&universe);
            let mcs = search.some_mcs(predicate)?;
            Ok(pick_from_complement(&universe, mcs.as_deref(), rng))
        }
        BadAxiomStrategy::NotInSomeMcs => {
            let search = MaximalConsistentSubsets::new(&universe);
            let mut samples = Vec::new();
            for _ in 0..SAMPLE_SIZE {
                if let Some(mcs) = search.some_mcs(predicate)? {
                    let removed: Vec<Arc<AxiomRecord>> =
                        universe.iter().filter(|a| !mcs.contains(a)).cloned().collect();
                    samples.push(removed);
                }
            }
            Ok(most_frequent(&universe, &samples).cloned())
        }
        BadAxiomStrategy::NotInLargestMcs => {
            let search = MaximalConsistentSubsets::new(&universe);
            let mcs = search.largest_mcs(predicate)?;
            Ok(pick_from_complement(&universe, mcs.as_deref(), rng))
        }
        BadAxiomStrategy::InLeastMcs => {
            let search = MaximalConsistentSubsets::new(&universe);
            let mcss = search.maximal_consistent_subsets(predicate)?;
            let samples: Vec<Vec<Arc<AxiomRecord>>> = mcss
                .iter()
                .map(|mcs| universe.iter().filter(|a| !mcs.contains(a)).cloned().collect())
                .collect();
            Ok(most_frequent(&universe, &samples).cloned())
        }
        BadAxiomStrategy::InOneMus => {
            let search = MinimalSubsets::new(&universe);
            let mus = search.single_minimal(violates)?;
            Ok(pick_random(&mus, rng))
        }
        BadAxiomStrategy::InSomeMus => {
            let search = MinimalSubsets::new(&universe);
            let samples = search.many_minimal(SAMPLE_SIZE, violates)?;
            Ok(most_frequent(&universe, &samples).cloned())
        }
        BadAxiomStrategy::InMostMus => {
            let search = MinimalSubsets::new(&universe);
            let samples = search.all_minimal(violates)?;
            Ok(most_frequent(&universe, &samples).cloned())
        }
    }
}

fn pick_from_complement(
    universe: &[Arc<AxiomRecord>],
    mcs: Option<&[Arc<AxiomRecord>]>,
    rng: &mut impl Rng,
) -> Option<Arc<AxiomRecord>> {
    let mcs = mcs?;
    let removed: Vec<&Arc<AxiomRecord>> = universe.iter().filter(|a| !mcs.contains(a)).collect();
    if removed.is_empty() {
        return None;
    }
    Some(removed[rng.gen_range(0..removed.len())].clone())
}

fn pick_random(sample: &Option<Vec<Arc<AxiomRecord>>>, rng: &mut impl Rng) -> Option<Arc<AxiomRecord>> {
    let sample = sample.as_ref()?;
    if sample.is_empty() {
        return None;
    }
    Some(sample[rng.gen_range(0..sample.len())].clone())
}

/// Which (and how many) maximal consistent subsets a computation is
/// willing to enumerate before picking a reference ontology or score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McsComputationStrategy {
    OneMcs,
    SomeMcs,
    AllMcs,
}

/// Quality score used to rank candidate repaired ontologies: the number
/// of entailed `SubClassOf` axioms between distinct named classes — a
/// simple, monotone proxy for "how much of the original structure
/// survived the repair."
pub fn quality_score(core: &OntologyCore) -> RepairResult<u64> {
    let classes: Vec<Class> = core.signature().classes.into_iter().collect();
    let mut score = 0u64;
    for c in &classes {
        for d in &classes {
            if c == d {
                continue;
            }
            let axiom = Axiom::SubClassOf(Concept::Atomic(c.clone()), Concept::Atomic(d.clone()));
            if core.is_entailed(&axiom)? {
                score += 1;
            }
        }
    }
    Ok(score)
}
