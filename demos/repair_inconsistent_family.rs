//! Repair an inconsistent family ontology.
//!
//! Builds a small family ontology where `Parent` and `Childless` are
//! declared disjoint, but `mary` is asserted to be both, then repairs it
//! with each of the six strategies in turn and reports what each one kept.

use dl_repair::axiom::Axiom;
use dl_repair::concept::Concept;
use dl_repair::entities::{Class, NamedIndividual};
use dl_repair::error::RepairResult;
use dl_repair::local_oracle::LocalOracle;
use dl_repair::mcts::MctsConfig;
use dl_repair::ontology::OntologyCore;
use dl_repair::oracle::ReasonerCache;
use dl_repair::progress::{NullProgressSink, ProgressSink};
use dl_repair::refinement::RefinementFlags;
use dl_repair::repair::{
    self, apply, BadAxiomStrategy, BestMcs, BestOfKWeakening, CancelToken, McsComputationStrategy,
    MctsWeakening, RandomMcs, RefOntologyStrategy, RepairGoal, RepairStrategy, Removal, Weakening,
};
use std::sync::Arc;

struct PrintProgress(&'static str);

impl ProgressSink for PrintProgress {
    fn report(&self, message: String) {
        println!("  [{}] {message}", self.0);
    }
}

fn atom(name: &str) -> Concept {
    Concept::Atomic(Class::new(format!("http://example.org/{name}")))
}

/// `Parent` and `Childless` are disjoint, `mary` is asserted to both, and
/// `Parent ⊑ Person` is thrown in so there is slack for the weakening
/// strategies to exploit instead of outright deleting something.
fn family_ontology() -> OntologyCore {
    let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
    core.add(Axiom::SubClassOf(atom("Parent"), atom("Person")));
    core.add(Axiom::DisjointClasses(vec![
        atom("Parent"),
        atom("Childless"),
    ]));
    core.add(Axiom::ClassAssertion(
        atom("Parent"),
        NamedIndividual::new("http://example.org/mary"),
    ));
    core.add(Axiom::ClassAssertion(
        atom("Childless"),
        NamedIndividual::new("http://example.org/mary"),
    ));
    core
}

fn run_strategy(name: &'static str, mut strategy: impl RepairStrategy) -> RepairResult<()> {
    println!("\n=== {name} ===");
    let mut core = family_ontology();
    println!("  starting from {} axioms", core.len());

    let goal = RepairGoal::Consistency;
    apply(
        &mut core,
        &goal,
        &mut strategy,
        &PrintProgress(name),
        &CancelToken::new(),
    )?;

    let score = repair::quality_score(&core)?;
    println!(
        "  repaired: consistent={}, {} axioms kept, quality score {score}",
        core.is_consistent()?,
        core.len()
    );
    Ok(())
}

fn main() -> RepairResult<()> {
    env_logger::init();
    println!("=== Family Ontology Repair ===");
    println!(
        "Parent and Childless are disjoint, but mary is asserted to be both -- inconsistent."
    );

    run_strategy("removal", Removal::new(BadAxiomStrategy::InOneMus, 1))?;

    run_strategy(
        "random_mcs",
        RandomMcs::new(McsComputationStrategy::AllMcs, 1),
    )?;

    run_strategy("best_mcs", BestMcs::new())?;

    run_strategy(
        "weakening",
        Weakening::new(
            BadAxiomStrategy::InOneMus,
            RefOntologyStrategy::OneMcs,
            false,
            RefinementFlags::default(),
            32,
            1,
        ),
    )?;

    run_strategy(
        "best_of_k_weakening",
        BestOfKWeakening::new(
            4,
            BadAxiomStrategy::InOneMus,
            RefOntologyStrategy::OneMcs,
            false,
            RefinementFlags::default(),
            32,
            1,
        ),
    )?;

    run_strategy(
        "mcts_weakening",
        MctsWeakening::new(RefinementFlags::default(), 3, 64, MctsConfig::default()),
    )?;

    println!("\nAll strategies repaired the ontology to consistency.");
    let _ = NullProgressSink;
    Ok(())
}
