//! Main benchmark runner for the ontology repair engine.
//!
//! Runs each repair strategy over a small synthetically-inconsistent
//! ontology so relative cost across strategies stays comparable run to run.

use criterion::{criterion_group, criterion_main, Criterion};
use dl_repair::axiom::Axiom;
use dl_repair::concept::Concept;
use dl_repair::entities::{Class, NamedIndividual};
use dl_repair::local_oracle::LocalOracle;
use dl_repair::oracle::ReasonerCache;
use dl_repair::ontology::OntologyCore;
use dl_repair::progress::NullProgressSink;
use dl_repair::refinement::RefinementFlags;
use dl_repair::repair::{
    self, apply, BadAxiomStrategy, BestMcs, BestOfKWeakening, CancelToken, McsComputationStrategy,
    MctsWeakening, RandomMcs, RefOntologyStrategy, RepairGoal, RepairStrategy, Removal, Weakening,
};
use std::sync::Arc;

fn atom(name: &str) -> Concept {
    Concept::Atomic(Class::new(format!("http://example.org/{name}")))
}

/// An inconsistent singleton: `{A ⊑ B, A ⊑ ¬B, a:A}`.
fn unsat_singleton() -> OntologyCore {
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
    core
}

fn run(core: &OntologyCore, goal: &RepairGoal, strategy: &mut dyn RepairStrategy) {
    let mut working = core.clone_with_separate_cache();
    apply(
        &mut working,
        goal,
        strategy,
        &NullProgressSink,
        &CancelToken::new(),
    )
    .expect("benchmark scenario must be reparable");
}

fn bench_removal(c: &mut Criterion) {
    let core = unsat_singleton();
    let goal = RepairGoal::Consistency;
    c.bench_function("removal/unsat_singleton", |b| {
        b.iter(|| {
            let mut strategy = Removal::new(BadAxiomStrategy::InOneMus, 1);
            run(&core, &goal, &mut strategy);
        })
    });
}

fn bench_random_mcs(c: &mut Criterion) {
    let core = unsat_singleton();
    let goal = RepairGoal::Consistency;
    c.bench_function("random_mcs/unsat_singleton", |b| {
        b.iter(|| {
            let mut strategy = RandomMcs::new(McsComputationStrategy::AllMcs, 1);
            run(&core, &goal, &mut strategy);
        })
    });
}

fn bench_best_mcs(c: &mut Criterion) {
    let core = unsat_singleton();
    let goal = RepairGoal::Consistency;
    c.bench_function("best_mcs/unsat_singleton", |b| {
        b.iter(|| {
            let mut strategy = BestMcs::new();
            run(&core, &goal, &mut strategy);
        })
    });
}

fn bench_weakening(c: &mut Criterion) {
    let core = unsat_singleton();
    let goal = RepairGoal::Consistency;
    c.bench_function("weakening/unsat_singleton", |b| {
        b.iter(|| {
            let mut strategy = Weakening::new(
                BadAxiomStrategy::InOneMus,
                RefOntologyStrategy::OneMcs,
                false,
                RefinementFlags::default(),
                32,
                1,
            );
            run(&core, &goal, &mut strategy);
        })
    });
}

fn bench_best_of_k_weakening(c: &mut Criterion) {
    let core = unsat_singleton();
    let goal = RepairGoal::Consistency;
    c.bench_function("best_of_k_weakening/unsat_singleton", |b| {
        b.iter(|| {
            let mut strategy = BestOfKWeakening::new(
                4,
                BadAxiomStrategy::InOneMus,
                RefOntologyStrategy::OneMcs,
                false,
                RefinementFlags::default(),
                32,
                1,
            );
            run(&core, &goal, &mut strategy);
        })
    });
}

fn bench_mcts_weakening(c: &mut Criterion) {
    let core = unsat_singleton();
    let goal = RepairGoal::Consistency;
    c.bench_function("mcts_weakening/unsat_singleton", |b| {
        b.iter(|| {
            let mut strategy = MctsWeakening::new(
                RefinementFlags::default(),
                3,
                64,
                dl_repair::mcts::MctsConfig::default(),
            );
            run(&core, &goal, &mut strategy);
        })
    });
}

fn bench_quality_score(c: &mut Criterion) {
    let core = unsat_singleton();
    c.bench_function("quality_score/unsat_singleton", |b| {
        b.iter(|| repair::quality_score(&core).unwrap())
    });
}

fn benchmark_suite(c: &mut Criterion) {
    bench_removal(c);
    bench_random_mcs(c);
    bench_best_mcs(c);
    bench_weakening(c);
    bench_best_of_k_weakening(c);
    bench_mcts_weakening(c);
    bench_quality_score(c);
}

criterion_group!(benches, benchmark_suite);
criterion_main!(benches);
