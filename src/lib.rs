//! # dl-repair
//!
//! A Description Logic ontology repair engine: given an inconsistent or
//! incoherent ontology (or one that entails something it shouldn't), drive
//! it to a state where a goal predicate holds, via maximal-consistent-subset
//! extraction, minimal-subset-directed removal, or syntax-directed axiom
//! weakening.
//!
//! ## Quick Start
//!
//! ```rust
//! use dl_repair::axiom::Axiom;
//! use dl_repair::concept::Concept;
//! use dl_repair::entities::{Class, NamedIndividual};
//! use dl_repair::local_oracle::LocalOracle;
//! use dl_repair::oracle::ReasonerCache;
//! use dl_repair::ontology::OntologyCore;
//! use dl_repair::repair::{apply, BadAxiomStrategy, CancelToken, RepairGoal, Removal};
//! use dl_repair::progress::NullProgressSink;
//! use std::sync::Arc;
//!
//! let dog = Concept::Atomic(Class::new("http://example.org/Dog"));
//! let cat = Concept::Atomic(Class::new("http://example.org/Cat"));
//! let rex = NamedIndividual::new("http://example.org/rex");
//!
//! let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
//! core.add(Axiom::DisjointClasses(vec![dog.clone(), cat.clone()]));
//! core.add(Axiom::ClassAssertion(dog, rex.clone()));
//! core.add(Axiom::ClassAssertion(cat, rex));
//!
//! let goal = RepairGoal::Consistency;
//! let mut strategy = Removal::new(BadAxiomStrategy::InOneMus, 1);
//! apply(&mut core, &goal, &mut strategy, &NullProgressSink, &CancelToken::new())?;
//! assert!(core.is_consistent()?);
//! # Ok::<(), dl_repair::error::RepairError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`error`] — the two error layers: [`error::OwlError`] for the data
//!   model/reasoner boundary, [`error::RepairError`] for the repair loop.
//! - [`iri`], [`constants`], [`entities`] — the interned IRI/entity layer.
//! - [`concept`], [`role`], [`axiom`] — the concept/role/axiom algebra.
//! - [`ontology`] — [`ontology::OntologyCore`], the static/refutable axiom
//!   partition paired with its reasoner oracle.
//! - [`oracle`], [`local_oracle`] — the reasoner boundary ([`oracle::ReasonerOracle`])
//!   and the in-process bounded tableau reasoner that implements it.
//! - [`preorder`], [`covers`], [`refinement`], [`axiom_refinement`] — the
//!   refinement engine: incremental subsumption caching, up/down covers, and
//!   the syntax-directed weakening/strengthening operators built on them.
//! - [`normalization`] — canonical-SROIQ-form rewriting.
//! - [`mcs`], [`minimal_subsets`], [`set_of_sets`] — maximal-consistent-subset
//!   and minimal-subset (QuickXPlain/HS-tree) search.
//! - [`mcts`] — a generic UCB1+RAVE Monte Carlo tree search.
//! - [`memoize`], [`cache`] — the memoization layer backing covers and IRI
//!   interning.
//! - [`progress`] — the repair-loop status callback.
//! - [`factory`] — the expression-construction seam.
//! - [`repair`] — the repair strategies themselves: [`repair::Removal`],
//!   [`repair::RandomMcs`], [`repair::BestMcs`], [`repair::Weakening`],
//!   [`repair::BestOfKWeakening`], [`repair::MctsWeakening`].

pub mod error;

pub mod iri;

pub mod constants;

/// OWL2/SROIQ entities — classes, object properties, named individuals —
/// wrapping interned, cached IRIs.
pub mod entities;

/// Class (concept) expressions.
pub mod concept;

/// Roles: named object properties and their inverses.
pub mod role;

/// Axioms: TBox, RBox, ABox, and non-logical statements, plus the
/// provenance-tracking [`axiom::AxiomRecord`] wrapper.
pub mod axiom;

/// `OntologyCore`: the static/refutable axiom partition and its reasoner
/// oracle — the single mutation point a repair session acts on.
pub mod ontology;

/// The reasoner oracle boundary and the diffing cache in front of it.
pub mod oracle;

/// A bounded, depth-limited in-process tableau reasoner implementing
/// [`oracle::ReasonerOracle`] over the ALC(D)-ish fragment this crate needs.
pub mod local_oracle;

/// An incrementally-closed preorder cache, backing subsumption queries for
/// [`covers`].
pub mod preorder;

/// Up/down covers — immediate generalizations/specializations of concepts,
/// roles, and small integers, relative to a reference ontology.
pub mod covers;

/// Syntax-directed generalization/specialization of concepts and roles.
pub mod refinement;

/// Lifts concept/role refinement to axiom-level weakening/strengthening.
pub mod axiom_refinement;

/// Canonical-SROIQ-form rewriting (binarization, NNF, TBox/RBox/ABox
/// normal forms).
pub mod normalization;

/// Maximal consistent subset search.
pub mod mcs;

/// Minimal (unsatisfiable/correction) subset search: QuickXPlain, a
/// many-minimal sampler, and the Reiter HS-tree.
pub mod minimal_subsets;

/// A trie-indexed collection of sets, used to prune already-covered search
/// branches during subset search.
pub mod set_of_sets;

/// A generic UCB1+RAVE Monte Carlo tree search.
pub mod mcts;

/// Generic function memoization (bounded and stream-materializing).
pub mod memoize;

/// A small thread-safe bounded LRU cache, used to intern IRIs.
pub mod cache;

/// The repair-loop progress callback.
pub mod progress;

/// The expression-construction seam between a host and this crate's data
/// model.
pub mod factory;

/// The repair strategies: goal predicates, cancellation, bad-axiom
/// sampling, and the six repair algorithms built on top of them.
pub mod repair;

pub use error::{OwlError, OwlResult, RepairError, RepairResult};
pub use iri::IRI;
pub use ontology::OntologyCore;
pub use repair::{
    apply, BadAxiomStrategy, BestMcs, BestOfKWeakening, CancelToken, McsComputationStrategy,
    MctsWeakening, RandomMcs, RefOntologyStrategy, RepairGoal, RepairStrategy, Removal, Weakening,
};

/// Library version, as declared in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name, as declared in `Cargo.toml`.
pub const NAME: &str = env!("CARGO_PKG_NAME");
