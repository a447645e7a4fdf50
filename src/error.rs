//! Error types for the ontology core and the reasoner oracle boundary.

use thiserror::Error;

/// Errors raised while constructing or manipulating entities, axioms, and
/// ontologies — the data-model layer, as opposed to [`RepairError`] which
/// covers the refinement engine and repair loop itself.
#[derive(Error, Debug, Clone)]
pub enum OwlError {
    /// IRI-related errors
    #[error("invalid IRI: {0}")]
    InvalidIRI(String),

    /// Unknown namespace prefix
    #[error("unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Reasoning errors surfaced by the reasoner oracle
    #[error("reasoning error: {0}")]
    ReasoningError(String),

    /// The oracle itself failed (timeout, crash, disconnect)
    #[error("oracle error: {0}")]
    OracleError(String),

    /// Inconsistent ontology, surfaced where a consistent one was required
    #[error("inconsistent ontology: {0}")]
    InconsistentOntology(String),

    /// Other errors
    #[error("other error: {0}")]
    Other(String),
}

/// Result type for the data-model layer.
pub type OwlResult<T> = Result<T, OwlError>;

/// Errors raised by the refinement engine and repair loop.
#[derive(Error, Debug, Clone)]
pub enum RepairError {
    /// The static axioms alone already violate the repair predicate.
    #[error("ontology is not reparable: static axioms already violate the goal predicate")]
    NotReparable,

    /// Strict-mode refinement encountered a construct outside the
    /// permitted fragment (ALC/SROIQ/NNF, depending on the active flags).
    #[error("axiom is not supported under the active refinement flags: {0}")]
    NotSupported(String),

    /// Cooperative cancellation was observed at an iteration boundary.
    #[error("repair was cancelled")]
    Cancelled,

    /// The underlying reasoner oracle failed; propagated unchanged.
    #[error("oracle failure: {0}")]
    OracleFailure(#[from] OwlError),

    /// A `BestOfK` worker ran out of memory/resources for its round; the
    /// round is discarded and counted but not fatal unless every worker
    /// exhausts.
    #[error("resource exhausted during repair round")]
    ResourceExhausted,
}

/// Result type for the refinement/repair layer.
pub type RepairResult<T> = Result<T, RepairError>;
