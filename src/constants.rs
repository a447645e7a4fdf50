//! Well-known IRIs used throughout the concept/axiom model.

/// `owl:Thing`, the top concept `⊤`.
pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";

/// `owl:Nothing`, the bottom concept `⊥`.
pub const OWL_NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";

/// Synthetic IRI prefix minted by RBox normalization for the reflexive
/// sub-role introduced when rewriting `ReflexiveProperty`/`TransitiveProperty`
/// axioms (see `normalization.rs`).
pub const SYNTHETIC_ROLE_PREFIX: &str = "http://dl-repair.invalid/synthetic-role#";
