//! Axioms: TBox, RBox, ABox, and non-logical statements.

use crate::concept::Concept;
use crate::entities::{Annotation, Class, NamedIndividual, ObjectProperty};
use crate::role::Role;
use std::fmt;
use std::sync::Arc;

/// A declaration of an entity's kind — a non-logical axiom, never refined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Declaration {
    Class(Class),
    ObjectProperty(ObjectProperty),
    NamedIndividual(NamedIndividual),
}

/// An annotation assertion on an entity IRI — a non-logical axiom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationAssertion {
    pub subject: crate::iri::IRI,
    pub annotation: Annotation,
}

/// A Description Logic axiom. Every logical variant (everything but
/// [`Axiom::Declaration`] and [`Axiom::AnnotationAssertion`]) is either
/// `⊑` some reference axiom after weakening, or the direction's no-op
/// sentinel — see [`Axiom::weakening_noop`]/[`Axiom::strengthening_noop`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axiom {
    // --- TBox ---
    SubClassOf(Concept, Concept),
    EquivalentClasses(Vec<Concept>),
    DisjointClasses(Vec<Concept>),
    DisjointUnion(Class, Vec<Concept>),
    ObjectPropertyDomain(Role, Concept),
    ObjectPropertyRange(Role, Concept),

    // --- RBox ---
    SubObjectPropertyOf(Role, Role),
    SubPropertyChainOf(Vec<Role>, Role),
    InverseProperties(Role, Role),
    TransitiveProperty(Role),
    SymmetricProperty(Role),
    AsymmetricProperty(Role),
    ReflexiveProperty(Role),
    IrreflexiveProperty(Role),
    EquivalentProperties(Vec<Role>),
    DisjointProperties(Vec<Role>),

    // --- ABox ---
    ClassAssertion(Concept, NamedIndividual),
    PropertyAssertion(Role, NamedIndividual, NamedIndividual),
    NegativePropertyAssertion(Role, NamedIndividual, NamedIndividual),
    SameIndividual(Vec<NamedIndividual>),
    DifferentIndividuals(Vec<NamedIndividual>),

    // --- non-logical ---
    Declaration(Declaration),
    AnnotationAssertion(AnnotationAssertion),
}

impl Axiom {
    /// `⊥ ⊑ ⊤`, the weakener's no-op sentinel: true in every model, so
    /// replacing an axiom with it always weakens.
    pub fn weakening_noop() -> Axiom {
        Axiom::SubClassOf(Concept::Bottom, Concept::Top)
    }

    /// `⊤ ⊑ ⊥`, the strengthener's no-op sentinel.
    pub fn strengthening_noop() -> Axiom {
        Axiom::SubClassOf(Concept::Top, Concept::Bottom)
    }

    pub fn is_weakening_noop(&self) -> bool {
        matches!(self, Axiom::SubClassOf(a, b) if a.is_bottom() && b.is_top())
    }

    pub fn is_strengthening_noop(&self) -> bool {
        matches!(self, Axiom::SubClassOf(a, b) if a.is_top() && b.is_bottom())
    }

    /// Non-logical axioms (`Declaration`/`AnnotationAssertion`) are never
    /// refined.
    pub fn is_non_logical(&self) -> bool {
        matches!(self, Axiom::Declaration(_) | Axiom::AnnotationAssertion(_))
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axiom::SubClassOf(c, d) => write!(f, "{} ⊑ {}", c, d),
            Axiom::EquivalentClasses(cs) => {
                write!(f, "{}", cs.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ≡ "))
            }
            Axiom::DisjointClasses(cs) => {
                write!(f, "Disjoint({})", cs.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", "))
            }
            Axiom::DisjointUnion(a, cs) => write!(
                f,
                "{} ≡ {} (disjoint)",
                a,
                cs.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ⊔ ")
            ),
            Axiom::ObjectPropertyDomain(r, c) => write!(f, "Domain({}) = {}", r, c),
            Axiom::ObjectPropertyRange(r, c) => write!(f, "Range({}) = {}", r, c),
            Axiom::SubObjectPropertyOf(r, s) => write!(f, "{} ⊑ {}", r, s),
            Axiom::SubPropertyChainOf(chain, r) => write!(
                f,
                "{} ⊑ {}",
                chain.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ∘ "),
                r
            ),
            Axiom::InverseProperties(r, s) => write!(f, "{} ≡ {}⁻", r, s),
            Axiom::TransitiveProperty(r) => write!(f, "Trans({})", r),
            Axiom::SymmetricProperty(r) => write!(f, "Sym({})", r),
            Axiom::AsymmetricProperty(r) => write!(f, "Asym({})", r),
            Axiom::ReflexiveProperty(r) => write!(f, "Refl({})", r),
            Axiom::IrreflexiveProperty(r) => write!(f, "Irrefl({})", r),
            Axiom::EquivalentProperties(rs) => {
                write!(f, "{}", rs.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(" ≡ "))
            }
            Axiom::DisjointProperties(rs) => {
                write!(f, "Disjoint({})", rs.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", "))
            }
            Axiom::ClassAssertion(c, a) => write!(f, "{}: {}", a, c),
            Axiom::PropertyAssertion(r, a, b) => write!(f, "{}({}, {})", r, a, b),
            Axiom::NegativePropertyAssertion(r, a, b) => write!(f, "¬{}({}, {})", r, a, b),
            Axiom::SameIndividual(inds) => {
                write!(f, "{}", inds.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" = "))
            }
            Axiom::DifferentIndividuals(inds) => write!(
                f,
                "Different({})",
                inds.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
            ),
            Axiom::Declaration(d) => write!(f, "Declare({:?})", d),
            Axiom::AnnotationAssertion(a) => write!(f, "Annotation({})", a.subject),
        }
    }
}

/// Provenance wrapper: an axiom and, if it resulted from weakening or
/// strengthening, the axiom it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxiomRecord {
    pub axiom: Axiom,
    pub origin: Option<Axiom>,
}

impl AxiomRecord {
    pub fn fresh(axiom: Axiom) -> Arc<AxiomRecord> {
        Arc::new(AxiomRecord { axiom, origin: None })
    }

    /// Build a record for `replacement`, carrying forward `old`'s origin
    /// (or `old` itself, if `old` had none) — `OntologyCore::replace`
    /// preserves origin across chained weakenings.
    pub fn derived(old: &AxiomRecord, replacement: Axiom) -> Arc<AxiomRecord> {
        let origin = old.origin.clone().unwrap_or_else(|| old.axiom.clone());
        Arc::new(AxiomRecord {
            axiom: replacement,
            origin: Some(origin),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sentinels_are_recognized() {
        assert!(Axiom::weakening_noop().is_weakening_noop());
        assert!(Axiom::strengthening_noop().is_strengthening_noop());
        assert!(!Axiom::weakening_noop().is_strengthening_noop());
    }

    #[test]
    fn derived_record_keeps_oldest_origin() {
        let a = AxiomRecord::fresh(Axiom::SubClassOf(Concept::Top, Concept::Top));
        let b = AxiomRecord::derived(&a, Axiom::SubClassOf(Concept::Top, Concept::Bottom));
        let c = AxiomRecord::derived(&b, Axiom::weakening_noop());
        assert_eq!(c.origin.as_ref().unwrap(), &a.axiom);
    }
}
