//! Class (concept) expressions.
//!
//! `Concept` is an immutable algebraic value; a host sitting above this
//! crate builds one only through [`crate::factory::ExpressionFactory`],
//! while this crate's own refinement/normalization code uses the variant
//! constructors directly. Values are cheap to clone since the recursive
//! cases box their operands.

use crate::entities::{Class, NamedIndividual};
use crate::role::Role;
use std::fmt;

/// A class expression. Variant names follow OWL2/SROIQ functional-syntax
/// naming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Concept {
    /// An atomic named class.
    Atomic(Class),
    /// `⊤`, the top concept.
    Top,
    /// `⊥`, the bottom concept.
    Bottom,
    /// `¬C`
    Complement(Box<Concept>),
    /// `C₁ ⊓ ... ⊓ Cₙ`
    Intersection(Vec<Concept>),
    /// `C₁ ⊔ ... ⊔ Cₙ`
    Union(Vec<Concept>),
    /// `∃R.C`
    ObjectSomeValuesFrom(Role, Box<Concept>),
    /// `∀R.C`
    ObjectAllValuesFrom(Role, Box<Concept>),
    /// `∋R{a}` — the set of individuals related to `a` via `R`.
    ObjectHasValue(Role, NamedIndividual),
    /// `∃R.Self`
    ObjectHasSelf(Role),
    /// `≥n R.C`
    ObjectMinCardinality(u32, Role, Box<Concept>),
    /// `≤n R.C`
    ObjectMaxCardinality(u32, Role, Box<Concept>),
    /// `=n R.C`
    ObjectExactCardinality(u32, Role, Box<Concept>),
    /// `{a₁, ..., aₙ}`
    ObjectOneOf(Vec<NamedIndividual>),
}

impl Concept {
    pub fn atomic(class: Class) -> Self {
        Concept::Atomic(class)
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Concept::Top) || matches!(self, Concept::Atomic(c) if c.is_thing())
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Concept::Bottom) || matches!(self, Concept::Atomic(c) if c.is_nothing())
    }

    /// Is this concept already in negation normal form — complements
    /// appear only directly below atomic classes?
    pub fn is_nnf(&self) -> bool {
        match self {
            Concept::Atomic(_) | Concept::Top | Concept::Bottom => true,
            Concept::Complement(inner) => matches!(**inner, Concept::Atomic(_)),
            Concept::Intersection(cs) | Concept::Union(cs) => cs.iter().all(Concept::is_nnf),
            Concept::ObjectSomeValuesFrom(_, c) | Concept::ObjectAllValuesFrom(_, c) => c.is_nnf(),
            Concept::ObjectMinCardinality(_, _, c)
            | Concept::ObjectMaxCardinality(_, _, c)
            | Concept::ObjectExactCardinality(_, _, c) => c.is_nnf(),
            Concept::ObjectHasValue(..) | Concept::ObjectHasSelf(_) | Concept::ObjectOneOf(_) => {
                true
            }
        }
    }

    /// Push negations inward until they sit directly above atomic
    /// classes. Idempotent: `c.nnf().nnf() == c.nnf()`.
    pub fn nnf(&self) -> Concept {
        match self {
            Concept::Complement(inner) => inner.complement_nnf(),
            Concept::Intersection(cs) => Concept::Intersection(cs.iter().map(Concept::nnf).collect()),
            Concept::Union(cs) => Concept::Union(cs.iter().map(Concept::nnf).collect()),
            Concept::ObjectSomeValuesFrom(r, c) => {
                Concept::ObjectSomeValuesFrom(r.clone(), Box::new(c.nnf()))
            }
            Concept::ObjectAllValuesFrom(r, c) => {
                Concept::ObjectAllValuesFrom(r.clone(), Box::new(c.nnf()))
            }
            Concept::ObjectMinCardinality(n, r, c) => {
                Concept::ObjectMinCardinality(*n, r.clone(), Box::new(c.nnf()))
            }
            Concept::ObjectMaxCardinality(n, r, c) => {
                Concept::ObjectMaxCardinality(*n, r.clone(), Box::new(c.nnf()))
            }
            Concept::ObjectExactCardinality(n, r, c) => {
                Concept::ObjectExactCardinality(*n, r.clone(), Box::new(c.nnf()))
            }
            other => other.clone(),
        }
    }

    /// NNF of `¬self` — negation-preserving push-down, used by
    /// [`Concept::nnf`] and directly by callers producing a negation that
    /// must itself already be in NNF (see the `NNF_STRICT` refinement flag).
    pub fn complement_nnf(&self) -> Concept {
        match self {
            Concept::Atomic(_) => Concept::Complement(Box::new(self.clone())),
            Concept::Top => Concept::Bottom,
            Concept::Bottom => Concept::Top,
            Concept::Complement(inner) => inner.nnf(),
            Concept::Intersection(cs) => {
                Concept::Union(cs.iter().map(Concept::complement_nnf).collect())
            }
            Concept::Union(cs) => {
                Concept::Intersection(cs.iter().map(Concept::complement_nnf).collect())
            }
            Concept::ObjectSomeValuesFrom(r, c) => {
                Concept::ObjectAllValuesFrom(r.clone(), Box::new(c.complement_nnf()))
            }
            Concept::ObjectAllValuesFrom(r, c) => {
                Concept::ObjectSomeValuesFrom(r.clone(), Box::new(c.complement_nnf()))
            }
            Concept::ObjectMinCardinality(n, r, c) => {
                if *n == 0 {
                    Concept::Bottom
                } else {
                    Concept::ObjectMaxCardinality(n - 1, r.clone(), Box::new(c.nnf()))
                }
            }
            Concept::ObjectMaxCardinality(n, r, c) => {
                Concept::ObjectMinCardinality(n + 1, r.clone(), Box::new(c.nnf()))
            }
            Concept::ObjectExactCardinality(n, r, c) => Concept::Union(vec![
                Concept::ObjectMaxCardinality(n.saturating_sub(1), r.clone(), Box::new(c.nnf())),
                Concept::ObjectMinCardinality(n + 1, r.clone(), Box::new(c.nnf())),
            ]),
            Concept::ObjectHasValue(..) | Concept::ObjectHasSelf(_) | Concept::ObjectOneOf(_) => {
                Concept::Complement(Box::new(self.clone()))
            }
        }
    }

    /// Does this construct use only ALC-fragment shape (no cardinality
    /// restrictions, no nominals/has-value/has-self)? Used by
    /// `ALC_STRICT` refinement.
    pub fn is_alc(&self) -> bool {
        match self {
            Concept::Atomic(_) | Concept::Top | Concept::Bottom => true,
            Concept::Complement(c) => c.is_alc(),
            Concept::Intersection(cs) | Concept::Union(cs) => cs.iter().all(Concept::is_alc),
            Concept::ObjectSomeValuesFrom(_, c) | Concept::ObjectAllValuesFrom(_, c) => c.is_alc(),
            _ => false,
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concept::Atomic(c) => write!(f, "{}", c),
            Concept::Top => write!(f, "⊤"),
            Concept::Bottom => write!(f, "⊥"),
            Concept::Complement(c) => write!(f, "¬{}", c),
            Concept::Intersection(cs) => {
                write!(f, "({})", cs.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ⊓ "))
            }
            Concept::Union(cs) => {
                write!(f, "({})", cs.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ⊔ "))
            }
            Concept::ObjectSomeValuesFrom(r, c) => write!(f, "∃{}.{}", r, c),
            Concept::ObjectAllValuesFrom(r, c) => write!(f, "∀{}.{}", r, c),
            Concept::ObjectHasValue(r, a) => write!(f, "∋{}{{{}}}", r, a),
            Concept::ObjectHasSelf(r) => write!(f, "∃{}.Self", r),
            Concept::ObjectMinCardinality(n, r, c) => write!(f, "≥{} {}.{}", n, r, c),
            Concept::ObjectMaxCardinality(n, r, c) => write!(f, "≤{} {}.{}", n, r, c),
            Concept::ObjectExactCardinality(n, r, c) => write!(f, "={} {}.{}", n, r, c),
            Concept::ObjectOneOf(inds) => {
                write!(f, "{{{}}}", inds.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ObjectProperty;

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    #[test]
    fn nnf_is_idempotent() {
        let r = Role::named(ObjectProperty::new("http://example.org/R"));
        let c = Concept::Complement(Box::new(Concept::Intersection(vec![
            atom("A"),
            Concept::ObjectAllValuesFrom(r.clone(), Box::new(atom("B"))),
        ])));
        let once = c.nnf();
        assert!(once.is_nnf());
        assert_eq!(once.nnf(), once);
    }

    #[test]
    fn complement_of_conjunction_is_disjunction_of_complements() {
        let c = Concept::Intersection(vec![atom("A"), atom("B")]);
        let nnf = Concept::Complement(Box::new(c)).nnf();
        match nnf {
            Concept::Union(cs) => assert_eq!(cs.len(), 2),
            other => panic!("expected union, got {other:?}"),
        }
    }
}
