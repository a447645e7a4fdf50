//! Rewrites axioms to a canonical SROIQ form: TBox axioms become
//! `SubClassOf`, ABox n-ary assertions become binary, RBox axioms become
//! role inclusions/chains, and concept constructors are binarized (with
//! an optional NNF pass).

use crate::axiom::{Axiom, Declaration};
use crate::concept::Concept;
use crate::constants::SYNTHETIC_ROLE_PREFIX;
use crate::entities::ObjectProperty;
use crate::role::Role;

#[derive(Debug, Clone, Copy)]
pub struct NormalizationOptions {
    /// Split a SameIndividual/DifferentIndividuals list into every pair
    /// rather than just a chaining sequence.
    pub full_pairwise_abox: bool,
    /// Enforce negation normal form on every concept produced.
    pub enforce_nnf: bool,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        NormalizationOptions {
            full_pairwise_abox: false,
            enforce_nnf: false,
        }
    }
}

/// The synthetic role asserted reflexive on every individual, used to
/// normalize `ReflexiveProperty` into a role inclusion rather than a
/// bespoke TBox axiom.
pub fn synthetic_reflexive_role() -> Role {
    Role::named(ObjectProperty::new(format!(
        "{SYNTHETIC_ROLE_PREFIX}reflexive"
    )))
}

fn pairwise<T: Clone>(items: &[T], chain_only: bool) -> Vec<(T, T)> {
    if chain_only {
        items.windows(2).map(|w| (w[0].clone(), w[1].clone())).collect()
    } else {
        let mut out = Vec::new();
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                out.push((items[i].clone(), items[j].clone()));
            }
        }
        out
    }
}

/// Concept normalization: binarizes n-ary intersections/unions, rewrites
/// `HasValue`/`ExactCardinality` into their SROIQ expansions, and
/// optionally pushes negations into NNF.
pub fn normalize_concept(c: &Concept, opts: &NormalizationOptions) -> Concept {
    let rewritten = match c {
        Concept::Intersection(cs) => binarize(cs, opts, Concept::Intersection, |a, b| {
            Concept::Intersection(vec![a, b])
        }),
        Concept::Union(cs) => binarize(cs, opts, Concept::Union, |a, b| Concept::Union(vec![a, b])),
        Concept::ObjectHasValue(r, a) => {
            Concept::ObjectSomeValuesFrom(r.clone(), Box::new(Concept::ObjectOneOf(vec![a.clone()])))
        }
        Concept::ObjectExactCardinality(n, r, inner) => {
            let inner = normalize_concept(inner, opts);
            Concept::Intersection(vec![
                Concept::ObjectMinCardinality(*n, r.clone(), Box::new(inner.clone())),
                Concept::ObjectMaxCardinality(*n, r.clone(), Box::new(inner)),
            ])
        }
        Concept::Complement(inner) => Concept::Complement(Box::new(normalize_concept(inner, opts))),
        Concept::ObjectSomeValuesFrom(r, inner) => {
            Concept::ObjectSomeValuesFrom(r.clone(), Box::new(normalize_concept(inner, opts)))
        }
        Concept::ObjectAllValuesFrom(r, inner) => {
            Concept::ObjectAllValuesFrom(r.clone(), Box::new(normalize_concept(inner, opts)))
        }
        Concept::ObjectMinCardinality(n, r, inner) => {
            Concept::ObjectMinCardinality(*n, r.clone(), Box::new(normalize_concept(inner, opts)))
        }
        Concept::ObjectMaxCardinality(n, r, inner) => {
            Concept::ObjectMaxCardinality(*n, r.clone(), Box::new(normalize_concept(inner, opts)))
        }
        other => other.clone(),
    };
    if opts.enforce_nnf {
        rewritten.nnf()
    } else {
        rewritten
    }
}

fn binarize(
    cs: &[Concept],
    opts: &NormalizationOptions,
    rebuild_flat: impl Fn(Vec<Concept>) -> Concept,
    rebuild_pair: impl Fn(Concept, Concept) -> Concept,
) -> Concept {
    let normalized: Vec<Concept> = cs.iter().map(|c| normalize_concept(c, opts)).collect();
    if normalized.len() <= 2 {
        return rebuild_flat(normalized);
    }
    let mut iter = normalized.into_iter();
    let first = iter.next().unwrap();
    iter.fold(first, |acc, next| rebuild_pair(acc, next))
}

fn map_concepts(axiom: Axiom, opts: &NormalizationOptions) -> Axiom {
    let nc = |c: Concept| normalize_concept(&c, opts);
    match axiom {
        Axiom::SubClassOf(a, b) => Axiom::SubClassOf(nc(a), nc(b)),
        Axiom::ClassAssertion(c, a) => Axiom::ClassAssertion(nc(c), a),
        Axiom::ObjectPropertyDomain(r, c) => Axiom::ObjectPropertyDomain(r, nc(c)),
        Axiom::ObjectPropertyRange(r, c) => Axiom::ObjectPropertyRange(r, nc(c)),
        other => other,
    }
}

/// Rewrite one axiom into its normal-form equivalents (usually one, but
/// several for axioms that split, like `EquivalentClasses`).
pub fn normalize_axiom(axiom: &Axiom, opts: &NormalizationOptions) -> Vec<Axiom> {
    let rewritten = match axiom.clone() {
        // --- TBox ---
        Axiom::EquivalentClasses(cs) => pairwise(&cs, false)
            .into_iter()
            .flat_map(|(a, b)| [Axiom::SubClassOf(a.clone(), b.clone()), Axiom::SubClassOf(b, a)])
            .collect(),
        Axiom::DisjointClasses(cs) => pairwise(&cs, false)
            .into_iter()
            .map(|(a, b)| Axiom::SubClassOf(a, Concept::Complement(Box::new(b))))
            .collect(),
        Axiom::DisjointUnion(class, cs) => {
            let union = Concept::Union(cs.clone());
            let atom = Concept::Atomic(class);
            let mut out = vec![
                Axiom::SubClassOf(atom.clone(), union.clone()),
                Axiom::SubClassOf(union, atom),
            ];
            out.extend(
                pairwise(&cs, false)
                    .into_iter()
                    .map(|(a, b)| Axiom::SubClassOf(a, Concept::Complement(Box::new(b)))),
            );
            out
        }
        Axiom::ObjectPropertyDomain(r, c) => vec![Axiom::SubClassOf(
            Concept::ObjectSomeValuesFrom(r, Box::new(Concept::Top)),
            c,
        )],
        Axiom::ObjectPropertyRange(r, c) => {
            vec![Axiom::SubClassOf(Concept::Top, Concept::ObjectAllValuesFrom(r, Box::new(c)))]
        }

        // --- RBox ---
        Axiom::TransitiveProperty(r) => vec![Axiom::SubPropertyChainOf(vec![r.clone(), r.clone()], r)],
        Axiom::SymmetricProperty(r) => vec![
            Axiom::SubObjectPropertyOf(r.clone(), r.inverse()),
            Axiom::SubObjectPropertyOf(r.inverse(), r),
        ],
        Axiom::AsymmetricProperty(r) => vec![Axiom::DisjointProperties(vec![r.clone(), r.inverse()])],
        Axiom::ReflexiveProperty(r) => {
            vec![Axiom::SubObjectPropertyOf(synthetic_reflexive_role(), r)]
        }
        Axiom::IrreflexiveProperty(r) => vec![Axiom::SubClassOf(
            Concept::Top,
            Concept::Complement(Box::new(Concept::ObjectHasSelf(r))),
        )],
        Axiom::InverseProperties(r, s) => vec![
            Axiom::SubObjectPropertyOf(r.clone(), s.inverse()),
            Axiom::SubObjectPropertyOf(s, r.inverse()),
        ],
        Axiom::EquivalentProperties(rs) => pairwise(&rs, false)
            .into_iter()
            .flat_map(|(a, b)| {
                [
                    Axiom::SubObjectPropertyOf(a.clone(), b.clone()),
                    Axiom::SubObjectPropertyOf(b, a),
                ]
            })
            .collect(),

        // --- ABox ---
        Axiom::SameIndividual(inds) => pairwise(&inds, !opts.full_pairwise_abox)
            .into_iter()
            .map(|(a, b)| Axiom::SameIndividual(vec![a, b]))
            .collect(),
        Axiom::DifferentIndividuals(inds) => pairwise(&inds, !opts.full_pairwise_abox)
            .into_iter()
            .map(|(a, b)| Axiom::DifferentIndividuals(vec![a, b]))
            .collect(),

        other => vec![other],
    };

    rewritten.into_iter().map(|a| map_concepts(a, opts)).collect()
}

/// Run all four passes over an ontology's axioms, including the
/// reflexivity background axiom for the synthetic role whenever any
/// `ReflexiveProperty` axiom is present.
pub fn normalize_ontology(
    axioms: impl IntoIterator<Item = Axiom>,
    opts: &NormalizationOptions,
) -> Vec<Axiom> {
    let axioms: Vec<Axiom> = axioms.into_iter().collect();
    let needs_synthetic_role = axioms
        .iter()
        .any(|a| matches!(a, Axiom::ReflexiveProperty(_)));

    let mut out = Vec::new();
    if needs_synthetic_role {
        out.push(Axiom::Declaration(Declaration::ObjectProperty(
            synthetic_reflexive_role().property().clone(),
        )));
        out.push(Axiom::SubClassOf(
            Concept::Top,
            Concept::ObjectHasSelf(synthetic_reflexive_role()),
        ));
    }
    for axiom in &axioms {
        out.extend(normalize_axiom(axiom, opts));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Class, NamedIndividual};

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    #[test]
    fn equivalent_classes_become_pairwise_subclass_not_disjoint() {
        let opts = NormalizationOptions::default();
        let result = normalize_axiom(&Axiom::EquivalentClasses(vec![atom("A"), atom("B")]), &opts);
        assert!(result.contains(&Axiom::SubClassOf(atom("A"), atom("B"))));
        assert!(result.contains(&Axiom::SubClassOf(atom("B"), atom("A"))));
        assert!(!result.iter().any(|a| matches!(a, Axiom::DisjointClasses(_))));
    }

    #[test]
    fn same_individual_chain_splits_to_binary() {
        let opts = NormalizationOptions::default();
        let inds: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|n| NamedIndividual::new(format!("http://example.org/{n}")))
            .collect();
        let result = normalize_axiom(&Axiom::SameIndividual(inds.clone()), &opts);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn nary_intersection_binarizes() {
        let opts = NormalizationOptions::default();
        let c = Concept::Intersection(vec![atom("A"), atom("B"), atom("C")]);
        let normalized = normalize_concept(&c, &opts);
        match normalized {
            Concept::Intersection(cs) => assert_eq!(cs.len(), 2),
            other => panic!("expected binary intersection, got {other:?}"),
        }
    }

    #[test]
    fn reflexive_property_uses_synthetic_role() {
        let opts = NormalizationOptions::default();
        let r = Role::named(ObjectProperty::new("http://example.org/knows"));
        let result = normalize_axiom(&Axiom::ReflexiveProperty(r.clone()), &opts);
        assert_eq!(
            result,
            vec![Axiom::SubObjectPropertyOf(synthetic_reflexive_role(), r)]
        );
    }

    #[test]
    fn inverse_properties_become_role_inclusions_both_ways() {
        let opts = NormalizationOptions::default();
        let r = Role::named(ObjectProperty::new("http://example.org/hasPart"));
        let s = Role::named(ObjectProperty::new("http://example.org/partOf"));
        let result = normalize_axiom(&Axiom::InverseProperties(r.clone(), s.clone()), &opts);
        assert!(result.contains(&Axiom::SubObjectPropertyOf(r.clone(), s.inverse())));
        assert!(result.contains(&Axiom::SubObjectPropertyOf(s, r.inverse())));
    }
}
