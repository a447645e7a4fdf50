//! The expression factory boundary.
//!
//! `spec.md` §6 names this as the seam a *host* (the out-of-scope editor
//! plugin) constructs `Concept`/`Role`/`Axiom` values through, so the
//! refinement engine never has to know whether it's talking to a live
//! OWL-API-backed factory or a standalone one. This crate's own code
//! (refinement, normalization, axiom refinement) builds values directly
//! via the inherent variant constructors, the way the teacher's own
//! internal reasoning code builds `ClassExpression`s directly rather than
//! through a factory indirection — `ExpressionFactory` is for a caller
//! sitting *above* this crate, not for this crate's own internals.
//! [`DefaultExpressionFactory`] is the in-process implementation used by
//! the oracle and tests, and stands in for what a host's real factory
//! would do.

use crate::axiom::{AnnotationAssertion, Axiom, Declaration};
use crate::concept::Concept;
use crate::entities::{Annotation, Class, NamedIndividual, ObjectProperty};
use crate::role::Role;

/// Immutable constructors for every concept/role/axiom shape in the data
/// model. A trait rather than free functions so a host can substitute a
/// factory that interns through its own ontology.
pub trait ExpressionFactory {
    fn class(&self, iri: &str) -> Class {
        Class::new(iri)
    }

    fn object_property(&self, iri: &str) -> ObjectProperty {
        ObjectProperty::new(iri)
    }

    fn individual(&self, iri: &str) -> NamedIndividual {
        NamedIndividual::new(iri)
    }

    fn named_role(&self, property: ObjectProperty) -> Role {
        Role::named(property)
    }

    fn role_inverse(&self, role: Role) -> Role {
        role.inverse()
    }

    fn top(&self) -> Concept {
        Concept::Top
    }

    fn bottom(&self) -> Concept {
        Concept::Bottom
    }

    fn atomic(&self, class: Class) -> Concept {
        Concept::Atomic(class)
    }

    fn complement(&self, c: Concept) -> Concept {
        Concept::Complement(Box::new(c))
    }

    fn intersection(&self, cs: Vec<Concept>) -> Concept {
        Concept::Intersection(cs)
    }

    fn union(&self, cs: Vec<Concept>) -> Concept {
        Concept::Union(cs)
    }

    fn some_values_from(&self, r: Role, c: Concept) -> Concept {
        Concept::ObjectSomeValuesFrom(r, Box::new(c))
    }

    fn all_values_from(&self, r: Role, c: Concept) -> Concept {
        Concept::ObjectAllValuesFrom(r, Box::new(c))
    }

    fn has_value(&self, r: Role, a: NamedIndividual) -> Concept {
        Concept::ObjectHasValue(r, a)
    }

    fn has_self(&self, r: Role) -> Concept {
        Concept::ObjectHasSelf(r)
    }

    fn min_cardinality(&self, n: u32, r: Role, c: Concept) -> Concept {
        Concept::ObjectMinCardinality(n, r, Box::new(c))
    }

    fn max_cardinality(&self, n: u32, r: Role, c: Concept) -> Concept {
        Concept::ObjectMaxCardinality(n, r, Box::new(c))
    }

    fn exact_cardinality(&self, n: u32, r: Role, c: Concept) -> Concept {
        Concept::ObjectExactCardinality(n, r, Box::new(c))
    }

    fn one_of(&self, individuals: Vec<NamedIndividual>) -> Concept {
        Concept::ObjectOneOf(individuals)
    }

    fn sub_class_of(&self, sub: Concept, sup: Concept) -> Axiom {
        Axiom::SubClassOf(sub, sup)
    }

    fn equivalent_classes(&self, cs: Vec<Concept>) -> Axiom {
        Axiom::EquivalentClasses(cs)
    }

    fn disjoint_classes(&self, cs: Vec<Concept>) -> Axiom {
        Axiom::DisjointClasses(cs)
    }

    fn disjoint_union(&self, class: Class, cs: Vec<Concept>) -> Axiom {
        Axiom::DisjointUnion(class, cs)
    }

    fn object_property_domain(&self, r: Role, c: Concept) -> Axiom {
        Axiom::ObjectPropertyDomain(r, c)
    }

    fn object_property_range(&self, r: Role, c: Concept) -> Axiom {
        Axiom::ObjectPropertyRange(r, c)
    }

    fn sub_object_property_of(&self, sub: Role, sup: Role) -> Axiom {
        Axiom::SubObjectPropertyOf(sub, sup)
    }

    fn sub_property_chain_of(&self, chain: Vec<Role>, sup: Role) -> Axiom {
        Axiom::SubPropertyChainOf(chain, sup)
    }

    fn inverse_properties(&self, r: Role, s: Role) -> Axiom {
        Axiom::InverseProperties(r, s)
    }

    fn transitive_property(&self, r: Role) -> Axiom {
        Axiom::TransitiveProperty(r)
    }

    fn symmetric_property(&self, r: Role) -> Axiom {
        Axiom::SymmetricProperty(r)
    }

    fn asymmetric_property(&self, r: Role) -> Axiom {
        Axiom::AsymmetricProperty(r)
    }

    fn reflexive_property(&self, r: Role) -> Axiom {
        Axiom::ReflexiveProperty(r)
    }

    fn irreflexive_property(&self, r: Role) -> Axiom {
        Axiom::IrreflexiveProperty(r)
    }

    fn equivalent_properties(&self, rs: Vec<Role>) -> Axiom {
        Axiom::EquivalentProperties(rs)
    }

    fn disjoint_properties(&self, rs: Vec<Role>) -> Axiom {
        Axiom::DisjointProperties(rs)
    }

    fn class_assertion(&self, c: Concept, a: NamedIndividual) -> Axiom {
        Axiom::ClassAssertion(c, a)
    }

    fn property_assertion(&self, r: Role, a: NamedIndividual, b: NamedIndividual) -> Axiom {
        Axiom::PropertyAssertion(r, a, b)
    }

    fn negative_property_assertion(&self, r: Role, a: NamedIndividual, b: NamedIndividual) -> Axiom {
        Axiom::NegativePropertyAssertion(r, a, b)
    }

    fn same_individual(&self, individuals: Vec<NamedIndividual>) -> Axiom {
        Axiom::SameIndividual(individuals)
    }

    fn different_individuals(&self, individuals: Vec<NamedIndividual>) -> Axiom {
        Axiom::DifferentIndividuals(individuals)
    }

    fn declare_class(&self, class: Class) -> Axiom {
        Axiom::Declaration(Declaration::Class(class))
    }

    fn declare_object_property(&self, property: ObjectProperty) -> Axiom {
        Axiom::Declaration(Declaration::ObjectProperty(property))
    }

    fn declare_individual(&self, individual: NamedIndividual) -> Axiom {
        Axiom::Declaration(Declaration::NamedIndividual(individual))
    }

    fn annotation_assertion(&self, subject: crate::iri::IRI, annotation: Annotation) -> Axiom {
        Axiom::AnnotationAssertion(AnnotationAssertion { subject, annotation })
    }
}

/// The in-process default: builds values directly via inherent
/// constructors, deferring interning to the global entity cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExpressionFactory;

impl ExpressionFactory for DefaultExpressionFactory {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_factory_builds_subclass_axiom() {
        let f = DefaultExpressionFactory;
        let a = f.atomic(f.class("http://example.org/A"));
        let b = f.atomic(f.class("http://example.org/B"));
        assert_eq!(f.sub_class_of(a.clone(), b.clone()), Axiom::SubClassOf(a, b));
    }

    #[test]
    fn role_inverse_round_trips_through_the_factory() {
        let f = DefaultExpressionFactory;
        let r = f.named_role(f.object_property("http://example.org/hasPart"));
        assert_eq!(f.role_inverse(f.role_inverse(r.clone())), r);
    }

    #[test]
    fn declarations_build_the_matching_entity_kind() {
        let f = DefaultExpressionFactory;
        let class = f.class("http://example.org/Dog");
        assert_eq!(
            f.declare_class(class.clone()),
            Axiom::Declaration(Declaration::Class(class))
        );
    }
}
