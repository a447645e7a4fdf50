//! `OntologyCore`: the single mutation point for a repair session's axiom
//! set, paired with the reasoner oracle that answers questions about it.

use crate::axiom::{Axiom, AxiomRecord};
use crate::concept::Concept;
use crate::entities::{Class, NamedIndividual, ObjectProperty};
use crate::error::OwlResult;
use crate::oracle::ReasonerCache;
use crate::role::Role;
use std::collections::HashSet;
use std::sync::Arc;

/// A tuple `(static axioms, refutable axioms, oracle)`. Static axioms are
/// never removed or weakened by a repair run; refutable axioms are the
/// ones a repair strategy is allowed to touch. The two sets are always
/// disjoint.
#[derive(Clone)]
pub struct OntologyCore {
    static_axioms: HashSet<Arc<AxiomRecord>>,
    refutable_axioms: HashSet<Arc<AxiomRecord>>,
    oracle: ReasonerCache,
}

impl OntologyCore {
    pub fn new(oracle: ReasonerCache) -> Self {
        OntologyCore {
            static_axioms: HashSet::new(),
            refutable_axioms: HashSet::new(),
            oracle,
        }
    }

    pub fn from_axioms(
        static_axioms: impl IntoIterator<Item = Axiom>,
        refutable_axioms: impl IntoIterator<Item = Axiom>,
        oracle: ReasonerCache,
    ) -> Self {
        OntologyCore {
            static_axioms: static_axioms.into_iter().map(AxiomRecord::fresh).collect(),
            refutable_axioms: refutable_axioms
                .into_iter()
                .map(AxiomRecord::fresh)
                .collect(),
            oracle,
        }
    }

    pub fn static_axioms(&self) -> &HashSet<Arc<AxiomRecord>> {
        &self.static_axioms
    }

    pub fn refutable_axioms(&self) -> &HashSet<Arc<AxiomRecord>> {
        &self.refutable_axioms
    }

    /// All live axioms, static and refutable, as bare `Axiom` values for
    /// passing to the oracle.
    pub fn all_axioms(&self) -> HashSet<Axiom> {
        self.static_axioms
            .iter()
            .chain(self.refutable_axioms.iter())
            .map(|r| r.axiom.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.static_axioms.len() + self.refutable_axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a refutable axiom with no recorded origin.
    pub fn add(&mut self, axiom: Axiom) {
        self.refutable_axioms.insert(AxiomRecord::fresh(axiom));
    }

    pub fn add_static(&mut self, axiom: Axiom) {
        self.static_axioms.insert(AxiomRecord::fresh(axiom));
    }

    /// Remove a refutable axiom record. Static axioms cannot be removed
    /// through this method — a repair strategy must promote/demote
    /// explicitly via [`OntologyCore::promote_to_static`] first.
    pub fn remove(&mut self, record: &Arc<AxiomRecord>) -> bool {
        self.refutable_axioms.remove(record)
    }

    /// Atomically remove `old` and add `new`, each carrying `old`'s origin
    /// annotation (or `old` itself as the origin, if it had none). `new`
    /// axioms land in whichever set `old` came from.
    pub fn replace(&mut self, old: &Arc<AxiomRecord>, new: impl IntoIterator<Item = Axiom>) {
        let was_static = self.static_axioms.remove(old);
        if !was_static {
            self.refutable_axioms.remove(old);
        }
        let target = if was_static {
            &mut self.static_axioms
        } else {
            &mut self.refutable_axioms
        };
        for replacement in new {
            target.insert(AxiomRecord::derived(old, replacement));
        }
    }

    /// Move a refutable axiom into the static set, preserving its record
    /// (used by `Weakening`'s `enhance_ref` option to pin reference
    /// axioms before repair starts).
    pub fn promote_to_static(&mut self, record: &Arc<AxiomRecord>) {
        if self.refutable_axioms.remove(record) {
            self.static_axioms.insert(record.clone());
        }
    }

    /// A new core sharing this one's oracle (and therefore its hot
    /// reasoner instance and lock) — cheap, but serializes concurrent
    /// oracle calls.
    pub fn clone_shared(&self) -> Self {
        OntologyCore {
            static_axioms: self.static_axioms.clone(),
            refutable_axioms: self.refutable_axioms.clone(),
            oracle: self.oracle.clone(),
        }
    }

    /// A new core with an independent oracle cache, for parallel workers
    /// (`BestOfKWeakening`, `MctsWeakening`) that must not serialize
    /// against each other or the main ontology.
    pub fn clone_with_separate_cache(&self) -> Self {
        OntologyCore {
            static_axioms: self.static_axioms.clone(),
            refutable_axioms: self.refutable_axioms.clone(),
            oracle: self.oracle.clone_with_separate_cache(),
        }
    }

    /// A new core whose refutable set is replaced by `refutable`
    /// (all previously static axioms are kept static); used to set up an
    /// `AxiomWeakener`'s reference ontology from an MCS.
    pub fn clone_with_refutable(&self, refutable: HashSet<Arc<AxiomRecord>>) -> Self {
        OntologyCore {
            static_axioms: self.static_axioms.clone(),
            refutable_axioms: refutable,
            oracle: self.oracle.clone(),
        }
    }

    pub fn is_consistent(&self) -> OwlResult<bool> {
        let axioms = self.all_axioms();
        self.oracle.with_reasoner(&axioms, |h| h.is_consistent())
    }

    pub fn is_entailed(&self, axiom: &Axiom) -> OwlResult<bool> {
        let axioms = self.all_axioms();
        self.oracle
            .with_reasoner(&axioms, |h| h.is_entailed(axiom))
    }

    pub fn is_satisfiable(&self, concept: &Concept) -> OwlResult<bool> {
        let axioms = self.all_axioms();
        self.oracle
            .with_reasoner(&axioms, |h| h.is_satisfiable(concept))
    }

    /// Named classes, roles, and individuals reachable from the live
    /// axiom set (excludes the built-in `⊤`/`⊥` sentinels).
    pub fn signature(&self) -> Signature {
        let mut sig = Signature::default();
        for record in self.static_axioms.iter().chain(self.refutable_axioms.iter()) {
            collect_axiom_signature(&record.axiom, &mut sig);
        }
        sig
    }
}

#[derive(Debug, Default, Clone)]
pub struct Signature {
    pub classes: HashSet<Class>,
    pub roles: HashSet<ObjectProperty>,
    pub individuals: HashSet<NamedIndividual>,
}

fn collect_role_signature(role: &Role, sig: &mut Signature) {
    sig.roles.insert(role.property().clone());
}

fn collect_concept_signature(concept: &Concept, sig: &mut Signature) {
    match concept {
        Concept::Atomic(c) => {
            sig.classes.insert(c.clone());
        }
        Concept::Top | Concept::Bottom => {}
        Concept::Complement(c) => collect_concept_signature(c, sig),
        Concept::Intersection(cs) | Concept::Union(cs) => {
            for c in cs {
                collect_concept_signature(c, sig);
            }
        }
        Concept::ObjectSomeValuesFrom(r, c) | Concept::ObjectAllValuesFrom(r, c) => {
            collect_role_signature(r, sig);
            collect_concept_signature(c, sig);
        }
        Concept::ObjectHasValue(r, a) => {
            collect_role_signature(r, sig);
            sig.individuals.insert(a.clone());
        }
        Concept::ObjectHasSelf(r) => collect_role_signature(r, sig),
        Concept::ObjectMinCardinality(_, r, c)
        | Concept::ObjectMaxCardinality(_, r, c)
        | Concept::ObjectExactCardinality(_, r, c) => {
            collect_role_signature(r, sig);
            collect_concept_signature(c, sig);
        }
        Concept::ObjectOneOf(inds) => {
            for a in inds {
                sig.individuals.insert(a.clone());
            }
        }
    }
}

fn collect_axiom_signature(axiom: &Axiom, sig: &mut Signature) {
    match axiom {
        Axiom::SubClassOf(a, b) => {
            collect_concept_signature(a, sig);
            collect_concept_signature(b, sig);
        }
        Axiom::EquivalentClasses(cs) | Axiom::DisjointClasses(cs) => {
            for c in cs {
                collect_concept_signature(c, sig);
            }
        }
        Axiom::DisjointUnion(a, cs) => {
            sig.classes.insert(a.clone());
            for c in cs {
                collect_concept_signature(c, sig);
            }
        }
        Axiom::ObjectPropertyDomain(r, c) | Axiom::ObjectPropertyRange(r, c) => {
            collect_role_signature(r, sig);
            collect_concept_signature(c, sig);
        }
        Axiom::SubObjectPropertyOf(r, s) => {
            collect_role_signature(r, sig);
            collect_role_signature(s, sig);
        }
        Axiom::SubPropertyChainOf(chain, r) => {
            for role in chain {
                collect_role_signature(role, sig);
            }
            collect_role_signature(r, sig);
        }
        Axiom::InverseProperties(r, s) => {
            collect_role_signature(r, sig);
            collect_role_signature(s, sig);
        }
        Axiom::TransitiveProperty(r)
        | Axiom::SymmetricProperty(r)
        | Axiom::AsymmetricProperty(r)
        | Axiom::ReflexiveProperty(r)
        | Axiom::IrreflexiveProperty(r) => collect_role_signature(r, sig),
        Axiom::EquivalentProperties(rs) | Axiom::DisjointProperties(rs) => {
            for r in rs {
                collect_role_signature(r, sig);
            }
        }
        Axiom::ClassAssertion(c, a) => {
            collect_concept_signature(c, sig);
            sig.individuals.insert(a.clone());
        }
        Axiom::PropertyAssertion(r, a, b) | Axiom::NegativePropertyAssertion(r, a, b) => {
            collect_role_signature(r, sig);
            sig.individuals.insert(a.clone());
            sig.individuals.insert(b.clone());
        }
        Axiom::SameIndividual(inds) | Axiom::DifferentIndividuals(inds) => {
            for a in inds {
                sig.individuals.insert(a.clone());
            }
        }
        Axiom::Declaration(d) => match d {
            crate::axiom::Declaration::Class(c) => {
                sig.classes.insert(c.clone());
            }
            crate::axiom::Declaration::ObjectProperty(p) => {
                sig.roles.insert(p.clone());
            }
            crate::axiom::Declaration::NamedIndividual(i) => {
                sig.individuals.insert(i.clone());
            }
        },
        Axiom::AnnotationAssertion(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_oracle::LocalOracle;

    fn fresh_core() -> OntologyCore {
        OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())))
    }

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    #[test]
    fn replace_preserves_oldest_origin() {
        let mut core = fresh_core();
        core.add(Axiom::SubClassOf(atom("A"), atom("B")));
        let record = core.refutable_axioms().iter().next().unwrap().clone();
        core.replace(&record, [Axiom::SubClassOf(atom("A"), Concept::Top)]);
        let replaced = core.refutable_axioms().iter().next().unwrap();
        assert_eq!(replaced.origin.as_ref().unwrap(), &record.axiom);
    }

    #[test]
    fn static_and_refutable_partition_stays_disjoint() {
        let mut core = fresh_core();
        core.add_static(Axiom::SubClassOf(atom("A"), atom("B")));
        core.add(Axiom::SubClassOf(atom("B"), atom("C")));
        assert_eq!(core.static_axioms().len(), 1);
        assert_eq!(core.refutable_axioms().len(), 1);
        let intersection: Vec<_> = core
            .static_axioms()
            .intersection(core.refutable_axioms())
            .collect();
        assert!(intersection.is_empty());
    }

    #[test]
    fn signature_collects_classes_from_nested_concepts() {
        let mut core = fresh_core();
        let r = Role::named(ObjectProperty::new("http://example.org/hasPart"));
        core.add(Axiom::SubClassOf(
            atom("A"),
            Concept::ObjectSomeValuesFrom(r, Box::new(atom("B"))),
        ));
        let sig = core.signature();
        assert_eq!(sig.classes.len(), 2);
        assert_eq!(sig.roles.len(), 1);
    }

    #[test]
    fn clone_shared_sees_same_oracle_state() {
        let core = fresh_core();
        let clone = core.clone_shared();
        assert!(core.is_consistent().unwrap());
        assert!(clone.is_consistent().unwrap());
    }
}
