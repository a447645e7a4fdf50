//! Lifts concept/role refinement to axiom-level weakening/strengthening.

use crate::axiom::Axiom;
use crate::covers::{non_simple_roles, Covers};
use crate::entities::ObjectProperty;
use crate::error::{RepairError, RepairResult};
use crate::ontology::OntologyCore;
use crate::preorder::PreorderCache;
use crate::refinement::{RefinementFlags, RefinementOperator};
use crate::role::Role;
use parking_lot::Mutex;
use std::collections::HashSet;

/// Shared state between `AxiomWeakener` and `AxiomStrengthener`: a
/// reference ontology's covers, the simple-role set, a preorder used to
/// check that a super-role refinement preserves RBox regularity, and the
/// active flags.
struct AxiomRefiner<'a> {
    covers: Covers<'a>,
    flags: RefinementFlags,
    weaken: bool,
    simple_roles: HashSet<ObjectProperty>,
    regular_preorder: Mutex<PreorderCache<Role>>,
}

impl<'a> AxiomRefiner<'a> {
    fn new(reference: &'a OntologyCore, flags: RefinementFlags, weaken: bool) -> Self {
        let non_simple = non_simple_roles(reference);
        let simple_roles: HashSet<ObjectProperty> = reference
            .signature()
            .roles
            .into_iter()
            .filter(|r| !non_simple.contains(r))
            .collect();
        AxiomRefiner {
            covers: Covers::new(reference),
            flags,
            weaken,
            simple_roles,
            regular_preorder: Mutex::new(PreorderCache::new()),
        }
    }

    fn op(&self) -> RefinementOperator<'_> {
        if self.weaken {
            RefinementOperator::generalization(&self.covers, self.flags)
        } else {
            RefinementOperator::specialization(&self.covers, self.flags)
        }
    }

    fn opposite_op(&self) -> RefinementOperator<'_> {
        if self.weaken {
            RefinementOperator::specialization(&self.covers, self.flags)
        } else {
            RefinementOperator::generalization(&self.covers, self.flags)
        }
    }

    fn noop(&self) -> Axiom {
        if self.weaken {
            Axiom::weakening_noop()
        } else {
            Axiom::strengthening_noop()
        }
    }

    fn is_simple(&self, r: &Role) -> bool {
        self.simple_roles.contains(r.property())
    }

    /// A super-role refinement is permitted if the candidate is simple,
    /// or the preorder accepts it as a regular successor of the current
    /// super-role (approximating RIA regularity without a full chain
    /// analysis).
    fn super_role_permitted(&self, current: &Role, candidate: &Role) -> bool {
        if self.is_simple(candidate) {
            return true;
        }
        let mut preorder = self.regular_preorder.lock();
        if preorder.is_known_leq(candidate, current) {
            false
        } else {
            preorder.assert(current, candidate);
            true
        }
    }

    /// Like [`Self::super_role_permitted`], but for the super-role of a
    /// `SubPropertyChainOf` axiom: the candidate must additionally stay
    /// strictly above every role used as a chain component, since a
    /// chain predecessor becoming a successor of its own super-role
    /// would make the RBox irregular.
    fn chain_super_role_permitted(&self, current: &Role, candidate: &Role, chain: &[Role]) -> bool {
        if self.is_simple(candidate) {
            return true;
        }
        let mut preorder = self.regular_preorder.lock();
        if preorder.is_known_leq(candidate, current) {
            return false;
        }
        for pred in chain {
            if preorder.is_known_leq(candidate, pred) {
                return false;
            }
        }
        preorder.assert(current, candidate);
        for pred in chain {
            preorder.deny(candidate, pred);
        }
        true
    }

    fn remove_one<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
        if items.len() <= 2 {
            return Vec::new();
        }
        (0..items.len())
            .map(|i| {
                let mut rest = items.to_vec();
                rest.remove(i);
                rest
            })
            .collect()
    }

    /// Specialize each operand of a Disjoint* list in turn, guarding
    /// against two operands collapsing onto the same refined concept by
    /// wrapping the later one in a double complement (semantically
    /// idempotent, syntactically distinct).
    fn respecialize_disjoint(
        &self,
        concepts: &[crate::concept::Concept],
    ) -> RepairResult<Vec<Vec<crate::concept::Concept>>> {
        let spec_op = self.opposite_op();
        let mut out = Vec::new();
        for i in 0..concepts.len() {
            for repl in spec_op.refine_concept(&concepts[i])? {
                let mut new_cs = concepts.to_vec();
                new_cs[i] = repl;
                for j in 0..new_cs.len() {
                    if j == i {
                        continue;
                    }
                    if new_cs[j] == new_cs[i] {
                        new_cs[i] =
                            crate::concept::Concept::Complement(Box::new(crate::concept::Concept::Complement(
                                Box::new(new_cs[i].clone()),
                            )));
                    }
                }
                out.push(new_cs);
            }
        }
        Ok(out)
    }

    fn refine_axiom(&self, axiom: &Axiom) -> RepairResult<Vec<Axiom>> {
        if axiom.is_non_logical() {
            return Ok(vec![axiom.clone()]);
        }

        let mut out = vec![axiom.clone(), self.noop()];
        let op = self.op();
        let opp = self.opposite_op();

        match axiom {
            Axiom::SubClassOf(c, d) => {
                for c2 in opp.refine_concept(c)? {
                    out.push(Axiom::SubClassOf(c2, d.clone()));
                }
                for d2 in op.refine_concept(d)? {
                    out.push(Axiom::SubClassOf(c.clone(), d2));
                }
            }
            Axiom::ClassAssertion(c, a) => {
                for c2 in op.refine_concept(c)? {
                    out.push(Axiom::ClassAssertion(c2, a.clone()));
                }
            }
            Axiom::PropertyAssertion(r, a, b) => {
                for r2 in op.refine_role(r, false)? {
                    out.push(Axiom::PropertyAssertion(r2, a.clone(), b.clone()));
                }
            }
            Axiom::NegativePropertyAssertion(r, a, b) => {
                for r2 in opp.refine_role(r, false)? {
                    out.push(Axiom::NegativePropertyAssertion(r2, a.clone(), b.clone()));
                }
            }
            Axiom::SameIndividual(inds) if self.weaken => {
                for rest in Self::remove_one(inds) {
                    out.push(Axiom::SameIndividual(rest));
                }
            }
            Axiom::DifferentIndividuals(inds) if self.weaken => {
                for rest in Self::remove_one(inds) {
                    out.push(Axiom::DifferentIndividuals(rest));
                }
            }
            Axiom::EquivalentClasses(cs) if self.weaken => {
                for rest in Self::remove_one(cs) {
                    out.push(Axiom::EquivalentClasses(rest));
                }
            }
            Axiom::EquivalentProperties(rs) if self.weaken => {
                for rest in Self::remove_one(rs) {
                    out.push(Axiom::EquivalentProperties(rest));
                }
            }
            Axiom::DisjointClasses(cs) if self.weaken => {
                for variant in self.respecialize_disjoint(cs)? {
                    out.push(Axiom::DisjointClasses(variant));
                }
            }
            Axiom::SubObjectPropertyOf(sub, sup) => {
                if self.is_simple(sub) {
                    for sub2 in opp.refine_role(sub, true)? {
                        out.push(Axiom::SubObjectPropertyOf(sub2, sup.clone()));
                    }
                }
                for sup2 in op.refine_role(sup, false)? {
                    if self.super_role_permitted(sup, &sup2) {
                        out.push(Axiom::SubObjectPropertyOf(sub.clone(), sup2));
                    }
                }
            }
            Axiom::SubPropertyChainOf(chain, sup) => {
                for sup2 in op.refine_role(sup, false)? {
                    if self.chain_super_role_permitted(sup, &sup2, chain) {
                        out.push(Axiom::SubPropertyChainOf(chain.clone(), sup2));
                    }
                }
            }
            Axiom::DisjointProperties(rs) if self.weaken => {
                let simple_rs: Vec<Role> = rs.iter().filter(|r| self.is_simple(r)).cloned().collect();
                if simple_rs.len() == rs.len() {
                    for i in 0..rs.len() {
                        for repl in opp.refine_role(&rs[i], true)? {
                            let mut new_rs = rs.clone();
                            new_rs[i] = repl;
                            out.push(Axiom::DisjointProperties(new_rs));
                        }
                    }
                }
            }
            Axiom::Declaration(_) => {
                return Ok(vec![axiom.clone()]);
            }
            _ => {
                if self.flags.alc_strict || self.flags.sroiq_strict {
                    return Err(RepairError::NotSupported(format!(
                        "axiom shape not supported by refinement under the active flags: {axiom}"
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        out.retain(|a| seen.insert(a.clone()));
        Ok(out)
    }
}

/// Produces weaker replacements for an axiom (`⊑`-above a reference
/// axiom, or the weakening no-op `⊥ ⊑ ⊤`).
pub struct AxiomWeakener<'a>(AxiomRefiner<'a>);

impl<'a> AxiomWeakener<'a> {
    pub fn new(reference: &'a OntologyCore, flags: RefinementFlags) -> Self {
        AxiomWeakener(AxiomRefiner::new(reference, flags, true))
    }

    pub fn weaker_axioms(&self, axiom: &Axiom) -> RepairResult<Vec<Axiom>> {
        self.0.refine_axiom(axiom)
    }
}

/// Produces stronger replacements for an axiom (`⊑`-below a reference
/// axiom, or the strengthening no-op `⊤ ⊑ ⊥`).
pub struct AxiomStrengthener<'a>(AxiomRefiner<'a>);

impl<'a> AxiomStrengthener<'a> {
    pub fn new(reference: &'a OntologyCore, flags: RefinementFlags) -> Self {
        AxiomStrengthener(AxiomRefiner::new(reference, flags, false))
    }

    pub fn stronger_axioms(&self, axiom: &Axiom) -> RepairResult<Vec<Axiom>> {
        self.0.refine_axiom(axiom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::Concept;
    use crate::entities::{Class, NamedIndividual};
    use crate::local_oracle::LocalOracle;
    use crate::oracle::ReasonerCache;
    use std::sync::Arc;

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    fn fresh_core() -> OntologyCore {
        OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())))
    }

    #[test]
    fn weaker_axioms_include_noop_and_identity() {
        let mut core = fresh_core();
        core.add_static(Axiom::SubClassOf(atom("Dog"), atom("Animal")));
        let weakener = AxiomWeakener::new(&core, RefinementFlags::default());
        let axiom = Axiom::SubClassOf(atom("Dog"), atom("Animal"));
        let weaker = weakener.weaker_axioms(&axiom).unwrap();
        assert!(weaker.contains(&axiom));
        assert!(weaker.contains(&Axiom::weakening_noop()));
    }

    #[test]
    fn class_assertion_weakens_via_generalization() {
        let mut core = fresh_core();
        core.add_static(Axiom::SubClassOf(atom("Dog"), atom("Animal")));
        let weakener = AxiomWeakener::new(&core, RefinementFlags::default());
        let a = NamedIndividual::new("http://example.org/rex");
        let axiom = Axiom::ClassAssertion(atom("Dog"), a.clone());
        let weaker = weakener.weaker_axioms(&axiom).unwrap();
        assert!(weaker.contains(&Axiom::ClassAssertion(atom("Animal"), a)));
    }

    #[test]
    fn declarations_are_never_refined() {
        let core = fresh_core();
        let weakener = AxiomWeakener::new(&core, RefinementFlags::default());
        let decl = Axiom::Declaration(crate::axiom::Declaration::Class(Class::new(
            "http://example.org/Dog",
        )));
        assert_eq!(weakener.weaker_axioms(&decl).unwrap(), vec![decl]);
    }

    #[test]
    fn chain_super_role_refinement_denies_its_own_chain_predecessors() {
        use crate::entities::ObjectProperty;
        use crate::role::Role;

        let core = fresh_core();
        let refiner = AxiomRefiner::new(&core, RefinementFlags::default(), true);
        let current = Role::named(ObjectProperty::new("http://example.org/r"));
        let candidate = Role::named(ObjectProperty::new("http://example.org/s"));
        let pred = Role::named(ObjectProperty::new("http://example.org/p"));

        assert!(refiner.chain_super_role_permitted(&current, &candidate, std::slice::from_ref(&pred)));

        // The candidate super-role must no longer be a possible successor
        // of its own chain predecessor, or a later refinement could make
        // the predecessor a successor of the chain's own super-role.
        let mut preorder = refiner.regular_preorder.lock();
        let result = preorder.query(&candidate, &pred, |_, _| -> Result<bool, ()> {
            panic!("denied edge must short-circuit before consulting the oracle")
        });
        assert_eq!(result, Ok(false));
    }

    #[test]
    fn same_individual_weakens_by_dropping_one_member() {
        let core = fresh_core();
        let weakener = AxiomWeakener::new(&core, RefinementFlags::default());
        let inds: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|n| NamedIndividual::new(format!("http://example.org/{n}")))
            .collect();
        let axiom = Axiom::SameIndividual(inds.clone());
        let weaker = weakener.weaker_axioms(&axiom).unwrap();
        assert!(weaker
            .iter()
            .any(|a| matches!(a, Axiom::SameIndividual(rest) if rest.len() == 2)));
    }
}
