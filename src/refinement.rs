//! `RefinementOperator`: syntax-directed generalization/specialization of
//! class and role expressions, built from a (way, back) pair of covers.

use crate::concept::Concept;
use crate::covers::Covers;
use crate::error::{RepairError, RepairResult};
use crate::role::Role;

/// Flags gating which constructs refinement is willing to touch.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefinementFlags {
    /// Reject constructs outside the ALC fragment (no cardinalities,
    /// has-value, has-self, nominals).
    pub alc_strict: bool,
    /// Enforce binary ⊓/⊔, binary Same/DifferentIndividuals, binary
    /// DisjointProperties.
    pub sroiq_strict: bool,
    /// Input must already be in negation normal form; output stays in
    /// NNF (negations produced via `complement_nnf`).
    pub nnf_strict: bool,
    /// Permit singleton ⊓/⊔ instead of collapsing to the lone operand.
    pub owl2_single_operands: bool,
}

/// A generalization or specialization operator over concepts/roles, built
/// from a reference ontology's covers.
pub struct RefinementOperator<'a> {
    covers: &'a Covers<'a>,
    flags: RefinementFlags,
    generalize: bool,
}

impl<'a> RefinementOperator<'a> {
    pub fn generalization(covers: &'a Covers<'a>, flags: RefinementFlags) -> Self {
        RefinementOperator {
            covers,
            flags,
            generalize: true,
        }
    }

    pub fn specialization(covers: &'a Covers<'a>, flags: RefinementFlags) -> Self {
        RefinementOperator {
            covers,
            flags,
            generalize: false,
        }
    }

    pub fn is_generalization(&self) -> bool {
        self.generalize
    }

    fn opposite(&self) -> RefinementOperator<'a> {
        RefinementOperator {
            covers: self.covers,
            flags: self.flags,
            generalize: !self.generalize,
        }
    }

    fn way_concept(&self, c: &Concept) -> RepairResult<Vec<Concept>> {
        let arc = if self.generalize {
            self.covers.up_concept(c)?
        } else {
            self.covers.down_concept(c)?
        };
        Ok((*arc).clone())
    }

    fn way_role(&self, r: &Role, simple: bool) -> RepairResult<Vec<Role>> {
        let arc = if self.generalize {
            self.covers.up_role(r, simple)?
        } else {
            self.covers.down_role(r, simple)?
        };
        Ok((*arc).clone())
    }

    /// `roleRefine(R, simple)`: identity only under `ALC_STRICT`.
    pub fn refine_role(&self, r: &Role, simple: bool) -> RepairResult<Vec<Role>> {
        if self.flags.alc_strict {
            return Ok(vec![r.clone()]);
        }
        self.way_role(r, simple)
    }

    fn reconstruct_intersection(&self, mut cs: Vec<Concept>) -> Concept {
        dedup_concepts(&mut cs);
        if cs.len() == 1 && !self.flags.owl2_single_operands {
            cs.into_iter().next().unwrap()
        } else {
            Concept::Intersection(cs)
        }
    }

    fn reconstruct_union(&self, mut cs: Vec<Concept>) -> Concept {
        dedup_concepts(&mut cs);
        if cs.len() == 1 && !self.flags.owl2_single_operands {
            cs.into_iter().next().unwrap()
        } else {
            Concept::Union(cs)
        }
    }

    fn pointwise(&self, cs: &[Concept], reconstruct: impl Fn(&Self, Vec<Concept>) -> Concept) -> RepairResult<Vec<Concept>> {
        let mut out = Vec::new();
        for i in 0..cs.len() {
            for repl in self.refine_concept(&cs[i])? {
                let mut new_cs = cs.to_vec();
                new_cs[i] = repl;
                out.push(reconstruct(self, new_cs));
            }
        }
        Ok(out)
    }

    /// Refine `c` one step in this operator's direction. Always includes
    /// the direct cover of `c` itself, plus constructor-specific
    /// structural refinements.
    pub fn refine_concept(&self, c: &Concept) -> RepairResult<Vec<Concept>> {
        if self.flags.nnf_strict && !c.is_nnf() {
            return Err(RepairError::NotSupported(format!(
                "concept not in negation normal form: {c}"
            )));
        }
        if self.flags.alc_strict && !c.is_alc() {
            return Err(RepairError::NotSupported(format!(
                "concept outside the ALC fragment: {c}"
            )));
        }

        if matches!(c, Concept::ObjectHasValue(..) | Concept::ObjectOneOf(_)) {
            return Ok(Vec::new());
        }

        let mut out = self.way_concept(c)?;

        match c {
            Concept::Atomic(_) | Concept::Top | Concept::Bottom => {}
            Concept::Complement(inner) => {
                if !self.flags.nnf_strict {
                    let opp = self.opposite();
                    for c2 in opp.refine_concept(inner)? {
                        out.push(c2.complement_nnf());
                    }
                }
            }
            Concept::Intersection(cs) => {
                out.extend(self.pointwise(cs, Self::reconstruct_intersection)?);
            }
            Concept::Union(cs) => {
                out.extend(self.pointwise(cs, Self::reconstruct_union)?);
            }
            Concept::ObjectSomeValuesFrom(r, inner) => {
                for repl in self.refine_concept(inner)? {
                    out.push(Concept::ObjectSomeValuesFrom(r.clone(), Box::new(repl)));
                }
                for r2 in self.refine_role(r, false)? {
                    out.push(Concept::ObjectSomeValuesFrom(r2, inner.clone()));
                }
            }
            Concept::ObjectAllValuesFrom(r, inner) => {
                for repl in self.refine_concept(inner)? {
                    out.push(Concept::ObjectAllValuesFrom(r.clone(), Box::new(repl)));
                }
                let opp = self.opposite();
                for r2 in opp.refine_role(r, false)? {
                    out.push(Concept::ObjectAllValuesFrom(r2, inner.clone()));
                }
            }
            Concept::ObjectHasSelf(r) => {
                if !self.flags.alc_strict {
                    for r2 in self.refine_role(r, true)? {
                        out.push(Concept::ObjectHasSelf(r2));
                    }
                }
            }
            Concept::ObjectMaxCardinality(n, r, inner) => {
                if !self.flags.alc_strict {
                    let opp = self.opposite();
                    for repl in opp.refine_concept(inner)? {
                        out.push(Concept::ObjectMaxCardinality(*n, r.clone(), Box::new(repl)));
                    }
                    for r2 in self.refine_role(r, true)? {
                        out.push(Concept::ObjectMaxCardinality(*n, r2, inner.clone()));
                    }
                    let bound = if self.generalize {
                        crate::covers::integer_up_cover(*n)
                    } else {
                        crate::covers::integer_down_cover(*n)
                    };
                    for m in bound {
                        out.push(Concept::ObjectMaxCardinality(m, r.clone(), inner.clone()));
                    }
                }
            }
            Concept::ObjectMinCardinality(n, r, inner) => {
                if !self.flags.alc_strict {
                    for repl in self.refine_concept(inner)? {
                        out.push(Concept::ObjectMinCardinality(*n, r.clone(), Box::new(repl)));
                    }
                    let opp = self.opposite();
                    for r2 in opp.refine_role(r, true)? {
                        out.push(Concept::ObjectMinCardinality(*n, r2, inner.clone()));
                    }
                    let bound = if self.generalize {
                        crate::covers::integer_down_cover(*n)
                    } else {
                        crate::covers::integer_up_cover(*n)
                    };
                    for m in bound {
                        out.push(Concept::ObjectMinCardinality(m, r.clone(), inner.clone()));
                    }
                }
            }
            Concept::ObjectExactCardinality(n, r, inner) => {
                if !self.flags.alc_strict {
                    let synthetic = vec![
                        Concept::ObjectMinCardinality(*n, r.clone(), inner.clone()),
                        Concept::ObjectMaxCardinality(*n, r.clone(), inner.clone()),
                    ];
                    out.extend(self.pointwise(&synthetic, Self::reconstruct_intersection)?);
                }
            }
            Concept::ObjectHasValue(..) | Concept::ObjectOneOf(_) => unreachable!(
                "handled by the early return above"
            ),
        }
        dedup_concepts(&mut out);
        Ok(out)
    }
}

fn dedup_concepts(cs: &mut Vec<Concept>) {
    let mut seen = std::collections::HashSet::new();
    cs.retain(|c| seen.insert(c.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::Axiom;
    use crate::entities::Class;
    use crate::local_oracle::LocalOracle;
    use crate::oracle::ReasonerCache;
    use crate::ontology::OntologyCore;
    use std::sync::Arc;

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    #[test]
    fn atomic_generalization_uses_up_cover() {
        let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
        core.add_static(Axiom::SubClassOf(atom("Dog"), atom("Animal")));
        let covers = Covers::new(&core);
        let op = RefinementOperator::generalization(&covers, RefinementFlags::default());
        let refined = op.refine_concept(&atom("Dog")).unwrap();
        assert!(refined.contains(&atom("Animal")));
    }

    #[test]
    fn one_of_is_not_generalizable() {
        use crate::entities::NamedIndividual;
        let core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
        let covers = Covers::new(&core);
        let op = RefinementOperator::generalization(&covers, RefinementFlags::default());
        let c = Concept::ObjectOneOf(vec![NamedIndividual::new("http://example.org/a")]);
        assert!(op.refine_concept(&c).unwrap().is_empty());
    }

    #[test]
    fn intersection_refines_pointwise() {
        let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
        core.add_static(Axiom::SubClassOf(atom("Dog"), atom("Animal")));
        let covers = Covers::new(&core);
        let op = RefinementOperator::generalization(&covers, RefinementFlags::default());
        let c = Concept::Intersection(vec![atom("Dog"), atom("Cat")]);
        let refined = op.refine_concept(&c).unwrap();
        assert!(refined
            .iter()
            .any(|r| matches!(r, Concept::Intersection(cs) if cs.contains(&atom("Animal")))));
    }

    proptest::proptest! {
        /// A freestanding atomic concept's generalizations never echo
        /// the concept being refined, whatever name it's given.
        #[test]
        fn atomic_generalizations_never_echo_the_input(name in "[A-Z][a-zA-Z0-9]{0,12}") {
            let core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
            let covers = Covers::new(&core);
            let op = RefinementOperator::generalization(&covers, RefinementFlags::default());
            let concept = atom(&name);
            let refined = op.refine_concept(&concept).unwrap();
            for candidate in refined {
                proptest::prop_assert_ne!(candidate, concept.clone());
            }
        }

        /// Same invariant, in the specialization direction.
        #[test]
        fn atomic_specializations_never_echo_the_input(name in "[A-Z][a-zA-Z0-9]{0,12}") {
            let core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
            let covers = Covers::new(&core);
            let op = RefinementOperator::specialization(&covers, RefinementFlags::default());
            let concept = atom(&name);
            let refined = op.refine_concept(&concept).unwrap();
            for candidate in refined {
                proptest::prop_assert_ne!(candidate, concept.clone());
            }
        }
    }
}
