//! Up/down covers over concepts, simple/non-simple roles, and integers,
//! built on [`PreorderCache`].

use crate::concept::Concept;
use crate::entities::ObjectProperty;
use crate::error::OwlResult;
use crate::memoize::StreamMemo;
use crate::ontology::OntologyCore;
use crate::preorder::PreorderCache;
use crate::role::Role;
use parking_lot::Mutex;
use std::collections::HashSet;

fn is_strict<T: Eq + std::hash::Hash + Clone, E>(
    preorder: &mut PreorderCache<T>,
    a: &T,
    b: &T,
    oracle: &mut impl FnMut(&T, &T) -> Result<bool, E>,
) -> Result<bool, E> {
    let ab = preorder.query(a, b, |x, y| oracle(x, y))?;
    if !ab {
        return Ok(false);
    }
    let ba = preorder.query(b, a, |x, y| oracle(x, y))?;
    Ok(!ba)
}

/// `upCover(C) = { X ∈ domain | C ≤ X ∧ ¬∃ Y ∈ domain : C < Y < X }`.
fn up_cover<T: Eq + std::hash::Hash + Clone, E>(
    preorder: &mut PreorderCache<T>,
    domain: &[T],
    elem: &T,
    oracle: &mut impl FnMut(&T, &T) -> Result<bool, E>,
) -> Result<Vec<T>, E> {
    let mut candidates = Vec::new();
    for x in domain {
        if x == elem {
            continue;
        }
        if preorder.query(elem, x, |a, b| oracle(a, b))? {
            candidates.push(x.clone());
        }
    }
    let mut result = Vec::new();
    for x in &candidates {
        let mut dominated = false;
        for y in &candidates {
            if y == x {
                continue;
            }
            if is_strict(preorder, elem, y, oracle)? && is_strict(preorder, y, x, oracle)? {
                dominated = true;
                break;
            }
        }
        if !dominated {
            result.push(x.clone());
        }
    }
    Ok(result)
}

/// `downCover(C) = { X ∈ domain | X ≤ C ∧ ¬∃ Y ∈ domain : X < Y < C }`.
fn down_cover<T: Eq + std::hash::Hash + Clone, E>(
    preorder: &mut PreorderCache<T>,
    domain: &[T],
    elem: &T,
    oracle: &mut impl FnMut(&T, &T) -> Result<bool, E>,
) -> Result<Vec<T>, E> {
    let mut candidates = Vec::new();
    for x in domain {
        if x == elem {
            continue;
        }
        if preorder.query(x, elem, |a, b| oracle(a, b))? {
            candidates.push(x.clone());
        }
    }
    let mut result = Vec::new();
    for x in &candidates {
        let mut dominated = false;
        for y in &candidates {
            if y == x {
                continue;
            }
            if is_strict(preorder, x, y, oracle)? && is_strict(preorder, y, elem, oracle)? {
                dominated = true;
                break;
            }
        }
        if !dominated {
            result.push(x.clone());
        }
    }
    Ok(result)
}

/// Integer cover per the up/down rules at the domain boundary: `upCover(n)
/// = {n, n+1}`; `downCover(0) = {0}`, `downCover(n) = {n, n-1}`.
pub fn integer_up_cover(n: u32) -> Vec<u32> {
    vec![n, n + 1]
}

pub fn integer_down_cover(n: u32) -> Vec<u32> {
    if n == 0 {
        vec![0]
    } else {
        vec![n, n - 1]
    }
}

/// Role hierarchy simplicity: a role is non-simple if it's declared or
/// entailed transitive, or derivable from a property chain of length ≥ 2
/// — propagated through `SubObjectPropertyOf`/`InverseProperties` since a
/// sub-role of a non-simple role is itself non-simple.
pub fn non_simple_roles(core: &OntologyCore) -> HashSet<ObjectProperty> {
    let axioms = core.all_axioms();
    let mut non_simple = HashSet::new();
    for axiom in &axioms {
        match axiom {
            crate::axiom::Axiom::SubPropertyChainOf(chain, r) if chain.len() >= 2 => {
                non_simple.insert(r.property().clone());
            }
            crate::axiom::Axiom::TransitiveProperty(r) => {
                non_simple.insert(r.property().clone());
            }
            _ => {}
        }
    }
    let mut changed = true;
    while changed {
        changed = false;
        for axiom in &axioms {
            match axiom {
                crate::axiom::Axiom::SubObjectPropertyOf(sub, sup) => {
                    if non_simple.contains(sup.property()) && non_simple.insert(sub.property().clone())
                    {
                        changed = true;
                    }
                }
                crate::axiom::Axiom::InverseProperties(r, s) => {
                    if non_simple.contains(r.property()) && non_simple.insert(s.property().clone()) {
                        changed = true;
                    }
                    if non_simple.contains(s.property()) && non_simple.insert(r.property().clone()) {
                        changed = true;
                    }
                }
                _ => {}
            }
        }
    }
    non_simple
}

/// Up/down covers over the concept, role, and integer domains of a
/// reference ontology. Results are cached per-instance (`spec.md`'s
/// "cached by default" cover variant) so repeated refinement queries
/// against the same reference ontology don't re-walk the preorder.
pub struct Covers<'a> {
    core: &'a OntologyCore,
    concept_domain: Vec<Concept>,
    role_domain: Vec<Role>,
    simple_role_domain: Vec<Role>,
    concept_preorder: Mutex<PreorderCache<Concept>>,
    role_preorder: Mutex<PreorderCache<Role>>,
    simple_role_preorder: Mutex<PreorderCache<Role>>,
    up_concept_cache: StreamMemo<Concept, Concept>,
    down_concept_cache: StreamMemo<Concept, Concept>,
    up_role_cache: StreamMemo<Role, Role>,
    down_role_cache: StreamMemo<Role, Role>,
    up_simple_role_cache: StreamMemo<Role, Role>,
    down_simple_role_cache: StreamMemo<Role, Role>,
}

impl<'a> Covers<'a> {
    pub fn new(core: &'a OntologyCore) -> Self {
        let signature = core.signature();
        let mut concept_domain: Vec<Concept> = signature
            .classes
            .iter()
            .cloned()
            .map(Concept::Atomic)
            .collect();
        concept_domain.push(Concept::Top);
        concept_domain.push(Concept::Bottom);

        let non_simple = non_simple_roles(core);
        let role_domain: Vec<Role> = signature
            .roles
            .iter()
            .cloned()
            .map(Role::Named)
            .chain(signature.roles.iter().cloned().map(Role::Inverse))
            .collect();
        let simple_role_domain: Vec<Role> = role_domain
            .iter()
            .filter(|r| !non_simple.contains(r.property()))
            .cloned()
            .collect();

        Covers {
            core,
            concept_domain,
            role_domain,
            simple_role_domain,
            concept_preorder: Mutex::new(PreorderCache::new()),
            role_preorder: Mutex::new(PreorderCache::new()),
            simple_role_preorder: Mutex::new(PreorderCache::new()),
            up_concept_cache: StreamMemo::unbounded(),
            down_concept_cache: StreamMemo::unbounded(),
            up_role_cache: StreamMemo::unbounded(),
            down_role_cache: StreamMemo::unbounded(),
            up_simple_role_cache: StreamMemo::unbounded(),
            down_simple_role_cache: StreamMemo::unbounded(),
        }
    }

    fn concept_oracle(&self) -> impl FnMut(&Concept, &Concept) -> OwlResult<bool> + '_ {
        move |a: &Concept, b: &Concept| {
            self.core
                .is_entailed(&crate::axiom::Axiom::SubClassOf(a.clone(), b.clone()))
        }
    }

    fn role_oracle(&self) -> impl FnMut(&Role, &Role) -> OwlResult<bool> + '_ {
        move |a: &Role, b: &Role| {
            self.core
                .is_entailed(&crate::axiom::Axiom::SubObjectPropertyOf(a.clone(), b.clone()))
        }
    }

    pub fn up_concept(&self, c: &Concept) -> OwlResult<std::sync::Arc<Vec<Concept>>> {
        let domain = self.concept_domain.clone();
        let mut oracle = self.concept_oracle();
        let mut preorder = self.concept_preorder.lock();
        let mut err = None;
        let result = self.up_concept_cache.get_or_stream(c.clone(), || {
            match up_cover(&mut preorder, &domain, c, &mut oracle) {
                Ok(v) => v.into_iter(),
                Err(e) => {
                    err = Some(e);
                    Vec::new().into_iter()
                }
            }
        });
        match err {
            Some(e) => Err(e),
            None => Ok(result),
        }
    }

    pub fn down_concept(&self, c: &Concept) -> OwlResult<std::sync::Arc<Vec<Concept>>> {
        let domain = self.concept_domain.clone();
        let mut oracle = self.concept_oracle();
        let mut preorder = self.concept_preorder.lock();
        let mut err = None;
        let result = self.down_concept_cache.get_or_stream(c.clone(), || {
            match down_cover(&mut preorder, &domain, c, &mut oracle) {
                Ok(v) => v.into_iter(),
                Err(e) => {
                    err = Some(e);
                    Vec::new().into_iter()
                }
            }
        });
        match err {
            Some(e) => Err(e),
            None => Ok(result),
        }
    }

    /// `simple = true` restricts the domain/preorder to simple roles.
    pub fn up_role(&self, r: &Role, simple: bool) -> OwlResult<std::sync::Arc<Vec<Role>>> {
        let (domain, preorder_lock, cache) = if simple {
            (&self.simple_role_domain, &self.simple_role_preorder, &self.up_simple_role_cache)
        } else {
            (&self.role_domain, &self.role_preorder, &self.up_role_cache)
        };
        let domain = domain.clone();
        let mut oracle = self.role_oracle();
        let mut preorder = preorder_lock.lock();
        let mut err = None;
        let result = cache.get_or_stream(r.clone(), || {
            match up_cover(&mut preorder, &domain, r, &mut oracle) {
                Ok(v) => v.into_iter(),
                Err(e) => {
                    err = Some(e);
                    Vec::new().into_iter()
                }
            }
        });
        match err {
            Some(e) => Err(e),
            None => Ok(result),
        }
    }

    pub fn down_role(&self, r: &Role, simple: bool) -> OwlResult<std::sync::Arc<Vec<Role>>> {
        let (domain, preorder_lock, cache) = if simple {
            (&self.simple_role_domain, &self.simple_role_preorder, &self.down_simple_role_cache)
        } else {
            (&self.role_domain, &self.role_preorder, &self.down_role_cache)
        };
        let domain = domain.clone();
        let mut oracle = self.role_oracle();
        let mut preorder = preorder_lock.lock();
        let mut err = None;
        let result = cache.get_or_stream(r.clone(), || {
            match down_cover(&mut preorder, &domain, r, &mut oracle) {
                Ok(v) => v.into_iter(),
                Err(e) => {
                    err = Some(e);
                    Vec::new().into_iter()
                }
            }
        });
        match err {
            Some(e) => Err(e),
            None => Ok(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::Axiom;
    use crate::entities::Class;
    use crate::local_oracle::LocalOracle;
    use crate::oracle::ReasonerCache;
    use std::sync::Arc;

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    #[test]
    fn up_cover_of_bottom_includes_direct_parents() {
        let mut core = OntologyCore::new(ReasonerCache::new(Arc::new(LocalOracle::default())));
        core.add_static(Axiom::SubClassOf(atom("Dog"), atom("Animal")));
        core.add_static(Axiom::SubClassOf(atom("Animal"), Concept::Top));
        let covers = Covers::new(&core);
        let up = covers.up_concept(&atom("Dog")).unwrap();
        assert!(up.contains(&atom("Animal")));
        assert!(!up.contains(&Concept::Top));
    }

    #[test]
    fn integer_covers_match_boundary_rules() {
        assert_eq!(integer_up_cover(3), vec![3, 4]);
        assert_eq!(integer_down_cover(0), vec![0]);
        assert_eq!(integer_down_cover(3), vec![3, 2]);
    }
}
