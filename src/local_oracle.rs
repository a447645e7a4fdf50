//! A small in-process ALC-family tableau reasoner standing in for a real
//! external DL reasoner, so the engine is testable and runnable end to
//! end without a live OWL-API bridge.
//!
//! This is **not** a complete SROIQ(D) decision procedure. It internalizes
//! TBox axioms built from `SubClassOf`/`EquivalentClasses`/`DisjointClasses`
//! into global GCIs and runs a depth- and node-bounded ALC tableau
//! (`⊓/⊔/¬/∃/∀` expansion with a clash check) over the ABox. RBox axioms
//! (role hierarchies, transitivity, ...) and cardinality/nominal concepts
//! are accepted and stored but not enforced during satisfiability
//! checking — a production deployment is expected to substitute a real DL
//! reasoner here.

use crate::axiom::Axiom;
use crate::concept::Concept;
use crate::entities::NamedIndividual;
use crate::error::OwlResult;
use crate::oracle::{ReasonerHandle, ReasonerOracle};
use crate::role::Role;
use std::collections::{HashMap, HashSet};

/// The depth at which tableau expansion gives up and treats a node as
/// blocked (sound but incomplete for deeply recursive existentials).
const MAX_DEPTH: usize = 8;
/// The total node budget for one satisfiability check.
const MAX_NODES: usize = 256;

#[derive(Default)]
pub struct LocalOracle;

impl ReasonerOracle for LocalOracle {
    fn classify(&self, axioms: &HashSet<Axiom>) -> OwlResult<Box<dyn ReasonerHandle>> {
        Ok(Box::new(LocalHandle {
            axioms: axioms.clone(),
        }))
    }
}

struct LocalHandle {
    axioms: HashSet<Axiom>,
}

impl ReasonerHandle for LocalHandle {
    fn flush(&mut self, additions: &[Axiom], removals: &[Axiom]) -> OwlResult<()> {
        for a in removals {
            self.axioms.remove(a);
        }
        for a in additions {
            self.axioms.insert(a.clone());
        }
        Ok(())
    }

    fn is_consistent(&mut self) -> OwlResult<bool> {
        Ok(tableau::is_abox_consistent(&self.axioms))
    }

    fn is_entailed(&mut self, axiom: &Axiom) -> OwlResult<bool> {
        Ok(tableau::is_entailed(&self.axioms, axiom))
    }

    fn is_satisfiable(&mut self, concept: &Concept) -> OwlResult<bool> {
        Ok(tableau::is_concept_satisfiable(&self.axioms, concept))
    }

    fn dispose(&mut self) {}
}

mod tableau {
    use super::*;

    /// A node in the completion graph.
    struct Node {
        label: HashSet<Concept>,
        edges: Vec<(Role, usize)>,
    }

    struct Graph {
        nodes: Vec<Node>,
        gcis: Vec<Concept>,
    }

    impl Graph {
        fn new(gcis: Vec<Concept>) -> Self {
            Graph {
                nodes: Vec::new(),
                gcis,
            }
        }

        fn new_node(&mut self, seed: impl IntoIterator<Item = Concept>) -> usize {
            let mut label: HashSet<Concept> = seed.into_iter().collect();
            for g in &self.gcis {
                label.insert(g.clone());
            }
            self.nodes.push(Node {
                label,
                edges: Vec::new(),
            });
            self.nodes.len() - 1
        }
    }

    /// Build the GCI set `{ ¬C ⊔ D | C ⊑ D derivable from the TBox }` in
    /// NNF, internalizing `SubClassOf`/`EquivalentClasses`/`DisjointClasses`.
    fn internalize_tbox(axioms: &HashSet<Axiom>) -> Vec<Concept> {
        let mut gcis = Vec::new();
        for axiom in axioms {
            match axiom {
                Axiom::SubClassOf(c, d) => {
                    gcis.push(Concept::Union(vec![c.complement_nnf(), d.nnf()]));
                }
                Axiom::EquivalentClasses(cs) if cs.len() >= 2 => {
                    for w in 0..cs.len() {
                        let c = &cs[w];
                        let d = &cs[(w + 1) % cs.len()];
                        gcis.push(Concept::Union(vec![c.complement_nnf(), d.nnf()]));
                    }
                }
                Axiom::DisjointClasses(cs) => {
                    for i in 0..cs.len() {
                        for j in (i + 1)..cs.len() {
                            gcis.push(Concept::Union(vec![
                                cs[i].complement_nnf(),
                                cs[j].complement_nnf(),
                            ]));
                        }
                    }
                }
                Axiom::DisjointUnion(class, cs) => {
                    let atom = Concept::Atomic(class.clone());
                    gcis.push(Concept::Union(vec![
                        atom.complement_nnf(),
                        Concept::Union(cs.clone()).nnf(),
                    ]));
                    gcis.push(Concept::Union(vec![
                        Concept::Union(cs.clone()).complement_nnf(),
                        atom.clone(),
                    ]));
                    for i in 0..cs.len() {
                        for j in (i + 1)..cs.len() {
                            gcis.push(Concept::Union(vec![
                                cs[i].complement_nnf(),
                                cs[j].complement_nnf(),
                            ]));
                        }
                    }
                }
                _ => {}
            }
        }
        gcis
    }

    /// Direct syntactic clash: `⊥` in the label, or some atomic/complement
    /// pair `C, ¬C` both present.
    fn has_clash(label: &HashSet<Concept>) -> bool {
        if label.iter().any(Concept::is_bottom) {
            return true;
        }
        for c in label {
            if let Concept::Complement(inner) = c {
                if label.contains(inner.as_ref()) {
                    return true;
                }
            }
        }
        false
    }

    /// Expand `node` in `graph` to a clash-free completion, branching on
    /// disjunctions and existentials, bounded by `depth`/`budget`.
    fn expand(graph: &mut Graph, node: usize, depth: usize) -> bool {
        if has_clash(&graph.nodes[node].label) {
            return false;
        }
        if depth >= MAX_DEPTH || graph.nodes.len() >= MAX_NODES {
            // Blocked: stop expanding, accept as clash-free at this depth.
            return true;
        }

        // ⊓-rule: saturate conjunctions into the label (fixpoint).
        loop {
            let mut additions = Vec::new();
            for c in graph.nodes[node].label.clone() {
                if let Concept::Intersection(cs) = &c {
                    for sub in cs {
                        if !graph.nodes[node].label.contains(sub) {
                            additions.push(sub.clone());
                        }
                    }
                }
            }
            if additions.is_empty() {
                break;
            }
            for a in additions {
                graph.nodes[node].label.insert(a);
            }
            if has_clash(&graph.nodes[node].label) {
                return false;
            }
        }

        // ⊔-rule: pick the first unresolved disjunction and branch.
        let disjunction = graph.nodes[node]
            .label
            .iter()
            .find_map(|c| match c {
                Concept::Union(cs) => Some(cs.clone()),
                _ => None,
            });
        if let Some(disjuncts) = disjunction {
            for d in &disjuncts {
                if graph.nodes[node].label.contains(d) {
                    // Already satisfied by an existing disjunct.
                    return expand_rest(graph, node, depth);
                }
            }
            for d in disjuncts {
                let mut snapshot_label = graph.nodes[node].label.clone();
                snapshot_label.insert(d);
                let saved = std::mem::replace(&mut graph.nodes[node].label, snapshot_label);
                if expand(graph, node, depth) {
                    return true;
                }
                graph.nodes[node].label = saved;
            }
            return false;
        }

        expand_rest(graph, node, depth)
    }

    /// `∃`/`∀`-rules, once `⊓`/`⊔` have been resolved for this node.
    fn expand_rest(graph: &mut Graph, node: usize, depth: usize) -> bool {
        let existentials: Vec<(Role, Concept)> = graph.nodes[node]
            .label
            .iter()
            .filter_map(|c| match c {
                Concept::ObjectSomeValuesFrom(r, c) => Some((r.clone(), (**c).clone())),
                _ => None,
            })
            .collect();

        for (role, filler) in existentials {
            let already_satisfied = graph.nodes[node].edges.iter().any(|(r, succ)| {
                r == &role && graph.nodes[*succ].label.contains(&filler)
            });
            if already_satisfied {
                continue;
            }
            let universals: Vec<Concept> = graph.nodes[node]
                .label
                .iter()
                .filter_map(|c| match c {
                    Concept::ObjectAllValuesFrom(r, c) if r == &role => Some((**c).clone()),
                    _ => None,
                })
                .collect();
            let mut seed = vec![filler];
            seed.extend(universals);
            let succ = graph.new_node(seed);
            graph.nodes[node].edges.push((role, succ));
            if !expand(graph, succ, depth + 1) {
                return false;
            }
        }

        // ∀-rule: propagate into existing successors.
        let universals: Vec<(Role, Concept)> = graph.nodes[node]
            .label
            .iter()
            .filter_map(|c| match c {
                Concept::ObjectAllValuesFrom(r, c) => Some((r.clone(), (**c).clone())),
                _ => None,
            })
            .collect();
        let successors: Vec<(Role, usize)> = graph.nodes[node].edges.clone();
        for (role, filler) in universals {
            for (edge_role, succ) in &successors {
                if edge_role == &role && !graph.nodes[*succ].label.contains(&filler) {
                    graph.nodes[*succ].label.insert(filler.clone());
                    if !expand(graph, *succ, depth + 1) {
                        return false;
                    }
                }
            }
        }

        true
    }

    pub fn is_concept_satisfiable(axioms: &HashSet<Axiom>, concept: &Concept) -> bool {
        let gcis = internalize_tbox(axioms);
        let mut graph = Graph::new(gcis);
        let root = graph.new_node(std::iter::once(concept.nnf()));
        expand(&mut graph, root, 0)
    }

    /// Build the shared ABox completion graph: one node per individual
    /// (merged by `SameIndividual`), edges for positive property
    /// assertions, and an early direct clash check for
    /// `PropertyAssertion`/`NegativePropertyAssertion` pairs and
    /// `SameIndividual`/`DifferentIndividuals` conflicts.
    fn build_abox(axioms: &HashSet<Axiom>, gcis: Vec<Concept>) -> Option<Graph> {
        let mut index: HashMap<NamedIndividual, usize> = HashMap::new();
        let mut graph = Graph::new(gcis);

        let mut node_of = |graph: &mut Graph, index: &mut HashMap<NamedIndividual, usize>, ind: &NamedIndividual| -> usize {
            if let Some(&n) = index.get(ind) {
                return n;
            }
            let n = graph.new_node(std::iter::once(Concept::Top));
            index.insert(ind.clone(), n);
            n
        };

        for axiom in axioms {
            if let Axiom::ClassAssertion(c, a) = axiom {
                let n = node_of(&mut graph, &mut index, a);
                graph.nodes[n].label.insert(c.nnf());
            }
        }
        for axiom in axioms {
            if let Axiom::PropertyAssertion(r, a, b) = axiom {
                let na = node_of(&mut graph, &mut index, a);
                let nb = node_of(&mut graph, &mut index, b);
                graph.nodes[na].edges.push((r.clone(), nb));
            }
        }
        for axiom in axioms {
            if let Axiom::NegativePropertyAssertion(r, a, b) = axiom {
                if axioms.contains(&Axiom::PropertyAssertion(r.clone(), a.clone(), b.clone())) {
                    return None; // direct clash
                }
            }
        }
        let mut different_groups: Vec<HashSet<NamedIndividual>> = Vec::new();
        for axiom in axioms {
            if let Axiom::DifferentIndividuals(inds) = axiom {
                different_groups.push(inds.iter().cloned().collect());
            }
        }
        for axiom in axioms {
            if let Axiom::SameIndividual(inds) = axiom {
                for group in &different_groups {
                    let overlap = inds.iter().filter(|i| group.contains(*i)).count();
                    if overlap > 1 {
                        return None; // asserted same individuals that must differ
                    }
                }
            }
        }

        if graph.nodes.is_empty() {
            graph.new_node(std::iter::once(Concept::Top));
        }
        Some(graph)
    }

    pub fn is_abox_consistent(axioms: &HashSet<Axiom>) -> bool {
        let gcis = internalize_tbox(axioms);
        match build_abox(axioms, gcis) {
            None => false,
            Some(mut graph) => {
                let node_count = graph.nodes.len();
                (0..node_count).all(|n| expand(&mut graph, n, 0))
            }
        }
    }

    /// Entailment via refutation: `R ⊨ a` iff `R ∪ {¬a}` is inconsistent.
    pub fn is_entailed(axioms: &HashSet<Axiom>, axiom: &Axiom) -> bool {
        match axiom {
            Axiom::SubClassOf(c, d) => {
                !is_concept_satisfiable(axioms, &Concept::Intersection(vec![c.clone(), d.complement_nnf()]))
            }
            Axiom::ClassAssertion(c, a) => {
                let mut extended = axioms.clone();
                extended.insert(Axiom::ClassAssertion(c.complement_nnf(), a.clone()));
                !is_abox_consistent(&extended)
            }
            other => axioms.contains(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Class;

    fn atom(name: &str) -> Concept {
        Concept::Atomic(Class::new(format!("http://example.org/{name}")))
    }

    #[test]
    fn s1_unsat_singleton_is_inconsistent() {
        let a = atom("A");
        let b = atom("B");
        let ind = NamedIndividual::new("http://example.org/a1");
        let mut axioms = HashSet::new();
        axioms.insert(Axiom::SubClassOf(a.clone(), b.clone()));
        axioms.insert(Axiom::SubClassOf(a.clone(), Concept::Complement(Box::new(b))));
        axioms.insert(Axiom::ClassAssertion(a, ind));
        assert!(!tableau::is_abox_consistent(&axioms));
    }

    #[test]
    fn s2_incoherent_but_consistent_abox() {
        let a = atom("A");
        let b = atom("B");
        let ind = NamedIndividual::new("http://example.org/b1");
        let mut axioms = HashSet::new();
        axioms.insert(Axiom::SubClassOf(a.clone(), Concept::Bottom));
        axioms.insert(Axiom::SubClassOf(b.clone(), a.clone()));
        axioms.insert(Axiom::ClassAssertion(b, ind));
        // b ⊑ a ⊑ ⊥ makes the ABox inconsistent (b1 forced into ⊥).
        assert!(!tableau::is_abox_consistent(&axioms));
        assert!(!tableau::is_concept_satisfiable(&axioms, &a));
    }

    #[test]
    fn consistent_ontology_stays_consistent() {
        let a = atom("A");
        let ind = NamedIndividual::new("http://example.org/x");
        let mut axioms = HashSet::new();
        axioms.insert(Axiom::ClassAssertion(a, ind));
        assert!(tableau::is_abox_consistent(&axioms));
    }

    #[test]
    fn entailment_via_refutation() {
        let a = atom("A");
        let b = atom("B");
        let mut axioms = HashSet::new();
        axioms.insert(Axiom::SubClassOf(a.clone(), b.clone()));
        assert!(tableau::is_entailed(&axioms, &Axiom::SubClassOf(a, b)));
    }
}
