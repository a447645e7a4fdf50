//! A generic UCB1+RAVE Monte Carlo tree search with virtual loss, used by
//! `MctsWeakening` to pick which axiom to weaken and which replacement to
//! take at each repair step.
//!
//! This is a "tree-only" RAVE: there are no random rollouts past a newly
//! expanded leaf — a leaf's value is whatever [`GameState::evaluate`]
//! reports once it is terminal, or an early read of a non-terminal
//! leaf's heuristic value otherwise. AMAF statistics are gathered only
//! from moves actually played along the selection/expansion path, which
//! is standard for domains (like repair) where a full random playout
//! makes little sense.

use std::collections::HashMap;
use std::hash::Hash;

/// A node of the search tree: apply a move to get the next state, and
/// read off a terminal value once the repair goal is satisfied (or
/// whatever heuristic quality score a non-terminal state has).
pub trait GameState: Clone {
    type Move: Clone + Eq + Hash;

    fn legal_moves(&self) -> Vec<Self::Move>;
    fn apply_move(&self, mv: &Self::Move) -> Self;
    fn is_terminal(&self) -> bool;
    /// Meaningful once `is_terminal()` holds; used as a heuristic estimate
    /// otherwise (for leaves expanded but not yet terminal).
    fn evaluate(&self) -> f64;
}

#[derive(Debug, Clone, Copy)]
pub struct MctsConfig {
    /// `C` in the UCB1 exploration term.
    pub exploration_constant: f64,
    /// `β` in the RAVE weighting term `m / (c + m + 4β²cm)`.
    pub rave_balance: f64,
    /// A node expands its first child only once its visit count reaches
    /// this threshold (root counts as already past it).
    pub expansion_threshold: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            exploration_constant: std::f64::consts::SQRT_2,
            rave_balance: 0.25,
            expansion_threshold: 1,
        }
    }
}

struct Node<S: GameState> {
    state: S,
    parent: Option<usize>,
    move_from_parent: Option<S::Move>,
    children: Vec<usize>,
    untried_moves: Vec<S::Move>,
    visits: u32,
    virtual_loss: u32,
    value_sum: f64,
    rave_visits: HashMap<S::Move, u32>,
    rave_value_sum: HashMap<S::Move, f64>,
}

impl<S: GameState> Node<S> {
    fn new(state: S, parent: Option<usize>, move_from_parent: Option<S::Move>) -> Self {
        let untried_moves = if state.is_terminal() {
            Vec::new()
        } else {
            state.legal_moves()
        };
        Node {
            state,
            parent,
            move_from_parent,
            children: Vec::new(),
            untried_moves,
            visits: 0,
            virtual_loss: 0,
            value_sum: 0.0,
            rave_visits: HashMap::new(),
            rave_value_sum: HashMap::new(),
        }
    }

    fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f64
        }
    }

    fn effective_visits(&self) -> u32 {
        self.visits + self.virtual_loss
    }
}

/// Maps a raw value into `[0, 1]` given the widest range observed so far.
/// Collapses to `0.0` when `min == max` (including the zero-observations
/// case), so a tree that has only ever seen one distinct terminal value
/// is driven purely by the exploration term, never by a phantom gradient.
fn scale(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.0
    }
}

/// A single MCTS search tree rooted at an initial state.
pub struct MctsTree<S: GameState> {
    nodes: Vec<Node<S>>,
    root: usize,
    config: MctsConfig,
    min_value: f64,
    max_value: f64,
    seen_value: bool,
}

impl<S: GameState> MctsTree<S> {
    pub fn new(root_state: S, config: MctsConfig) -> Self {
        let root_node = Node::new(root_state, None, None);
        MctsTree {
            nodes: vec![root_node],
            root: 0,
            config,
            min_value: 0.0,
            max_value: 0.0,
            seen_value: false,
        }
    }

    fn observe_value(&mut self, value: f64) {
        if !self.seen_value {
            self.min_value = value;
            self.max_value = value;
            self.seen_value = true;
        } else {
            self.min_value = self.min_value.min(value);
            self.max_value = self.max_value.max(value);
        }
    }

    fn add_node(&mut self, state: S, parent: usize, mv: S::Move) -> usize {
        self.nodes.push(Node::new(state, Some(parent), Some(mv)));
        self.nodes.len() - 1
    }

    /// UCB1 exploitation + exploration, blended with RAVE. Mutates the
    /// chosen child's virtual loss — every call must be paired with
    /// exactly one [`MctsTree::run_iteration`] backprop that subtracts it
    /// back out.
    fn select_child(&mut self, parent: usize) -> usize {
        let parent_visits = self.nodes[parent].visits.max(1) as f64;
        let min = self.min_value;
        let max = self.max_value;
        let c_const = self.config.exploration_constant;
        let beta = self.config.rave_balance;

        let mut best_child = self.nodes[parent].children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child in &self.nodes[parent].children {
            let child_node = &self.nodes[child];
            let n_child = child_node.effective_visits();
            let exploration = if n_child == 0 {
                f64::INFINITY
            } else {
                c_const * (parent_visits.ln() / n_child as f64).sqrt()
            };
            let scaled_value = if child_node.visits == 0 {
                0.0
            } else {
                scale(child_node.mean_value(), min, max)
            };

            let mv = child_node.move_from_parent.clone();
            let (m, rave_mean) = match &mv {
                Some(mv) => {
                    let parent_node = &self.nodes[parent];
                    let m = *parent_node.rave_visits.get(mv).unwrap_or(&0);
                    let sum = *parent_node.rave_value_sum.get(mv).unwrap_or(&0.0);
                    let mean = if m == 0 { 0.0 } else { sum / m as f64 };
                    (m, mean)
                }
                None => (0, 0.0),
            };
            let c = child_node.visits;
            let denom = (c + m) as f64 + 4.0 * beta * beta * (c as f64) * (m as f64);
            let rave_weight = if denom > 0.0 { m as f64 / denom } else { 0.0 };
            let scaled_rave = if m == 0 { 0.0 } else { scale(rave_mean, min, max) };

            let score = exploration + scaled_value + rave_weight * (scaled_rave - scaled_value);
            if score > best_score {
                best_score = score;
                best_child = child;
            }
        }
        self.nodes[best_child].virtual_loss += 1;
        best_child
    }

    /// Run one selection/expansion/evaluation/backpropagation cycle.
    pub fn run_iteration(&mut self) {
        let mut path = vec![self.root];
        let mut moves_played: Vec<S::Move> = Vec::new();
        let mut current = self.root;

        while self.nodes[current].untried_moves.is_empty()
            && !self.nodes[current].children.is_empty()
            && !self.nodes[current].state.is_terminal()
        {
            let child = self.select_child(current);
            let mv = self.nodes[child].move_from_parent.clone().unwrap();
            moves_played.push(mv);
            current = child;
            path.push(current);
        }

        if !self.nodes[current].state.is_terminal()
            && !self.nodes[current].untried_moves.is_empty()
            && self.nodes[current].visits >= self.config.expansion_threshold
        {
            let mv = self.nodes[current].untried_moves.pop().unwrap();
            let child_state = self.nodes[current].state.apply_move(&mv);
            let child_idx = self.add_node(child_state, current, mv.clone());
            self.nodes[current].children.push(child_idx);
            moves_played.push(mv);
            current = child_idx;
            path.push(current);
        }

        let value = self.nodes[current].state.evaluate();
        self.observe_value(value);

        for (depth, &node_idx) in path.iter().enumerate() {
            {
                let node = &mut self.nodes[node_idx];
                if node.virtual_loss > 0 {
                    node.virtual_loss -= 1;
                }
                node.visits += 1;
                node.value_sum += value;
            }
            for mv in &moves_played[depth..] {
                let node = &mut self.nodes[node_idx];
                *node.rave_visits.entry(mv.clone()).or_insert(0) += 1;
                *node.rave_value_sum.entry(mv.clone()).or_insert(0.0) += value;
            }
        }
    }

    pub fn run(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.run_iteration();
        }
    }

    /// The most-visited move from the root, or `None` if the root has no
    /// children yet (too few iterations, or the root is already terminal).
    pub fn best_move(&self) -> Option<S::Move> {
        self.nodes[self.root]
            .children
            .iter()
            .max_by_key(|&&c| self.nodes[c].visits)
            .and_then(|&c| self.nodes[c].move_from_parent.clone())
    }

    pub fn root_state(&self) -> &S {
        &self.nodes[self.root].state
    }

    pub fn root_visits(&self) -> u32 {
        self.nodes[self.root].visits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A number-guessing toy: the state is the current guess; moves step
    /// it by ±1; terminal once it reaches a fixed target, with a value of
    /// `1.0` there and `0.0` everywhere else (so an untargeted search sees
    /// only a single distinct terminal value until it finds the target).
    #[derive(Clone)]
    struct Counter {
        value: i32,
        target: i32,
        depth: u32,
    }

    impl GameState for Counter {
        type Move = i32;

        fn legal_moves(&self) -> Vec<i32> {
            if self.depth >= 4 {
                Vec::new()
            } else {
                vec![-1, 1]
            }
        }

        fn apply_move(&self, mv: &i32) -> Self {
            Counter {
                value: self.value + mv,
                target: self.target,
                depth: self.depth + 1,
            }
        }

        fn is_terminal(&self) -> bool {
            self.value == self.target || self.depth >= 4
        }

        fn evaluate(&self) -> f64 {
            if self.value == self.target {
                1.0
            } else {
                0.0
            }
        }
    }

    #[test]
    fn search_prefers_the_move_toward_the_target() {
        let root = Counter { value: 0, target: 2, depth: 0 };
        let mut tree = MctsTree::new(root, MctsConfig::default());
        tree.run(500);
        assert_eq!(tree.best_move(), Some(1));
    }

    #[test]
    fn single_observed_value_keeps_scaling_at_zero() {
        let root = Counter { value: 5, target: 999, depth: 0 };
        let mut tree = MctsTree::new(root, MctsConfig::default());
        tree.run(50);
        assert_eq!(tree.min_value, tree.max_value);
        assert_eq!(scale(tree.min_value, tree.min_value, tree.max_value), 0.0);
    }

    #[test]
    fn virtual_loss_always_nets_back_to_zero_after_a_run() {
        let root = Counter { value: 0, target: 2, depth: 0 };
        let mut tree = MctsTree::new(root, MctsConfig::default());
        tree.run(200);
        assert!(tree.nodes.iter().all(|n| n.virtual_loss == 0));
    }
}
