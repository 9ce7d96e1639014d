//! The search engine: selection, expansion, simulation, back-propagation.
//!
//! One playout iteration walks the graph from the root with UCT until it
//! runs out of expanded children, expands one untried move (routing through
//! the transposition table so converging lines share a node), runs a few
//! random rollouts from the new position, and adds each rollout's result to
//! every node on the current path. The path's persistent prefix reaches back
//! to the original root, so the whole game history accumulates evidence, not
//! just the subtree under the current position.

use engine_core::{GameMove, GameState, Player, ZobristHash};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::graph::{ArcId, Link, NodeId, RootedDag};
use crate::node::{ArcData, NodeData};
use crate::path::Path;
use crate::table::TranspositionTable;

/// The search graph: statistics on nodes, moves on arcs.
pub type SearchGraph<G> = RootedDag<ArcData<G>, NodeData<G>>;

/// A Monte Carlo Tree Search engine for one game type.
///
/// The engine owns its graph, transposition table and path exclusively; game
/// states passed to [`compute`](Mcts::compute) are borrowed read-only and
/// cloned internally. With a fixed config seed and a fixed game
/// implementation, `compute` is deterministic.
#[derive(Debug, Clone)]
pub struct Mcts<G: GameState> {
    pub(crate) tree: SearchGraph<G>,
    pub(crate) table: TranspositionTable,
    pub(crate) path: Path,
    pub(crate) initialized: bool,
    pub(crate) config: MctsConfig,
    pub(crate) rng: ChaCha8Rng,
}

impl<G: GameState> Default for Mcts<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameState> Mcts<G> {
    pub fn new() -> Self {
        Self::with_config(MctsConfig::default())
    }

    pub fn with_config(config: MctsConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            tree: SearchGraph::new(NodeData::placeholder()),
            table: TranspositionTable::default(),
            path: Path::default(),
            initialized: false,
            config,
            rng,
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The search graph (for inspection and tests).
    #[inline]
    pub fn tree(&self) -> &SearchGraph<G> {
        &self.tree
    }

    #[inline]
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Node for a position hash, `NodeId::INVALID` when unknown.
    #[inline]
    pub fn lookup(&self, key: ZobristHash) -> NodeId {
        self.table.get(key)
    }

    /// The persistent root-to-position path (for inspection and tests).
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The transposition table (for inspection and tests).
    #[inline]
    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    fn initialize(&mut self, state: &G) {
        let root = self.tree.root();
        *self.tree.get_mut(root) = NodeData::from_state(state);
        self.table.insert(state.zobrist(), root);
        self.initialized = true;
        self.path.reset(ArcId::INVALID, root);
        debug!(hash = state.zobrist(), "search graph initialized");
    }

    /// Allocate a fresh node for `state` under `parent` and register it in
    /// the transposition table.
    fn add_node_child(&mut self, parent: NodeId, state: &G) -> Link {
        let child = self.tree.add_node(NodeData::from_state(state));
        let arc = self.tree.add_arc(parent, child, ArcData::from_state(state));
        self.table.insert(state.zobrist(), child);
        Link::new(arc, child)
    }

    /// Attach the position reached by `state` as a child of `parent`. When
    /// the position is already in the table this adds only an arc into the
    /// existing node; that arc is where a transposition forms.
    fn add_child(&mut self, parent: NodeId, state: &G) -> Link {
        let child = self.table.get(state.zobrist());
        if child.is_invalid() {
            self.add_node_child(parent, state)
        } else {
            let arc = self.tree.add_arc(parent, child, ArcData::from_state(state));
            Link::new(arc, child)
        }
    }

    /// UCT child choice under `parent`.
    ///
    /// Contract: `parent` has at least one out-arc and every child has
    /// `visits >= 1` (guaranteed because a child is only reachable here after
    /// it has been expanded and back-propagated at least once). Ties on the
    /// maximum score are broken uniformly at random.
    pub fn select_child_uct(&mut self, parent: NodeId) -> Link {
        let explore = self.config.exploration_constant
            * (self.tree.get(parent).visits as f32 + 1.0).ln();
        let out = self.tree.out_arcs(parent);
        debug_assert!(!out.is_empty(), "UCT selection on a leaf");
        let mut best_score = f32::NEG_INFINITY;
        let mut best: Vec<Link> = Vec::with_capacity(out.len());
        for &arc in out {
            let target = self.tree.arc_target(arc);
            let child = self.tree.get(target);
            let visits = child.visits as f32;
            let uct = child.score / visits + (explore / visits).sqrt();
            if uct > best_score {
                best_score = uct;
                best.clear();
                best.push(Link::new(arc, target));
            } else if uct == best_score {
                best.push(Link::new(arc, target));
            }
        }
        if best.len() == 1 {
            best[0]
        } else {
            best[self.rng.gen_range(0..best.len())]
        }
    }

    /// Extend the persistent path with the position the caller just reached
    /// (normally the opponent's move). The position is looked up by hash and
    /// connected to the path tail, creating node and arc as needed.
    fn connect_states_path(&mut self, state: &G) {
        let parent = self.path.back().target;
        let child = self.table.get(state.zobrist());
        let link = if child.is_invalid() {
            self.add_node_child(parent, state)
        } else if child == parent {
            // The caller's position is already the path tail (root was just
            // pruned or rehung here); nothing to connect.
            Link::new(ArcId::INVALID, child)
        } else {
            let link = self.tree.link(parent, child);
            if link.arc.is_valid() {
                link
            } else {
                // Known position reached over a line the path has not taken
                // before; connect it so the path stays arc-linked.
                let arc = self.tree.add_arc(parent, child, ArcData::from_state(state));
                Link::new(arc, child)
            }
        };
        self.path.push(link);
        self.path.advance_persistent();
    }

    /// Run `max_iterations` playouts from `state` and return the most-visited
    /// root move, extending the persistent path with that choice.
    ///
    /// The first call initializes the engine from `state`; later calls expect
    /// `state` to be the root position or one move below it (the caller keeps
    /// the root current via [`Mcts::prune`] or [`Mcts::reset`] between plies).
    /// Passing a terminal position is a precondition violation; the engine
    /// will not crash but the returned move is meaningless.
    pub fn compute(&mut self, state: &G, max_iterations: u32) -> G::Move {
        if !self.initialized {
            self.initialize(state);
        } else {
            self.connect_states_path(state);
        }

        for _ in 0..max_iterations {
            self.playout(state);
        }

        trace!(
            iterations = max_iterations,
            nodes = self.tree.node_count(),
            arcs = self.tree.arc_count(),
            "search complete"
        );

        self.best_move()
    }

    /// One playout: descent, expansion, simulation, back-propagation.
    fn playout(&mut self, state: &G) {
        let mut node = self.tree.root();
        let mut scratch = state.clone();

        // Descent: follow UCT while the node is fully expanded and internal.
        while !self.tree.get(node).has_untried_moves() && self.tree.has_children(node) {
            let child = self.select_child_uct(node);
            scratch.move_hash(self.tree.arc(child.arc).mv);
            self.path.push(child);
            node = child.target;
        }

        // Expansion: try one untried move, attaching through the table.
        let Mcts { tree, rng, .. } = self;
        if let Some(mv) = tree.get_mut(node).take_untried_move(rng) {
            scratch.move_hash_winner(mv);
            let link = self.add_child(node, &scratch);
            self.path.push(link);
        }

        // Simulation + back-propagation: independent rollouts, each credited
        // to every node on the whole physical path.
        for _ in 0..self.config.simulations_per_expansion {
            let mut rollout = scratch.clone();
            rollout.simulate(&mut self.rng);
            for i in 0..self.path.len() {
                let link = self.path.get(i);
                let data = self.tree.get_mut(link.target);
                data.visits += 1;
                data.score += rollout.result(data.player_just_moved);
            }
        }

        self.path.truncate_to_persistent();
    }

    /// Most-robust-child rule: the root child with the most visits, ties
    /// broken by first-seen. Extends the persistent path with the winner;
    /// `Move::NONE` (path untouched) when the root has no children.
    fn best_move(&mut self) -> G::Move {
        let root = self.tree.root();
        let mut best_visits = i32::MIN;
        let mut best: Option<(Link, G::Move)> = None;
        for &arc in self.tree.out_arcs(root) {
            let target = self.tree.arc_target(arc);
            let visits = self.tree.get(target).visits;
            if visits > best_visits {
                best_visits = visits;
                best = Some((Link::new(arc, target), self.tree.arc(arc).mv));
            }
        }
        match best {
            Some((link, mv)) => {
                self.path.push(link);
                self.path.advance_persistent();
                mv
            }
            None => <G::Move as GameMove>::NONE,
        }
    }

    /// Rehang the root on the node for `state` when the position is known;
    /// otherwise replace the engine with a freshly initialized one. No-op on
    /// an uninitialized engine.
    pub fn reset(slot: &mut Self, state: &G, player: Player) {
        if !slot.initialized {
            return;
        }
        let node = slot.table.get(state.zobrist());
        if node.is_valid() {
            debug!(?player, "rehanging search root");
            slot.tree.set_root(node);
        } else {
            debug!(?player, "position unknown, reinitializing");
            let mut fresh = Self::with_config(slot.config.clone());
            fresh.initialize(state);
            *slot = fresh;
        }
    }

    /// Number of reachable nodes entered by more than one arc.
    pub fn transposition_count(&self) -> usize {
        let mut visited = vec![false; self.tree.node_slot_capacity()];
        let mut stack = vec![self.tree.root()];
        visited[self.tree.root().0 as usize] = true;
        let mut count = 0;
        while let Some(parent) = stack.pop() {
            for &arc in self.tree.out_arcs(parent) {
                let child = self.tree.arc_target(arc);
                if !visited[child.0 as usize] {
                    visited[child.0 as usize] = true;
                    stack.push(child);
                    if self.tree.in_degree(child) > 1 {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

impl<G: GameState> NodeData<G> {
    /// Payload for a root slot that has not seen a state yet.
    pub(crate) fn placeholder() -> Self {
        Self {
            moves: None,
            score: 0.0,
            visits: 0,
            player_just_moved: Player::Vacant,
        }
    }
}

/// One-shot search: run a throwaway engine and apply the chosen move.
pub fn compute<G: GameState>(state: &mut G, max_iterations: u32) {
    let mut engine = Mcts::<G>::new();
    let mv = engine.compute(state, max_iterations);
    if mv != <G::Move as GameMove>::NONE {
        state.move_hash_winner(mv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::MoveBuffer;
    use games_tictactoe::{Move, TicTacToe};

    fn start_state(seed: u64) -> TicTacToe {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = TicTacToe::new();
        state.initialize(&mut rng);
        state
    }

    #[test]
    fn test_first_compute_initializes() {
        let mut engine = Mcts::<TicTacToe>::new();
        let state = start_state(0);
        assert!(!engine.is_initialized());
        engine.compute(&state, 0);
        assert!(engine.is_initialized());
        assert_eq!(engine.tree().node_count(), 1);
        assert_eq!(engine.lookup(state.zobrist()), engine.tree().root());
    }

    #[test]
    fn test_zero_iterations_returns_none() {
        let mut engine = Mcts::<TicTacToe>::new();
        let state = start_state(0);
        let mv = engine.compute(&state, 0);
        assert_eq!(mv, Move::NONE);
        assert_eq!(engine.tree().node_count(), 1);
        assert_eq!(engine.tree().arc_count(), 0);
        assert_eq!(engine.path().persistent_len(), 1);
    }

    #[test]
    fn test_single_iteration_expands_once() {
        let mut engine = Mcts::<TicTacToe>::new();
        let state = start_state(0);
        let mv = engine.compute(&state, 1);
        assert_ne!(mv, Move::NONE);
        assert_eq!(engine.tree().node_count(), 2);
        assert_eq!(engine.tree().arc_count(), 1);
        // Three rollouts were credited to both path nodes.
        let root = engine.tree().root();
        assert_eq!(engine.tree().get(root).visits, 3);
        assert_eq!(engine.path().persistent_len(), 2);
    }

    #[test]
    fn test_compute_is_deterministic_for_a_seed() {
        let state = start_state(0);
        let run = |seed: u64| {
            let mut engine =
                Mcts::<TicTacToe>::with_config(MctsConfig::default().with_seed(seed));
            let mv = engine.compute(&state, 50);
            (mv, engine.tree().node_count(), engine.tree().arc_count())
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_uct_tie_break_is_fair() {
        let mut engine = Mcts::<TicTacToe>::new();
        let state = start_state(0);
        engine.compute(&state, 0);
        let root = engine.tree.root();
        engine.tree.get_mut(root).visits = 20;

        // Two synthetic children with identical statistics.
        let mut counts = [0u32; 2];
        let mut children = Vec::new();
        for _ in 0..2 {
            let child = engine.tree.add_node(NodeData {
                moves: None,
                score: 5.0,
                visits: 10,
                player_just_moved: state.player_to_move(),
            });
            engine.tree.add_arc(root, child, ArcData { mv: Move::INVALID });
            children.push(child);
        }

        let draws = 10_000;
        for _ in 0..draws {
            let link = engine.select_child_uct(root);
            let slot = children.iter().position(|&c| c == link.target).unwrap();
            counts[slot] += 1;
        }
        for &c in &counts {
            let frequency = c as f64 / draws as f64;
            assert!((frequency - 0.5).abs() < 0.05, "biased tie-break: {counts:?}");
        }
    }

    #[test]
    fn test_reset_to_root_is_noop() {
        let mut engine = Mcts::<TicTacToe>::new();
        let state = start_state(0);
        engine.compute(&state, 20);
        let nodes = engine.tree().node_count();
        let root = engine.tree().root();
        Mcts::reset(&mut engine, &state, Player::Agent);
        assert_eq!(engine.tree().root(), root);
        assert_eq!(engine.tree().node_count(), nodes);
    }

    #[test]
    fn test_reset_unknown_position_reinitializes() {
        let mut engine = Mcts::<TicTacToe>::new();
        let state = start_state(0);
        engine.compute(&state, 5);

        // A position far from anything searched: fill a fresh board a bit.
        let mut other = start_state(99);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut moves: <TicTacToe as GameState>::Moves = Default::default();
        for _ in 0..4 {
            assert!(other.moves(&mut moves));
            let mv = moves.random(&mut rng);
            other.move_hash_winner(mv);
        }
        if engine.lookup(other.zobrist()).is_valid() {
            return; // extremely unlikely seed overlap; nothing to assert
        }
        Mcts::reset(&mut engine, &other, Player::Human);
        assert!(engine.is_initialized());
        assert_eq!(engine.tree().node_count(), 1);
        assert_eq!(engine.lookup(other.zobrist()), engine.tree().root());
    }

    #[test]
    fn test_one_shot_compute_applies_a_move() {
        let mut state = start_state(3);
        compute(&mut state, 30);
        assert_ne!(state.last_move(), Move::ROOT);
    }
}
