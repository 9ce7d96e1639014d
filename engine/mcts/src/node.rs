//! Node and arc payloads of the search graph.
//!
//! Statistics are aggregated on nodes; arcs carry only the move that produced
//! the child and act as multiplicity carriers for transpositions (two paths
//! into the same position are two arcs sharing a target node).

use engine_core::{GameState, MoveBuffer, Player};
use rand::Rng;

/// Per-node search statistics and the not-yet-expanded moves.
///
/// `moves` is `Some` while the node still has untried moves and `None` once
/// fully expanded; dropping the buffer on exhaustion returns its storage
/// immediately.
#[derive(Debug, Clone)]
pub struct NodeData<G: GameState> {
    pub moves: Option<G::Moves>,
    pub score: f32,
    pub visits: i32,
    pub player_just_moved: Player,
}

impl<G: GameState> NodeData<G> {
    /// Payload for a freshly reached position. Terminal positions get no
    /// move buffer at all.
    pub fn from_state(state: &G) -> Self {
        let mut moves: G::Moves = Default::default();
        let moves = if state.moves(&mut moves) {
            Some(moves)
        } else {
            None
        };
        Self {
            moves,
            score: 0.0,
            visits: 0,
            player_just_moved: state.player_just_moved(),
        }
    }

    #[inline]
    pub fn has_untried_moves(&self) -> bool {
        self.moves.is_some()
    }

    /// Draw one untried move uniformly at random, clearing the buffer when
    /// the last one is taken. `None` once the node is fully expanded.
    pub fn take_untried_move<R: Rng>(&mut self, rng: &mut R) -> Option<G::Move> {
        let buffer = self.moves.as_mut()?;
        if buffer.len() == 1 {
            let mv = buffer.front();
            self.moves = None;
            Some(mv)
        } else {
            Some(buffer.draw(rng))
        }
    }

    /// Additive combine for graph merging. The move buffer is left alone:
    /// the receiving node keeps its own expansion frontier.
    pub fn absorb(&mut self, other: &NodeData<G>) {
        self.score += other.score;
        self.visits += other.visits;
    }
}

/// Per-arc payload: the move that led from the arc's source to its target.
#[derive(Debug, Clone)]
pub struct ArcData<G: GameState> {
    pub mv: G::Move,
}

impl<G: GameState> ArcData<G> {
    pub fn from_state(state: &G) -> Self {
        Self {
            mv: state.last_move(),
        }
    }
}
