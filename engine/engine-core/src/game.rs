//! The game capability the search engine is generic over.

use std::fmt::Debug;

use rand::Rng;

use crate::moves::MoveBuffer;
use crate::player::Player;

/// 64-bit Zobrist hash of a position, side-to-move included.
pub type ZobristHash = u64;

/// A game move. One or two bytes in practice; carried on search-graph arcs.
///
/// The sentinels never correspond to a legal move: `ROOT` marks the start
/// position, `NONE` is the "no move available" answer, `INVALID` the
/// uninitialized value.
pub trait GameMove: Copy + PartialEq + Eq + Debug {
    const NONE: Self;
    const ROOT: Self;
    const INVALID: Self;
}

/// A two-player, perfect-information, zero-sum game with deterministic
/// transitions.
///
/// The engine clones states freely during descent and rollouts, so `Clone`
/// should be cheap (plain-old-data boards). All mutation happens through the
/// `move_*` family; the three variants let the engine skip Zobrist or winner
/// bookkeeping on paths where it is not needed:
///
/// | operation          | applies move | updates hash | detects winner |
/// |--------------------|--------------|--------------|----------------|
/// | `move_hash`        | yes          | yes          | no             |
/// | `move_hash_winner` | yes          | yes          | yes            |
/// | `move_winner`      | yes          | no           | yes            |
pub trait GameState: Clone {
    type Move: GameMove;
    type Moves: MoveBuffer<Move = Self::Move>;

    /// Upper bound on simultaneously legal moves; capacity of `Moves`.
    const MAX_MOVES: usize;

    /// Reset to the start position with a randomly drawn starter.
    fn initialize<R: Rng>(&mut self, rng: &mut R);

    fn player_just_moved(&self) -> Player;

    #[inline]
    fn player_to_move(&self) -> Player {
        self.player_just_moved().opponent()
    }

    /// The move that produced this position (`GameMove::ROOT` at the start).
    fn last_move(&self) -> Self::Move;

    /// Apply `mv`, maintaining the incremental hash.
    fn move_hash(&mut self, mv: Self::Move);

    /// Apply `mv`, maintaining the hash and running terminal detection.
    fn move_hash_winner(&mut self, mv: Self::Move);

    /// Apply `mv` with terminal detection but without hash maintenance
    /// (rollouts never consult the hash).
    fn move_winner(&mut self, mv: Self::Move);

    /// Fill `out` with the legal moves. Returns `false` iff the position is
    /// terminal (in which case `out` is left empty).
    fn moves(&self, out: &mut Self::Moves) -> bool;

    /// Play uniformly random moves until the game ends.
    fn simulate<R: Rng>(&mut self, rng: &mut R);

    /// Result from the perspective of `player_just_moved`: +1.0 win,
    /// -1.0 loss, 0.0 draw. Only meaningful on terminal states.
    fn result(&self, player_just_moved: Player) -> f32;

    /// `Some(winner)` when terminal, with `Player::Vacant` meaning a draw.
    fn ended(&self) -> Option<Player>;

    /// Current position hash, side-to-move included.
    fn zobrist(&self) -> ZobristHash;
}
