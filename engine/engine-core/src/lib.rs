//! Core traits and types for game implementations
//!
//! This crate provides the capability surface a two-player, perfect-information,
//! zero-sum game must implement to be searchable by the `mcts` crate:
//! - `GameState`: the game itself (moves, rollouts, terminal detection, hashing)
//! - `GameMove`: a move type with `NONE`/`ROOT`/`INVALID` sentinels
//! - `MoveBuffer` / `MoveList`: a bounded legal-move container with uniform
//!   random draw
//! - `Player`: the two seats plus the draw/unseated sentinel
//!
//! Games are deterministic; the only randomness flows in through the `Rng`
//! handles the engine passes to `initialize`, `simulate` and the move buffers.

pub mod game;
pub mod moves;
pub mod player;

// Re-export main types for convenience
pub use game::{GameMove, GameState, ZobristHash};
pub use moves::{MoveBuffer, MoveList};
pub use player::Player;
