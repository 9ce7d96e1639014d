//! Monte Carlo Tree Search over a shared search graph.
//!
//! This crate provides a game-agnostic MCTS engine for two-player,
//! perfect-information, zero-sum games implementing the `engine-core`
//! [`GameState`](engine_core::GameState) trait.
//!
//! # Overview
//!
//! The engine grows a rooted directed graph rather than a plain tree:
//! positions are keyed by Zobrist hash in a transposition table, so distinct
//! move orders converging on one position share a single node, with one arc
//! per converging line. Each playout runs four phases:
//!
//! 1. **Descent**: walk from the root with UCT while the current node is
//!    fully expanded and has children
//! 2. **Expansion**: draw one untried move and attach the resulting position
//!    (a fresh node, or an extra arc into a known transposition)
//! 3. **Simulation**: a few independent uniformly random rollouts to the end
//!    of the game
//! 4. **Back-propagation**: credit each rollout's result to every node on
//!    the path, all the way back to the original root
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{Mcts, MctsConfig};
//!
//! let mut engine = Mcts::with_config(MctsConfig::default().with_seed(42));
//! let mv = engine.compute(&state, 20_000);
//! state.move_hash_winner(mv);
//! // Keep the root in sync with the game between plies:
//! Mcts::prune(&mut engine, &state);
//! ```
//!
//! # Graph surgery
//!
//! Two operations restructure grown graphs wholesale: [`Mcts::prune`]
//! replaces the engine with the subtree reachable from a new root, and
//! [`Mcts::merge`] fuses two independently grown engines sharing a root
//! position, adding their statistics. [`Mcts::save_to`] / [`Mcts::load_from`]
//! round-trip an engine through a binary archive.

pub mod config;
pub mod graph;
pub mod node;
pub mod path;
pub mod pool;
pub mod search;
pub mod snapshot;
pub mod surgery;
pub mod table;

// Re-export main types
pub use config::MctsConfig;
pub use graph::{ArcId, Link, NodeId, RootedDag};
pub use node::{ArcData, NodeData};
pub use path::Path;
pub use pool::{Pool, PoolIndex};
pub use search::{compute, Mcts, SearchGraph};
pub use snapshot::SnapshotError;
pub use table::TranspositionTable;
