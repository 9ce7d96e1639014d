//! Binary engine snapshots.
//!
//! A snapshot round-trips the search graph, the transposition table, the
//! configuration and the initialization flag through a compact wire format.
//! The in-memory arenas are not archived directly: nodes are compacted to
//! ordinals (root first) so vacant slots vanish and identifiers rebase
//! cleanly on load. Reloading restores the path to the bare root and reseeds
//! the RNG from the archived seed; the mid-stream RNG position is not part
//! of a snapshot.

use std::io::{Read, Write};

use engine_core::{GameState, MoveBuffer, Player, ZobristHash};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::MctsConfig;
use crate::graph::ArcId;
use crate::node::{ArcData, NodeData};
use crate::path::Path;
use crate::search::{Mcts, SearchGraph};
use crate::table::TranspositionTable;

const SCHEMA_VERSION: u32 = 1;

/// Move-list presence tags: 1 absent, 2 present followed by the moves.
const MOVES_ABSENT: u8 = 1;
const MOVES_PRESENT: u8 = 2;

/// Errors that can occur while archiving or restoring an engine.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("unsupported snapshot schema version {0}")]
    SchemaVersion(u32),

    #[error("corrupt snapshot: {0}")]
    Corrupt(&'static str),
}

#[derive(Serialize, Deserialize)]
struct NodeRecord<M> {
    score: f32,
    visits: i32,
    player_just_moved: Player,
    moves_tag: u8,
    moves: Vec<M>,
}

#[derive(Serialize, Deserialize)]
struct ArcRecord<M> {
    source: u32,
    target: u32,
    mv: M,
}

#[derive(Serialize, Deserialize)]
struct EngineSnapshot<M> {
    schema_version: u32,
    config: MctsConfig,
    initialized: bool,
    /// Ordinal 0 is the root.
    nodes: Vec<NodeRecord<M>>,
    arcs: Vec<ArcRecord<M>>,
    table: Vec<(ZobristHash, u32)>,
}

impl<G: GameState> Mcts<G> {
    /// Archive the engine to `writer`.
    pub fn save_to<W: Write>(&self, mut writer: W) -> Result<(), SnapshotError>
    where
        G::Move: Serialize,
    {
        // Compact live slots to ordinals, root first.
        let mut ordinal = vec![u32::MAX; self.tree.node_slot_capacity()];
        let root = self.tree.root();
        ordinal[root.0 as usize] = 0;
        let mut next = 1u32;
        for (id, _) in self.tree.nodes() {
            if id != root {
                ordinal[id.0 as usize] = next;
                next += 1;
            }
        }

        let mut nodes = Vec::with_capacity(self.tree.node_count());
        nodes.push(node_record(self.tree.get(root)));
        for (id, data) in self.tree.nodes() {
            if id != root {
                nodes.push(node_record(data));
            }
        }

        let arcs = self
            .tree
            .arcs()
            .map(|(_, source, target, data)| ArcRecord {
                source: ordinal[source.0 as usize],
                target: ordinal[target.0 as usize],
                mv: data.mv,
            })
            .collect();

        let table = self
            .table
            .iter()
            .map(|(hash, node)| (hash, ordinal[node.0 as usize]))
            .collect();

        let snapshot = EngineSnapshot {
            schema_version: SCHEMA_VERSION,
            config: self.config.clone(),
            initialized: self.initialized,
            nodes,
            arcs,
            table,
        };
        rmp_serde::encode::write(&mut writer, &snapshot)?;
        Ok(())
    }

    /// Restore an engine archived with [`save_to`](Mcts::save_to).
    pub fn load_from<R: Read>(reader: R) -> Result<Self, SnapshotError>
    where
        G::Move: DeserializeOwned,
    {
        let snapshot: EngineSnapshot<G::Move> = rmp_serde::decode::from_read(reader)?;
        if snapshot.schema_version != SCHEMA_VERSION {
            return Err(SnapshotError::SchemaVersion(snapshot.schema_version));
        }
        let mut records = snapshot.nodes.into_iter();
        let root_record = records
            .next()
            .ok_or(SnapshotError::Corrupt("snapshot has no root node"))?;

        let mut tree: SearchGraph<G> = SearchGraph::new(node_data(root_record)?);
        let mut ids = vec![tree.root()];
        for record in records {
            ids.push(tree.add_node(node_data(record)?));
        }

        for arc in snapshot.arcs {
            let source = *ids
                .get(arc.source as usize)
                .ok_or(SnapshotError::Corrupt("arc source out of range"))?;
            let target = *ids
                .get(arc.target as usize)
                .ok_or(SnapshotError::Corrupt("arc target out of range"))?;
            tree.add_arc(source, target, ArcData { mv: arc.mv });
        }

        let mut table = TranspositionTable::default();
        for (hash, node) in snapshot.table {
            let id = *ids
                .get(node as usize)
                .ok_or(SnapshotError::Corrupt("table entry out of range"))?;
            table.insert(hash, id);
        }

        let mut path = Path::default();
        path.reset(ArcId::INVALID, tree.root());
        let rng = ChaCha8Rng::seed_from_u64(snapshot.config.seed);

        debug!(
            nodes = tree.node_count(),
            arcs = tree.arc_count(),
            initialized = snapshot.initialized,
            "snapshot restored"
        );

        Ok(Self {
            tree,
            table,
            path,
            initialized: snapshot.initialized,
            config: snapshot.config,
            rng,
        })
    }
}

fn node_record<G: GameState>(data: &NodeData<G>) -> NodeRecord<G::Move> {
    let (moves_tag, moves) = match &data.moves {
        None => (MOVES_ABSENT, Vec::new()),
        Some(buffer) => (MOVES_PRESENT, buffer.as_slice().to_vec()),
    };
    NodeRecord {
        score: data.score,
        visits: data.visits,
        player_just_moved: data.player_just_moved,
        moves_tag,
        moves,
    }
}

fn node_data<G: GameState>(record: NodeRecord<G::Move>) -> Result<NodeData<G>, SnapshotError> {
    let moves = match record.moves_tag {
        MOVES_ABSENT => None,
        MOVES_PRESENT => {
            if record.moves.is_empty() {
                return Err(SnapshotError::Corrupt("present move-list is empty"));
            }
            let mut buffer: G::Moves = Default::default();
            for mv in record.moves {
                buffer.push(mv);
            }
            Some(buffer)
        }
        _ => return Err(SnapshotError::Corrupt("bad move-list tag")),
    };
    Ok(NodeData {
        moves,
        score: record.score,
        visits: record.visits,
        player_just_moved: record.player_just_moved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{GameMove as _, GameState as _};
    use games_tictactoe::{Move, TicTacToe};

    fn start_state(seed: u64) -> TicTacToe {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = TicTacToe::new();
        state.initialize(&mut rng);
        state
    }

    #[test]
    fn test_round_trip_preserves_graph_and_table() {
        let mut engine = Mcts::<TicTacToe>::new();
        let state = start_state(0);
        engine.compute(&state, 120);

        let mut bytes = Vec::new();
        engine.save_to(&mut bytes).unwrap();
        let restored = Mcts::<TicTacToe>::load_from(bytes.as_slice()).unwrap();

        assert!(restored.is_initialized());
        assert_eq!(restored.tree().node_count(), engine.tree().node_count());
        assert_eq!(restored.tree().arc_count(), engine.tree().arc_count());
        assert_eq!(restored.table.len(), engine.table.len());
        assert_eq!(restored.path().persistent_len(), 1);
        assert_eq!(restored.path().back().target, restored.tree().root());

        // Statistics per position survive, keyed by hash.
        for (hash, node) in engine.table.iter() {
            let other = restored.lookup(hash);
            assert!(other.is_valid());
            let a = engine.tree().get(node);
            let b = restored.tree().get(other);
            assert_eq!(a.visits, b.visits);
            assert!((a.score - b.score).abs() < 1e-6);
            assert_eq!(a.player_just_moved, b.player_just_moved);
            assert_eq!(
                a.moves.as_ref().map(|m| m.len()),
                b.moves.as_ref().map(|m| m.len())
            );
        }

        // The root hash still resolves to the root.
        assert_eq!(restored.lookup(state.zobrist()), restored.tree().root());
    }

    #[test]
    fn test_restored_engine_keeps_playing() {
        let mut engine = Mcts::<TicTacToe>::new();
        let state = start_state(1);
        engine.compute(&state, 50);

        let mut bytes = Vec::new();
        engine.save_to(&mut bytes).unwrap();
        let mut restored = Mcts::<TicTacToe>::load_from(bytes.as_slice()).unwrap();

        // The restored engine accepts the same position and keeps searching.
        let mv = restored.compute(&state, 50);
        assert_ne!(mv, Move::NONE);
        assert!(restored.tree().node_count() >= engine.tree().node_count());
    }

    #[test]
    fn test_uninitialized_round_trip() {
        let engine = Mcts::<TicTacToe>::new();
        let mut bytes = Vec::new();
        engine.save_to(&mut bytes).unwrap();
        let restored = Mcts::<TicTacToe>::load_from(bytes.as_slice()).unwrap();
        assert!(!restored.is_initialized());
        assert_eq!(restored.tree().node_count(), 1);
    }

    #[test]
    fn test_rejects_unknown_schema_version() {
        let snapshot: EngineSnapshot<Move> = EngineSnapshot {
            schema_version: 99,
            config: MctsConfig::default(),
            initialized: false,
            nodes: vec![NodeRecord {
                score: 0.0,
                visits: 0,
                player_just_moved: Player::Vacant,
                moves_tag: MOVES_ABSENT,
                moves: Vec::new(),
            }],
            arcs: Vec::new(),
            table: Vec::new(),
        };
        let bytes = rmp_serde::to_vec(&snapshot).unwrap();
        match Mcts::<TicTacToe>::load_from(bytes.as_slice()) {
            Err(SnapshotError::SchemaVersion(99)) => {}
            other => panic!("expected schema version error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_move_list_tag() {
        let snapshot: EngineSnapshot<Move> = EngineSnapshot {
            schema_version: SCHEMA_VERSION,
            config: MctsConfig::default(),
            initialized: true,
            nodes: vec![NodeRecord {
                score: 0.0,
                visits: 1,
                player_just_moved: Player::Agent,
                moves_tag: 7,
                moves: Vec::new(),
            }],
            arcs: Vec::new(),
            table: Vec::new(),
        };
        let bytes = rmp_serde::to_vec(&snapshot).unwrap();
        assert!(matches!(
            Mcts::<TicTacToe>::load_from(bytes.as_slice()),
            Err(SnapshotError::Corrupt(_))
        ));
    }
}
