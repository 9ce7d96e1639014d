//! Structural invariants of the search graph, checked over randomized
//! starting positions and iteration budgets.

use engine_core::{GameState, MoveBuffer};
use games_tictactoe::TicTacToe;
use mcts::{Mcts, MctsConfig};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A TicTacToe position a few random plies into the game, never terminal.
fn position(seed: u64, plies: usize) -> TicTacToe {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = TicTacToe::new();
    state.initialize(&mut rng);
    let mut moves: <TicTacToe as GameState>::Moves = Default::default();
    for _ in 0..plies {
        if !state.moves(&mut moves) {
            break;
        }
        let mv = moves.random(&mut rng);
        let mut next = state.clone();
        next.move_hash_winner(mv);
        if next.ended().is_some() {
            break;
        }
        state = next;
    }
    state
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_node_on_a_path_is_visited(
        seed in 0u64..1000,
        plies in 0usize..5,
        iterations in 1u32..120,
    ) {
        let state = position(seed, plies);
        let mut engine = Mcts::<TicTacToe>::with_config(MctsConfig::default().with_seed(seed));
        engine.compute(&state, iterations);
        // Every node was created by an expansion and back-propagated at
        // least once since.
        for (_, data) in engine.tree().nodes() {
            prop_assert!(data.visits >= 1);
        }
    }

    #[test]
    fn arcs_and_incidence_lists_agree(
        seed in 0u64..1000,
        plies in 0usize..5,
        iterations in 0u32..120,
    ) {
        let state = position(seed, plies);
        let mut engine = Mcts::<TicTacToe>::with_config(MctsConfig::default().with_seed(seed));
        engine.compute(&state, iterations);
        let tree = engine.tree();
        for (arc, source, target, _) in tree.arcs() {
            prop_assert!(tree.out_arcs(source).contains(&arc));
            prop_assert!(tree.in_arcs(target).contains(&arc));
        }
        for (node, _) in tree.nodes() {
            for &arc in tree.out_arcs(node) {
                prop_assert_eq!(tree.arc_source(arc), node);
            }
            for &arc in tree.in_arcs(node) {
                prop_assert_eq!(tree.arc_target(arc), node);
            }
        }
    }

    #[test]
    fn table_and_nodes_are_in_bijection(
        seed in 0u64..1000,
        plies in 0usize..5,
        iterations in 0u32..120,
    ) {
        let state = position(seed, plies);
        let mut engine = Mcts::<TicTacToe>::with_config(MctsConfig::default().with_seed(seed));
        engine.compute(&state, iterations);
        prop_assert_eq!(engine.table().len(), engine.tree().node_count());
        let mut targets: Vec<u32> = engine.table().iter().map(|(_, node)| node.0).collect();
        targets.sort_unstable();
        targets.dedup();
        prop_assert_eq!(targets.len(), engine.tree().node_count());
    }

    #[test]
    fn persistent_path_starts_at_root_and_stays_connected(
        seed in 0u64..1000,
        plies in 0usize..5,
        iterations in 0u32..120,
    ) {
        let state = position(seed, plies);
        let mut engine = Mcts::<TicTacToe>::with_config(MctsConfig::default().with_seed(seed));
        engine.compute(&state, iterations);
        let path = engine.path();
        prop_assert_eq!(path.get(0).target, engine.tree().root());
        prop_assert!(path.persistent_len() <= path.len());
        for i in 1..path.persistent_len() {
            let link = path.get(i);
            prop_assert!(link.arc.is_valid());
            prop_assert_eq!(engine.tree().arc_source(link.arc), path.get(i - 1).target);
            prop_assert_eq!(engine.tree().arc_target(link.arc), link.target);
        }
    }
}
