//! Criterion benchmarks for the search loop and pruning.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine_core::GameState;
use games_connect4::ConnectFour;
use mcts::{Mcts, MctsConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn start_state(seed: u64) -> ConnectFour {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = ConnectFour::new();
    state.initialize(&mut rng);
    state
}

fn bench_compute(c: &mut Criterion) {
    let state = start_state(1);
    c.bench_function("compute/connect4/1000", |b| {
        b.iter(|| {
            let mut engine =
                Mcts::<ConnectFour>::with_config(MctsConfig::default().with_seed(1));
            black_box(engine.compute(black_box(&state), 1000))
        })
    });
}

fn bench_prune(c: &mut Criterion) {
    let state = start_state(2);
    let mut engine = Mcts::<ConnectFour>::with_config(MctsConfig::default().with_seed(2));
    let mv = engine.compute(&state, 5000);
    let mut after = state;
    after.move_hash_winner(mv);

    c.bench_function("prune/connect4/5000-iteration-graph", |b| {
        b.iter(|| {
            let mut clone = engine.clone();
            Mcts::prune(&mut clone, black_box(&after));
            black_box(clone.tree().node_count())
        })
    });
}

fn bench_merge(c: &mut Criterion) {
    let state = start_state(3);
    let mut a = Mcts::<ConnectFour>::with_config(MctsConfig::default().with_seed(3));
    let mut b_engine = Mcts::<ConnectFour>::with_config(MctsConfig::default().with_seed(4));
    a.compute(&state, 3000);
    b_engine.compute(&state, 1000);

    c.bench_function("merge/connect4/3000-into-1000", |b| {
        b.iter(|| {
            let mut target = a.clone();
            Mcts::merge(&mut target, b_engine.clone());
            black_box(target.tree().node_count())
        })
    });
}

criterion_group!(benches, bench_compute, bench_prune, bench_merge);
criterion_main!(benches);
