//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MctsConfig {
    /// Exploration constant K in the UCT formula
    /// `score/visits + sqrt(K * ln(parent_visits + 1) / visits)`.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration_constant: f32,

    /// Independent random rollouts per expanded leaf. More rollouts lower
    /// the score variance at the leaf without re-descending the tree, at a
    /// higher per-iteration cost.
    pub simulations_per_expansion: u32,

    /// Seed for the engine's deterministic RNG. With a fixed seed and a
    /// fixed game implementation, `compute` is reproducible.
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: 4.0,
            simulations_per_expansion: 3,
            seed: 0,
        }
    }
}

impl MctsConfig {
    /// Builder pattern: set the UCT exploration constant.
    pub fn with_exploration_constant(mut self, k: f32) -> Self {
        self.exploration_constant = k;
        self
    }

    /// Builder pattern: set rollouts per expansion.
    pub fn with_simulations_per_expansion(mut self, n: u32) -> Self {
        self.simulations_per_expansion = n;
        self
    }

    /// Builder pattern: set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
