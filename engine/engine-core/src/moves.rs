//! Bounded legal-move containers.
//!
//! A node's untried moves and a rollout's candidate moves both live in a
//! fixed-capacity buffer sized by the game's `MAX_MOVES`. The buffer supports
//! two sampling modes: `draw` removes the sampled move (expansion), `random`
//! leaves the buffer untouched (rollouts regenerate the move set every ply).

use std::fmt::Debug;

use rand::Rng;

/// Operations the engine needs from a legal-move container.
pub trait MoveBuffer: Clone + Default + Debug {
    type Move: Copy;

    fn clear(&mut self);

    /// Append a move. Overflowing the capacity is fatal.
    fn push(&mut self, mv: Self::Move);

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn as_slice(&self) -> &[Self::Move];

    /// First move in insertion order. Panics when empty.
    #[inline]
    fn front(&self) -> Self::Move {
        self.as_slice()[0]
    }

    /// Uniform random draw-with-removal (swap-remove).
    fn draw<R: Rng>(&mut self, rng: &mut R) -> Self::Move;

    /// Uniform random sample without removal.
    fn random<R: Rng>(&self, rng: &mut R) -> Self::Move;
}

/// Fixed-capacity move list backed by an inline array.
#[derive(Debug, Clone, Copy)]
pub struct MoveList<M, const N: usize> {
    items: [M; N],
    len: u8,
}

impl<M: Copy + Default + Debug, const N: usize> Default for MoveList<M, N> {
    fn default() -> Self {
        Self {
            items: [M::default(); N],
            len: 0,
        }
    }
}

impl<M: Copy + Default + Debug, const N: usize> MoveBuffer for MoveList<M, N> {
    type Move = M;

    #[inline]
    fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    fn push(&mut self, mv: M) {
        assert!((self.len as usize) < N, "move list capacity exhausted");
        self.items[self.len as usize] = mv;
        self.len += 1;
    }

    #[inline]
    fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    fn as_slice(&self) -> &[M] {
        &self.items[..self.len as usize]
    }

    fn draw<R: Rng>(&mut self, rng: &mut R) -> M {
        let i = rng.gen_range(0..self.len as usize);
        let mv = self.items[i];
        self.len -= 1;
        self.items[i] = self.items[self.len as usize];
        mv
    }

    fn random<R: Rng>(&self, rng: &mut R) -> M {
        self.items[rng.gen_range(0..self.len as usize)]
    }
}
