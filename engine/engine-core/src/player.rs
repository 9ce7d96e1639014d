//! Player seats and the draw/unseated sentinel.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the two seated players, or the vacant sentinel.
///
/// `Vacant` marks empty board cells and doubles as the draw outcome in
/// [`ended`](crate::GameState::ended). The discriminant order matters:
/// [`as_index`](Player::as_index) is used to pick side-to-move Zobrist keys,
/// so it must be stable across runs and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    Agent = 0,
    Vacant = 1,
    Human = 2,
}

impl Player {
    /// The other seat. `Vacant` has no opponent and maps to itself.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Agent => Player::Human,
            Player::Human => Player::Agent,
            Player::Vacant => Player::Vacant,
        }
    }

    /// Stable index for key tables: Agent = 0, Vacant = 1, Human = 2.
    #[inline]
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Seat index for piece-square key tables: Agent = 0, Human = 1.
    ///
    /// Calling this on `Vacant` is a programmer error.
    #[inline]
    pub fn seat_index(self) -> usize {
        match self {
            Player::Agent => 0,
            Player::Human => 1,
            Player::Vacant => unreachable!("vacant player has no seat"),
        }
    }

    #[inline]
    pub fn is_vacant(self) -> bool {
        self == Player::Vacant
    }

    /// Draw a random starter, fair coin between the two seats.
    pub fn random<R: Rng>(rng: &mut R) -> Player {
        if rng.gen::<bool>() {
            Player::Agent
        } else {
            Player::Human
        }
    }
}
