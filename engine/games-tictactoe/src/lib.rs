//! TicTacToe game implementation for the MCTS engine
//!
//! A complete reference implementation of the `engine-core` GameState trait.
//! TicTacToe is small enough that distinct move orders frequently converge on
//! the same position, which makes it the game of choice for exercising the
//! engine's transposition handling.
//!
//! # Board Layout
//!
//! ```text
//! [0][1][2]
//! [3][4][5]
//! [6][7][8]
//! ```

use engine_core::{GameMove, GameState, MoveBuffer, MoveList, Player, ZobristHash};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of board squares.
pub const SQUARES: usize = 9;

/// A square index 0-8, or one of the sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move(pub i8);

impl GameMove for Move {
    const NONE: Move = Move(-1);
    const ROOT: Move = Move(-2);
    const INVALID: Move = Move(-3);
}

impl Default for Move {
    fn default() -> Self {
        Move::INVALID
    }
}

/// Legal-move buffer sized to the empty board.
pub type Moves = MoveList<Move, SQUARES>;

/// Winning positions (rows, columns, diagonals).
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Piece-square keys, seat-major: `[seat * 9 + square]`.
const ZOBRIST_PIECE_KEYS: [ZobristHash; 2 * SQUARES] = [
    0x9d39247e33776d41,
    0x2af7398005aaa5c7,
    0x44db015024623547,
    0x9c15f73e62a76ae2,
    0x75834465489c0c89,
    0x3290ac3a203001bf,
    0x0fbbad1f61042279,
    0xe83a908ff2fb60ca,
    0x0d7e765d58755c10,
    0x1a083822ceafe02d,
    0x9605d5f0e25ec3b0,
    0xd021ff5cd13a2ed5,
    0x40bdf15d4a672e32,
    0x011355146fd56395,
    0x5db4832046f3d9e5,
    0x239f8b2d7ff719cc,
    0x05d1a1ae85b49aa1,
    0x679f848f6e8fc971,
];

/// Side-to-move keys indexed by `Player::as_index`.
const ZOBRIST_PLAYER_KEYS: [ZobristHash; 3] = [
    0x7449bbff801fed0b,
    0x7d11cdb1c3b7adf0,
    0x0568763768e06ca8,
];

/// TicTacToe game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    board: [Player; SQUARES],
    zobrist_hash: ZobristHash,
    no_moves: u8,
    player_just_moved: Player,
    winner: Option<Player>,
    last: Move,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: [Player::Vacant; SQUARES],
            zobrist_hash: ZOBRIST_PLAYER_KEYS[Player::Vacant.as_index()],
            no_moves: 0,
            player_just_moved: Player::Human,
            winner: None,
            last: Move::ROOT,
        }
    }

    /// Apply the move without hash or winner bookkeeping; returns the square.
    fn apply(&mut self, mv: Move) -> usize {
        debug_assert!(self.winner.is_none());
        let square = mv.0 as usize;
        debug_assert!(self.board[square].is_vacant());
        self.player_just_moved = self.player_just_moved.opponent();
        self.board[square] = self.player_just_moved;
        self.no_moves += 1;
        self.last = mv;
        square
    }

    fn hash(&mut self, square: usize) {
        let seat = self.player_just_moved.seat_index();
        self.zobrist_hash ^= ZOBRIST_PIECE_KEYS[seat * SQUARES + square];
    }

    fn detect_winner(&mut self) {
        let piece = self.player_just_moved;
        for line in &LINES {
            if line.iter().all(|&square| self.board[square] == piece) {
                self.winner = Some(piece);
                return;
            }
        }
        if self.no_moves as usize == SQUARES {
            self.winner = Some(Player::Vacant);
        }
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for TicTacToe {
    type Move = Move;
    type Moves = Moves;

    const MAX_MOVES: usize = SQUARES;

    fn initialize<R: Rng>(&mut self, rng: &mut R) {
        *self = Self::new();
        self.player_just_moved = Player::random(rng);
    }

    fn player_just_moved(&self) -> Player {
        self.player_just_moved
    }

    fn last_move(&self) -> Move {
        self.last
    }

    fn move_hash(&mut self, mv: Move) {
        let square = self.apply(mv);
        self.hash(square);
    }

    fn move_hash_winner(&mut self, mv: Move) {
        let square = self.apply(mv);
        self.hash(square);
        self.detect_winner();
    }

    fn move_winner(&mut self, mv: Move) {
        self.apply(mv);
        self.detect_winner();
    }

    fn moves(&self, out: &mut Moves) -> bool {
        out.clear();
        if self.winner.is_some() || self.no_moves as usize == SQUARES {
            return false;
        }
        for square in 0..SQUARES {
            if self.board[square].is_vacant() {
                out.push(Move(square as i8));
            }
        }
        true
    }

    fn simulate<R: Rng>(&mut self, rng: &mut R) {
        let mut moves = Moves::default();
        while self.moves(&mut moves) {
            let mv = moves.random(rng);
            self.move_winner(mv);
        }
    }

    fn result(&self, player_just_moved: Player) -> f32 {
        match self.winner {
            Some(Player::Vacant) | None => 0.0,
            Some(winner) if winner == player_just_moved => 1.0,
            Some(_) => -1.0,
        }
    }

    fn ended(&self) -> Option<Player> {
        self.winner
    }

    fn zobrist(&self) -> ZobristHash {
        self.zobrist_hash ^ ZOBRIST_PLAYER_KEYS[self.player_just_moved.as_index()]
    }
}
