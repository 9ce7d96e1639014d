//! Connect Four game implementation for the MCTS engine
//!
//! Connect Four is a two-player connection game where players drop discs
//! into a 7-column, 6-row vertically suspended grid. The objective is to be
//! the first to form a horizontal, vertical, or diagonal line of four discs.
//!
//! # Board Layout
//!
//! The board is stored in row-major order with row 0 at the top; discs
//! stack upward from row 5:
//!
//! ```text
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Top (drop entry)
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 4: [28][29][30][31][32][33][34]
//! Row 5: [35][36][37][38][39][40][41]  <- Bottom
//!         Col 0   1   2   3   4   5   6
//! ```

use engine_core::{GameMove, GameState, MoveBuffer, MoveList, Player, ZobristHash};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// A column index 0-6, or one of the sentinels.
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

/// Legal-move buffer sized to the column count.
pub type Moves = MoveList<Move, COLS>;

/// Piece-square keys, seat-major: `[seat * 42 + row * 7 + col]`.
const ZOBRIST_PIECE_KEYS: [ZobristHash; 2 * BOARD_SIZE] = [
    0xa1a656cb9731c5d5,
    0xc3dce6ad6465ea7a,
    0x9e2556e2bbec18d3,
    0x900670630f4f76af,
    0xda8071005889fa3c,
    0xd1efb50aec8b61a9,
    0x73203d10cf4db8b8,
    0x6ab7fd70679d877f,
    0x3a56cdae74f9d816,
    0xb3b48dc62bacaf9b,
    0x27760b12660e6c3b,
    0xd9ac7fb482854702,
    0xd35e698b064e4f93,
    0x7b379503f68242bd,
    0xdad6afcb4409d282,
    0xf04b592c8e1183fe,
    0x6dbb4f77e63f5267,
    0x970b0ae4e9e7d347,
    0xd19027f157c2845a,
    0x82a53746e2d25fa5,
    0xe2097dbb17c142f7,
    0x5eba98d936a14c91,
    0x963286f60ab69777,
    0x96e9eb899e5e615b,
    0xecd8957747d0bef8,
    0x961b3fb52b112218,
    0x44c776ac7af4cc2d,
    0xfa2708e399719ac4,
    0xe34b58c2f6acac45,
    0x7f6d2cb0416a63ca,
    0x287ecf88477a3e7d,
    0xe57d268150b95703,
    0xf9cc76357617493c,
    0xe956f77acaa2f112,
    0x9a9441286a0a70e7,
    0x5b5a62ba1d8dfd33,
    0xb3d1b947205bf8f4,
    0x4aabdee7fb6aa20b,
    0xa810d257d77576af,
    0x6a1789922b7af41a,
    0x315833a0f0b5ceeb,
    0x481a32e97fbd47d8,
    0x11e80a41d2022fdc,
    0xfab59400ba6c780c,
    0xfce9f47e1dc3037d,
    0xf5f404421f6c78b2,
    0x274ef7151bd8503e,
    0x1d5268cdadd43ad3,
    0x59ed9dc04b81a0c1,
    0x3c10ea92d1a6d79d,
    0x595d9292d07ee51d,
    0x1a62a32bb174ee71,
    0x417fd9b9b0bc7a47,
    0x3e266eca431347d6,
    0x74a093aeceb1fd60,
    0x7720a5e78ae8d571,
    0x9645ae72f6f57362,
    0xcc7279ab05731ef7,
    0xf5a0574bc2385c6f,
    0xb254ccf017ebc43b,
    0x34184cd5945aff3e,
    0x4c5ede78a68fd1a5,
    0x49adf513d838ce5d,
    0x44940842e2c75c16,
    0x7aacd877d0831e19,
    0x9d8d5e4f7c511acd,
    0xac2f78583e0e9692,
    0x03e2da677110440c,
    0x07d2a6b527f4ef05,
    0x91a680f12222cf16,
    0x08617f45641626d0,
    0xb2df85147e2a11cb,
    0x6bf333747f7f10a4,
    0xc6f2a33e3a94b2c1,
    0xf5358b1cb75e528f,
    0x904af33725c150b5,
    0xd75d6d3f202f964b,
    0x8d58eeece3979331,
    0xb58f905351a0d8f1,
    0x38ad67581ffcbdfb,
    0xcd5f48e9ac464398,
    0xfcc2df3237564c0c,
    0x1ea8202ddf77efde,
    0x000617fafba044ad,
];

/// Side-to-move keys indexed by `Player::as_index`.
const ZOBRIST_PLAYER_KEYS: [ZobristHash; 3] = [
    0x41fec34015a1bef2,
    0x8b80677c9c144514,
    0xf6242292160d5bb7,
];

/// Connect Four game state.
///
/// Plain-old-data and `Copy`: the engine clones it once per descent and once
/// per rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectFour {
    zobrist_hash: ZobristHash,
    board: [Player; BOARD_SIZE],
    no_moves: u8,
    player_just_moved: Player,
    winner: Option<Player>,
    last: Move,
}

impl ConnectFour {
    pub fn new() -> Self {
        Self {
            zobrist_hash: ZOBRIST_PLAYER_KEYS[Player::Vacant.as_index()],
            board: [Player::Vacant; BOARD_SIZE],
            no_moves: 0,
            player_just_moved: Player::Human,
            winner: None,
            last: Move::ROOT,
        }
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> Player {
        self.board[row * COLS + col]
    }

    /// Drop a disc in the column without hash or winner bookkeeping;
    /// returns the landing row.
    fn apply(&mut self, mv: Move) -> usize {
        debug_assert!(self.winner.is_none());
        let col = mv.0 as usize;
        let row = (0..ROWS)
            .rev()
            .find(|&row| self.at(row, col).is_vacant())
            .expect("drop into a full column");
        self.player_just_moved = self.player_just_moved.opponent();
        self.board[row * COLS + col] = self.player_just_moved;
        self.no_moves += 1;
        self.last = mv;
        row
    }

    fn hash(&mut self, row: usize, col: usize) {
        let seat = self.player_just_moved.seat_index();
        self.zobrist_hash ^= ZOBRIST_PIECE_KEYS[seat * BOARD_SIZE + row * COLS + col];
    }

    /// Count contiguous same-colored discs through (row, col) along
    /// (row_step, col_step), the landing disc included.
    fn line_length(&self, row: usize, col: usize, row_step: isize, col_step: isize) -> usize {
        let piece = self.at(row, col);
        let mut count = 1;
        for dir in [1isize, -1] {
            let mut r = row as isize + dir * row_step;
            let mut c = col as isize + dir * col_step;
            while (0..ROWS as isize).contains(&r)
                && (0..COLS as isize).contains(&c)
                && self.at(r as usize, c as usize) == piece
            {
                count += 1;
                r += dir * row_step;
                c += dir * col_step;
            }
        }
        count
    }

    /// Winner detection limited to the four lines through the last disc.
    fn detect_winner(&mut self, row: usize, col: usize) {
        for (row_step, col_step) in [(0, 1), (1, 0), (1, 1), (1, -1)] {
            if self.line_length(row, col, row_step, col_step) >= 4 {
                self.winner = Some(self.player_just_moved);
                return;
            }
        }
        if self.no_moves as usize == BOARD_SIZE {
            self.winner = Some(Player::Vacant);
        }
    }
}

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for ConnectFour {
    type Move = Move;
    type Moves = Moves;

    const MAX_MOVES: usize = COLS;

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
        let col = mv.0 as usize;
        let row = self.apply(mv);
        self.hash(row, col);
    }

    fn move_hash_winner(&mut self, mv: Move) {
        let col = mv.0 as usize;
        let row = self.apply(mv);
        self.hash(row, col);
        self.detect_winner(row, col);
    }

    fn move_winner(&mut self, mv: Move) {
        let col = mv.0 as usize;
        let row = self.apply(mv);
        self.detect_winner(row, col);
    }

    fn moves(&self, out: &mut Moves) -> bool {
        out.clear();
        if self.winner.is_some() || self.no_moves as usize == BOARD_SIZE {
            return false;
        }
        for col in 0..COLS {
            if self.at(0, col).is_vacant() {
                out.push(Move(col as i8));
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
