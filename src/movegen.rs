//! Pseudo-legal move generation.
//!
//! Each scan is a pure function of the position. Besides the candidate
//! targets it reports every square the piece attacks and whether one of
//! those squares holds the enemy king, so the legality check needs no
//! second attack pass.

use once_cell::sync::Lazy;

use crate::board::{self, GameState, NUM_SQUARES, bit, offset, row_col};
use crate::types::{CastlingSide, Color, Piece, PieceKind};

const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (-1, 2),
    (1, -2),
    (-1, -2),
];
const KING_DELTAS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

static KNIGHT_JUMPS: Lazy<[Vec<usize>; NUM_SQUARES]> = Lazy::new(|| step_table(&KNIGHT_DELTAS));
static KING_STEPS: Lazy<[Vec<usize>; NUM_SQUARES]> = Lazy::new(|| step_table(&KING_DELTAS));

fn step_table(deltas: &[(i32, i32)]) -> [Vec<usize>; NUM_SQUARES] {
    std::array::from_fn(|from| {
        deltas
            .iter()
            .filter_map(|&(dr, dc)| offset(from, dr, dc))
            .collect()
    })
}

/// Outcome of scanning one piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// Candidate targets in generation order.
    pub targets: Vec<usize>,
    /// Bit mask of squares the piece attacks, occupied or not.
    pub attacks: u64,
    /// True when one of the attacked squares holds the enemy king.
    pub targets_king: bool,
}

impl Scan {
    pub fn attacks_square(&self, square: usize) -> bool {
        self.attacks & bit(square) != 0
    }

    /// Whether a king castling from `king_from` to `king_to` starts on or
    /// crosses an attacked square. The landing square is covered by the
    /// ordinary self-check test.
    pub fn attacks_castling_path(&self, king_from: usize, king_to: usize) -> bool {
        let transit = (king_from + king_to) / 2;
        self.attacks_square(king_from) || self.attacks_square(transit)
    }

    /// Folds another scan's attacks into this one.
    pub fn absorb(&mut self, other: &Scan) {
        self.attacks |= other.attacks;
        self.targets_king |= other.targets_king;
    }

    fn touch(&mut self, square: usize, occupant: Option<Piece>, mover: Color) {
        self.attacks |= bit(square);
        if occupant.is_some_and(|piece| piece.kind == PieceKind::King && piece.color != mover) {
            self.targets_king = true;
        }
    }

    /// Touches `square` and keeps it as a target if empty or capturable.
    /// Returns whether a ray may continue past it.
    fn step(&mut self, state: &GameState, square: usize, mover: Color) -> bool {
        let occupant = state.board.get(square);
        self.touch(square, occupant, mover);
        match occupant {
            None => {
                self.targets.push(square);
                true
            }
            Some(piece) => {
                if piece.is_capturable_by(mover) {
                    self.targets.push(square);
                }
                false
            }
        }
    }
}

/// Generates pseudo-legal targets for the piece on `from`.
/// Returns `None` when the square is empty.
pub fn candidate_moves(state: &GameState, from: usize) -> Option<Scan> {
    state.board.get(from).map(|piece| scan_piece(state, from, piece))
}

pub fn scan_piece(state: &GameState, from: usize, piece: Piece) -> Scan {
    let mut scan = Scan::default();
    match piece.kind {
        PieceKind::Pawn => pawn_moves(state, from, piece, &mut scan),
        PieceKind::Rook => slide(state, from, piece.color, &ROOK_DIRS, &mut scan),
        PieceKind::Bishop => slide(state, from, piece.color, &BISHOP_DIRS, &mut scan),
        PieceKind::Queen => {
            slide(state, from, piece.color, &ROOK_DIRS, &mut scan);
            slide(state, from, piece.color, &BISHOP_DIRS, &mut scan);
        }
        PieceKind::Knight => {
            for &to in &KNIGHT_JUMPS[from] {
                scan.step(state, to, piece.color);
            }
        }
        PieceKind::King => king_moves(state, from, piece, &mut scan),
    }
    scan
}

fn pawn_moves(state: &GameState, from: usize, piece: Piece, scan: &mut Scan) {
    let dir = piece.color.forward();

    // Pushes never capture and attack nothing.
    if let Some(one) = offset(from, dir, 0)
        && state.board.is_empty(one)
    {
        scan.targets.push(one);
        if !piece.has_moved
            && let Some(two) = offset(from, dir * 2, 0)
            && state.board.is_empty(two)
        {
            scan.targets.push(two);
        }
    }

    for dc in [-1, 1] {
        let Some(diag) = offset(from, dir, dc) else {
            continue;
        };
        let occupant = state.board.get(diag);
        scan.touch(diag, occupant, piece.color);
        let capturable = match occupant {
            Some(target) => target.is_capturable_by(piece.color),
            None => en_passant_target(state, diag, piece.color),
        };
        if capturable {
            scan.targets.push(diag);
        }
    }
}

fn en_passant_target(state: &GameState, square: usize, mover: Color) -> bool {
    state.en_passant.is_some_and(|marker| {
        marker.capture_square == square
            && state
                .board
                .get(marker.victim)
                .is_some_and(|victim| victim.kind == PieceKind::Pawn && victim.color != mover)
    })
}

fn slide(state: &GameState, from: usize, mover: Color, dirs: &[(i32, i32)], scan: &mut Scan) {
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(next) = offset(cur, dr, dc) {
            if !scan.step(state, next, mover) {
                break;
            }
            cur = next;
        }
    }
}

fn king_moves(state: &GameState, from: usize, piece: Piece, scan: &mut Scan) {
    for &to in &KING_STEPS[from] {
        scan.step(state, to, piece.color);
    }

    if piece.has_moved {
        return;
    }
    // Attacks on the king's path are vetoed during simulation.
    for side in [CastlingSide::Queenside, CastlingSide::Kingside] {
        if let Some(target) = castling_target(state, from, piece.color, side) {
            scan.targets.push(target);
        }
    }
}

/// Landing square of a castling king, when the rook is in place and unmoved
/// and every square between king and rook is empty.
fn castling_target(state: &GameState, from: usize, color: Color, side: CastlingSide) -> Option<usize> {
    let (row, col) = row_col(from);
    let (rook_col, step) = match side {
        CastlingSide::Queenside => (0, -1),
        CastlingSide::Kingside => (board::BOARD_SIZE - 1, 1),
    };
    let rook = state.board.get(board::square(row, rook_col))?;
    if rook.kind != PieceKind::Rook || rook.color != color || rook.has_moved {
        return None;
    }

    let (lo, hi) = if rook_col < col { (rook_col, col) } else { (col, rook_col) };
    if (lo + 1..hi).any(|c| !state.board.is_empty(board::square(row, c))) {
        return None;
    }
    offset(from, 0, step * 2)
}
