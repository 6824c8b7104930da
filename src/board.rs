use crate::error::{EngineError, Result};
use crate::types::{Color, EnPassant, Piece, PieceKind};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

const BACK_RANK: [PieceKind; BOARD_SIZE] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 8x8 mailbox board, `idx = row * 8 + col`, row 0 is Black's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; NUM_SQUARES],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [None; NUM_SQUARES],
        }
    }

    /// Creates the standard initial position.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for (col, kind) in BACK_RANK.into_iter().enumerate() {
            board.set(square(0, col), Some(Piece::new(kind, Color::Black)));
            board.set(square(1, col), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            board.set(square(6, col), Some(Piece::new(PieceKind::Pawn, Color::White)));
            board.set(square(7, col), Some(Piece::new(kind, Color::White)));
        }
        board
    }

    /// Returns the piece on `square`, or `None` when empty or off the board.
    pub fn get(&self, square: usize) -> Option<Piece> {
        self.cells.get(square).copied().flatten()
    }

    pub fn is_empty(&self, square: usize) -> bool {
        self.get(square).is_none()
    }

    /// Panics if `square` is off the board.
    pub fn set(&mut self, square: usize, piece: Option<Piece>) {
        self.cells[square] = piece;
    }

    /// Removes and returns the piece on `square`.
    pub fn take(&mut self, square: usize) -> Option<Piece> {
        self.cells.get_mut(square).and_then(Option::take)
    }

    /// Squares holding pieces of `color`, in index order.
    pub fn pieces_of(&self, color: Color) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some_and(|piece| piece.color == color))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn king_square(&self, color: Color) -> Option<usize> {
        self.cells.iter().position(|cell| {
            cell.is_some_and(|piece| piece.kind == PieceKind::King && piece.color == color)
        })
    }

    pub fn count(&self, kind: PieceKind, color: Color) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|piece| piece.kind == kind && piece.color == color)
            .count()
    }

    pub fn to_vec(&self) -> Vec<Option<Piece>> {
        self.cells.to_vec()
    }
}

/// Full engine state. Treated as immutable: moves produce a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub en_passant: Option<EnPassant>,
    pub side_to_move: Color,
}

impl GameState {
    /// Standard initial position with `first_to_move` to play.
    pub fn new(first_to_move: Color) -> Self {
        Self {
            board: Board::standard(),
            en_passant: None,
            side_to_move: first_to_move,
        }
    }

    /// Builds a custom position, checking the board invariants:
    /// exactly one king per color, one piece per square, and an en-passant
    /// marker that points at a pawn that just double-stepped.
    pub fn from_position(
        pieces: &[(usize, Piece)],
        side_to_move: Color,
        en_passant: Option<EnPassant>,
    ) -> Result<Self> {
        let mut board = Board::empty();
        for &(idx, piece) in pieces {
            if idx >= NUM_SQUARES {
                return Err(invalid_position(format!("square {idx} is off the board")));
            }
            if board.get(idx).is_some() {
                return Err(invalid_position(format!(
                    "square {} holds two pieces",
                    square_name(idx)
                )));
            }
            board.set(idx, Some(piece));
        }

        for color in [Color::White, Color::Black] {
            let kings = board.count(PieceKind::King, color);
            if kings != 1 {
                return Err(invalid_position(format!(
                    "{color} has {kings} kings, expected exactly one"
                )));
            }
        }

        if let Some(marker) = en_passant {
            validate_en_passant(&board, marker, side_to_move)?;
        }

        Ok(Self {
            board,
            en_passant,
            side_to_move,
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Color::White)
    }
}

fn validate_en_passant(board: &Board, marker: EnPassant, side_to_move: Color) -> Result<()> {
    let victim_color = side_to_move.opponent();
    let victim_ok = board
        .get(marker.victim)
        .is_some_and(|piece| piece.kind == PieceKind::Pawn && piece.color == victim_color);
    // The skipped square sits one step behind the victim.
    let behind = offset(marker.victim, -victim_color.forward(), 0);
    if !victim_ok || behind != Some(marker.capture_square) || !board.is_empty(marker.capture_square)
    {
        return Err(invalid_position(format!(
            "en-passant marker {} does not follow a {victim_color} pawn double-step",
            square_name(marker.capture_square)
        )));
    }
    Ok(())
}

fn invalid_position(reason: String) -> EngineError {
    EngineError::InvalidPosition { reason }
}

pub fn square(row: usize, col: usize) -> usize {
    row * BOARD_SIZE + col
}

pub fn row_col(square: usize) -> (usize, usize) {
    (square / BOARD_SIZE, square % BOARD_SIZE)
}

/// Square reached by moving `(dr, dc)` from `square`, if still on the board.
pub fn offset(square: usize, dr: i32, dc: i32) -> Option<usize> {
    let (row, col) = row_col(square);
    let row = row as i32 + dr;
    let col = col as i32 + dc;
    if in_bounds(row, col) {
        Some(row as usize * BOARD_SIZE + col as usize)
    } else {
        None
    }
}

pub fn bit(square: usize) -> u64 {
    if square < NUM_SQUARES { 1u64 << square } else { 0 }
}

/// Algebraic name of a square, e.g. `e4`.
pub fn square_name(square: usize) -> String {
    if square >= NUM_SQUARES {
        return format!("#{square}");
    }
    let (row, col) = row_col(square);
    format!("{}{}", (b'a' + col as u8) as char, BOARD_SIZE - row)
}

/// Parses an algebraic square name such as `e4`.
pub fn parse_square(name: &str) -> Option<usize> {
    let mut chars = name.chars();
    let file = chars.next()?;
    let rank = chars.next()?.to_digit(10)? as usize;
    if chars.next().is_some() || !('a'..='h').contains(&file) || !(1..=BOARD_SIZE).contains(&rank) {
        return None;
    }
    Some(square(BOARD_SIZE - rank, file as usize - 'a' as usize))
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> usize {
        parse_square(name).unwrap()
    }

    #[test]
    fn standard_board_places_both_armies() {
        let board = Board::standard();

        assert_eq!(board.pieces_of(Color::White).len(), 16);
        assert_eq!(board.pieces_of(Color::Black).len(), 16);
        assert_eq!(board.king_square(Color::White), Some(sq("e1")));
        assert_eq!(board.king_square(Color::Black), Some(sq("e8")));
        assert_eq!(
            board.get(sq("d1")),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        assert_eq!(board.count(PieceKind::Pawn, Color::Black), 8);
        assert!(board.is_empty(sq("e4")));
    }

    #[test]
    fn square_names_follow_orientation() {
        assert_eq!(sq("a8"), 0);
        assert_eq!(sq("h1"), 63);
        assert_eq!(sq("e2"), square(6, 4));
        assert_eq!(square_name(square(4, 3)), "d4");
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        assert_eq!(parse_square("a10"), None);
    }

    #[test]
    fn offset_stays_on_board() {
        assert_eq!(offset(sq("a1"), -1, 0), Some(sq("a2")));
        assert_eq!(offset(sq("a1"), 0, -1), None);
        assert_eq!(offset(sq("h8"), -1, 1), None);
        assert_eq!(offset(sq("b1"), -2, 1), Some(sq("c3")));
    }

    #[test]
    fn take_empties_the_square() {
        let mut board = Board::standard();

        let piece = board.take(sq("g1"));

        assert_eq!(piece, Some(Piece::new(PieceKind::Knight, Color::White)));
        assert!(board.is_empty(sq("g1")));
        assert_eq!(board.take(sq("g1")), None);
        assert_eq!(board.take(99), None);
    }

    #[test]
    fn from_position_requires_one_king_per_color() {
        let white_king = (sq("e1"), Piece::new(PieceKind::King, Color::White));
        let black_king = (sq("e8"), Piece::new(PieceKind::King, Color::Black));
        let extra_king = (sq("a8"), Piece::new(PieceKind::King, Color::Black));

        assert!(GameState::from_position(&[white_king, black_king], Color::White, None).is_ok());
        assert!(matches!(
            GameState::from_position(&[white_king], Color::White, None),
            Err(EngineError::InvalidPosition { .. })
        ));
        assert!(matches!(
            GameState::from_position(&[white_king, black_king, extra_king], Color::White, None),
            Err(EngineError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn from_position_rejects_doubled_square() {
        let pieces = [
            (sq("e1"), Piece::new(PieceKind::King, Color::White)),
            (sq("e8"), Piece::new(PieceKind::King, Color::Black)),
            (sq("e1"), Piece::new(PieceKind::Rook, Color::White)),
        ];

        let err = GameState::from_position(&pieces, Color::White, None).unwrap_err();

        assert!(err.to_string().contains("two pieces"));
    }

    #[test]
    fn from_position_checks_en_passant_marker() {
        let pieces = [
            (sq("e1"), Piece::new(PieceKind::King, Color::White)),
            (sq("e8"), Piece::new(PieceKind::King, Color::Black)),
            (sq("e5"), Piece::moved(PieceKind::Pawn, Color::White)),
            (sq("d5"), Piece::moved(PieceKind::Pawn, Color::Black)),
        ];
        let good = EnPassant {
            capture_square: sq("d6"),
            victim: sq("d5"),
        };
        let bad = EnPassant {
            capture_square: sq("d4"),
            victim: sq("d5"),
        };

        assert!(GameState::from_position(&pieces, Color::White, Some(good)).is_ok());
        assert!(GameState::from_position(&pieces, Color::White, Some(bad)).is_err());
        // The victim must belong to the side that just moved.
        assert!(GameState::from_position(&pieces, Color::Black, Some(good)).is_err());
    }
}
