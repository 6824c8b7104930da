use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row delta of a pawn step. Row 0 is Black's back rank.
    pub fn forward(self) -> i32 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    pub fn back_row(self) -> usize {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// Row on which this side's pawns promote.
    pub fn promotion_row(self) -> usize {
        self.opponent().back_row()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Kinds a pawn may become on the last rank.
    pub const PROMOTABLE: [PieceKind; 4] = [Self::Rook, Self::Knight, Self::Bishop, Self::Queen];

    pub fn is_promotable(self) -> bool {
        Self::PROMOTABLE.contains(&self)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        })
    }
}

/// A piece record. Pieces have no identity beyond the cell holding them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    /// Monotonic: once set it is never cleared.
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
        }
    }

    /// Same piece, already marked as moved.
    pub fn moved(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: true,
        }
    }

    /// Whether a piece of `mover` may land on a square holding `self`.
    pub fn is_capturable_by(&self, mover: Color) -> bool {
        self.color != mover && self.kind != PieceKind::King
    }
}

/// En-passant window opened by the immediately preceding pawn double-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassant {
    /// Square the double-stepping pawn skipped over.
    pub capture_square: usize,
    /// Square of the pawn that may be taken.
    pub victim: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Queenside,
    Kingside,
}

/// Side effect of a move beyond relocating the moving piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SpecialMove {
    EnPassant { captured_pawn: usize },
    QueensideCastling { rook_from: usize },
    KingsideCastling { rook_from: usize },
    Promotion { pawn: usize },
}

impl SpecialMove {
    pub fn castling_side(&self) -> Option<CastlingSide> {
        match self {
            Self::QueensideCastling { .. } => Some(CastlingSide::Queenside),
            Self::KingsideCastling { .. } => Some(CastlingSide::Kingside),
            _ => None,
        }
    }
}

/// Classification of the position after a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Continue,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }
}

/// Promotion waiting for a piece choice, as reported to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChoice {
    pub from: usize,
    pub to: usize,
    pub color: Color,
}

/// Result of a move request returned from WASM APIs.
///
/// Contract:
/// - `awaiting_promotion` is set and `status` is unchanged while a pawn on
///   the last rank waits for its piece choice; the board is not updated yet.
/// - Otherwise the move is committed and `status` describes the new position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    pub from: usize,
    pub to: usize,
    pub captured: Option<Piece>,
    pub special: Option<SpecialMove>,
    pub in_check: bool,
    pub status: GameStatus,
    pub awaiting_promotion: Option<PendingChoice>,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// 64 cells, `idx = row * 8 + col`, row 0 is Black's back rank.
    pub board: Vec<Option<Piece>>,
    pub side_to_move: Color,
    pub status: GameStatus,
    pub in_check: bool,
    pub awaiting_promotion: Option<PendingChoice>,
    pub last_move: Option<(usize, usize)>,
    pub captured: Vec<Piece>,
    pub winner: Option<Color>,
}
