//! Error types for the rules engine.
//!
//! Every error is local-recoverable: the engine never applies a move
//! partially, so the caller can ignore the error and re-prompt.

use thiserror::Error;

use crate::types::{Color, GameStatus, PieceKind};

/// Errors returned by engine and session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The selected square cannot be moved from.
    #[error("invalid selection on square {square}: {fault}")]
    InvalidSelection { square: usize, fault: SelectionFault },

    /// The target is not in the legal-move set of the selected piece.
    #[error("illegal move from square {from} to square {to}")]
    IllegalMove { from: usize, to: usize },

    /// A promotion choice was rejected.
    #[error("invalid promotion: {fault}")]
    InvalidPromotion { fault: PromotionFault },

    /// A move was submitted while a promotion choice is outstanding.
    #[error("promotion from square {from} to square {to} is awaiting a piece choice")]
    PromotionPending { from: usize, to: usize },

    /// The game already ended.
    #[error("game is already over ({status:?})")]
    GameOver { status: GameStatus },

    /// A custom position violates a board invariant.
    #[error("invalid position: {reason}")]
    InvalidPosition { reason: String },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFault {
    #[error("square is off the board")]
    OffBoard,
    #[error("square is empty")]
    EmptySquare,
    #[error("piece belongs to {owner}, but {to_move} is to move")]
    OpponentPiece { owner: Color, to_move: Color },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionFault {
    #[error("no promotion is awaiting a choice")]
    NotAwaitingChoice,
    #[error("a pawn cannot promote to {0}")]
    UnpromotableKind(PieceKind),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
