//! Move legality, special moves and game-status classification.
//!
//! Legality is decided by playing the candidate on a copy of the state and
//! scanning every opponent reply: a move is legal when the mover's king is
//! not attacked afterwards and, for castling, the king neither starts on nor
//! crosses an attacked square.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::board::{BOARD_SIZE, GameState, NUM_SQUARES, offset, row_col, square, square_name};
use crate::error::{EngineError, PromotionFault, Result, SelectionFault};
use crate::movegen::{Scan, candidate_moves, scan_piece};
use crate::types::{Color, EnPassant, GameStatus, Piece, PieceKind, SpecialMove};

/// Candidate targets per opponent piece square.
pub type ReplyMap = BTreeMap<usize, Vec<usize>>;

/// A move that passed simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalMove {
    pub from: usize,
    pub to: usize,
    pub resulting_state: GameState,
    pub captured: Option<Piece>,
    pub special: Option<SpecialMove>,
    /// Pseudo-legal replies of the side to move in `resulting_state`.
    pub opponent_replies: ReplyMap,
}

/// A committed move and the classification of the position it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    pub new_state: GameState,
    pub from: usize,
    pub to: usize,
    pub captured: Option<Piece>,
    pub special: Option<SpecialMove>,
    /// Whether the side now to move is in check.
    pub in_check: bool,
    pub status: GameStatus,
}

/// A pawn move to the last rank that waits for its piece choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPromotion {
    pub from: usize,
    pub to: usize,
    pub color: Color,
    base: GameState,
}

impl PendingPromotion {
    /// State the promotion is played from.
    pub fn base(&self) -> &GameState {
        &self.base
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Committed(CommitResult),
    AwaitingChoice(PendingPromotion),
}

/// Standard starting position, White to move.
pub fn new_game() -> GameState {
    GameState::new(Color::White)
}

/// Plays `from -> to` on a copy of `state` and returns the move when it
/// does not leave the mover's king in check.
///
/// `promotion` picks the piece a pawn becomes on the last rank; without it
/// the pawn stays a pawn and the move is reported as a pending promotion.
pub fn simulate(
    state: &GameState,
    from: usize,
    to: usize,
    promotion: Option<PieceKind>,
) -> Option<LegalMove> {
    let mut next = state.clone();
    let mut piece = next.board.take(from)?;
    let mut captured = next.board.take(to);
    let mut special = None;
    let (from_row, from_col) = row_col(from);
    let (to_row, to_col) = row_col(to);

    match piece.kind {
        PieceKind::Pawn if from_col != to_col && captured.is_none() => {
            let victim = state
                .en_passant
                .filter(|marker| marker.capture_square == to)?
                .victim;
            captured = next.board.take(victim);
            special = Some(SpecialMove::EnPassant {
                captured_pawn: victim,
            });
        }
        PieceKind::Pawn if to_row == piece.color.promotion_row() => {
            special = Some(SpecialMove::Promotion { pawn: from });
            if let Some(kind) = promotion {
                piece.kind = kind;
            }
        }
        PieceKind::King if to_col + 2 == from_col => {
            let rook_from = square(from_row, 0);
            castle_rook(&mut next, rook_from, to + 1)?;
            special = Some(SpecialMove::QueensideCastling { rook_from });
        }
        PieceKind::King if from_col + 2 == to_col => {
            let rook_from = square(from_row, BOARD_SIZE - 1);
            castle_rook(&mut next, rook_from, to - 1)?;
            special = Some(SpecialMove::KingsideCastling { rook_from });
        }
        _ => {}
    }

    next.board.set(to, Some(piece));
    next.en_passant = double_step_marker(from, to, piece);
    next.side_to_move = piece.color.opponent();

    let mut threats = Scan::default();
    let mut opponent_replies = ReplyMap::new();
    for idx in next.board.pieces_of(next.side_to_move) {
        if let Some(scan) = candidate_moves(&next, idx) {
            threats.absorb(&scan);
            opponent_replies.insert(idx, scan.targets);
        }
    }

    if threats.targets_king {
        debug!(
            "{} {}->{} rejected: leaves own king in check",
            piece.kind,
            square_name(from),
            square_name(to)
        );
        return None;
    }
    if special.is_some_and(|s| s.castling_side().is_some())
        && threats.attacks_castling_path(from, to)
    {
        debug!(
            "castling {}->{} rejected: king path is attacked",
            square_name(from),
            square_name(to)
        );
        return None;
    }

    piece.has_moved = true;
    next.board.set(to, Some(piece));

    Some(LegalMove {
        from,
        to,
        resulting_state: next,
        captured,
        special,
        opponent_replies,
    })
}

fn castle_rook(state: &mut GameState, rook_from: usize, rook_to: usize) -> Option<()> {
    let mut rook = state.board.take(rook_from)?;
    rook.has_moved = true;
    state.board.set(rook_to, Some(rook));
    Some(())
}

/// Only a pawn double-step opens an en-passant window; every other move
/// closes it.
fn double_step_marker(from: usize, to: usize, piece: Piece) -> Option<EnPassant> {
    if piece.kind != PieceKind::Pawn {
        return None;
    }
    let (from_row, from_col) = row_col(from);
    let (to_row, to_col) = row_col(to);
    let dir = piece.color.forward();
    if from_col != to_col || to_row as i32 - from_row as i32 != dir * 2 {
        return None;
    }
    Some(EnPassant {
        capture_square: offset(from, dir, 0)?,
        victim: to,
    })
}

/// Legal moves of the piece on `from`, keyed by target square.
pub fn legal_moves_for(state: &GameState, from: usize) -> Result<BTreeMap<usize, LegalMove>> {
    let piece = selectable(state, from)?;
    let scan = scan_piece(state, from, piece);
    Ok(scan
        .targets
        .into_iter()
        .filter_map(|to| simulate(state, from, to, None).map(|mv| (to, mv)))
        .collect())
}

fn selectable(state: &GameState, from: usize) -> Result<Piece> {
    let fault = if from >= NUM_SQUARES {
        SelectionFault::OffBoard
    } else {
        match state.board.get(from) {
            None => SelectionFault::EmptySquare,
            Some(piece) if piece.color != state.side_to_move => SelectionFault::OpponentPiece {
                owner: piece.color,
                to_move: state.side_to_move,
            },
            Some(piece) => return Ok(piece),
        }
    };
    Err(EngineError::InvalidSelection { square: from, fault })
}

/// Validates and plays `from -> to`.
///
/// A pawn reaching the last rank is not committed: the returned
/// [`PendingPromotion`] must be passed to [`resolve_promotion`].
pub fn commit_move(state: &GameState, from: usize, to: usize) -> Result<MoveOutcome> {
    let piece = selectable(state, from)?;
    let scan = scan_piece(state, from, piece);
    let Some(mv) = scan
        .targets
        .contains(&to)
        .then(|| simulate(state, from, to, None))
        .flatten()
    else {
        warn!(
            "illegal move {} {}->{}",
            piece.kind,
            square_name(from),
            square_name(to)
        );
        return Err(EngineError::IllegalMove { from, to });
    };

    if let Some(SpecialMove::Promotion { .. }) = mv.special {
        info!(
            "{} pawn reached {}, awaiting promotion choice",
            piece.color,
            square_name(to)
        );
        return Ok(MoveOutcome::AwaitingChoice(PendingPromotion {
            from,
            to,
            color: piece.color,
            base: state.clone(),
        }));
    }

    Ok(MoveOutcome::Committed(finalize(mv)))
}

/// Finishes a pending promotion with the chosen piece kind.
pub fn resolve_promotion(pending: &PendingPromotion, kind: PieceKind) -> Result<CommitResult> {
    if !kind.is_promotable() {
        return Err(EngineError::InvalidPromotion {
            fault: PromotionFault::UnpromotableKind(kind),
        });
    }
    let mv = simulate(&pending.base, pending.from, pending.to, Some(kind)).ok_or(
        EngineError::IllegalMove {
            from: pending.from,
            to: pending.to,
        },
    )?;
    info!("promoted on {} to {kind}", square_name(pending.to));
    Ok(finalize(mv))
}

fn finalize(mv: LegalMove) -> CommitResult {
    let (in_check, status) = classify(&mv.resulting_state, &mv.opponent_replies);
    let mover = mv.resulting_state.side_to_move.opponent();
    info!(
        "{mover} played {}->{}{}",
        square_name(mv.from),
        square_name(mv.to),
        mv.captured
            .map(|piece| format!(", captured {} {}", piece.color, piece.kind))
            .unwrap_or_default()
    );
    match status {
        GameStatus::Checkmate => info!("checkmate, {mover} wins"),
        GameStatus::Stalemate => info!("stalemate"),
        GameStatus::Check => info!("check"),
        GameStatus::Continue => {}
    }

    CommitResult {
        new_state: mv.resulting_state,
        from: mv.from,
        to: mv.to,
        captured: mv.captured,
        special: mv.special,
        in_check,
        status,
    }
}

/// Whether the king of `color` is attacked in `state`.
pub fn is_in_check(state: &GameState, color: Color) -> bool {
    state
        .board
        .pieces_of(color.opponent())
        .into_iter()
        .filter_map(|idx| candidate_moves(state, idx))
        .any(|scan| scan.targets_king)
}

/// Classifies `state` for the side to move, re-simulating the cached
/// `replies` until one legal escape is found.
pub fn classify(state: &GameState, replies: &ReplyMap) -> (bool, GameStatus) {
    let in_check = is_in_check(state, state.side_to_move);
    let has_reply = replies.iter().any(|(&from, targets)| {
        targets
            .iter()
            .any(|&to| simulate(state, from, to, None).is_some())
    });

    let status = match (in_check, has_reply) {
        (true, false) => GameStatus::Checkmate,
        (false, false) => GameStatus::Stalemate,
        (true, true) => GameStatus::Check,
        (false, true) => GameStatus::Continue,
    };
    (in_check, status)
}

/// Classifies `state` without a cached reply map.
pub fn game_status(state: &GameState) -> (bool, GameStatus) {
    let replies: ReplyMap = state
        .board
        .pieces_of(state.side_to_move)
        .into_iter()
        .filter_map(|idx| candidate_moves(state, idx).map(|scan| (idx, scan.targets)))
        .collect();
    classify(state, &replies)
}
