use log::{info, warn};

use crate::board::GameState;
use crate::config::GameConfig;
use crate::error::{EngineError, PromotionFault, Result};
use crate::rules::{self, CommitResult, MoveOutcome, PendingPromotion};
use crate::types::{
    GameSnapshot, GameStatus, MoveReport, PendingChoice, Piece, PieceKind, SpecialMove,
};

/// Where the session is in the move cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A pawn reached the last rank; only `promote` is accepted.
    AwaitingChoice(PendingPromotion),
    /// Checkmate or stalemate; no move is accepted until reset.
    Finished,
}

/// Caller-owned game session around the single live [`GameState`].
pub struct GameInstance {
    state: GameState,
    config: GameConfig,
    phase: Phase,
    pub status: GameStatus,
    pub in_check: bool,
    pub last_move: Option<(usize, usize)>,
    pub captured: Vec<Piece>,
}

impl GameInstance {
    pub fn new(config: GameConfig) -> Self {
        let mut game = Self {
            state: GameState::new(config.first_to_move),
            config,
            phase: Phase::Idle,
            status: GameStatus::Continue,
            in_check: false,
            last_move: None,
            captured: Vec::new(),
        };
        game.refresh_status();
        game
    }

    /// Discards the current game and starts from the standard position.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
        info!("new game, {} to move", self.state.side_to_move);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Legal targets of the piece on `square`, for highlighting.
    pub fn legal_targets(&self, square: usize) -> Result<Vec<usize>> {
        self.ensure_accepting_moves()?;
        Ok(rules::legal_moves_for(&self.state, square)?
            .into_keys()
            .collect())
    }

    pub fn request_move(&mut self, from: usize, to: usize) -> Result<MoveReport> {
        self.ensure_accepting_moves()?;

        match rules::commit_move(&self.state, from, to)? {
            MoveOutcome::Committed(result) => Ok(self.apply(result)),
            MoveOutcome::AwaitingChoice(pending) => {
                let report = MoveReport {
                    from,
                    to,
                    captured: self.state.board.get(to),
                    special: Some(SpecialMove::Promotion { pawn: from }),
                    in_check: self.in_check,
                    status: self.status,
                    awaiting_promotion: Some(pending_choice(&pending)),
                };
                self.phase = Phase::AwaitingChoice(pending);
                Ok(report)
            }
        }
    }

    pub fn promote(&mut self, kind: PieceKind) -> Result<MoveReport> {
        let Phase::AwaitingChoice(pending) = &self.phase else {
            return Err(EngineError::InvalidPromotion {
                fault: PromotionFault::NotAwaitingChoice,
            });
        };

        let result = rules::resolve_promotion(pending, kind)?;
        Ok(self.apply(result))
    }

    pub fn to_snapshot(&self) -> GameSnapshot {
        let awaiting_promotion = match &self.phase {
            Phase::AwaitingChoice(pending) => Some(pending_choice(pending)),
            _ => None,
        };
        GameSnapshot {
            board: self.state.board.to_vec(),
            side_to_move: self.state.side_to_move,
            status: self.status,
            in_check: self.in_check,
            awaiting_promotion,
            last_move: self.last_move,
            captured: self.captured.clone(),
            winner: (self.status == GameStatus::Checkmate)
                .then(|| self.state.side_to_move.opponent()),
        }
    }

    fn ensure_accepting_moves(&self) -> Result<()> {
        match &self.phase {
            Phase::Idle => Ok(()),
            Phase::AwaitingChoice(pending) => {
                warn!("move rejected while promotion is pending");
                Err(EngineError::PromotionPending {
                    from: pending.from,
                    to: pending.to,
                })
            }
            Phase::Finished => Err(EngineError::GameOver {
                status: self.status,
            }),
        }
    }

    /// Swaps in the validated state; nothing is mutated before this point.
    fn apply(&mut self, result: CommitResult) -> MoveReport {
        self.state = result.new_state;
        self.status = result.status;
        self.in_check = result.in_check;
        self.last_move = Some((result.from, result.to));
        if let Some(piece) = result.captured {
            self.captured.push(piece);
        }
        self.phase = if result.status.is_over() {
            Phase::Finished
        } else {
            Phase::Idle
        };

        MoveReport {
            from: result.from,
            to: result.to,
            captured: result.captured,
            special: result.special,
            in_check: result.in_check,
            status: result.status,
            awaiting_promotion: None,
        }
    }

    fn refresh_status(&mut self) {
        let (in_check, status) = rules::game_status(&self.state);
        self.in_check = in_check;
        self.status = status;
        self.phase = if status.is_over() {
            Phase::Finished
        } else {
            Phase::Idle
        };
    }

    #[cfg(test)]
    fn set_state_for_test(&mut self, state: GameState) {
        self.state = state;
        self.last_move = None;
        self.captured.clear();
        self.refresh_status();
    }
}

impl Default for GameInstance {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

fn pending_choice(pending: &PendingPromotion) -> PendingChoice {
    PendingChoice {
        from: pending.from,
        to: pending.to,
        color: pending.color,
    }
}
