use log::{debug, info, warn, Level};
use serde::{Deserialize, Serialize};

use super::{
    board::{Square, Team},
    capture::{CaptureOutcome, CaptureResolver},
    config::{RuleConfig, StalemateRule},
    state::{GameEvent, GameState, Victory, VictoryReason},
    validate::{MoveAttempt, MoveValidator, RejectionReason, ValidationResult},
};

/// 表现层播放一次走子所需的全部结果。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveResolution {
    pub validation: ValidationResult,
    #[serde(default)]
    pub captured: CaptureOutcome,
    #[serde(default)]
    pub promoted: bool,
    #[serde(default)]
    pub turn_ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Square>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<GameEvent>,
}

impl MoveResolution {
    fn rejected(reason: RejectionReason, state: &GameState) -> Self {
        Self {
            validation: ValidationResult::Rejected { reason },
            captured: CaptureOutcome::default(),
            promoted: false,
            turn_ended: false,
            winner: state.winner(),
            selection: state.selected,
            events: Vec::new(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.validation.is_accepted()
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        self.validation.rejection()
    }
}

/// 状态快照与产生它的结算结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveReport {
    pub state: GameState,
    pub resolution: MoveResolution,
}

impl MoveReport {
    pub fn new(state: GameState, resolution: MoveResolution) -> Self {
        Self { state, resolution }
    }
}

/// 回合控制器，持有规则配置，游戏状态由调用方传入。
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    pub fn with_config(config: RuleConfig) -> Self {
        Self { config }
    }

    fn logs(&self, level: Level) -> bool {
        level <= self.config.log_level
    }

    /// 校验并执行一次走子。被拒绝的尝试不会修改 `state`。
    pub fn attempt_move(&self, state: &mut GameState, attempt: MoveAttempt) -> MoveResolution {
        match self.apply_move(state, attempt) {
            Ok(resolution) => resolution,
            Err(reason) => {
                if let RejectionReason::IntegrityViolation { error } = &reason {
                    if self.logs(Level::Warn) {
                        warn!("rejecting move on corrupt state: {error:?}");
                    }
                } else if self.logs(Level::Debug) {
                    debug!(
                        "rejected {:?} -> {:?}: {reason:?}",
                        attempt.origin, attempt.destination
                    );
                }
                MoveResolution::rejected(reason, state)
            }
        }
    }

    fn apply_move(
        &self,
        state: &mut GameState,
        attempt: MoveAttempt,
    ) -> Result<MoveResolution, RejectionReason> {
        MoveValidator::validate(state, attempt)?;

        let MoveAttempt {
            origin,
            destination,
        } = attempt;

        // 在副本上结算，走子、吃子与升变一起提交。
        let mut board = state.board.clone();
        let piece = board
            .move_occupant(origin, destination)
            .map_err(|error| RejectionReason::IntegrityViolation { error })?;
        let captured = CaptureResolver::resolve(&mut board, piece.rank, origin, destination);
        let promoted = !piece.is_king()
            && destination.rank == piece.team.promotion_rank()
            && board.promote(destination);
        state.board = board;

        let team = piece.team;
        let mut events = vec![GameEvent::PieceMoved {
            team,
            origin,
            destination,
        }];
        events.extend(
            captured
                .squares
                .iter()
                .zip(captured.pieces.iter())
                .map(|(&square, &piece)| GameEvent::PieceCaptured { square, piece }),
        );
        if promoted {
            events.push(GameEvent::PiecePromoted {
                square: destination,
                team,
            });
        }

        let continues = !captured.is_empty()
            && CaptureResolver::can_capture_from(&state.board, destination);
        let mut winner = None;
        if continues {
            state.selected = Some(destination);
            events.push(GameEvent::CaptureChainContinues {
                team,
                square: destination,
            });
        } else {
            state.end_turn();
            events.push(GameEvent::TurnEnded {
                team,
                next: state.active_team,
            });
            if let Some(victory) = self.evaluate_game_over(state) {
                state.declare_victory(victory.winner, victory.reason);
                events.push(GameEvent::GameWon {
                    winner: victory.winner,
                    reason: victory.reason,
                });
                winner = Some(victory.winner);
            }
        }

        if self.logs(Level::Info) {
            info!(
                "{team:?} {origin:?} -> {destination:?}, captured {}, promoted {promoted}",
                captured.len()
            );
            if let Some(winner) = winner {
                info!("game over, {winner:?} wins");
            }
        }

        if self.config.record_history {
            for event in &events {
                state.record_event(event.clone(), self.config.history_limit);
            }
        }

        Ok(MoveResolution {
            validation: ValidationResult::Accepted,
            captured,
            promoted,
            turn_ended: !continues,
            winner,
            selection: state.selected,
            events,
        })
    }

    fn evaluate_game_over(&self, state: &GameState) -> Option<Victory> {
        if let Some(victory) = state.evaluate_elimination() {
            return Some(victory);
        }
        match self.config.stalemate {
            StalemateRule::Ignore => None,
            StalemateRule::Loss => {
                if Self::has_legal_move(state) {
                    None
                } else {
                    let loser = state.active_team;
                    Some(Victory {
                        winner: loser.opponent(),
                        reason: VictoryReason::OpponentBlocked { loser },
                    })
                }
            }
        }
    }

    /// `attempt_move` 在 `state` 下会接受的全部走子。
    pub fn legal_moves(state: &GameState) -> Vec<MoveAttempt> {
        if state.is_terminal() || state.integrity_check().is_err() {
            return Vec::new();
        }

        let (origins, must_capture): (Vec<Square>, bool) = match state.selected {
            Some(selected) => (
                vec![selected],
                CaptureResolver::can_capture_from(&state.board, selected),
            ),
            None => (
                state
                    .board
                    .team_pieces(state.active_team)
                    .map(|(square, _)| square)
                    .collect(),
                MoveValidator::must_capture(&state.board, state.active_team),
            ),
        };

        let mut moves = Vec::new();
        for origin in origins {
            let Some(piece) = state.board.occupant_at(origin) else {
                continue;
            };
            for destination in Square::all().filter(Square::is_dark) {
                let attempt = MoveAttempt::new(origin, destination);
                if MoveValidator::validate_on_board(&state.board, attempt, piece, must_capture)
                    .is_ok()
                {
                    moves.push(attempt);
                }
            }
        }
        moves
    }

    pub fn has_legal_move(state: &GameState) -> bool {
        !Self::legal_moves(state).is_empty()
    }

    pub fn current_selection(state: &GameState) -> Option<Square> {
        state.current_selection()
    }
}
