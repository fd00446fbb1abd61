use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Piece, Rank, Square, Team},
    capture::CaptureResolver,
    state::{GameState, IntegrityError},
};

/// 输入层提交的一次走子尝试。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MoveAttempt {
    pub origin: Square,
    pub destination: Square,
}

impl MoveAttempt {
    pub fn new(origin: Square, destination: Square) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RejectionReason {
    GameFinished,
    NoPieceAtOrigin { square: Square },
    NotActiveTeam { square: Square },
    NotSelectedPiece { selected: Square },
    OutOfBounds { square: Square },
    DestinationOccupied { square: Square },
    WrongShape,
    WrongDirection,
    MustCapture,
    NotMidpointOpponent { square: Square },
    IntegrityViolation { error: IntegrityError },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ValidationResult {
    Accepted,
    Rejected { reason: RejectionReason },
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted)
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            ValidationResult::Accepted => None,
            ValidationResult::Rejected { reason } => Some(reason),
        }
    }
}

/// 合法走子的形状。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MoveKind {
    Step,
    Jump,
    Flight,
}

pub struct MoveValidator;

impl MoveValidator {
    /// 基于完整状态校验：走子方、连吃锁定以及棋盘规则。
    pub fn validate(state: &GameState, attempt: MoveAttempt) -> Result<MoveKind, RejectionReason> {
        if state.is_terminal() {
            return Err(RejectionReason::GameFinished);
        }
        state
            .integrity_check()
            .map_err(|error| RejectionReason::IntegrityViolation { error })?;

        let piece = Self::moving_piece(state, attempt.origin)?;

        let must_capture = match state.selected {
            Some(selected) if selected != attempt.origin => {
                return Err(RejectionReason::NotSelectedPiece { selected });
            }
            Some(selected) => CaptureResolver::can_capture_from(&state.board, selected),
            None => CaptureResolver::team_can_capture(&state.board, state.active_team),
        };

        Self::validate_on_board(&state.board, attempt, piece, must_capture)
    }

    /// 已知棋子等级与阵营时的棋盘规则。`must_capture` 为当前走子方的强制吃子标志。
    pub fn validate_on_board(
        board: &Board,
        attempt: MoveAttempt,
        piece: Piece,
        must_capture: bool,
    ) -> Result<MoveKind, RejectionReason> {
        let MoveAttempt {
            origin,
            destination,
        } = attempt;

        if !destination.is_on_board() {
            return Err(RejectionReason::OutOfBounds {
                square: destination,
            });
        }
        if board.occupant_at(destination).is_some() {
            return Err(RejectionReason::DestinationOccupied {
                square: destination,
            });
        }

        match piece.rank {
            Rank::Man => Self::validate_man(board, origin, destination, piece.team, must_capture),
            Rank::King => Self::validate_king(board, origin, destination, piece.team, must_capture),
        }
    }

    /// 非连吃状态下 `team` 的强制吃子标志。
    pub fn must_capture(board: &Board, team: Team) -> bool {
        CaptureResolver::team_can_capture(board, team)
    }

    fn moving_piece(state: &GameState, origin: Square) -> Result<Piece, RejectionReason> {
        let piece = state
            .board
            .occupant_at(origin)
            .ok_or(RejectionReason::NoPieceAtOrigin { square: origin })?;
        if piece.team != state.active_team {
            return Err(RejectionReason::NotActiveTeam { square: origin });
        }
        Ok(piece)
    }

    fn validate_man(
        board: &Board,
        origin: Square,
        destination: Square,
        team: Team,
        must_capture: bool,
    ) -> Result<MoveKind, RejectionReason> {
        match origin.distance(destination) {
            (1, 1) => {
                if destination.rank - origin.rank != team.forward() {
                    return Err(RejectionReason::WrongDirection);
                }
                if must_capture {
                    return Err(RejectionReason::MustCapture);
                }
                Ok(MoveKind::Step)
            }
            (2, 2) => {
                let middle = origin.midpoint(destination);
                if CaptureResolver::is_opponent(board, middle, team) {
                    Ok(MoveKind::Jump)
                } else {
                    Err(RejectionReason::NotMidpointOpponent { square: middle })
                }
            }
            _ => Err(RejectionReason::WrongShape),
        }
    }

    fn validate_king(
        board: &Board,
        origin: Square,
        destination: Square,
        team: Team,
        must_capture: bool,
    ) -> Result<MoveKind, RejectionReason> {
        let (dx, dy) = origin.distance(destination);
        if dx != dy || dx == 0 {
            return Err(RejectionReason::WrongShape);
        }

        if must_capture {
            // 必须真正吃掉一个兵，飞越对方王不算吃子。
            let sweeps_a_man = origin
                .diagonal_path(destination)
                .into_iter()
                .any(|square| CaptureResolver::is_opposing_man(board, square, team));
            if !CaptureResolver::can_capture_from(board, origin) || !sweeps_a_man {
                return Err(RejectionReason::MustCapture);
            }
        }

        if dx == 2 {
            let middle = origin.midpoint(destination);
            if !CaptureResolver::is_opponent(board, middle, team) {
                return Err(RejectionReason::NotMidpointOpponent { square: middle });
            }
            return Ok(MoveKind::Jump);
        }

        if dx == 1 {
            Ok(MoveKind::Step)
        } else {
            Ok(MoveKind::Flight)
        }
    }
}
