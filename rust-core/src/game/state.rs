use serde::{Deserialize, Serialize};

use super::board::{Board, Piece, Rank, Square, Team};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum VictoryReason {
    /// 失败方已无棋子。
    OpponentEliminated { loser: Team },
    /// 失败方仍有棋子但无合法着法。
    OpponentBlocked { loser: Team },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Victory {
    pub winner: Team,
    pub reason: VictoryReason,
}

/// 供表现层与音效层消费的事件流。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    PieceMoved {
        team: Team,
        origin: Square,
        destination: Square,
    },
    PieceCaptured {
        square: Square,
        piece: Piece,
    },
    PiecePromoted {
        square: Square,
        team: Team,
    },
    CaptureChainContinues {
        team: Team,
        square: Square,
    },
    TurnEnded {
        team: Team,
        next: Team,
    },
    GameWon {
        winner: Team,
        reason: VictoryReason,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    SquareOffBoard { square: Square },
    SquareEmpty { square: Square },
    SquareOccupied { square: Square },
    SelectionNotActiveTeam { square: Square },
    UnpromotedMan { square: Square },
    PieceOnLightSquare { square: Square },
}

/// 游戏整体状态，只通过规则引擎修改。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub active_team: Team,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<Square>,
    #[serde(default = "first_turn")]
    pub turn: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_log: Vec<GameEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Victory>,
}

fn first_turn() -> u32 {
    1
}

impl GameState {
    pub fn new(board: Board, active_team: Team) -> Self {
        Self {
            board,
            active_team,
            selected: None,
            turn: first_turn(),
            event_log: Vec::new(),
            outcome: None,
        }
    }

    /// 标准开局，白方先行。
    pub fn new_game() -> Self {
        Self::new(Board::standard(), Team::White)
    }

    pub fn with_selection(mut self, selected: Square) -> Self {
        self.selected = Some(selected);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<Team> {
        self.outcome.map(|victory| victory.winner)
    }

    /// 连吃进行中的棋子所在格。
    pub fn current_selection(&self) -> Option<Square> {
        self.selected
    }

    /// 追加事件，日志超过 `limit` 条时丢弃最早的部分。
    pub fn record_event(&mut self, event: GameEvent, limit: usize) {
        self.event_log.push(event);
        if self.event_log.len() > limit {
            let overflow = self.event_log.len() - limit;
            self.event_log.drain(..overflow);
        }
    }

    pub fn end_turn(&mut self) {
        self.selected = None;
        self.active_team = self.active_team.opponent();
        self.turn += 1;
    }

    pub fn declare_victory(&mut self, winner: Team, reason: VictoryReason) -> Victory {
        let victory = Victory { winner, reason };
        if self.outcome.is_none() {
            self.outcome = Some(victory);
        }
        victory
    }

    /// 只剩一方有棋子时判定胜负。
    pub fn evaluate_elimination(&self) -> Option<Victory> {
        let white = self.board.count_by_team(Team::White);
        let black = self.board.count_by_team(Team::Black);
        match (white, black) {
            (0, 0) => None,
            (_, 0) => Some(Victory {
                winner: Team::White,
                reason: VictoryReason::OpponentEliminated { loser: Team::Black },
            }),
            (0, _) => Some(Victory {
                winner: Team::Black,
                reason: VictoryReason::OpponentEliminated { loser: Team::White },
            }),
            _ => None,
        }
    }

    /// 拒绝不可能由标准开局走出的状态。
    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        for (square, piece) in self.board.pieces() {
            if !square.is_dark() {
                return Err(IntegrityError::PieceOnLightSquare { square });
            }
            if piece.rank == Rank::Man && square.rank == piece.team.promotion_rank() {
                return Err(IntegrityError::UnpromotedMan { square });
            }
        }

        if let Some(square) = self.selected {
            match self.board.occupant_at(square) {
                None => return Err(IntegrityError::SquareEmpty { square }),
                Some(piece) if piece.team != self.active_team => {
                    return Err(IntegrityError::SelectionNotActiveTeam { square })
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}
