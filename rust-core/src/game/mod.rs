//! 跳棋规则核心模块（棋盘、吃子结算、走子校验与回合状态机）。

pub mod board;
pub mod capture;
pub mod config;
pub mod rules;
pub mod state;
pub mod validate;

pub use board::{Board, Piece, Rank, Square, Team, BOARD_SIZE, PIECES_PER_TEAM};
pub use capture::{CaptureOutcome, CaptureResolver};
pub use config::{RuleConfig, StalemateRule, DEFAULT_HISTORY_LIMIT};
pub use rules::{MoveReport, MoveResolution, RuleEngine};
pub use state::{GameEvent, GameState, IntegrityError, Victory, VictoryReason};
pub use validate::{MoveAttempt, MoveKind, MoveValidator, RejectionReason, ValidationResult};
