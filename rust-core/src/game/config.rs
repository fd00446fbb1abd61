use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// 事件日志默认保留的条数。
pub const DEFAULT_HISTORY_LIMIT: usize = 512;

/// 走子方尚有棋子但无合法着法时的处理方式。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StalemateRule {
    /// 不判定，局面保持等待。
    #[serde(alias = "none", alias = "off")]
    Ignore,
    /// 被困的一方判负。
    #[serde(alias = "lose", alias = "blocked")]
    Loss,
}

impl Default for StalemateRule {
    fn default() -> Self {
        StalemateRule::Ignore
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuleConfig {
    pub stalemate: StalemateRule,
    pub record_history: bool,
    /// 超出后丢弃最早的事件。
    pub history_limit: usize,
    pub log_level: LevelFilter,
}

impl RuleConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_stalemate(mut self, stalemate: StalemateRule) -> Self {
        self.stalemate = stalemate;
        self
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    pub fn without_history(mut self) -> Self {
        self.record_history = false;
        self
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            stalemate: StalemateRule::default(),
            record_history: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_level: LevelFilter::Warn,
        }
    }
}
