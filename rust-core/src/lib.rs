pub mod game;

use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub use game::{
    Board, CaptureOutcome, CaptureResolver, GameEvent, GameState, IntegrityError, MoveAttempt,
    MoveKind, MoveReport, MoveResolution, MoveValidator, Piece, Rank, RejectionReason, RuleConfig,
    RuleEngine, Square, StalemateRule, Team, ValidationResult, Victory, VictoryReason,
    DEFAULT_HISTORY_LIMIT,
};

#[cfg(all(feature = "wee_alloc", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    init_console_log();
}

fn to_js_error(error: RejectionReason) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn checked_state(state: GameState) -> Result<GameState, JsValue> {
    state
        .integrity_check()
        .map_err(|error| to_js_error(RejectionReason::IntegrityViolation { error }))?;
    Ok(state)
}

fn parse_state_json(json: &str) -> Result<GameState, JsValue> {
    let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
    checked_state(state)
}

fn parse_config(config: JsValue) -> Result<RuleConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(RuleConfig::default());
    }
    from_value(config).map_err(JsValue::from)
}

/// 供前端持有的有状态引擎句柄。
#[wasm_bindgen]
pub struct CheckersEngine {
    state: GameState,
    rules: RuleEngine,
}

#[wasm_bindgen]
impl CheckersEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(
        initial_state_json: Option<String>,
        config_json: Option<String>,
    ) -> Result<CheckersEngine, JsValue> {
        let config = match config_json {
            Some(json) => RuleConfig::from_json(&json).map_err(serde_to_js_error)?,
            None => RuleConfig::default(),
        };
        let state = match initial_state_json {
            Some(json) => parse_state_json(&json)?,
            None => GameState::new_game(),
        };
        Ok(CheckersEngine {
            state,
            rules: RuleEngine::with_config(config),
        })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.state = parse_state_json(json)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state = GameState::new_game();
    }

    pub fn attempt_move(
        &mut self,
        origin_file: i8,
        origin_rank: i8,
        destination_file: i8,
        destination_rank: i8,
    ) -> Result<String, JsValue> {
        let attempt = MoveAttempt::new(
            Square::new(origin_file, origin_rank),
            Square::new(destination_file, destination_rank),
        );
        let resolution = self.rules.attempt_move(&mut self.state, attempt);
        serde_json::to_string(&resolution).map_err(serde_to_js_error)
    }

    pub fn attempt_move_json(&mut self, attempt_json: &str) -> Result<String, JsValue> {
        let attempt: MoveAttempt = serde_json::from_str(attempt_json).map_err(serde_to_js_error)?;
        let resolution = self.rules.attempt_move(&mut self.state, attempt);
        serde_json::to_string(&resolution).map_err(serde_to_js_error)
    }

    pub fn current_selection_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.current_selection()).map_err(serde_to_js_error)
    }

    pub fn legal_moves_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&RuleEngine::legal_moves(&self.state)).map_err(serde_to_js_error)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn winner(&self) -> Option<String> {
        self.state.winner().map(|team| format!("{team:?}"))
    }
}

/// 标准开局，白方先行。
#[wasm_bindgen(js_name = "newGame")]
pub fn new_game() -> Result<JsValue, JsValue> {
    to_value(&GameState::new_game()).map_err(JsValue::from)
}

/// 对传入状态执行一次走子，返回 `{ state, resolution }`。
#[wasm_bindgen(js_name = "attemptMove")]
pub fn attempt_move(state: JsValue, attempt: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let mut state: GameState = from_value(state).map_err(JsValue::from)?;
    let attempt: MoveAttempt = from_value(attempt).map_err(JsValue::from)?;
    let rules = RuleEngine::with_config(parse_config(config)?);
    let resolution = rules.attempt_move(&mut state, attempt);
    to_value(&MoveReport::new(state, resolution)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "currentSelection")]
pub fn current_selection(state: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    to_value(&RuleEngine::current_selection(&state)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "legalMoves")]
pub fn legal_moves(state: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    to_value(&RuleEngine::legal_moves(&state)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue) -> Result<(), JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    checked_state(state)?;
    Ok(())
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}

// 实际输出级别由各引擎的 `log_level` 过滤。
#[cfg(target_arch = "wasm32")]
fn init_console_log() {
    let _ = console_log::init_with_level(log::Level::Debug);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_console_log() {}
