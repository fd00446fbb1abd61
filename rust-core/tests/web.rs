#![cfg(target_arch = "wasm32")]

use checkers_engine::{CheckersEngine, GameState, MoveResolution, Square};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn engine_starts_from_the_standard_layout() {
    let engine = CheckersEngine::new(None, None).expect("engine should build");
    let state: GameState =
        serde_json::from_str(&engine.state_json().expect("state should serialize"))
            .expect("state json should parse");
    assert_eq!(state, GameState::new_game());
    assert_eq!(engine.current_selection_json().expect("selection"), "null");
    assert!(!engine.is_terminal());
}

#[wasm_bindgen_test]
fn attempt_move_reports_acceptance_and_rejection() {
    let mut engine = CheckersEngine::new(None, Some(r#"{"log_level":"off"}"#.into()))
        .expect("engine should build");

    let accepted: MoveResolution =
        serde_json::from_str(&engine.attempt_move(2, 2, 3, 3).expect("move should run"))
            .expect("resolution should parse");
    assert!(accepted.is_accepted());
    assert!(accepted.turn_ended);

    let rejected: MoveResolution = serde_json::from_str(
        &engine
            .attempt_move_json(r#"{"origin":{"file":5,"rank":5},"destination":{"file":5,"rank":4}}"#)
            .expect("move should run"),
    )
    .expect("resolution should parse");
    assert!(!rejected.is_accepted());
}

#[wasm_bindgen_test]
fn corrupt_states_are_refused() {
    let mut state = GameState::new_game();
    state.selected = Some(Square::new(1, 3));
    let json = serde_json::to_string(&state).expect("state should serialize");
    assert!(CheckersEngine::new(Some(json.clone()), None).is_err());

    let mut engine = CheckersEngine::new(None, None).expect("engine should build");
    assert!(engine.set_state_json(&json).is_err());
}

#[wasm_bindgen_test]
fn free_functions_share_the_rule_engine() {
    let state = checkers_engine::new_game().expect("new game");
    let moves = checkers_engine::legal_moves(state.clone()).expect("legal moves");
    let moves: Vec<checkers_engine::MoveAttempt> =
        serde_wasm_bindgen::from_value(moves).expect("moves should decode");
    assert_eq!(moves.len(), 7);

    let attempt = serde_wasm_bindgen::to_value(&moves[0]).expect("attempt should encode");
    let report = checkers_engine::attempt_move(state, attempt, JsValue::UNDEFINED)
        .expect("attempt should run");
    let report: checkers_engine::MoveReport =
        serde_wasm_bindgen::from_value(report).expect("report should decode");
    assert!(report.resolution.is_accepted());
    assert!(checkers_engine::validate_state(
        serde_wasm_bindgen::to_value(&report.state).expect("state should encode")
    )
    .is_ok());
}
