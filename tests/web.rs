//! Browser tests for the `ChessGame` surface.
//!
//! Run with: wasm-pack test --headless --chrome

#![cfg(target_arch = "wasm32")]

use chess_rules::ChessGame;
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn field(value: &JsValue, key: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(key)).expect("field must be readable")
}

fn ok<T>(result: Result<T, wasm_bindgen::JsError>, what: &str) -> T {
    result.unwrap_or_else(|_| panic!("{what} failed"))
}

// a8 = 0, so e2 = 52, e3 = 44, e4 = 36, e5 = 28.
const E2: u8 = 52;
const E4: u8 = 36;

#[wasm_bindgen_test]
fn wasm_reports_ready() {
    assert!(chess_rules::wasm_ready());
}

#[wasm_bindgen_test]
fn new_game_without_config_starts_with_white() {
    let game = ok(ChessGame::new(JsValue::UNDEFINED), "default config");

    let snapshot = ok(game.snapshot(), "snapshot");

    assert_eq!(field(&snapshot, "sideToMove").as_string().as_deref(), Some("white"));
    assert_eq!(field(&snapshot, "status").as_string().as_deref(), Some("continue"));
}

#[wasm_bindgen_test]
fn config_object_selects_first_side() {
    let config = Object::new();
    Reflect::set(&config, &"firstToMove".into(), &"black".into()).unwrap();

    let game = ok(ChessGame::new(config.into()), "config must parse");
    let snapshot = ok(game.snapshot(), "snapshot");

    assert_eq!(field(&snapshot, "sideToMove").as_string().as_deref(), Some("black"));
}

#[wasm_bindgen_test]
fn legal_targets_and_move_round_trip() {
    let mut game = ok(ChessGame::new(JsValue::NULL), "default config");

    let targets = ok(game.legal_targets(E2), "white pawn");
    assert_eq!(targets, vec![E4, 44]);

    let report = ok(game.request_move(E2, E4), "legal move");
    assert_eq!(field(&report, "status").as_string().as_deref(), Some("continue"));
    assert_eq!(field(&report, "inCheck").as_bool(), Some(false));
}

#[wasm_bindgen_test]
fn illegal_move_throws() {
    let mut game = ok(ChessGame::new(JsValue::UNDEFINED), "default config");

    assert!(game.request_move(E2, 28).is_err());
    assert!(game.legal_targets(E4).is_err());
}

#[wasm_bindgen_test]
fn promote_without_pending_choice_throws() {
    let mut game = ok(ChessGame::new(JsValue::UNDEFINED), "default config");

    assert!(game.promote(JsValue::from_str("queen")).is_err());
    assert!(game.promote(JsValue::from_str("dragon")).is_err());
}
