use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod movegen;
pub mod rules;
pub mod types;

use crate::config::GameConfig;
use crate::game::GameInstance;
use crate::types::PieceKind;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Chess session exposed to the page.
#[wasm_bindgen]
pub struct ChessGame {
    inner: GameInstance,
}

#[wasm_bindgen]
impl ChessGame {
    /// `config` may be omitted; see [`GameConfig`] for the accepted fields.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ChessGame, JsError> {
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        init_logging(config.log_level);

        Ok(Self {
            inner: GameInstance::new(config),
        })
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(js_name = legalTargets)]
    pub fn legal_targets(&self, square: u8) -> Result<Vec<u8>, JsError> {
        let targets = self.inner.legal_targets(square as usize)?;
        Ok(targets.into_iter().map(|idx| idx as u8).collect())
    }

    #[wasm_bindgen(js_name = requestMove)]
    pub fn request_move(&mut self, from: u8, to: u8) -> Result<JsValue, JsError> {
        let report = self.inner.request_move(from as usize, to as usize)?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    /// `kind` is one of `"rook"`, `"knight"`, `"bishop"`, `"queen"`.
    pub fn promote(&mut self, kind: JsValue) -> Result<JsValue, JsError> {
        let kind: PieceKind = serde_wasm_bindgen::from_value(kind)?;
        let report = self.inner.promote(kind)?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.to_snapshot())?)
    }
}

#[cfg(target_arch = "wasm32")]
fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    // A second session on the same page keeps the first logger.
    let _ = console_log::init_with_level(level);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(_level: log::Level) {}
