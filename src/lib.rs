use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod host;
pub mod types;

pub use ai::search::SearchOutcome;
pub use board::Board;
pub use config::EngineConfig;
pub use engine::{Engine, choose_move};
pub use error::EngineError;
pub use ai::weights::WeightTable;
pub use types::{Coordinate, Side};

#[wasm_bindgen(js_name = wasmReady)]
pub fn wasm_ready() -> bool {
    true
}

/// Chooses a move for `side` (1 = black, 2 = white) on a flat row-major
/// board. Resolves to `{ col, row }` or `null` when `side` must pass.
#[wasm_bindgen(js_name = chooseMove)]
pub fn wasm_choose_move(cells: Vec<u8>, size: usize, side: u8) -> Result<JsValue, JsError> {
    let (board, side) = parse_request(&cells, size, side)?;
    let best = choose_move(&board, side)?;
    to_js(&best)
}

/// Like `chooseMove` with a partial `EngineConfig` object, returning the
/// full search outcome.
#[wasm_bindgen(js_name = analyze)]
pub fn wasm_analyze(cells: Vec<u8>, size: usize, side: u8, config: JsValue) -> Result<JsValue, JsError> {
    let (board, side) = parse_request(&cells, size, side)?;
    let outcome = Engine::new(parse_config(config)?)?.analyze(&board, side)?;
    to_js(&outcome)
}

/// Like `analyze`, with the positional table for the board's size taken
/// from an `OTWT` weight blob.
#[wasm_bindgen(js_name = analyzeWithWeights)]
pub fn wasm_analyze_with_weights(
    cells: Vec<u8>,
    size: usize,
    side: u8,
    config: JsValue,
    weights: Vec<u8>,
) -> Result<JsValue, JsError> {
    let (board, side) = parse_request(&cells, size, side)?;
    let config = parse_config(config)?.with_weight_blob(&weights)?;
    let outcome = Engine::new(config)?.analyze(&board, side)?;
    to_js(&outcome)
}

/// Built-in table for `size` as an `OTWT` blob, a starting point for
/// hosts that tune their own weights.
#[wasm_bindgen(js_name = defaultWeights)]
pub fn wasm_default_weights(size: usize) -> Result<Vec<u8>, JsError> {
    let table = WeightTable::default_for(size).ok_or(EngineError::UnsupportedBoardSize(size))?;
    Ok(table.to_bytes())
}

fn parse_config(config: JsValue) -> Result<EngineConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(EngineConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(|err| JsError::new(&err.to_string()))
}

fn parse_request(cells: &[u8], size: usize, side: u8) -> Result<(Board, Side), EngineError> {
    let side = Side::from_u8(side).ok_or(EngineError::InvalidSide(side))?;
    Ok((Board::from_cells(size, cells)?, side))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()))
}
