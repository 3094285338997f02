//! Entry point for host game loops that hand over a raw grid.

use crate::board::Board;
use crate::engine::choose_move;
use crate::error::EngineError;
use crate::types::Side;

/// Picks a move for `color` (1 = black, 2 = white) on a grid of rows.
///
/// Returns `(column, row)`, or `None` when `color` has to pass.
pub fn select_move<R: AsRef<[u8]>>(grid: &[R], color: u8) -> Result<Option<(usize, usize)>, EngineError> {
    let side = Side::from_u8(color).ok_or(EngineError::InvalidSide(color))?;
    let board = Board::from_rows(grid)?;
    Ok(choose_move(&board, side)?.map(|coord| coord.as_tuple()))
}
