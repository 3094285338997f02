use log::debug;
use serde::Serialize;

use crate::board::Board;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::types::{Coordinate, Side};

pub trait MoveSelector: Send + Sync {
    /// Returns `None` only when `side` has no legal move.
    fn select_move(&self, board: &Board, side: Side) -> Result<Option<Coordinate>, EngineError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(&self, board: &Board, side: Side) -> Result<Option<Coordinate>, EngineError> {
        Ok(board.legal_coordinates(side).first().copied())
    }
}

impl MoveSelector for Engine {
    fn select_move(&self, board: &Board, side: Side) -> Result<Option<Coordinate>, EngineError> {
        self.choose_move(board, side)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Turn {
    Move {
        side: Side,
        coord: Coordinate,
        flipped: u32,
    },
    Pass {
        side: Side,
    },
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// `None` on a draw.
    pub winner: Option<Side>,
    pub black_count: u8,
    pub white_count: u8,
}

impl GameResult {
    fn from_board(board: &Board) -> Self {
        let (black_count, white_count) = board.count();
        Self {
            winner: if black_count > white_count {
                Some(Side::Black)
            } else if white_count > black_count {
                Some(Side::White)
            } else {
                None
            },
            black_count,
            white_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub start: Board,
    pub turns: Vec<Turn>,
    pub final_board: Board,
    pub result: GameResult,
}

impl GameRecord {
    pub fn moves(&self) -> impl Iterator<Item = (Side, Coordinate)> + '_ {
        self.turns.iter().filter_map(|turn| match *turn {
            Turn::Move { side, coord, .. } => Some((side, coord)),
            Turn::Pass { .. } => None,
        })
    }
}

/// Plays from `start` until neither side can move.
///
/// A side without legal moves passes. A selector that returns an illegal
/// move, or no move while it has one, aborts the game with an error.
pub fn play_game(
    start: Board,
    first_to_move: Side,
    black: &dyn MoveSelector,
    white: &dyn MoveSelector,
) -> Result<GameRecord, EngineError> {
    let mut board = start;
    let mut side = first_to_move;
    let mut turns = Vec::new();

    while !board.is_terminal() {
        if board.legal_moves(side) == 0 {
            debug!("{side} passes");
            turns.push(Turn::Pass { side });
            side = side.opponent();
            continue;
        }

        let selector = match side {
            Side::Black => black,
            Side::White => white,
        };
        let coord = selector
            .select_move(&board, side)?
            .ok_or(EngineError::NoMoveSelected(side))?;
        let log = board.place(coord, side)?;

        turns.push(Turn::Move {
            side,
            coord,
            flipped: log.flipped_count(),
        });
        side = side.opponent();
    }

    let result = GameResult::from_board(&board);
    debug!(
        "game over after {} turns: black {} white {}",
        turns.len(),
        result.black_count,
        result.white_count
    );

    Ok(GameRecord {
        start,
        turns,
        final_board: board,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedMoveSelector {
        mv: Coordinate,
    }

    impl MoveSelector for FixedMoveSelector {
        fn select_move(&self, _board: &Board, _side: Side) -> Result<Option<Coordinate>, EngineError> {
            Ok(Some(self.mv))
        }
    }

    struct PassingSelector;

    impl MoveSelector for PassingSelector {
        fn select_move(&self, _board: &Board, _side: Side) -> Result<Option<Coordinate>, EngineError> {
            Ok(None)
        }
    }

    #[test]
    fn first_legal_self_play_reaches_game_over() {
        let start = Board::new(6).unwrap();

        let record = play_game(start, Side::Black, &FirstLegalMoveSelector, &FirstLegalMoveSelector).unwrap();

        assert!(record.final_board.is_terminal());
        let (black, white) = record.final_board.count();
        assert_eq!(record.result.black_count, black);
        assert_eq!(record.result.white_count, white);
        assert_eq!(
            u32::from(black) + u32::from(white),
            4 + record.moves().count() as u32
        );
    }

    #[test]
    fn replaying_moves_reproduces_final_board() {
        let start = Board::new(8).unwrap();
        let engine = Engine::default();

        let record = play_game(start, Side::Black, &engine, &FirstLegalMoveSelector).unwrap();

        let mut board = record.start;
        for (side, coord) in record.moves() {
            board = board.apply_move(coord, side).unwrap();
        }
        assert_eq!(board, record.final_board);
    }

    #[test]
    fn side_without_moves_passes() {
        // Black's lone stone captures nothing; white takes it and fills the board.
        let black = 1u64 << 1;
        let white = u64::MAX ^ 1 ^ black;
        let start = Board::from_bitboards(8, black, white).unwrap();

        let record = play_game(start, Side::Black, &FirstLegalMoveSelector, &FirstLegalMoveSelector).unwrap();

        assert_eq!(
            record.turns,
            vec![
                Turn::Pass { side: Side::Black },
                Turn::Move {
                    side: Side::White,
                    coord: Coordinate::new(0, 0),
                    flipped: 1
                },
            ]
        );
        assert_eq!(
            record.result,
            GameResult {
                winner: Some(Side::White),
                black_count: 0,
                white_count: 64
            }
        );
    }

    #[test]
    fn finished_board_records_no_turns() {
        let start = Board::from_bitboards(6, (1u64 << 18) - 1, ((1u64 << 36) - 1) ^ ((1u64 << 18) - 1)).unwrap();

        let record = play_game(start, Side::Black, &PassingSelector, &PassingSelector).unwrap();

        assert!(record.turns.is_empty());
        assert_eq!(record.result.winner, None);
    }

    #[test]
    fn illegal_selection_aborts_the_game() {
        let start = Board::new(8).unwrap();
        let bad = FixedMoveSelector {
            mv: Coordinate::new(0, 0),
        };

        let err = play_game(start, Side::Black, &bad, &FirstLegalMoveSelector).unwrap_err();

        assert_eq!(
            err,
            EngineError::IllegalMove {
                coord: Coordinate::new(0, 0),
                side: Side::Black
            }
        );
    }

    #[test]
    fn selector_refusing_to_move_is_an_error() {
        let start = Board::new(6).unwrap();

        let err = play_game(start, Side::Black, &PassingSelector, &FirstLegalMoveSelector).unwrap_err();

        assert_eq!(err, EngineError::NoMoveSelected(Side::Black));
    }
}
