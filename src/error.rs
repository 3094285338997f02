use thiserror::Error;

use crate::types::{Coordinate, Side};

/// Errors reported by board parsing, move application and configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("board is not square: row {row} has {len} cells, expected {expected}")]
    NonSquareBoard {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("unsupported board size {0} (supported: 6, 8)")]
    UnsupportedBoardSize(usize),

    #[error("expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },

    #[error("invalid cell value {value} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, value: u8 },

    #[error("invalid bitboards: {0}")]
    InvalidBitboards(String),

    #[error("invalid side value {0} (expected 1 or 2)")]
    InvalidSide(u8),

    /// A move was applied that does not bracket any opponent stone.
    #[error("illegal move {coord} for {side}")]
    IllegalMove { coord: Coordinate, side: Side },

    #[error("{0} has legal moves but no move was selected")]
    NoMoveSelected(Side),

    #[error("coordinate {coord} is outside a {size}x{size} board")]
    OutOfBounds { coord: Coordinate, size: usize },

    #[error("no weight table configured for {0}x{0} boards")]
    MissingWeights(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("weight table: {0}")]
    Weights(#[from] WeightsError),
}

/// Failures while decoding a serialized weight table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeightsError {
    #[error("data too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("invalid magic (expected OTWT)")]
    BadMagic,

    #[error("unsupported version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },

    #[error("CRC32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch { expected: u32, actual: u32 },

    #[error("unexpected EOF while reading weights: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("payload has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error("table for size {size} has {len} weights, expected {expected}")]
    WrongLength {
        size: usize,
        len: usize,
        expected: usize,
    },
}
