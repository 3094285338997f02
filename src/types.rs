use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire value of an empty cell.
pub const EMPTY: u8 = 0;
/// Wire value of a black stone. Black moves first.
pub const BLACK: u8 = 1;
/// Wire value of a white stone.
pub const WHITE: u8 = 2;

/// One of the two playable sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// Parses the host encoding (1 = black, 2 = white).
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            BLACK => Some(Self::Black),
            WHITE => Some(Self::White),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Black => BLACK,
            Self::White => WHITE,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("black"),
            Self::White => f.write_str("white"),
        }
    }
}

/// Content of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            EMPTY => Some(Self::Empty),
            BLACK => Some(Self::Black),
            WHITE => Some(Self::White),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Empty => EMPTY,
            Self::Black => BLACK,
            Self::White => WHITE,
        }
    }

    pub fn side(self) -> Option<Side> {
        match self {
            Self::Empty => None,
            Self::Black => Some(Side::Black),
            Self::White => Some(Side::White),
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Self::Black,
            Side::White => Self::White,
        }
    }
}

/// A board coordinate in host order: column first, then row.
///
/// Boards index their cells as `(row, col)`; conversions between the two
/// orders go through [`Coordinate::from_index`] and [`Coordinate::to_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub col: u8,
    pub row: u8,
}

impl Coordinate {
    pub fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Converts a row-major cell index on a `size`-wide board.
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            col: (index % size) as u8,
            row: (index / size) as u8,
        }
    }

    pub fn to_index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    pub fn is_on_board(self, size: usize) -> bool {
        (self.col as usize) < size && (self.row as usize) < size
    }

    /// `(column, row)` tuple as handed back to hosts.
    pub fn as_tuple(self) -> (usize, usize) {
        (self.col as usize, self.row as usize)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_conversion_swaps_to_row_major() {
        let coord = Coordinate::new(3, 2);

        assert_eq!(coord.to_index(8), 19);
        assert_eq!(Coordinate::from_index(19, 8), coord);
        assert_eq!(Coordinate::from_index(19, 6), Coordinate::new(1, 3));
    }

    #[test]
    fn side_round_trips_host_values_and_rejects_empty() {
        assert_eq!(Side::from_u8(1), Some(Side::Black));
        assert_eq!(Side::from_u8(2), Some(Side::White));
        assert_eq!(Side::from_u8(0), None);
        assert_eq!(Side::Black.opponent(), Side::White);
        assert_eq!(Cell::from(Side::White).to_u8(), WHITE);
    }
}
