use crate::error::EngineError;
use crate::types::{Cell, Coordinate, Side};

/// Board side lengths the engine accepts.
pub const SUPPORTED_SIZES: [usize; 2] = [6, 8];
const MAX_CELLS: usize = 64;
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Square Reversi board represented by two bitboards.
///
/// Cells are indexed row-major, `row * size + col`, so iterating a move mask
/// from the lowest bit visits cells top-to-bottom, left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    size: u8,
    black: u64,
    white: u64,
}

/// Record of one in-place move, enough to take it back with [`Board::undo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipLog {
    pub side: Side,
    pub placed: usize,
    pub flipped: u64,
}

impl FlipLog {
    pub fn flipped_count(&self) -> u32 {
        self.flipped.count_ones()
    }
}

impl Board {
    /// Creates the starting position: the two centre diagonals are white on
    /// the main diagonal and black on the anti-diagonal.
    pub fn new(size: usize) -> Result<Self, EngineError> {
        check_size(size)?;
        let mid = size / 2;
        let at = |row: usize, col: usize| bit(row * size + col);

        Ok(Self {
            size: size as u8,
            black: at(mid - 1, mid) | at(mid, mid - 1),
            white: at(mid - 1, mid - 1) | at(mid, mid),
        })
    }

    /// Builds a board from host rows of `0/1/2` cells.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, EngineError> {
        let size = rows.len();
        check_size(size)?;

        let mut cells = Vec::with_capacity(size * size);
        for (row, cols) in rows.iter().enumerate() {
            let cols = cols.as_ref();
            if cols.len() != size {
                return Err(EngineError::NonSquareBoard {
                    row,
                    len: cols.len(),
                    expected: size,
                });
            }
            cells.extend_from_slice(cols);
        }

        Self::from_cells(size, &cells)
    }

    /// Builds a board from a flat row-major slice of `0/1/2` cells.
    pub fn from_cells(size: usize, cells: &[u8]) -> Result<Self, EngineError> {
        check_size(size)?;
        if cells.len() != size * size {
            return Err(EngineError::CellCount {
                expected: size * size,
                actual: cells.len(),
            });
        }

        let mut black = 0u64;
        let mut white = 0u64;
        for (pos, &value) in cells.iter().enumerate() {
            match Cell::from_u8(value) {
                Some(Cell::Empty) => {}
                Some(Cell::Black) => black |= bit(pos),
                Some(Cell::White) => white |= bit(pos),
                None => {
                    return Err(EngineError::InvalidCell {
                        row: pos / size,
                        col: pos % size,
                        value,
                    });
                }
            }
        }

        Ok(Self {
            size: size as u8,
            black,
            white,
        })
    }

    pub fn from_bitboards(size: usize, black: u64, white: u64) -> Result<Self, EngineError> {
        check_size(size)?;
        if black & white != 0 {
            return Err(EngineError::InvalidBitboards(format!(
                "black and white overlap at {:#018x}",
                black & white
            )));
        }
        let outside = (black | white) & !board_mask(size);
        if outside != 0 {
            return Err(EngineError::InvalidBitboards(format!(
                "stones outside a {size}x{size} board at {outside:#018x}"
            )));
        }

        Ok(Self {
            size: size as u8,
            black,
            white,
        })
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn num_cells(&self) -> usize {
        self.size() * self.size()
    }

    /// Occupancy mask of one side.
    pub fn stones(&self, side: Side) -> u64 {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    /// Cell at `(row, col)`; off-board cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        let size = self.size();
        if row >= size || col >= size {
            return Cell::Empty;
        }
        self.cell_at(row * size + col)
    }

    pub fn cell_at(&self, pos: usize) -> Cell {
        let square = bit(pos);
        if self.black & square != 0 {
            Cell::Black
        } else if self.white & square != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Returns the legal move mask for `side`.
    pub fn legal_moves(&self, side: Side) -> u64 {
        let (me, opp) = self.split(side);
        let occupied = me | opp;
        let size = self.size();
        let mut legal = 0u64;

        for pos in 0..self.num_cells() {
            let move_bit = bit(pos);
            if occupied & move_bit != 0 {
                continue;
            }
            if collect_flips(pos, size, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Legal moves for `side` in row-major scan order.
    pub fn legal_coordinates(&self, side: Side) -> Vec<Coordinate> {
        let size = self.size();
        mask_to_indices(self.legal_moves(side))
            .map(|pos| Coordinate::from_index(pos, size))
            .collect()
    }

    pub fn is_legal(&self, coord: Coordinate, side: Side) -> bool {
        coord.is_on_board(self.size())
            && self.legal_moves(side) & bit(coord.to_index(self.size())) != 0
    }

    /// Stones `side` would flip by playing at `coord`; zero when illegal.
    pub fn flips(&self, coord: Coordinate, side: Side) -> u64 {
        if !coord.is_on_board(self.size()) {
            return 0;
        }
        let (me, opp) = self.split(side);
        collect_flips(coord.to_index(self.size()), self.size(), me, opp)
    }

    /// Returns a new board with `coord` played by `side`. `self` is untouched.
    pub fn apply_move(&self, coord: Coordinate, side: Side) -> Result<Self, EngineError> {
        let mut next = *self;
        next.place(coord, side)?;
        Ok(next)
    }

    /// Places one stone in place and flips captured stones.
    pub fn place(&mut self, coord: Coordinate, side: Side) -> Result<FlipLog, EngineError> {
        let size = self.size();
        if !coord.is_on_board(size) {
            return Err(EngineError::OutOfBounds { coord, size });
        }

        let pos = coord.to_index(size);
        let (me, opp) = self.split(side);
        let flips = collect_flips(pos, size, me, opp);
        if flips == 0 {
            return Err(EngineError::IllegalMove { coord, side });
        }

        self.set_sides(side, me | bit(pos) | flips, opp & !flips);

        Ok(FlipLog {
            side,
            placed: pos,
            flipped: flips,
        })
    }

    /// Takes back a move recorded by [`Board::place`].
    pub fn undo(&mut self, log: &FlipLog) {
        let (me, opp) = self.split(log.side);
        self.set_sides(log.side, me & !(bit(log.placed) | log.flipped), opp | log.flipped);
    }

    /// True when neither side has a legal move.
    pub fn is_terminal(&self) -> bool {
        self.legal_moves(Side::Black) == 0 && self.legal_moves(Side::White) == 0
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    pub fn count_of(&self, side: Side) -> u8 {
        self.stones(side).count_ones() as u8
    }

    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        self.num_cells() as u8 - black_count - white_count
    }

    /// Flat row-major cells, `0=empty, 1=black, 2=white`.
    pub fn to_cells(&self) -> Vec<u8> {
        (0..self.num_cells())
            .map(|pos| self.cell_at(pos).to_u8())
            .collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.to_cells()
            .chunks(self.size())
            .map(<[u8]>::to_vec)
            .collect()
    }

    fn split(&self, side: Side) -> (u64, u64) {
        match side {
            Side::Black => (self.black, self.white),
            Side::White => (self.white, self.black),
        }
    }

    fn set_sides(&mut self, side: Side, me: u64, opp: u64) {
        match side {
            Side::Black => {
                self.black = me;
                self.white = opp;
            }
            Side::White => {
                self.white = me;
                self.black = opp;
            }
        }
    }
}

/// Iterates set bits from the lowest index upward.
pub fn mask_to_indices(mut mask: u64) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let pos = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(pos)
    })
}

fn check_size(size: usize) -> Result<(), EngineError> {
    if SUPPORTED_SIZES.contains(&size) {
        Ok(())
    } else {
        Err(EngineError::UnsupportedBoardSize(size))
    }
}

fn collect_flips(pos: usize, size: usize, me: u64, opp: u64) -> u64 {
    if pos >= size * size {
        return 0;
    }

    let move_bit = bit(pos);
    if (me | opp) & move_bit != 0 {
        return 0;
    }

    let row = (pos / size) as i32;
    let col = (pos % size) as i32;
    let mut flips = 0u64;

    for (dr, dc) in DIRECTIONS {
        let mut r = row + dr;
        let mut c = col + dc;
        let mut line = 0u64;

        while in_bounds(r, c, size) {
            let square = bit(r as usize * size + c as usize);
            if opp & square != 0 {
                line |= square;
            } else {
                if me & square != 0 {
                    flips |= line;
                }
                break;
            }

            r += dr;
            c += dc;
        }
    }

    flips
}

fn bit(pos: usize) -> u64 {
    if pos < MAX_CELLS { 1u64 << pos } else { 0 }
}

fn board_mask(size: usize) -> u64 {
    let cells = size * size;
    if cells >= MAX_CELLS {
        u64::MAX
    } else {
        (1u64 << cells) - 1
    }
}

fn in_bounds(row: i32, col: i32, size: usize) -> bool {
    (0..size as i32).contains(&row) && (0..size as i32).contains(&col)
}
