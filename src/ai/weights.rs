use serde::{Deserialize, Serialize};

use crate::board::SUPPORTED_SIZES;
use crate::error::{EngineError, WeightsError};

const MAGIC: &[u8; 4] = b"OTWT";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 16;

/// Largest accepted weight magnitude. Keeps every evaluation far from the
/// search's `i32` sentinels.
pub const MAX_WEIGHT: i32 = 10_000;

#[rustfmt::skip]
const DEFAULT_6X6: [i32; 36] = [
    100, -20,  10,  10, -20, 100,
    -20, -50,   3,   3, -50, -20,
     10,   3,   1,   1,   3,  10,
     10,   3,   1,   1,   3,  10,
    -20, -50,   3,   3, -50, -20,
    100, -20,  10,  10, -20, 100,
];

#[rustfmt::skip]
const DEFAULT_8X8: [i32; 64] = [
    100, -20,  10,   5,   5,  10, -20, 100,
    -20, -50,   4,   3,   3,   4, -50, -20,
     10,   4,   3,   2,   2,   3,   4,  10,
      5,   3,   2,   1,   1,   2,   3,   5,
      5,   3,   2,   1,   1,   2,   3,   5,
     10,   4,   3,   2,   2,   3,   4,  10,
    -20, -50,   4,   3,   3,   4, -50, -20,
    100, -20,  10,   5,   5,  10, -20, 100,
];

/// Positional weights for one board size, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable {
    size: usize,
    weights: Vec<i32>,
}

impl WeightTable {
    pub fn new(size: usize, weights: Vec<i32>) -> Result<Self, EngineError> {
        if !SUPPORTED_SIZES.contains(&size) {
            return Err(EngineError::UnsupportedBoardSize(size));
        }
        if weights.len() != size * size {
            return Err(WeightsError::WrongLength {
                size,
                len: weights.len(),
                expected: size * size,
            }
            .into());
        }
        Ok(Self { size, weights })
    }

    /// Built-in table for `size`, if the engine ships one.
    pub fn default_for(size: usize) -> Option<Self> {
        let weights = match size {
            6 => DEFAULT_6X6.to_vec(),
            8 => DEFAULT_8X8.to_vec(),
            _ => return None,
        };
        Some(Self { size, weights })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.weights[row * self.size + col]
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.weights
    }

    /// Whether the table is invariant under all eight rotations and
    /// reflections of the board.
    pub fn is_symmetric(&self) -> bool {
        let n = self.size;
        (0..n).all(|row| {
            (0..n).all(|col| {
                let w = self.get(row, col);
                let m = n - 1;
                [
                    (col, row),
                    (m - row, col),
                    (row, m - col),
                    (m - row, m - col),
                    (m - col, m - row),
                    (col, m - row),
                    (m - col, row),
                ]
                .iter()
                .all(|&(r, c)| self.get(r, c) == w)
            })
        })
    }

    /// Checks what deserialization cannot: shape, weight range and symmetry.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !SUPPORTED_SIZES.contains(&self.size) {
            return Err(EngineError::UnsupportedBoardSize(self.size));
        }
        if self.weights.len() != self.size * self.size {
            return Err(WeightsError::WrongLength {
                size: self.size,
                len: self.weights.len(),
                expected: self.size * self.size,
            }
            .into());
        }
        if let Some((pos, w)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, w)| w.unsigned_abs() > MAX_WEIGHT.unsigned_abs())
        {
            return Err(EngineError::InvalidConfig(format!(
                "weight {w} at cell {pos} of the {0}x{0} table exceeds {MAX_WEIGHT} in magnitude",
                self.size
            )));
        }
        if !self.is_symmetric() {
            return Err(EngineError::InvalidConfig(format!(
                "{0}x{0} weight table is not symmetric under rotation and reflection",
                self.size
            )));
        }
        Ok(())
    }

    /// Sum of weights over every set bit of `mask`. Cells outside the table
    /// contribute nothing.
    pub fn sum_over(&self, mask: u64) -> i32 {
        crate::board::mask_to_indices(mask)
            .filter_map(|pos| self.weights.get(pos))
            .sum()
    }

    /// Deserialize a table from the `OTWT` blob format.
    pub fn from_bytes(data: &[u8]) -> Result<Self, EngineError> {
        if data.len() < HEADER_SIZE {
            return Err(WeightsError::TooShort {
                expected: HEADER_SIZE,
                actual: data.len(),
            }
            .into());
        }

        if &data[0..4] != MAGIC {
            return Err(WeightsError::BadMagic.into());
        }

        let version = read_u32_le(data, 4)?;
        if version != VERSION {
            return Err(WeightsError::UnsupportedVersion {
                expected: VERSION,
                actual: version,
            }
            .into());
        }

        let size = read_u32_le(data, 8)? as usize;
        if !SUPPORTED_SIZES.contains(&size) {
            return Err(EngineError::UnsupportedBoardSize(size));
        }

        let expected_crc = read_u32_le(data, 12)?;
        let payload = &data[HEADER_SIZE..];
        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(WeightsError::CrcMismatch {
                expected: expected_crc,
                actual: actual_crc,
            }
            .into());
        }

        let bytes_len = size * size * 4;
        if payload.len() < bytes_len {
            return Err(WeightsError::Truncated {
                expected: bytes_len,
                actual: payload.len(),
            }
            .into());
        }
        if payload.len() > bytes_len {
            return Err(WeightsError::TrailingBytes(payload.len() - bytes_len).into());
        }

        let weights = payload
            .chunks_exact(4)
            .map(|chunk| {
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(chunk);
                i32::from_le_bytes(bytes)
            })
            .collect();

        Ok(Self { size, weights })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let payload: Vec<u8> = self
            .weights
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();

        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&(self.size as u32).to_le_bytes());
        out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, WeightsError> {
    if offset + 4 > data.len() {
        return Err(WeightsError::Truncated {
            expected: offset + 4,
            actual: data.len(),
        });
    }
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    Ok(u32::from_le_bytes(bytes))
}
