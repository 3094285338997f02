use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::ai::weights::WeightTable;
use crate::board::SUPPORTED_SIZES;
use crate::error::EngineError;

pub const DEFAULT_DEPTH: u8 = 3;
pub const MAX_DEPTH: u8 = 12;
pub const DEFAULT_MOBILITY_COEFFICIENT: i32 = 5;
pub const DEFAULT_CORNER_BONUS: i32 = 30;
pub const DEFAULT_ENDGAME_EMPTY_THRESHOLD: u8 = 10;
pub const DEFAULT_ENDGAME_COEFFICIENT: i32 = 10;
/// Largest accepted magnitude for the mobility, corner and disc coefficients.
pub const MAX_COEFFICIENT: i32 = 10_000;

static DEFAULT_CONFIG: Lazy<EngineConfig> = Lazy::new(EngineConfig::default);

/// Tunable engine parameters.
///
/// Missing fields fall back to their defaults when deserialized, so hosts
/// only need to send what they override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plies searched below the root.
    pub depth: u8,
    /// One positional table per supported board size.
    pub weights: Vec<WeightTable>,
    pub mobility_coefficient: i32,
    pub corner_bonus: i32,
    /// The disc differential counts once fewer than this many cells are empty.
    pub endgame_empty_threshold: u8,
    pub endgame_coefficient: i32,
    /// Stop deepening after this many visited nodes.
    pub node_budget: Option<u64>,
    /// Stop deepening after this many milliseconds.
    pub time_budget_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            weights: SUPPORTED_SIZES
                .iter()
                .filter_map(|&size| WeightTable::default_for(size))
                .collect(),
            mobility_coefficient: DEFAULT_MOBILITY_COEFFICIENT,
            corner_bonus: DEFAULT_CORNER_BONUS,
            endgame_empty_threshold: DEFAULT_ENDGAME_EMPTY_THRESHOLD,
            endgame_coefficient: DEFAULT_ENDGAME_COEFFICIENT,
            node_budget: None,
            time_budget_ms: None,
        }
    }
}

impl EngineConfig {
    /// Shared default configuration.
    pub fn shared() -> &'static Self {
        &DEFAULT_CONFIG
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Replaces the table for the given table's board size.
    pub fn with_weights(mut self, table: WeightTable) -> Self {
        self.weights.retain(|t| t.size() != table.size());
        self.weights.push(table);
        self
    }

    /// Decodes an `OTWT` weight blob and installs it for its board size.
    pub fn with_weight_blob(self, blob: &[u8]) -> Result<Self, EngineError> {
        let table = WeightTable::from_bytes(blob)?;
        Ok(self.with_weights(table))
    }

    pub fn weights_for(&self, size: usize) -> Result<&WeightTable, EngineError> {
        self.weights
            .iter()
            .find(|t| t.size() == size)
            .ok_or(EngineError::MissingWeights(size))
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.depth > MAX_DEPTH {
            return Err(EngineError::InvalidConfig(format!(
                "depth {} exceeds maximum {MAX_DEPTH}",
                self.depth
            )));
        }

        for (name, value) in [
            ("mobility coefficient", self.mobility_coefficient),
            ("corner bonus", self.corner_bonus),
            ("endgame coefficient", self.endgame_coefficient),
        ] {
            if value.unsigned_abs() > MAX_COEFFICIENT.unsigned_abs() {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} {value} exceeds {MAX_COEFFICIENT} in magnitude"
                )));
            }
        }

        for (i, table) in self.weights.iter().enumerate() {
            // Tables deserialized from a host skip `WeightTable::new`.
            table.validate()?;
            if self.weights[..i].iter().any(|t| t.size() == table.size()) {
                return Err(EngineError::InvalidConfig(format!(
                    "duplicate weight table for {0}x{0} boards",
                    table.size()
                )));
            }
        }

        if self.node_budget == Some(0) {
            return Err(EngineError::InvalidConfig(
                "node budget must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
