use crate::ai::eval::Evaluator;
use crate::ai::search::{SearchOutcome, Searcher};
use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::{Coordinate, Side};

/// Move-selection engine bound to a validated configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Best move for `side`, or `None` when `side` has to pass.
    pub fn choose_move(&self, board: &Board, side: Side) -> Result<Option<Coordinate>, EngineError> {
        Ok(self.analyze(board, side)?.best_move)
    }

    /// Runs the search and reports score, depth and node counts as well.
    pub fn analyze(&self, board: &Board, side: Side) -> Result<SearchOutcome, EngineError> {
        analyze_with(&self.config, board, side)
    }
}

pub(crate) fn analyze_with(
    config: &EngineConfig,
    board: &Board,
    side: Side,
) -> Result<SearchOutcome, EngineError> {
    let evaluator = Evaluator::new(config, board.size())?;
    Searcher::from_config(&evaluator, config).search(board, side)
}

/// Chooses a move with the default configuration.
pub fn choose_move(board: &Board, side: Side) -> Result<Option<Coordinate>, EngineError> {
    Ok(analyze_with(EngineConfig::shared(), board, side)?.best_move)
}
