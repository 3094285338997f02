use serde::Serialize;

use crate::ai::weights::WeightTable;
use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::Side;

/// Static board scoring from one side's perspective.
pub trait Evaluate {
    /// Positive values favour `perspective`.
    fn score(&self, board: &Board, perspective: Side) -> i32;
}

/// Per-term contributions of one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvalBreakdown {
    pub positional: i32,
    pub mobility: i32,
    pub corners: i32,
    pub discs: i32,
}

impl EvalBreakdown {
    pub fn total(&self) -> i32 {
        self.positional + self.mobility + self.corners + self.discs
    }
}

/// Weighted-square evaluator with mobility, corner and endgame disc terms.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    table: &'a WeightTable,
    corners: u64,
    mobility_coefficient: i32,
    corner_bonus: i32,
    endgame_empty_threshold: u8,
    endgame_coefficient: i32,
}

impl<'a> Evaluator<'a> {
    /// Binds the configuration to one board size. The configuration is
    /// validated first, which keeps every score well inside `i32`.
    pub fn new(config: &'a EngineConfig, size: usize) -> Result<Self, EngineError> {
        config.validate()?;
        let table = config.weights_for(size)?;
        Ok(Self {
            table,
            corners: corner_mask(size),
            mobility_coefficient: config.mobility_coefficient,
            corner_bonus: config.corner_bonus,
            endgame_empty_threshold: config.endgame_empty_threshold,
            endgame_coefficient: config.endgame_coefficient,
        })
    }

    pub fn breakdown(&self, board: &Board, perspective: Side) -> EvalBreakdown {
        EvalBreakdown {
            positional: self.positional(board, perspective),
            mobility: self.mobility(board, perspective),
            corners: self.corners(board, perspective),
            discs: self.disc_differential(board, perspective),
        }
    }

    pub fn positional(&self, board: &Board, perspective: Side) -> i32 {
        self.table.sum_over(board.stones(perspective))
            - self.table.sum_over(board.stones(perspective.opponent()))
    }

    pub fn mobility(&self, board: &Board, perspective: Side) -> i32 {
        let own = board.legal_moves(perspective).count_ones() as i32;
        let opp = board.legal_moves(perspective.opponent()).count_ones() as i32;
        (own - opp) * self.mobility_coefficient
    }

    pub fn corners(&self, board: &Board, perspective: Side) -> i32 {
        let own = (board.stones(perspective) & self.corners).count_ones() as i32;
        let opp = (board.stones(perspective.opponent()) & self.corners).count_ones() as i32;
        (own - opp) * self.corner_bonus
    }

    /// Zero until the endgame, where raw disc count starts to matter.
    pub fn disc_differential(&self, board: &Board, perspective: Side) -> i32 {
        if board.empty_count() >= self.endgame_empty_threshold {
            return 0;
        }
        let own = board.count_of(perspective) as i32;
        let opp = board.count_of(perspective.opponent()) as i32;
        (own - opp) * self.endgame_coefficient
    }
}

impl Evaluate for Evaluator<'_> {
    fn score(&self, board: &Board, perspective: Side) -> i32 {
        self.positional(board, perspective)
            + self.mobility(board, perspective)
            + self.corners(board, perspective)
            + self.disc_differential(board, perspective)
    }
}

fn corner_mask(size: usize) -> u64 {
    let last = size - 1;
    [0, last, last * size, last * size + last]
        .iter()
        .fold(0u64, |mask, &pos| mask | (1u64 << pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinate;

    fn board_from(rows: &[&str]) -> Board {
        let rows: Vec<Vec<u8>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|ch| match ch {
                        'B' => 1,
                        'W' => 2,
                        _ => 0,
                    })
                    .collect()
            })
            .collect();
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn start_position_scores_zero_for_both_sides() {
        let config = EngineConfig::default();
        for size in [6, 8] {
            let evaluator = Evaluator::new(&config, size).unwrap();
            let board = Board::new(size).unwrap();

            assert_eq!(evaluator.score(&board, Side::Black), 0);
            assert_eq!(evaluator.score(&board, Side::White), 0);
        }
    }

    #[test]
    fn score_is_antisymmetric_between_perspectives() {
        let config = EngineConfig::default();
        let evaluator = Evaluator::new(&config, 8).unwrap();
        let board = Board::new(8)
            .unwrap()
            .apply_move(Coordinate::new(3, 2), Side::Black)
            .unwrap();

        let black = evaluator.breakdown(&board, Side::Black);
        let white = evaluator.breakdown(&board, Side::White);

        assert_eq!(black.total(), -white.total());
        assert_eq!(black.total(), evaluator.score(&board, Side::Black));
        assert_ne!(black.positional, 0);
    }

    #[test]
    fn corners_and_x_squares_dominate_positional_term() {
        let config = EngineConfig::default();
        let evaluator = Evaluator::new(&config, 6).unwrap();
        let board = board_from(&[
            "B.....",
            ".W....",
            "......",
            "......",
            "......",
            "......",
        ]);

        let breakdown = evaluator.breakdown(&board, Side::Black);

        assert_eq!(breakdown.positional, 100 - (-50));
        assert_eq!(breakdown.corners, config.corner_bonus);
        assert_eq!(breakdown.discs, 0);
    }

    #[test]
    fn disc_differential_only_counts_below_empty_threshold() {
        let config = EngineConfig::default();
        let evaluator = Evaluator::new(&config, 6).unwrap();
        let midgame = Board::new(6).unwrap();
        // 35 black stones, one empty cell.
        let endgame = Board::from_bitboards(6, ((1u64 << 36) - 1) ^ 1, 0).unwrap();

        assert_eq!(evaluator.disc_differential(&midgame, Side::Black), 0);
        assert_eq!(
            evaluator.disc_differential(&endgame, Side::Black),
            35 * config.endgame_coefficient
        );
        assert_eq!(
            evaluator.disc_differential(&endgame, Side::White),
            -35 * config.endgame_coefficient
        );
    }

    #[test]
    fn mobility_rewards_more_options() {
        let config = EngineConfig::default();
        let evaluator = Evaluator::new(&config, 8).unwrap();
        let board = Board::new(8)
            .unwrap()
            .apply_move(Coordinate::new(3, 2), Side::Black)
            .unwrap();

        let own = board.legal_moves(Side::Black).count_ones() as i32;
        let opp = board.legal_moves(Side::White).count_ones() as i32;

        assert_eq!(
            evaluator.mobility(&board, Side::Black),
            (own - opp) * config.mobility_coefficient
        );
    }

    #[test]
    fn missing_table_is_a_configuration_error() {
        let config = EngineConfig {
            weights: vec![WeightTable::default_for(8).unwrap()],
            ..EngineConfig::default()
        };

        assert_eq!(
            Evaluator::new(&config, 6).unwrap_err(),
            EngineError::MissingWeights(6)
        );
    }

    #[test]
    fn out_of_range_configuration_is_rejected_before_scoring() {
        let huge_mobility = EngineConfig {
            mobility_coefficient: i32::MAX / 2,
            ..EngineConfig::default()
        };
        let huge_weights = EngineConfig::default()
            .with_weights(WeightTable::new(8, vec![i32::MAX / 2; 64]).unwrap());

        assert!(matches!(
            Evaluator::new(&huge_mobility, 8),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            Evaluator::new(&huge_weights, 8),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn extreme_accepted_configuration_stays_inside_i32() {
        use crate::ai::weights::MAX_WEIGHT;
        use crate::config::MAX_COEFFICIENT;

        let config = EngineConfig {
            mobility_coefficient: MAX_COEFFICIENT,
            corner_bonus: MAX_COEFFICIENT,
            endgame_empty_threshold: 64,
            endgame_coefficient: MAX_COEFFICIENT,
            ..EngineConfig::default()
        }
        .with_weights(WeightTable::new(8, vec![MAX_WEIGHT; 64]).unwrap());
        let evaluator = Evaluator::new(&config, 8).unwrap();
        let board = Board::from_bitboards(8, u64::MAX >> 1, 1 << 63).unwrap();

        let breakdown = evaluator.breakdown(&board, Side::Black);

        assert_eq!(breakdown.positional, 62 * MAX_WEIGHT);
        assert_eq!(breakdown.discs, 62 * MAX_COEFFICIENT);
        assert_eq!(breakdown.total(), evaluator.score(&board, Side::Black));
        assert!(breakdown.total() < i32::MAX / 2);
    }
}
