use std::time::Duration;

use log::{debug, trace, warn};
use serde::Serialize;
use web_time::Instant;

use crate::ai::eval::Evaluate;
use crate::board::{Board, mask_to_indices};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::{Coordinate, Side};

const MIN_SCORE: i32 = i32::MIN;
const MAX_SCORE: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SearchResult {
    Complete(Coordinate, i32),
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NodeValue {
    Complete(i32),
    TimedOut,
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

/// What a search decided and how much work it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// `None` when the side to move has to pass.
    pub best_move: Option<Coordinate>,
    /// Minimax value of `best_move`; `None` when no tree was searched.
    pub score: Option<i32>,
    /// Deepest fully completed iteration.
    pub depth: u8,
    pub stats: SearchStats,
    pub timed_out: bool,
}

impl SearchOutcome {
    fn unsearched(best_move: Option<Coordinate>) -> Self {
        Self {
            best_move,
            score: None,
            depth: 0,
            stats: SearchStats::default(),
            timed_out: false,
        }
    }
}

/// Fixed-depth minimax searcher with alpha-beta pruning.
///
/// Moves are tried in row-major order and only a strictly better value
/// replaces the current best, so equal-valued moves resolve to the one
/// scanned first.
pub struct Searcher<'a, E: Evaluate> {
    evaluator: &'a E,
    max_depth: u8,
    node_budget: Option<u64>,
    timeout: Option<Duration>,
    start_time: Instant,
    stats: SearchStats,
    timed_out: bool,
}

impl<'a, E: Evaluate> Searcher<'a, E> {
    pub fn new(evaluator: &'a E, max_depth: u8) -> Self {
        Self {
            evaluator,
            max_depth,
            node_budget: None,
            timeout: None,
            start_time: Instant::now(),
            stats: SearchStats::default(),
            timed_out: false,
        }
    }

    pub fn from_config(evaluator: &'a E, config: &EngineConfig) -> Self {
        Self::new(evaluator, config.depth)
            .with_node_budget(config.node_budget)
            .with_timeout(config.time_budget_ms.map(Duration::from_millis))
    }

    pub fn with_node_budget(mut self, budget: Option<u64>) -> Self {
        self.node_budget = budget;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Searches the best move for `root_side`.
    ///
    /// With a node or time budget the search deepens one ply at a time and
    /// keeps the last completed iteration; the first ply always completes.
    pub fn search(&mut self, board: &Board, root_side: Side) -> Result<SearchOutcome, EngineError> {
        self.start_time = Instant::now();
        self.stats = SearchStats::default();
        self.timed_out = false;

        let moves = board.legal_coordinates(root_side);
        let Some(&first) = moves.first() else {
            debug!("{root_side} has no legal move, pass");
            return Ok(SearchOutcome::unsearched(None));
        };
        if self.max_depth == 0 || moves.len() == 1 {
            return Ok(SearchOutcome::unsearched(Some(first)));
        }

        let mut best_move = first;
        let mut best_score = None;
        let mut depth_reached = 0;

        let start_depth = if self.has_budget() { 1 } else { self.max_depth };
        for depth in start_depth..=self.max_depth {
            match self.search_root(board, root_side, &moves, depth)? {
                SearchResult::Complete(mv, score) => {
                    trace!("depth {depth}: best {mv} score {score}, {} nodes", self.stats.nodes);
                    best_move = mv;
                    best_score = Some(score);
                    depth_reached = depth;
                }
                SearchResult::TimedOut => {
                    warn!(
                        "search budget exhausted at depth {depth} after {} nodes, using depth {depth_reached}",
                        self.stats.nodes
                    );
                    break;
                }
            }
        }

        let outcome = SearchOutcome {
            best_move: Some(best_move),
            score: best_score,
            depth: depth_reached,
            stats: self.stats,
            timed_out: self.timed_out,
        };
        debug!(
            "{root_side} plays {best_move} (score {best_score:?}, depth {depth_reached}, {} nodes, {} cutoffs)",
            self.stats.nodes, self.stats.cutoffs
        );
        Ok(outcome)
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn has_budget(&self) -> bool {
        self.node_budget.is_some() || self.timeout.is_some()
    }

    fn search_root(
        &mut self,
        board: &Board,
        root_side: Side,
        moves: &[Coordinate],
        depth: u8,
    ) -> Result<SearchResult, EngineError> {
        let mut best_move = moves[0];
        let mut best_score = MIN_SCORE;
        let mut alpha = MIN_SCORE;

        for &mv in moves {
            let next = board.apply_move(mv, root_side)?;
            let result =
                self.minimax(&next, root_side.opponent(), root_side, depth - 1, depth, alpha, MAX_SCORE)?;

            match result {
                NodeValue::TimedOut => return Ok(SearchResult::TimedOut),
                NodeValue::Complete(score) => {
                    if score > best_score {
                        best_score = score;
                        best_move = mv;
                    }
                    alpha = alpha.max(best_score);
                }
            }
        }

        Ok(SearchResult::Complete(best_move, best_score))
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        board: &Board,
        side: Side,
        root_side: Side,
        depth: u8,
        root_depth: u8,
        alpha: i32,
        beta: i32,
    ) -> Result<NodeValue, EngineError> {
        self.stats.nodes += 1;
        // Keep depth-1 search guaranteed by suppressing budget checks at root depth 1.
        if root_depth > 1 && self.budget_exhausted() {
            self.timed_out = true;
            return Ok(NodeValue::TimedOut);
        }

        if depth == 0 {
            return Ok(NodeValue::Complete(self.evaluator.score(board, root_side)));
        }

        let legal = board.legal_moves(side);
        if legal == 0 {
            if board.legal_moves(side.opponent()) == 0 {
                return Ok(NodeValue::Complete(self.evaluator.score(board, root_side)));
            }
            return self.minimax(board, side.opponent(), root_side, depth - 1, root_depth, alpha, beta);
        }

        let maximizing = side == root_side;
        let mut best = if maximizing { MIN_SCORE } else { MAX_SCORE };
        let mut alpha = alpha;
        let mut beta = beta;

        for pos in mask_to_indices(legal) {
            let mv = Coordinate::from_index(pos, board.size());
            let next = board.apply_move(mv, side)?;
            let score =
                match self.minimax(&next, side.opponent(), root_side, depth - 1, root_depth, alpha, beta)? {
                    NodeValue::TimedOut => return Ok(NodeValue::TimedOut),
                    NodeValue::Complete(score) => score,
                };

            if maximizing {
                if score > best {
                    best = score;
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                }
                beta = beta.min(best);
            }
            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        Ok(NodeValue::Complete(best))
    }

    fn budget_exhausted(&self) -> bool {
        self.node_budget.is_some_and(|budget| self.stats.nodes > budget)
            || self
                .timeout
                .is_some_and(|timeout| self.start_time.elapsed() >= timeout)
    }
}
