use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::board::{Board, Move, Side};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::evaluation::Evaluator;
use crate::movegen::{self, ColumnOrder, MoveGenerator};
use crate::transposition::TranspositionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub mv: Option<Move>,
}

/// Iterative-deepening negamax with alpha-beta pruning under a wall-clock
/// budget. Boards handed in must be oriented so the side to move is
/// `Side::Player`.
pub struct Search {
    config: EngineConfig,
    evaluator: Evaluator,
    move_generator: MoveGenerator,
    // Spare child buffers, one per ply in use
    pool: Vec<Board>,
    nodes_searched: u64,
    cache_hits: u64,
    completed_depth: u32,
    start_time: Instant,
}

impl Search {
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            warn!("rejected configuration: {}", e);
            return Err(e);
        }
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let column_order = match (config.shuffle_columns, config.ordering_seed) {
            (false, _) => ColumnOrder::Sequential,
            (true, Some(seed)) => ColumnOrder::seeded(seed),
            (true, None) => ColumnOrder::from_entropy(),
        };
        Self {
            evaluator: Evaluator::with_win_score(config.win_score),
            move_generator: MoveGenerator::with_order(column_order),
            pool: Vec::new(),
            nodes_searched: 0,
            cache_hits: 0,
            completed_depth: 0,
            start_time: Instant::now(),
            config,
        }
    }

    /// Deepens from `min_depth` until the budget runs out and returns the
    /// result of the deepest pass that finished in time with a move. The move
    /// is `None` if no pass got that far.
    pub fn decide_move(&mut self, board: &Board) -> SearchResult {
        self.nodes_searched = 0;
        self.cache_hits = 0;
        self.completed_depth = 0;
        self.start_time = Instant::now();

        let mut transposition_table = TranspositionTable::new(self.config.cache_capacity);
        let mut best = SearchResult {
            score: -self.config.infinity,
            mv: None,
        };
        let mut depth = self.config.min_depth;

        while !self.out_of_time() {
            let result = self.negamax(&mut transposition_table, board, depth);

            if result.mv.is_some() && !self.out_of_time() {
                best = result;
                self.completed_depth = depth;
                debug!(
                    "depth {} score {} move {:?} nodes {} cached {} elapsed {:?}",
                    depth,
                    result.score,
                    result.mv.map(|mv| mv.to_notation(board.size())),
                    self.nodes_searched,
                    transposition_table.len(),
                    self.start_time.elapsed()
                );
            }

            if self.config.max_depth.map_or(false, |max_depth| depth >= max_depth) {
                break;
            }
            depth += 1;
        }

        info!(
            "decided {:?} score {} at depth {} ({} nodes, {} cache hits, {:?})",
            best.mv.map(|mv| mv.to_notation(board.size())),
            best.score,
            self.completed_depth,
            self.nodes_searched,
            self.cache_hits,
            self.start_time.elapsed()
        );
        best
    }

    /// One full pass to `max_depth` plies with the widest window.
    fn negamax(
        &mut self,
        transposition_table: &mut TranspositionTable,
        board: &Board,
        max_depth: u32,
    ) -> SearchResult {
        let infinity = self.config.infinity;
        self.value(transposition_table, board, -infinity, infinity, 0, max_depth)
    }

    fn value(
        &mut self,
        transposition_table: &mut TranspositionTable,
        board: &Board,
        mut alpha: i32,
        beta: i32,
        plies: u32,
        max_depth: u32,
    ) -> SearchResult {
        self.nodes_searched += 1;
        let remaining = max_depth - plies;

        if let Some(result) = transposition_table.probe(board, remaining) {
            self.cache_hits += 1;
            return result;
        }

        if plies == max_depth || movegen::is_game_over(board, Side::Player) {
            return SearchResult {
                score: self.evaluator.evaluate(board),
                mv: None,
            };
        }

        let moves = self.move_generator.generate_moves(board, Side::Player);
        let mut child = self
            .pool
            .pop()
            .unwrap_or_else(|| Board::empty(board.size()));

        let mut best_score = -self.config.infinity;
        let mut best_move = None;

        for mv in moves {
            child.copy_from(board);
            child.make_move(Side::Player, mv);
            child.invert();

            let reply = self.value(
                transposition_table,
                &child,
                -beta,
                -alpha,
                plies + 1,
                max_depth,
            );
            let score = -reply.score;

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }

            alpha = alpha.max(best_score);

            // Alpha-beta pruning
            if alpha >= beta {
                break;
            }

            // Checked once per sibling; a running child is never interrupted
            if self.out_of_time() {
                break;
            }
        }

        self.pool.push(child);

        let result = SearchResult {
            score: best_score,
            mv: best_move,
        };
        // A node cut short by the clock is not stored as if it were complete
        if !self.out_of_time() {
            transposition_table.store(board, remaining, result);
        }
        result
    }

    fn out_of_time(&self) -> bool {
        self.start_time.elapsed() >= self.config.max_time
    }

    pub fn evaluate(&self, board: &Board) -> i32 {
        self.evaluator.evaluate(board)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_max_depth(&mut self, depth: Option<u32>) {
        self.config.max_depth = depth.map(|depth| depth.max(self.config.min_depth));
    }

    pub fn set_max_time(&mut self, time: Duration) {
        self.config.max_time = time;
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    pub fn get_cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Depth of the pass that produced the last returned move, 0 if none.
    pub fn get_completed_depth(&self) -> u32 {
        self.completed_depth
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}
