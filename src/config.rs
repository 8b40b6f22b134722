//! Engine parameters.
//!
//! All values are fixed when a [`Search`](crate::search::Search) is built;
//! nothing is reconfigured in the middle of a decision.

use std::time::Duration;

use crate::board::DEFAULT_SIZE;
use crate::error::{EngineError, Result};
use crate::evaluation::Evaluator;

pub const DEFAULT_WIN_SCORE: i32 = 100_000;
pub const DEFAULT_INFINITY: i32 = 1_000_000;
pub const DEFAULT_MIN_DEPTH: u32 = 4;
pub const DEFAULT_MAX_TIME_MS: u64 = 2900;
pub const DEFAULT_CACHE_CAPACITY: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Board edge length. Must be even and at least 4.
    pub board_size: usize,

    /// Magnitude of a decided game. Larger than any heuristic sum.
    pub win_score: i32,

    /// Search window bound. Larger than `win_score` plus any heuristic.
    pub infinity: i32,

    /// First iterative-deepening depth, in plies.
    pub min_depth: u32,

    /// Optional depth after which deepening stops even with time left.
    pub max_depth: Option<u32>,

    /// Wall-clock budget per decision.
    pub max_time: Duration,

    /// Maximum number of cached positions per decision.
    pub cache_capacity: usize,

    /// Shuffle the column scan order during move generation.
    pub shuffle_columns: bool,

    /// Seed for the column shuffle; `None` seeds from entropy.
    pub ordering_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_SIZE,
            win_score: DEFAULT_WIN_SCORE,
            infinity: DEFAULT_INFINITY,
            min_depth: DEFAULT_MIN_DEPTH,
            max_depth: None,
            max_time: Duration::from_millis(DEFAULT_MAX_TIME_MS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            shuffle_columns: true,
            ordering_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a `size` board. The win score is raised by powers of ten
    /// until it clears the heuristic bound of that size, and infinity sits
    /// ten times above it.
    pub fn for_board_size(size: usize) -> Self {
        let bound = Evaluator::new().heuristic_bound(size);
        let mut win_score = DEFAULT_WIN_SCORE;
        while i64::from(win_score) <= bound {
            match win_score.checked_mul(10) {
                Some(next) => win_score = next,
                None => break,
            }
        }
        Self {
            board_size: size,
            win_score,
            infinity: win_score.saturating_mul(10),
            ..Self::default()
        }
    }

    pub fn board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    pub fn win_score(mut self, score: i32) -> Self {
        self.win_score = score;
        self
    }

    pub fn infinity(mut self, score: i32) -> Self {
        self.infinity = score;
        self
    }

    pub fn min_depth(mut self, depth: u32) -> Self {
        self.min_depth = depth;
        self
    }

    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn max_time(mut self, time: Duration) -> Self {
        self.max_time = time;
        self
    }

    pub fn max_time_ms(self, millis: u64) -> Self {
        self.max_time(Duration::from_millis(millis))
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn shuffle_columns(mut self, shuffle: bool) -> Self {
        self.shuffle_columns = shuffle;
        self
    }

    pub fn ordering_seed(mut self, seed: u64) -> Self {
        self.ordering_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.board_size < 4 || self.board_size % 2 != 0 {
            return Err(EngineError::InvalidConfig(format!(
                "board size must be even and at least 4, got {}",
                self.board_size
            )));
        }
        // Notation uses a single lowercase letter per file.
        if self.board_size > 26 {
            return Err(EngineError::InvalidConfig(format!(
                "board size must be at most 26, got {}",
                self.board_size
            )));
        }
        if self.min_depth == 0 {
            return Err(EngineError::InvalidConfig("min depth must be at least 1".to_string()));
        }
        if let Some(max_depth) = self.max_depth {
            if max_depth < self.min_depth {
                return Err(EngineError::InvalidConfig(format!(
                    "max depth {} is below min depth {}",
                    max_depth, self.min_depth
                )));
            }
        }
        if self.win_score <= 0 || self.infinity <= self.win_score {
            return Err(EngineError::InvalidConfig(format!(
                "need 0 < win score < infinity, got {} and {}",
                self.win_score, self.infinity
            )));
        }
        // A decided game must outscore every undecided position
        let bound = Evaluator::new().heuristic_bound(self.board_size);
        let win_score = i64::from(self.win_score);
        if win_score <= bound || i64::from(self.infinity) <= win_score + bound {
            return Err(EngineError::InvalidConfig(format!(
                "win score {} and infinity {} must clear heuristic bound {} at size {}",
                self.win_score, self.infinity, bound, self.board_size
            )));
        }
        if self.cache_capacity == 0 {
            return Err(EngineError::InvalidConfig("cache capacity must be positive".to_string()));
        }
        Ok(())
    }
}
