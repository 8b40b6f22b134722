use crate::board::{Board, Position, Side};
use crate::config::DEFAULT_WIN_SCORE;

/// Static evaluation from the Player's point of view. Pure: the score depends
/// only on the board.
#[derive(Debug, Clone)]
pub struct Evaluator {
    pub win_score: i32,

    // Advancement by distance to the goal row
    pub one_step_bonus: i32,
    pub two_step_bonus: i32,
    pub three_step_bonus: i32,
    pub back_rank_bonus: i32,

    // A piece one step from goal with no enemy on its forward diagonals
    pub breakthrough_bonus: i32,
    pub blocked_penalty: i32,

    pub center_bonus: i32,
    pub chain_weight: i32,
    pub capture_threat_bonus: i32,
    pub piece_bonus: i32,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_win_score(DEFAULT_WIN_SCORE)
    }

    pub fn with_win_score(win_score: i32) -> Self {
        Self {
            win_score,
            one_step_bonus: 80,
            two_step_bonus: 40,
            three_step_bonus: 20,
            back_rank_bonus: 10,
            breakthrough_bonus: 160,
            blocked_penalty: -80,
            center_bonus: 5,
            chain_weight: 10,
            capture_threat_bonus: 20,
            piece_bonus: 5,
        }
    }

    pub fn evaluate(&self, board: &Board) -> i32 {
        let size = board.size() as i32;
        let last = size - 1;
        let center = (size / 2 - 1)..=(size / 2);

        let mut player_count = 0;
        let mut opponent_count = 0;
        let mut player_score = 0;
        let mut opponent_score = 0;

        for row in 0..size {
            for col in 0..size {
                let pos = Position::new(row, col);

                if board.holds(pos, Side::Player) {
                    player_count += 1;
                    if row == 0 {
                        return self.win_score;
                    }
                    player_score += self.advancement(board, pos, row, Side::Player);

                    if center.contains(&col) {
                        player_score += self.center_bonus;
                    }

                    for dc in [-1, 1] {
                        let support = Position::new(row + 1, col + dc);
                        if board.holds(support, Side::Player) {
                            player_score += (last - support.row) * self.chain_weight;
                        }
                    }

                    if [-1, 1]
                        .iter()
                        .any(|dc| board.holds(Position::new(row - 1, col + dc), Side::Opponent))
                    {
                        player_score += self.capture_threat_bonus;
                    }
                } else if board.holds(pos, Side::Opponent) {
                    opponent_count += 1;
                    if row == last {
                        return -self.win_score;
                    }
                    opponent_score += self.advancement(board, pos, last - row, Side::Opponent);
                }

                // Applied for every scanned cell, whatever it holds
                for dc in [-1, 1] {
                    let chained = Position::new(row - 1, col + dc);
                    if board.holds(chained, Side::Opponent) {
                        opponent_score += chained.row * self.chain_weight;
                    }
                }
            }
        }

        if player_count == 0 {
            return -self.win_score;
        } else if opponent_count == 0 {
            return self.win_score;
        }

        player_score += player_count * self.piece_bonus;
        opponent_score += opponent_count * self.piece_bonus;

        player_score - opponent_score
    }

    /// Upper bound on the magnitude of any undecided score on a `size` board.
    /// Every cell is charged the largest advancement bonus, the centre, threat
    /// and piece bonuses, and both chain terms at their deepest row.
    pub fn heuristic_bound(&self, size: usize) -> i64 {
        let n = size as i64;
        let advancement = [
            self.one_step_bonus + self.breakthrough_bonus,
            self.one_step_bonus + self.blocked_penalty,
            self.two_step_bonus,
            self.three_step_bonus,
            self.back_rank_bonus,
        ]
        .iter()
        .map(|bonus| i64::from(*bonus).abs())
        .max()
        .unwrap_or(0);
        let chain = 2 * (n - 1).max(0) * i64::from(self.chain_weight).abs();
        let per_cell = advancement
            + i64::from(self.center_bonus).abs()
            + i64::from(self.capture_threat_bonus).abs()
            + i64::from(self.piece_bonus).abs()
            + 2 * chain;
        n * n * per_cell
    }

    /// Bonus for a piece of `side` that is `distance` rows from its goal.
    fn advancement(&self, board: &Board, pos: Position, distance: i32, side: Side) -> i32 {
        match distance {
            1 => {
                let forward = if side == Side::Player { -1 } else { 1 };
                let blocked = [-1, 1].iter().any(|dc| {
                    board.holds(Position::new(pos.row + forward, pos.col + dc), side.opposite())
                });
                self.one_step_bonus
                    + if blocked {
                        self.blocked_penalty
                    } else {
                        self.breakthrough_bonus
                    }
            }
            2 => self.two_step_bonus,
            3 => self.three_step_bonus,
            _ => self.back_rank_bonus,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
