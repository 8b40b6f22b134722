use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::{Board, Cell, Move, Position, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    Won(Side),
}

/// Order in which the columns of each row are scanned. Only tie-breaking and
/// search paths depend on it, never legality.
#[derive(Debug, Clone)]
pub enum ColumnOrder {
    Sequential,
    Shuffled(StdRng),
}

impl ColumnOrder {
    pub fn seeded(seed: u64) -> Self {
        ColumnOrder::Shuffled(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        ColumnOrder::Shuffled(StdRng::from_entropy())
    }

    fn arrange(&mut self, columns: &mut [usize]) {
        if let ColumnOrder::Shuffled(rng) = self {
            columns.shuffle(rng);
        }
    }
}

/// Checks a move for `side`, whose goal is row 0 on this board.
/// The source cell is not inspected.
pub fn is_valid_move(board: &Board, side: Side, mv: &Move) -> bool {
    let (src, dst) = (mv.src, mv.dst);

    // Exactly one row forward, at most one column sideways
    if src.row - dst.row != 1 || (src.col - dst.col).abs() > 1 {
        return false;
    }

    let target = match board.get(dst) {
        Some(cell) => cell,
        None => return false,
    };

    if dst.col == src.col {
        target == Cell::Empty
    } else {
        !target.is(side)
    }
}

/// Like [`is_valid_move`], but also requires a piece of `side` on the source
/// square. Used for moves that come from outside the generator.
pub fn is_legal_move(board: &Board, side: Side, mv: &Move) -> bool {
    board.holds(mv.src, side) && is_valid_move(board, side, mv)
}

/// Candidate moves of the piece at `pos`, left diagonal first.
pub fn moves_from(board: &Board, side: Side, pos: Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(3);
    push_moves_from(board, side, pos, &mut moves);
    moves
}

fn push_moves_from(board: &Board, side: Side, pos: Position, moves: &mut Vec<Move>) {
    for dc in -1..=1 {
        let mv = Move::new(pos, Position::new(pos.row - 1, pos.col + dc));
        if is_valid_move(board, side, &mv) {
            moves.push(mv);
        }
    }
}

/// Plays `mv` in place if legal. Illegal moves are a no-op and return false.
pub fn apply_move(board: &mut Board, side: Side, mv: Move) -> bool {
    if !is_valid_move(board, side, &mv) {
        return false;
    }
    board.set(mv.dst, Cell::from(side));
    board.set(mv.src, Cell::Empty);
    true
}

/// Decides the game from the point of view of `side`, whose goal is row 0.
pub fn game_state(board: &Board, side: Side) -> GameState {
    let other = side.opposite();
    let last = board.size() - 1;
    if board.row_contains(0, side) || board.count(other) == 0 {
        GameState::Won(side)
    } else if board.row_contains(last, other) || board.count(side) == 0 {
        GameState::Won(other)
    } else {
        GameState::InProgress
    }
}

pub fn is_game_over(board: &Board, side: Side) -> bool {
    game_state(board, side) != GameState::InProgress
}

pub fn winner(board: &Board, side: Side) -> Option<Side> {
    match game_state(board, side) {
        GameState::Won(winner) => Some(winner),
        GameState::InProgress => None,
    }
}

pub struct MoveGenerator {
    column_order: ColumnOrder,
    columns: Vec<usize>,
}

impl MoveGenerator {
    pub fn new() -> Self {
        Self::with_order(ColumnOrder::Sequential)
    }

    pub fn with_order(column_order: ColumnOrder) -> Self {
        Self {
            column_order,
            columns: Vec::new(),
        }
    }

    /// Every legal move of `side`, rows scanned top to bottom and columns in
    /// the configured order.
    pub fn generate_moves(&mut self, board: &Board, side: Side) -> Vec<Move> {
        let size = board.size();
        let mut moves = Vec::new();
        for row in 0..size {
            if !board.row_contains(row, side) {
                continue;
            }
            self.columns.clear();
            self.columns.extend(0..size);
            self.column_order.arrange(&mut self.columns);
            for &col in &self.columns {
                let pos = Position::new(row as i32, col as i32);
                if board.holds(pos, side) {
                    push_moves_from(board, side, pos, &mut moves);
                }
            }
        }
        moves
    }
}

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}
