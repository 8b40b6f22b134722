use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::board::Board;
use crate::search::SearchResult;

#[derive(Debug, Clone)]
pub struct TranspositionEntry {
    /// Remaining depth the stored result was searched to.
    pub depth: u32,
    pub result: SearchResult,
}

/// Results of earlier searches keyed by the exact board.
///
/// Entries carry no bound type: a result found under one alpha-beta window is
/// reused under any other window. This can return a fail-high or fail-low
/// score as if it were exact.
///
/// Each board is held once; the map key and the insertion queue share it.
pub struct TranspositionTable {
    table: HashMap<Rc<Board>, TranspositionEntry>,
    order: VecDeque<Rc<Board>>,
    size: usize,
}

impl TranspositionTable {
    pub fn new(size: usize) -> Self {
        Self {
            table: HashMap::new(),
            order: VecDeque::new(),
            size: size.max(1),
        }
    }

    pub fn store(&mut self, board: &Board, depth: u32, result: SearchResult) {
        let entry = TranspositionEntry { depth, result };
        if let Some(existing) = self.table.get_mut(board) {
            *existing = entry;
            return;
        }

        if self.table.len() >= self.size {
            // Remove oldest entry if table is full
            if let Some(oldest) = self.order.pop_front() {
                self.table.remove(oldest.as_ref());
            }
        }
        let key = Rc::new(board.clone());
        self.order.push_back(Rc::clone(&key));
        self.table.insert(key, entry);
    }

    pub fn get(&self, board: &Board) -> Option<&TranspositionEntry> {
        self.table.get(board)
    }

    /// A stored result searched at least `depth` plies deep. Shallower entries
    /// count as misses.
    pub fn probe(&self, board: &Board, depth: u32) -> Option<SearchResult> {
        self.table
            .get(board)
            .filter(|entry| entry.depth >= depth)
            .map(|entry| entry.result)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.size
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Move, Position, Side};

    fn result(score: i32) -> SearchResult {
        SearchResult {
            score,
            mv: Some(Move::new(Position::new(4, 0), Position::new(3, 0))),
        }
    }

    #[test]
    fn test_store_then_get() {
        let mut tt = TranspositionTable::new(16);
        let board = Board::initial(6);
        tt.store(&board, 3, result(42));

        let entry = tt.get(&board).unwrap();
        assert_eq!(entry.depth, 3);
        assert_eq!(entry.result, result(42));

        // Structural key: an equal board built separately hits
        assert!(tt.get(&Board::initial(6)).is_some());
    }

    #[test]
    fn test_different_board_misses() {
        let mut tt = TranspositionTable::new(16);
        let board = Board::initial(6);
        tt.store(&board, 3, result(42));

        let moved = board.with_move(
            Side::Player,
            Move::new(Position::new(4, 2), Position::new(3, 2)),
        );
        assert_ne!(moved, board);
        assert!(tt.get(&moved).is_none());
    }

    #[test]
    fn test_shallow_entry_is_a_miss() {
        let mut tt = TranspositionTable::new(16);
        let board = Board::initial(6);
        tt.store(&board, 2, result(7));

        assert_eq!(tt.probe(&board, 2), Some(result(7)));
        assert_eq!(tt.probe(&board, 1), Some(result(7)));
        assert_eq!(tt.probe(&board, 3), None);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut tt = TranspositionTable::new(2);
        let a = Board::initial(6);
        let b = a.with_move(Side::Player, Move::new(Position::new(4, 0), Position::new(3, 0)));
        let c = a.with_move(Side::Player, Move::new(Position::new(4, 1), Position::new(3, 1)));

        tt.store(&a, 1, result(1));
        tt.store(&b, 1, result(2));
        tt.store(&b, 2, result(3));
        assert_eq!(tt.len(), 2);

        tt.store(&c, 1, result(4));
        assert_eq!(tt.len(), 2);
        assert!(tt.get(&a).is_none());
        assert_eq!(tt.get(&b).unwrap().depth, 2);
        assert!(tt.get(&c).is_some());
    }

    #[test]
    fn test_board_is_held_once() {
        let mut tt = TranspositionTable::new(4);
        let board = Board::initial(6);
        tt.store(&board, 1, result(1));
        tt.store(&board, 2, result(2));

        let (key, _) = tt.table.get_key_value(&board).unwrap();
        assert!(Rc::ptr_eq(key, &tt.order[0]));
        assert_eq!(Rc::strong_count(key), 2);
        assert_eq!(tt.order.len(), 1);

        tt.clear();
        assert!(tt.is_empty());
        assert!(tt.order.is_empty());
    }
}
