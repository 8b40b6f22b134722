//! Turn bookkeeping for a human playing against the engine.
//!
//! The board is kept from the human's point of view: the human's pieces are
//! `Side::Player` and advance toward row 0. The engine sees the inverted
//! board and its moves are mapped back before they are played.

use log::debug;

use crate::board::{Board, Color, Move, Side};
use crate::error::{EngineError, Result};
use crate::movegen::{self, GameState, MoveGenerator};
use crate::search::{Search, SearchResult};

pub struct Game {
    board: Board,
    human: Color,
    to_move: Color,
    history: Vec<(Color, Move)>,
    winner: Option<Color>,
}

impl Game {
    pub fn new(size: usize, human: Color) -> Self {
        Self {
            board: Board::initial(size),
            human,
            to_move: Color::White,
            history: Vec::new(),
            winner: None,
        }
    }

    /// Resumes from `board`, given from the human's point of view.
    pub fn from_board(board: Board, human: Color, to_move: Color) -> Self {
        let mut game = Self {
            board,
            human,
            to_move,
            history: Vec::new(),
            winner: None,
        };
        game.update_winner();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn human(&self) -> Color {
        self.human
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|(_, mv)| *mv)
    }

    pub fn history(&self) -> &[(Color, Move)] {
        &self.history
    }

    /// The board seen by `color`, whose goal is then row 0.
    pub fn oriented_for(&self, color: Color) -> Board {
        if color == self.human {
            self.board.clone()
        } else {
            self.board.inverted()
        }
    }

    /// Legal moves of `color` in the human's coordinates.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let oriented = self.oriented_for(color);
        let moves = MoveGenerator::new().generate_moves(&oriented, Side::Player);
        if color == self.human {
            moves
        } else {
            let size = self.board.size();
            moves.into_iter().map(|mv| mv.inverted(size)).collect()
        }
    }

    /// Plays a human move given in the human's coordinates.
    pub fn play_human(&mut self, mv: Move) -> Result<()> {
        if self.is_over() {
            return Err(EngineError::GameOver);
        }
        if self.to_move != self.human {
            return Err(EngineError::NotYourTurn);
        }
        if !movegen::is_legal_move(&self.board, Side::Player, &mv) {
            return Err(EngineError::IllegalMove(mv.to_notation(self.board.size())));
        }
        self.board.make_move(Side::Player, mv);
        self.finish_turn(mv);
        Ok(())
    }

    /// Lets the engine choose and play a move for the side to move. When the
    /// search finds nothing the turn does not pass and the result carries no
    /// move.
    pub fn play_engine(&mut self, search: &mut Search) -> Result<SearchResult> {
        if self.is_over() {
            return Err(EngineError::GameOver);
        }

        let color = self.to_move;
        let mut oriented = self.oriented_for(color);
        let result = search.decide_move(&oriented);

        let Some(mv) = result.mv else {
            debug!("engine found no move for {}", color);
            return Ok(result);
        };

        if !oriented.make_move(Side::Player, mv) {
            return Err(EngineError::IllegalMove(mv.to_notation(oriented.size())));
        }

        let size = self.board.size();
        let canonical = if color == self.human {
            self.board = oriented;
            mv
        } else {
            oriented.invert();
            self.board = oriented;
            mv.inverted(size)
        };
        self.finish_turn(canonical);

        Ok(SearchResult {
            score: result.score,
            mv: Some(canonical),
        })
    }

    fn finish_turn(&mut self, mv: Move) {
        self.history.push((self.to_move, mv));
        self.to_move = self.to_move.opposite();
        self.update_winner();
    }

    fn update_winner(&mut self) {
        self.winner = match movegen::game_state(&self.board, Side::Player) {
            GameState::Won(Side::Player) => Some(self.human),
            GameState::Won(Side::Opponent) => Some(self.human.opposite()),
            GameState::InProgress => None,
        };
    }
}
