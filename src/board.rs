use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::movegen;

pub const DEFAULT_SIZE: usize = 6;

/// Relative side label. On an oriented board the side to move is always
/// `Player` and its goal is row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

/// Absolute colours, only meaningful to the game driver. White moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

impl FromStr for Color {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "black" | "b" => Ok(Color::Black),
            other => Err(EngineError::InvalidConfig(format!("unknown colour '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Player,
    Opponent,
}

impl Cell {
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Player => Some(Side::Player),
            Cell::Opponent => Some(Side::Opponent),
        }
    }

    pub fn is(self, side: Side) -> bool {
        self.side() == Some(side)
    }

    fn recolored(self) -> Cell {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::Player => Cell::Opponent,
            Cell::Opponent => Cell::Player,
        }
    }

    fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Player => 'x',
            Cell::Opponent => 'o',
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Cell::Player,
            Side::Opponent => Cell::Opponent,
        }
    }
}

/// Board coordinates. Signed so that off-board candidates can be built and
/// then rejected by the bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub src: Position,
    pub dst: Position,
}

impl Move {
    pub fn new(src: Position, dst: Position) -> Self {
        Self { src, dst }
    }

    /// Maps a move found on an inverted board back to the original
    /// orientation. Applying it twice gives the original move.
    pub fn inverted(&self, size: usize) -> Move {
        let last = size as i32 - 1;
        Move {
            src: Position::new(last - self.src.row, self.src.col),
            dst: Position::new(last - self.dst.row, self.dst.col),
        }
    }

    /// Formats as `<file><rank><file><rank>`, files from `a` and ranks counted
    /// from the bottom row, e.g. `c2c3`.
    pub fn to_notation(&self, size: usize) -> String {
        let mut result = String::new();
        for pos in [self.src, self.dst] {
            result.push((b'a' + pos.col as u8) as char);
            result.push_str(&(size as i32 - pos.row).to_string());
        }
        result
    }

    pub fn from_notation(notation: &str, size: usize) -> Result<Move, EngineError> {
        let bytes = notation.trim().as_bytes();
        let mut index = 0;
        let src = parse_square(bytes, &mut index, size)
            .ok_or_else(|| EngineError::MoveParse(notation.to_string()))?;
        let dst = parse_square(bytes, &mut index, size)
            .ok_or_else(|| EngineError::MoveParse(notation.to_string()))?;
        if index != bytes.len() {
            return Err(EngineError::MoveParse(notation.to_string()));
        }
        Ok(Move::new(src, dst))
    }
}

fn parse_square(bytes: &[u8], index: &mut usize, size: usize) -> Option<Position> {
    let file = *bytes.get(*index)?;
    if !file.is_ascii_lowercase() {
        return None;
    }
    let col = (file - b'a') as i32;
    *index += 1;

    let start = *index;
    while *index < bytes.len() && bytes[*index].is_ascii_digit() {
        *index += 1;
    }
    let rank: i32 = std::str::from_utf8(&bytes[start..*index]).ok()?.parse().ok()?;

    let size = size as i32;
    if col >= size || rank < 1 || rank > size {
        return None;
    }
    Some(Position::new(size - rank, col))
}

/// Square grid of cells stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Starting layout: the Opponent fills the rows in front of the Player's
    /// goal, the Player fills the rows nearest its own edge, two empty rows in
    /// between. For the default size that is rows 0-1 and 4-5.
    pub fn initial(size: usize) -> Self {
        let mut board = Board::empty(size);
        let half = size / 2;
        for row in 0..size {
            let cell = if row + 1 < half {
                Cell::Opponent
            } else if row > half {
                Cell::Player
            } else {
                Cell::Empty
            };
            for col in 0..size {
                board.cells[row * size + col] = cell;
            }
        }
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_out_of_bounds(&self, pos: Position) -> bool {
        let size = self.size as i32;
        pos.row < 0 || pos.col < 0 || pos.row >= size || pos.col >= size
    }

    /// Returns `None` for off-board positions.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.is_out_of_bounds(pos) {
            return None;
        }
        Some(self.cells[pos.row as usize * self.size + pos.col as usize])
    }

    /// Whether `pos` is on the board and holds a piece of `side`.
    pub fn holds(&self, pos: Position, side: Side) -> bool {
        self.get(pos).map_or(false, |cell| cell.is(side))
    }

    /// Writes `cell` at `pos`. Off-board writes are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if !self.is_out_of_bounds(pos) {
            self.cells[pos.row as usize * self.size + pos.col as usize] = cell;
        }
    }

    pub fn count(&self, side: Side) -> usize {
        self.cells.iter().filter(|cell| cell.is(side)).count()
    }

    pub fn row_contains(&self, row: usize, side: Side) -> bool {
        row < self.size
            && self.cells[row * self.size..(row + 1) * self.size]
                .iter()
                .any(|cell| cell.is(side))
    }

    /// Flips the board in place: row order reversed and every piece handed to
    /// the other side. An involution.
    pub fn invert(&mut self) {
        let size = self.size;
        for row in 0..size / 2 {
            let (top, bottom) = self.cells.split_at_mut((size - 1 - row) * size);
            top[row * size..(row + 1) * size].swap_with_slice(&mut bottom[..size]);
        }
        for cell in self.cells.iter_mut() {
            *cell = cell.recolored();
        }
    }

    pub fn inverted(&self) -> Board {
        let mut board = self.clone();
        board.invert();
        board
    }

    /// Overwrites this buffer with `other`, reusing the allocation when sizes
    /// match.
    pub fn copy_from(&mut self, other: &Board) {
        self.size = other.size;
        self.cells.clear();
        self.cells.extend_from_slice(&other.cells);
    }

    /// Plays `mv` for `side` in place. Returns false and leaves the board
    /// untouched if the move is not legal.
    pub fn make_move(&mut self, side: Side, mv: Move) -> bool {
        movegen::apply_move(self, side, mv)
    }

    /// Copy-on-move: the receiver is never modified.
    pub fn with_move(&self, side: Side, mv: Move) -> Board {
        let mut board = self.clone();
        movegen::apply_move(&mut board, side, mv);
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial(DEFAULT_SIZE)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: Vec<String> = row.iter().map(|cell| cell.to_char().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for line in s.lines() {
            let row = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    '.' | '_' => Ok(Cell::Empty),
                    'x' => Ok(Cell::Player),
                    'o' => Ok(Cell::Opponent),
                    other => Err(EngineError::BoardParse(format!("unknown cell '{}'", other))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            if !row.is_empty() {
                rows.push(row);
            }
        }

        let size = rows.len();
        if size == 0 {
            return Err(EngineError::BoardParse("no rows".to_string()));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != size) {
            return Err(EngineError::BoardParse(format!(
                "row {} has {} cells, expected {}",
                bad,
                rows[bad].len(),
                size
            )));
        }

        Ok(Board {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }
}
