use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::board::{Board, Color, Move};
use crate::config::EngineConfig;
use crate::game::Game;
use crate::search::{Search, SearchResult};

const HELP: &str = "\
commands:
  new [white|black]          start a new game, playing the given colour
  show                       print the board from your side
  moves                      list your legal moves
  move <mv>                  play a move such as c2c3; the engine replies
  go [movetime <ms>] [depth <n>]
                             let the engine play for the side to move
  eval                       static evaluation for the side to move
  help                       this text
  quit                       leave
";

/// Line-oriented command loop around a [`Game`] and a [`Search`].
pub struct ProtocolHandler {
    config: EngineConfig,
    game: Game,
    search: Search,
}

impl ProtocolHandler {
    pub fn new(config: EngineConfig, human: Color) -> Result<Self> {
        let search = Search::with_config(config.clone()).context("cannot build the engine")?;
        Ok(Self {
            game: Game::new(config.board_size, human),
            search,
            config,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        // An engine playing white opens the game
        let opening = self.engine_turn_if_due()?;
        write!(stdout, "{}", opening)?;
        stdout.flush()?;

        while reader.read_line(&mut line)? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }

            let response = self.handle_command(command);
            write!(stdout, "{}", response)?;
            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    /// Runs one command. Failures come back as an `error: ...` line and leave
    /// the game untouched.
    pub fn handle_command(&mut self, command: &str) -> String {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return String::new();
        }

        let response = match parts[0] {
            "new" => self.handle_new(&parts[1..]),
            "show" => Ok(self.handle_show()),
            "moves" => Ok(self.handle_moves()),
            "move" => self.handle_move(&parts[1..]),
            "go" => self.handle_go(&parts[1..]),
            "eval" => Ok(self.handle_eval()),
            "help" => Ok(HELP.to_string()),
            "quit" => Ok(String::new()),
            other => Err(anyhow!("unknown command '{}'", other)),
        };

        response.unwrap_or_else(|e| format!("error: {:#}\n", e))
    }

    fn handle_new(&mut self, parts: &[&str]) -> Result<String> {
        let human = match parts.first() {
            Some(colour) => colour.parse::<Color>()?,
            None => Color::White,
        };
        self.game = Game::new(self.config.board_size, human);
        self.engine_turn_if_due()
    }

    fn handle_show(&self) -> String {
        let board = self.game.board();
        let size = board.size();
        let mut result = String::new();
        for (row, line) in board.to_string().lines().enumerate() {
            result.push_str(&format!("{:>2} {}\n", size - row, line));
        }
        let files: Vec<String> = (0..size)
            .map(|col| ((b'a' + col as u8) as char).to_string())
            .collect();
        result.push_str(&format!("   {}\n", files.join(" ")));

        result.push_str(&format!(
            "you play {} (x), {} to move",
            self.game.human(),
            self.game.to_move()
        ));
        if let Some(mv) = self.game.last_move() {
            result.push_str(&format!(", last move {}", mv.to_notation(size)));
        }
        result.push('\n');
        if let Some(winner) = self.game.winner() {
            result.push_str(&format!("result {} wins\n", winner));
        }
        result
    }

    fn handle_moves(&self) -> String {
        let size = self.game.board().size();
        let moves: Vec<String> = self
            .game
            .legal_moves(self.game.human())
            .iter()
            .map(|mv| mv.to_notation(size))
            .collect();
        format!("moves {}\n", moves.join(" "))
    }

    fn handle_move(&mut self, parts: &[&str]) -> Result<String> {
        let notation = parts.first().ok_or_else(|| anyhow!("move needs an argument"))?;
        let mv = Move::from_notation(notation, self.game.board().size())?;
        self.game.play_human(mv)?;

        let mut response = String::new();
        if self.game.is_over() {
            response.push_str(&self.result_line());
            return Ok(response);
        }
        response.push_str(&self.engine_turn_if_due()?);
        Ok(response)
    }

    fn handle_go(&mut self, parts: &[&str]) -> Result<String> {
        let mut max_time = self.config.max_time;
        let mut max_depth = self.config.max_depth;

        for i in 0..parts.len() {
            match parts[i] {
                "movetime" => {
                    let value = parts.get(i + 1).ok_or_else(|| anyhow!("movetime needs a value"))?;
                    let millis: u64 = value
                        .parse()
                        .with_context(|| format!("bad movetime '{}'", value))?;
                    max_time = Duration::from_millis(millis);
                }
                "depth" => {
                    let value = parts.get(i + 1).ok_or_else(|| anyhow!("depth needs a value"))?;
                    let depth: u32 = value
                        .parse()
                        .with_context(|| format!("bad depth '{}'", value))?;
                    max_depth = Some(depth);
                }
                _ => {}
            }
        }

        self.search.set_max_time(max_time);
        self.search.set_max_depth(max_depth);
        let outcome = self.engine_move();
        self.search.set_max_time(self.config.max_time);
        self.search.set_max_depth(self.config.max_depth);
        outcome
    }

    fn handle_eval(&self) -> String {
        let oriented = self.game.oriented_for(self.game.to_move());
        format!("eval {}\n", self.search.evaluate(&oriented))
    }

    fn engine_turn_if_due(&mut self) -> Result<String> {
        if self.game.is_over() || self.game.to_move() == self.game.human() {
            return Ok(String::new());
        }
        self.engine_move()
    }

    fn engine_move(&mut self) -> Result<String> {
        let result = self.game.play_engine(&mut self.search)?;
        let mut response = self.format_result(&result);
        if self.game.is_over() {
            response.push_str(&self.result_line());
        }
        Ok(response)
    }

    fn format_result(&self, result: &SearchResult) -> String {
        match result.mv {
            Some(mv) => format!(
                "bestmove {} score {}\n",
                mv.to_notation(self.game.board().size()),
                result.score
            ),
            None => "bestmove (none)\n".to_string(),
        }
    }

    fn result_line(&self) -> String {
        match self.game.winner() {
            Some(winner) => format!("result {} wins\n", winner),
            None => String::new(),
        }
    }
}

/// Parses a board written with `x`, `o` and `.`, checking it against the
/// configured size.
pub fn parse_board(text: &str, config: &EngineConfig) -> Result<Board> {
    let board: Board = text.parse()?;
    if board.size() != config.board_size {
        bail!(
            "board is {}x{}, engine expects {}x{}",
            board.size(),
            board.size(),
            config.board_size,
            config.board_size
        );
    }
    Ok(board)
}
