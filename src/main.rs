use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use breakthrough::board::Color;
use breakthrough::config::{EngineConfig, DEFAULT_MAX_TIME_MS, DEFAULT_MIN_DEPTH};
use breakthrough::protocol::{parse_board, ProtocolHandler};
use breakthrough::search::Search;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board edge length (even, at least 4)
    #[arg(short, long, default_value_t = 6)]
    size: usize,

    /// Thinking time per engine move in milliseconds
    #[arg(short = 't', long, default_value_t = DEFAULT_MAX_TIME_MS)]
    movetime: u64,

    /// First iterative-deepening depth
    #[arg(long, default_value_t = DEFAULT_MIN_DEPTH)]
    min_depth: u32,

    /// Stop deepening after this many plies
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seed for move ordering; omit for a random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Scan columns left to right instead of shuffling them
    #[arg(long)]
    no_shuffle: bool,

    /// Colour played by the human
    #[arg(short, long, default_value = "white")]
    color: Color,

    /// Analyse the position in this file (x to move toward the top) and exit
    #[arg(long)]
    analyse: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = EngineConfig::for_board_size(args.size)
        .max_time_ms(args.movetime)
        .min_depth(args.min_depth)
        .shuffle_columns(!args.no_shuffle);
    if let Some(depth) = args.max_depth {
        config = config.max_depth(depth);
    }
    if let Some(seed) = args.seed {
        config = config.ordering_seed(seed);
    }

    if let Some(path) = args.analyse {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let board = parse_board(&text, &config)?;
        let mut search = Search::with_config(config)?;
        let result = search.decide_move(&board);
        match result.mv {
            Some(mv) => println!(
                "bestmove {} score {} depth {}",
                mv.to_notation(board.size()),
                result.score,
                search.get_completed_depth()
            ),
            None => println!("bestmove (none)"),
        }
        return Ok(());
    }

    let mut handler = ProtocolHandler::new(config, args.color)?;
    handler.run()
}
