use std::time::{Duration, Instant};

use breakthrough::board::{Board, Move, Position, Side};
use breakthrough::config::EngineConfig;
use breakthrough::movegen::MoveGenerator;
use breakthrough::search::Search;

fn quick_config() -> EngineConfig {
    EngineConfig::new()
        .min_depth(1)
        .max_depth(3)
        .max_time(Duration::from_secs(30))
        .shuffle_columns(false)
}

#[test]
fn initial_position_within_budget() {
    let budget = Duration::from_millis(400);
    let config = EngineConfig::new().max_time(budget).ordering_seed(7);
    let mut search = Search::with_config(config).unwrap();
    let board = Board::initial(6);

    let start = Instant::now();
    let result = search.decide_move(&board);
    let elapsed = start.elapsed();

    assert!(
        elapsed < budget + Duration::from_millis(500),
        "search took {:?} on a {:?} budget",
        elapsed,
        budget
    );

    if let Some(mv) = result.mv {
        let legal = MoveGenerator::new().generate_moves(&board, Side::Player);
        assert!(legal.contains(&mv), "{:?} is not a legal move", mv);
        assert!(search.get_completed_depth() >= 4);
    }
    assert!(search.get_nodes_searched() > 0);
}

#[test]
fn takes_immediate_win() {
    let board: Board = "\
. . . . . .
. . x . . .
. . . . o .
. . . . . .
. . . . . .
x . . . . ."
        .parse()
        .unwrap();
    let config = quick_config();
    let win = config.win_score;
    let mut search = Search::with_config(config).unwrap();

    let result = search.decide_move(&board);
    let mv = result.mv.expect("a winning move exists");
    assert_eq!(mv.src, Position::new(1, 2));
    assert_eq!(mv.dst.row, 0);
    assert_eq!(result.score, win);
}

#[test]
fn captures_piece_about_to_break_through() {
    let board: Board = "\
. . . . . .
o . . . . .
. . . . . .
. . . . . .
. . . o . .
. . x . . ."
        .parse()
        .unwrap();
    let config = quick_config().min_depth(2).max_depth(2);
    let win = config.win_score;
    let mut search = Search::with_config(config).unwrap();

    let result = search.decide_move(&board);
    assert_eq!(
        result.mv,
        Some(Move::new(Position::new(5, 2), Position::new(4, 3)))
    );
    assert!(result.score > -win);
}

#[test]
fn seeded_searches_agree() {
    let config = EngineConfig::new()
        .max_depth(4)
        .max_time(Duration::from_secs(60))
        .ordering_seed(1234);
    let board = Board::initial(6);

    let first = Search::with_config(config.clone()).unwrap().decide_move(&board);
    let second = Search::with_config(config).unwrap().decide_move(&board);
    assert!(first.mv.is_some());
    assert_eq!(first, second);
}

#[test]
fn decided_position_has_no_move() {
    let board: Board = "\
. . . . . .
. . . . . .
. . x . . .
. . . . . .
. . . . . .
. . . . . ."
        .parse()
        .unwrap();
    let config = quick_config();
    let infinity = config.infinity;
    let mut search = Search::with_config(config).unwrap();

    let result = search.decide_move(&board);
    assert_eq!(result.mv, None);
    assert_eq!(result.score, -infinity);
    assert_eq!(search.get_completed_depth(), 0);
}

#[test]
fn zero_budget_returns_without_move() {
    let config = EngineConfig::new().max_time(Duration::ZERO);
    let mut search = Search::with_config(config).unwrap();

    let result = search.decide_move(&Board::initial(6));
    assert_eq!(result.mv, None);
}

#[test]
fn rejects_invalid_config() {
    assert!(Search::with_config(EngineConfig::new().board_size(5)).is_err());
    assert!(Search::with_config(EngineConfig::new().min_depth(0)).is_err());
    assert!(Search::with_config(EngineConfig::new().cache_capacity(0)).is_err());
    assert!(Search::with_config(EngineConfig::new().board_size(26)).is_err());
    assert!(Search::with_config(EngineConfig::for_board_size(26)).is_ok());
}

#[test]
fn transpositions_are_served_from_cache() {
    // Four plies from the start reach the same boards through swapped move orders
    let config = quick_config().min_depth(4).max_depth(4);
    let mut search = Search::with_config(config).unwrap();

    let result = search.decide_move(&Board::initial(6));
    assert!(result.mv.is_some());
    assert_eq!(search.get_completed_depth(), 4);
    assert!(search.get_cache_hits() > 0);
}

#[test]
fn small_cache_still_finds_win() {
    let board: Board = "\
. . . . . .
. . . . . .
. x . . o .
. . . . . .
. . . . . .
x . . . . ."
        .parse()
        .unwrap();
    let config = quick_config().max_depth(3).cache_capacity(4);
    let win = config.win_score;
    let mut search = Search::with_config(config).unwrap();

    // Two moves to reach row 0; the lone opponent piece cannot interfere
    let result = search.decide_move(&board);
    assert_eq!(result.score, win);
    assert_eq!(result.mv.map(|mv| mv.src), Some(Position::new(2, 1)));
}
