use std::time::Duration;

use breakthrough::board::{Board, Color, Move, Position};
use breakthrough::config::EngineConfig;
use breakthrough::error::EngineError;
use breakthrough::game::Game;
use breakthrough::search::Search;

fn engine() -> Search {
    let config = EngineConfig::new()
        .min_depth(2)
        .max_depth(3)
        .max_time(Duration::from_secs(30))
        .ordering_seed(5);
    Search::with_config(config).unwrap()
}

#[test]
fn human_then_engine() {
    let mut game = Game::new(6, Color::White);
    let mut search = engine();

    game.play_human(Move::from_notation("c2c3", 6).unwrap()).unwrap();
    assert_eq!(game.to_move(), Color::Black);

    let legal = game.legal_moves(Color::Black);
    let before = game.board().clone();
    let reply = game.play_engine(&mut search).unwrap();
    let mv = reply.mv.expect("engine should reply");

    assert!(legal.contains(&mv), "{:?} not in {:?}", mv, legal);
    // Engine pieces start on the top rows and move down in the human's view
    assert_eq!(mv.dst.row, mv.src.row + 1);
    assert_ne!(game.board(), &before);
    assert_eq!(game.to_move(), Color::White);
    assert_eq!(game.history().len(), 2);
    assert_eq!(game.last_move(), Some(mv));
    assert_eq!(game.board().count(breakthrough::board::Side::Opponent), 12);
}

#[test]
fn rejects_illegal_and_out_of_turn_moves() {
    let mut game = Game::new(6, Color::White);

    let jump = Move::new(Position::new(4, 0), Position::new(2, 0));
    assert_eq!(
        game.play_human(jump),
        Err(EngineError::IllegalMove("a2a4".to_string()))
    );

    // Empty source square
    let ghost = Move::new(Position::new(3, 0), Position::new(2, 0));
    assert!(matches!(game.play_human(ghost), Err(EngineError::IllegalMove(_))));
    assert!(game.history().is_empty());

    game.play_human(Move::from_notation("a2a3", 6).unwrap()).unwrap();
    assert_eq!(
        game.play_human(Move::from_notation("b2b3", 6).unwrap()),
        Err(EngineError::NotYourTurn)
    );
}

#[test]
fn engine_opens_when_human_is_black() {
    let mut game = Game::new(6, Color::Black);
    let mut search = engine();

    assert_eq!(
        game.play_human(Move::from_notation("c2c3", 6).unwrap()),
        Err(EngineError::NotYourTurn)
    );

    let reply = game.play_engine(&mut search).unwrap();
    assert!(reply.mv.is_some());
    assert_eq!(game.to_move(), Color::Black);
}

#[test]
fn reaching_the_far_row_ends_the_game() {
    let board: Board = "\
. . . . . .
. . x . . .
. . . . . .
. . . . . .
o . . . . .
. . . . . ."
        .parse()
        .unwrap();
    let mut game = Game::from_board(board, Color::White, Color::White);
    assert!(!game.is_over());

    game.play_human(Move::from_notation("c5c6", 6).unwrap()).unwrap();
    assert_eq!(game.winner(), Some(Color::White));

    let mut search = engine();
    assert!(matches!(game.play_engine(&mut search), Err(EngineError::GameOver)));
    assert!(matches!(
        game.play_human(Move::from_notation("a2a3", 6).unwrap()),
        Err(EngineError::GameOver)
    ));
}

#[test]
fn engine_finishes_a_won_position() {
    let board: Board = "\
. . . . . .
. . x . . .
. . . . . .
. . . . . .
o . . . . .
. . . . . ."
        .parse()
        .unwrap();
    // The engine owns the top pieces; its piece at a2 is one step from home
    let mut game = Game::from_board(board, Color::White, Color::Black);
    let mut search = engine();

    let reply = game.play_engine(&mut search).unwrap();
    let mv = reply.mv.unwrap();
    assert_eq!(mv.dst.row, 5);
    assert_eq!(game.winner(), Some(Color::Black));
}
