use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid board: {0}")]
    BoardParse(String),

    #[error("invalid move notation: {0}")]
    MoveParse(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("the game is already over")]
    GameOver,

    #[error("it is not the human's turn")]
    NotYourTurn,
}

pub type Result<T> = std::result::Result<T, EngineError>;
