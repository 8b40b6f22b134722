pub mod board;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod search;
pub mod transposition;
