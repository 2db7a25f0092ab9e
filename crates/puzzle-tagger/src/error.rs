//! Puzzle error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Puzzle {id}: mainline has {len} plies, need at least 2")]
    TooShort { id: String, len: usize },

    #[error("Puzzle {id}: ply {ply} is played by the same side as the ply before it")]
    NotAlternating { id: String, ply: usize },

    #[error("Puzzle {id}: point of view does not match the mover of ply 1")]
    PovMismatch { id: String },

    #[error("Puzzle {id}: ply {ply} does not start from the position left by the previous ply")]
    Discontinuous { id: String, ply: usize },

    #[error("Ply index {index} out of range for mainline of length {len}")]
    PlyOutOfRange { index: usize, len: usize },

    #[error("Invalid FEN: {fen}")]
    InvalidFen { fen: String },

    #[error("Invalid UCI move: {uci}")]
    InvalidUci { uci: String },

    #[error("Illegal move {uci} at ply {ply}")]
    IllegalMove { uci: String, ply: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Configuration error: {var} has invalid value {value:?}")]
    InvalidValue { var: &'static str, value: String },
}
