//! Tactical motif tagging for solved chess puzzles.
//!
//! A [`Puzzle`] is an already-played mainline; [`cook`] runs every motif
//! detector over it and returns the ordered tag list.

pub use chess;

pub mod board;
pub mod board_utils;
pub mod config;
pub mod error;
pub mod puzzle;
pub mod tactics;

pub use config::TaggerConfig;
pub use error::{ConfigError, PuzzleError};
pub use puzzle::cook::{cook, cook_traced, CookedPuzzle};
pub use puzzle::{Puzzle, PuzzleNode, TagKind};
