//! Tagger configuration from environment variables

use std::env;

use crate::error::ConfigError;

/// Prefix of the puzzle link logged for each classified puzzle
pub const DEFAULT_PUZZLE_URL_BASE: &str = "https://lichess.org/training/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggerConfig {
    /// Prefix of the trace URL logged per puzzle
    pub puzzle_url_base: String,

    /// Skip malformed puzzles with a warning instead of aborting
    pub skip_invalid: bool,

    /// Log progress every N puzzles (0 disables progress logs)
    pub progress_every: u64,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            puzzle_url_base: DEFAULT_PUZZLE_URL_BASE.to_string(),
            skip_invalid: true,
            progress_every: 10_000,
        }
    }
}

impl TaggerConfig {
    /// Load configuration from environment variables.
    /// Call `dotenvy::dotenv()` first to pick up a local .env file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let puzzle_url_base = lookup("PUZZLE_URL_BASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.puzzle_url_base);

        let skip_invalid = match lookup("COOK_SKIP_INVALID") {
            None => defaults.skip_invalid,
            Some(v) => parse_bool(&v).ok_or(ConfigError::InvalidValue {
                var: "COOK_SKIP_INVALID",
                value: v,
            })?,
        };

        let progress_every = match lookup("COOK_PROGRESS_EVERY") {
            None => defaults.progress_every,
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "COOK_PROGRESS_EVERY",
                value: v.clone(),
            })?,
        };

        Ok(Self {
            puzzle_url_base,
            skip_invalid,
            progress_every,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
