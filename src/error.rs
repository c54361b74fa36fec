//! Error types for the loaders around the simulation core.
//!
//! None of these are fatal to a running game: every loader has an
//! `*_or_default` variant that logs the error and falls back to built-in data.

use std::path::PathBuf;

/// Failures while reading the TOML configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures while turning a text maze into a [`Grid`](crate::grid::Grid).
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read maze template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("maze template is empty")]
    Empty,

    /// A character outside the maze vocabulary.
    #[error("unknown maze symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol {
        symbol: char,
        row: usize,
        column: usize,
    },

    /// Every row must be as wide as the first one.
    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("maze template has no player start")]
    MissingPlayerStart,

    #[error("maze template has more than one player start (second at row {row}, column {column})")]
    DuplicatePlayerStart { row: usize, column: usize },

    /// A maze without coins could never be completed.
    #[error("maze template has no coins")]
    NoCoins,

    #[error("maze template is {found_width}x{found_height}, configured grid is {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },
}

/// Failures while loading or saving the high-score table.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("high-score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed high-score file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
