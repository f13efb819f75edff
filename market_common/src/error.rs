//! Error types shared by the board crates.
//!
//! `BoardError` covers the failures that can end the process or a render pass:
//! reading the watchlist and writing output. Fetch failures are absent; they are
//! absorbed at the fetch boundary and never reach this type.
use std::io;

use thiserror::Error;

/// Unified error type for configuration and rendering.
#[derive(Error, Debug)]
pub enum BoardError {
    /// I/O error originating from files or the terminal.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Error while parsing the watchlist file into `Symbol` values.
    #[error("Parse watchlist error: {0}")]
    ParseWatchlist(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
