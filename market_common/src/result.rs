//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `BoardError`, so functions can simply return
//! `Result<T>`.
use crate::error::BoardError;

/// Workspace-wide `Result` alias with `BoardError` as the default error.
pub type Result<T, E = BoardError> = std::result::Result<T, E>;
