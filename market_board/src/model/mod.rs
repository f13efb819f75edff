//! Domain state and policy for the board.
//!
//! - `quote_cache`: last-known-good `Quote` per fetch key.
//! - `merge`: fallback merge policy, FX resolution and commodity conversion.
//! - `board`: one refresh cycle over the whole watchlist.

pub mod board;
pub mod merge;
pub mod quote_cache;
