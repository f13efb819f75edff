//!
//! Common types shared by the market board crates.
//!
//! This crate aggregates:
//! - `error`: unified error type `BoardError`.
//! - `result`: handy `Result<T, BoardError>` alias.
//! - `symbols`: display symbols, fetch keys, the watchlist and its file parser.
//! - `quote`: cached `Quote`, provider `RawQuote` and the render `Snapshot`.
#![warn(missing_docs)]
pub mod error;
pub mod quote;
pub mod result;
pub mod symbols;

pub use error::BoardError;
pub use quote::{ChangeClass, Quote, RawQuote, Snapshot};
pub use result::Result;
pub use symbols::{FetchKey, Symbol, Watchlist};
