//! Market board: polls a fixed watchlist of quotes, keeps the last good values
//! and renders them as a grid of price cards.
//!
//! - `fetcher`: provider sources and the non-failing `FetchAdapter` boundary.
//! - `model`: quote cache, fallback merge policy and the per-cycle `Board`.
//! - `scheduler`: fixed-interval refresh loop with manual refresh and shutdown.
//! - `refresh_listener`: stdin thread feeding manual refresh requests.
//! - `render`: card grid and JSON-lines renderers.
//! - `args`: command-line interface.
#![warn(missing_docs)]
pub mod args;
pub mod fetcher;
pub mod model;
pub mod refresh_listener;
pub mod render;
pub mod scheduler;
