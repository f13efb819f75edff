//! Command-line arguments for the market board.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use market_common::symbols::{DEFAULT_COMMODITY_KEY, DEFAULT_FX_KEY};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a watchlist file with one `display name,FETCH_KEY` entry per line.
    /// The built-in watchlist is used when omitted.
    #[clap(long)]
    pub watchlist: Option<String>,

    /// Seconds between refresh cycles.
    #[clap(long, default_value_t = 20)]
    pub interval_secs: u64,

    /// Upper bound, in seconds, for every single provider request.
    #[clap(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Fetch key whose price is the FX rate for the commodity conversion.
    #[clap(long, default_value = DEFAULT_FX_KEY)]
    pub fx_symbol: String,

    /// Fetch key converted from price per troy ounce to price per gram.
    #[clap(long, default_value = DEFAULT_COMMODITY_KEY)]
    pub commodity_symbol: String,

    /// History lookback window, in provider notation.
    #[clap(long, default_value = "1d")]
    pub history_range: String,

    /// History sample interval, in provider notation.
    #[clap(long, default_value = "2m")]
    pub history_interval: String,

    /// Fetch all quotes with one batched request per cycle.
    #[clap(long)]
    pub batch: bool,

    /// Use the synthetic random-walk source instead of the network.
    #[clap(long)]
    pub offline: bool,

    /// Emit JSON lines instead of cards.
    #[clap(long)]
    pub json: bool,

    /// Disable ANSI colours on cards.
    #[clap(long)]
    pub no_color: bool,

    /// Stop after this many cycles. Runs until Ctrl+C when omitted.
    #[clap(long)]
    pub cycles: Option<u64>,
}
