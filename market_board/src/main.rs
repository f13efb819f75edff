//! Market board - polls a fixed watchlist of market quotes and renders a refreshing
//! grid of price cards with sparklines.
//!
//! Usage example (CLI):
//! ```bash
//! market_board --watchlist ./watchlist.txt --interval-secs 20
//! market_board --offline --json --cycles 3
//! ```
//!
//! Wiring:
//! - `Board`: owns the quote cache and runs one fetch → merge → snapshot cycle.
//! - `RefreshScheduler`: runs a cycle at start, on every interval tick and on every
//!   manual refresh (press Enter), until Ctrl+C or the `--cycles` limit.
//! - `Renderer`: cards on stdout, or JSON lines with `--json`.
//!
//! Provider failures never stop the board: a symbol without fresh data keeps showing
//! its last good values. Only startup problems (bad watchlist, HTTP client setup,
//! signal handler) end the process with an error.
#![warn(missing_docs)]
use clap::Parser;
use crossbeam_channel::unbounded;
use log::{debug, info};
use market_board::args::Args;
use market_board::fetcher::synthetic::SyntheticSource;
use market_board::fetcher::yahoo::YahooSource;
use market_board::fetcher::{FetchAdapter, HistoryWindow, QuoteSource};
use market_board::model::board::Board;
use market_board::refresh_listener::StdinRefreshListener;
use market_board::render::{CardRenderer, JsonRenderer, Renderer};
use market_board::scheduler::RefreshScheduler;
use market_common::symbols::WatchlistParser;
use market_common::{BoardError, FetchKey, Result, Symbol, Watchlist};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;

/// Cards per row.
const GRID_COLUMNS: usize = 3;

fn main() -> Result<(), BoardError> {
    init_logger();
    let args = Args::parse();

    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down board...");
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| BoardError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let watchlist = load_watchlist(&args)?;
    info!(
        "Tracking {} symbols, FX {}, commodity {}",
        watchlist.symbols().len(),
        watchlist.fx_key(),
        watchlist.commodity_key()
    );

    let source: Box<dyn QuoteSource> = if args.offline {
        Box::new(SyntheticSource::default())
    } else {
        let yahoo = YahooSource::new(Duration::from_secs(args.timeout_secs))
            .map_err(|e| BoardError::Format(format!("Failed to build HTTP client: {}", e)))?;
        Box::new(yahoo)
    };
    let window = HistoryWindow::new(&args.history_range, &args.history_interval);
    let adapter = FetchAdapter::new(source, window, args.batch);
    let mut board = Board::new(watchlist, adapter);
    debug!("Fetch order: {:?}", board.fetch_keys());

    let mut renderer: Box<dyn Renderer> = if args.json {
        Box::new(JsonRenderer::new(io::stdout()))
    } else {
        Box::new(CardRenderer::new(io::stdout(), GRID_COLUMNS, !args.no_color))
    };

    let (refresh_tx, refresh_rx) = unbounded::<()>();
    StdinRefreshListener::start(refresh_tx);

    let scheduler = RefreshScheduler::new(
        Duration::from_secs(args.interval_secs.max(1)),
        args.cycles,
    );
    info!("Board is running. Press Enter to refresh, Ctrl+C to exit.");
    let cycles = scheduler.run(refresh_rx, shutdown_rx, |trigger| {
        debug!("Cycle triggered by {:?}", trigger);
        let snapshots = board.run_cycle();
        renderer.render(&snapshots)
    })?;

    info!("Board stopped after {} cycles", cycles);
    Ok(())
}

fn load_watchlist(args: &Args) -> Result<Watchlist> {
    let fx_key = FetchKey::new(args.fx_symbol.trim());
    let commodity_key = FetchKey::new(args.commodity_symbol.trim());

    let Some(raw_path) = args.watchlist.as_deref() else {
        return Ok(Watchlist::with_defaults(fx_key, commodity_key));
    };

    let file_path = normalize_path(raw_path);
    if !is_file_exist(&file_path) {
        return Err(BoardError::ParseWatchlist(format!(
            "watchlist file not found: {}",
            file_path.display()
        )));
    }
    let symbols = Symbol::parse_from_file(BufReader::new(File::open(&file_path)?))?;
    info!("Loaded {} entries from {}", symbols.len(), file_path.display());
    Watchlist::new(symbols, fx_key, commodity_key)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &PathBuf) -> bool {
    path.exists() && path.is_file()
}
