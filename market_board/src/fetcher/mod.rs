//! Fetch adapter: the boundary between the board and a market-data provider.
//!
//! Providers implement `QuoteSource` and report failures as `FetchError`.
//! `FetchAdapter` wraps a source and converts every failure into an explicit
//! "no data this cycle" value (`RawQuote::Absent` or `None` history), logging it on
//! the way. Nothing inside the adapter can fail the refresh cycle.
//!
//! - `yahoo`: public chart API over blocking HTTP.
//! - `synthetic`: offline random-walk source for demos and tests.

pub mod synthetic;
pub mod yahoo;

use log::{debug, warn};
use market_common::{FetchKey, RawQuote};
use std::collections::HashMap;
use thiserror::Error;

/// Failure reported by a `QuoteSource`. Never crosses `FetchAdapter`.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider rejected the request for rate limiting.
    #[error("rate limited by provider")]
    RateLimited,

    /// Provider answered with an unexpected HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Provider answered but the payload carried no usable data.
    #[error("empty payload: {0}")]
    EmptyPayload(String),

    /// Provider does not know the symbol.
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    /// Payload could not be decoded.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Lookback window and sample interval for history requests, in provider notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryWindow {
    /// Lookback window, e.g. `1d`.
    pub range: String,
    /// Sample interval, e.g. `2m`.
    pub interval: String,
}

impl HistoryWindow {
    /// Creates a new window.
    pub fn new(range: &str, interval: &str) -> Self {
        HistoryWindow {
            range: range.to_string(),
            interval: interval.to_string(),
        }
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        HistoryWindow::new("1d", "2m")
    }
}

/// Everything fetched for one key in one cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuoteFetch {
    /// Current quote fields, or `Absent`.
    pub quote: RawQuote,
    /// Close samples, oldest first; `None` when the history request failed.
    pub history: Option<Vec<f64>>,
}

/// A market-data provider.
pub trait QuoteSource: Send {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Current quote fields for one key.
    fn request_quote(&self, key: &FetchKey) -> Result<RawQuote, FetchError>;

    /// Close samples, oldest first, over `window`.
    fn request_history(
        &self,
        key: &FetchKey,
        window: &HistoryWindow,
    ) -> Result<Vec<f64>, FetchError>;

    /// Quote and history for one key in as few requests as the provider allows.
    ///
    /// The default issues `request_quote` and `request_history` separately; either
    /// may fail without affecting the other. Providers that return both from one
    /// endpoint should override it.
    fn request_quote_and_history(
        &self,
        key: &FetchKey,
        window: &HistoryWindow,
    ) -> Result<QuoteFetch, FetchError> {
        let quote = self.request_quote(key).unwrap_or_else(|e| {
            warn!("{}: quote for {} unavailable: {}", self.name(), key, e);
            RawQuote::Absent
        });
        let history = self
            .request_history(key, window)
            .map_err(|e| warn!("{}: history for {} unavailable: {}", self.name(), key, e))
            .ok();
        Ok(QuoteFetch { quote, history })
    }

    /// `true` when `request_quotes` answers many keys with one request.
    fn supports_batch(&self) -> bool {
        false
    }

    /// Quotes for many keys. Keys missing from the map had no data.
    ///
    /// The default issues one `request_quote` per key, in order. Providers with a bulk
    /// endpoint override it together with `supports_batch`; the per-key result must be
    /// the same either way.
    fn request_quotes(&self, keys: &[FetchKey]) -> Result<HashMap<FetchKey, RawQuote>, FetchError> {
        let mut quotes = HashMap::with_capacity(keys.len());
        for key in keys {
            match self.request_quote(key) {
                Ok(quote) => {
                    quotes.insert(key.clone(), quote);
                }
                Err(e) => warn!("{}: quote for {} unavailable: {}", self.name(), key, e),
            }
        }
        Ok(quotes)
    }
}

/// Non-failing wrapper around a `QuoteSource`.
pub struct FetchAdapter {
    source: Box<dyn QuoteSource>,
    window: HistoryWindow,
    batched: bool,
}

impl FetchAdapter {
    /// Wrap `source`. With `batched` set and a provider that has a bulk endpoint,
    /// `fetch_all` requests every quote at once.
    pub fn new(source: Box<dyn QuoteSource>, window: HistoryWindow, batched: bool) -> Self {
        if batched && !source.supports_batch() {
            warn!(
                "{} has no bulk quote endpoint, fetching one symbol at a time",
                source.name()
            );
        }
        let batched = batched && source.supports_batch();
        Self {
            source,
            window,
            batched,
        }
    }

    /// Provider name.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Current quote for `key`, or `RawQuote::Absent`.
    pub fn fetch_quote(&self, key: &FetchKey) -> RawQuote {
        match self.source.request_quote(key) {
            Ok(quote) => {
                debug!("{}: quote for {}: {:?}", self.source.name(), key, quote);
                quote
            }
            Err(e) => {
                warn!("{}: quote for {} unavailable: {}", self.source.name(), key, e);
                RawQuote::Absent
            }
        }
    }

    /// Close history for `key` over `window`, or `None`.
    pub fn fetch_history(&self, key: &FetchKey, window: &HistoryWindow) -> Option<Vec<f64>> {
        match self.source.request_history(key, window) {
            Ok(series) => {
                debug!(
                    "{}: {} history samples for {}",
                    self.source.name(),
                    series.len(),
                    key
                );
                Some(series)
            }
            Err(e) => {
                warn!("{}: history for {} unavailable: {}", self.source.name(), key, e);
                None
            }
        }
    }

    /// Quote and configured-window history for `key`. Never fails.
    pub fn fetch_quote_and_history(&self, key: &FetchKey) -> QuoteFetch {
        match self.source.request_quote_and_history(key, &self.window) {
            Ok(fetch) => {
                debug!("{}: quote for {}: {:?}", self.source.name(), key, fetch.quote);
                fetch
            }
            Err(e) => {
                warn!("{}: no data for {}: {}", self.source.name(), key, e);
                QuoteFetch::default()
            }
        }
    }

    /// Quotes for `keys` from one bulk request. Every key is present in the result.
    pub fn fetch_quotes(&self, keys: &[FetchKey]) -> HashMap<FetchKey, RawQuote> {
        let mut quotes = match self.source.request_quotes(keys) {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("{}: batch quote request failed: {}", self.source.name(), e);
                HashMap::new()
            }
        };
        for key in keys {
            quotes.entry(key.clone()).or_insert(RawQuote::Absent);
        }
        quotes
    }

    /// One cycle's data for `keys`, in the order given.
    pub fn fetch_all(&self, keys: &[FetchKey]) -> Vec<(FetchKey, QuoteFetch)> {
        if self.batched {
            let mut quotes = self.fetch_quotes(keys);
            keys.iter()
                .map(|key| {
                    let fetch = QuoteFetch {
                        quote: quotes.remove(key).unwrap_or_default(),
                        history: self.fetch_history(key, &self.window),
                    };
                    (key.clone(), fetch)
                })
                .collect()
        } else {
            keys.iter()
                .map(|key| (key.clone(), self.fetch_quote_and_history(key)))
                .collect()
        }
    }
}
