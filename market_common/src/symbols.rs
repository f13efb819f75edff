//! Display symbols, provider fetch keys and the watchlist.
//!
//! A `Symbol` is what the board shows (a display name) paired with the key the
//! provider is queried with. Several display entries may share one `FetchKey`;
//! the board fetches and merges each key once per cycle and broadcasts the
//! result to every entry that aliases it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;

use crate::error::BoardError;

/// Default designated FX key (USD/JPY).
pub const DEFAULT_FX_KEY: &str = "JPY=X";
/// Default designated commodity key (gold futures, quoted in USD per troy ounce).
pub const DEFAULT_COMMODITY_KEY: &str = "GC=F";

/// Built-in watchlist used when no file is supplied.
pub const DEFAULT_SYMBOLS: &[(&str, &str)] = &[
    ("Nikkei 225", "^N225"),
    ("Nikkei Futures", "NIY=F"),
    ("Nikkei Night", "NK225E=F"),
    ("TOPIX ETF", "1306.T"),
    ("TOPIX Futures", "MTI=F"),
    ("USD/JPY", "JPY=X"),
    ("Dow Jones", "^DJI"),
    ("Nasdaq", "^IXIC"),
    ("Semiconductor", "^SOX"),
    ("Gold (JPY/g)", "GC=F"),
    ("S&P 500", "^GSPC"),
    ("BTC (JPY)", "BTC-JPY"),
];

/// Provider-side ticker string. Opaque to the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchKey(String);

impl FetchKey {
    /// Wrap a provider ticker.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw ticker string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FetchKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One tracked display entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Name shown on the card.
    pub display_name: String,
    /// Key the provider is queried with.
    pub fetch_key: FetchKey,
}

impl Symbol {
    /// Creates a new display entry.
    pub fn new(display_name: &str, fetch_key: &str) -> Self {
        Symbol {
            display_name: String::from(display_name),
            fetch_key: FetchKey::new(fetch_key),
        }
    }
}

/// Trait providing file parsing for watchlist entries.
pub trait WatchlistParser {
    /// Parses `display name,FETCH_KEY` entries from a buffered reader.
    ///
    /// Blank lines and lines starting with `#` are skipped. Returns an error naming
    /// the offending line if an entry is malformed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Symbol>, BoardError>;
}

impl WatchlistParser for Symbol {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, BoardError> {
        let mut symbols = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(BoardError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            let line_no = index + 1;
            let (name, key) = trimmed_line.rsplit_once(',').ok_or_else(|| {
                BoardError::ParseWatchlist(format!(
                    "line {line_no}: expected `display name,FETCH_KEY`, got `{trimmed_line}`"
                ))
            })?;
            let (name, key) = (name.trim(), key.trim());
            if name.is_empty() || key.is_empty() {
                return Err(BoardError::ParseWatchlist(format!(
                    "line {line_no}: display name and fetch key must both be non-empty"
                )));
            }
            symbols.push(Symbol::new(name, key));
        }
        Ok(symbols)
    }
}

/// Fixed, ordered set of display entries plus the two designated keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    symbols: Vec<Symbol>,
    fx_key: FetchKey,
    commodity_key: FetchKey,
}

impl Watchlist {
    /// Build a watchlist. Fails when `symbols` is empty.
    pub fn new(
        symbols: Vec<Symbol>,
        fx_key: FetchKey,
        commodity_key: FetchKey,
    ) -> Result<Self, BoardError> {
        if symbols.is_empty() {
            return Err(BoardError::ParseWatchlist(
                "watchlist contains no symbols".to_string(),
            ));
        }
        Ok(Self {
            symbols,
            fx_key,
            commodity_key,
        })
    }

    /// The built-in watchlist with the given designated keys.
    pub fn with_defaults(fx_key: FetchKey, commodity_key: FetchKey) -> Self {
        let symbols = DEFAULT_SYMBOLS
            .iter()
            .map(|(name, key)| Symbol::new(name, key))
            .collect();
        Self {
            symbols,
            fx_key,
            commodity_key,
        }
    }

    /// Display entries in configured order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Designated FX key.
    pub fn fx_key(&self) -> &FetchKey {
        &self.fx_key
    }

    /// Designated commodity key.
    pub fn commodity_key(&self) -> &FetchKey {
        &self.commodity_key
    }

    /// Distinct fetch keys in first-seen order, with the FX key first when tracked.
    pub fn fetch_keys(&self) -> Vec<FetchKey> {
        let mut keys: Vec<FetchKey> = Vec::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            if !keys.contains(&symbol.fetch_key) {
                keys.push(symbol.fetch_key.clone());
            }
        }
        if let Some(pos) = keys.iter().position(|k| *k == self.fx_key) {
            let fx = keys.remove(pos);
            keys.insert(0, fx);
        }
        keys
    }

    /// Every display entry sharing `key`.
    pub fn aliases_of<'a>(&'a self, key: &'a FetchKey) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.symbols.iter().filter(move |s| s.fetch_key == *key)
    }
}
