//! One refresh cycle over the whole watchlist.
//!
//! `Board` owns the quote cache and the fetch adapter. `run_cycle` fetches every
//! distinct fetch key, merges each result into the cache with the fallback
//! policy, resolves the FX rate from the freshly merged FX quote and then builds
//! one `Snapshot` per display entry. Keys are processed with the FX key first,
//! so the commodity conversion always sees this cycle's FX value.

use crate::fetcher::FetchAdapter;
use crate::model::merge::{FxRate, convert_quote, merge};
use crate::model::quote_cache::QuoteCache;
use log::{info, warn};
use market_common::{FetchKey, Quote, Snapshot, Watchlist};

/// Polling state for one watchlist.
pub struct Board {
    watchlist: Watchlist,
    adapter: FetchAdapter,
    cache: QuoteCache,
    /// Keys fetched each cycle, FX first.
    keys: Vec<FetchKey>,
    cycle: u64,
}

impl Board {
    /// Create a board with an empty cache entry per fetch key.
    ///
    /// When the commodity is tracked but the FX key is not displayed, the FX key is
    /// still polled so the conversion has a live rate.
    pub fn new(watchlist: Watchlist, adapter: FetchAdapter) -> Self {
        let mut keys = watchlist.fetch_keys();
        if keys.contains(watchlist.commodity_key()) && !keys.contains(watchlist.fx_key()) {
            keys.insert(0, watchlist.fx_key().clone());
        }
        for key in &keys {
            let names: Vec<&str> = watchlist
                .aliases_of(key)
                .map(|s| s.display_name.as_str())
                .collect();
            if names.len() > 1 {
                info!("{} feeds {} cards: {}", key, names.len(), names.join(", "));
            }
        }
        let cache = QuoteCache::with_keys(&keys);
        Self {
            watchlist,
            adapter,
            cache,
            keys,
            cycle: 0,
        }
    }

    /// Fetch, merge and snapshot every configured symbol once.
    pub fn run_cycle(&mut self) -> Vec<Snapshot> {
        self.cycle += 1;
        let mut fresh = 0;

        for (key, fetch) in self.adapter.fetch_all(&self.keys) {
            if fetch.quote.has_price() {
                fresh += 1;
            }
            let merged = merge(&fetch.quote, fetch.history, &self.cache.get(&key));
            self.cache.put(&key, merged);
        }

        let fx = self.fx_rate();
        if fx.defaulted && self.tracks_commodity() {
            warn!(
                "FX rate for {} unresolved, converting {} at default {}",
                self.watchlist.fx_key(),
                self.watchlist.commodity_key(),
                fx.rate
            );
        }
        info!(
            "Cycle {}: {}/{} symbols updated from {}, {} with data, FX {:.3}",
            self.cycle,
            fresh,
            self.keys.len(),
            self.adapter.source_name(),
            self.cache.populated(),
            fx.rate
        );

        self.snapshots_at(fx)
    }

    fn snapshots_at(&self, fx: FxRate) -> Vec<Snapshot> {
        self.watchlist
            .symbols()
            .iter()
            .map(|symbol| {
                let mut quote = self.cache.get(&symbol.fetch_key);
                if symbol.fetch_key == *self.watchlist.commodity_key() {
                    quote = convert_quote(&quote, fx.rate);
                }
                Snapshot::from_quote(&symbol.display_name, &symbol.fetch_key, &quote)
            })
            .collect()
    }

    /// FX rate derived from the cached FX quote.
    pub fn fx_rate(&self) -> FxRate {
        FxRate::resolve(&self.cache.get(self.watchlist.fx_key()))
    }

    fn tracks_commodity(&self) -> bool {
        self.keys.contains(self.watchlist.commodity_key())
    }

    /// Cached quote for `key`, in provider units.
    pub fn quote(&self, key: &FetchKey) -> Quote {
        self.cache.get(key)
    }

    /// Keys polled each cycle, in fetch order.
    pub fn fetch_keys(&self) -> &[FetchKey] {
        &self.keys
    }

    /// Number of completed cycles.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::synthetic::SyntheticSource;
    use crate::fetcher::HistoryWindow;
    use market_common::Symbol;

    fn board(symbols: Vec<Symbol>) -> Board {
        let watchlist = Watchlist::new(symbols, "JPY=X".into(), "GC=F".into()).unwrap();
        let adapter = FetchAdapter::new(
            Box::new(SyntheticSource::new(0.0)),
            HistoryWindow::default(),
            false,
        );
        Board::new(watchlist, adapter)
    }

    #[test]
    fn fx_key_is_polled_for_commodity_even_when_hidden() {
        let board = board(vec![Symbol::new("Gold", "GC=F"), Symbol::new("Dow", "^DJI")]);
        assert_eq!(
            board.fetch_keys(),
            &[FetchKey::new("JPY=X"), FetchKey::new("GC=F"), FetchKey::new("^DJI")]
        );
    }

    #[test]
    fn fx_key_is_not_added_without_commodity() {
        let board = board(vec![Symbol::new("Dow", "^DJI")]);
        assert_eq!(board.fetch_keys(), &[FetchKey::new("^DJI")]);
    }

    #[test]
    fn snapshots_follow_display_order() {
        let mut board = board(vec![
            Symbol::new("Dow", "^DJI"),
            Symbol::new("USD/JPY", "JPY=X"),
            Symbol::new("Dow again", "^DJI"),
        ]);
        let snaps = board.run_cycle();
        let names: Vec<&str> = snaps.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["Dow", "USD/JPY", "Dow again"]);
        assert_eq!(snaps[0].price, snaps[2].price);
        assert_eq!(board.cycle(), 1);
    }

    #[test]
    fn unreachable_provider_leaves_snapshots_pending() {
        let watchlist =
            Watchlist::new(vec![Symbol::new("Dow", "^DJI")], "JPY=X".into(), "GC=F".into())
                .unwrap();
        let adapter = FetchAdapter::new(
            Box::new(SyntheticSource::new(1.0)),
            HistoryWindow::default(),
            false,
        );
        let mut board = Board::new(watchlist, adapter);
        assert!(board.run_cycle().iter().all(Snapshot::is_pending));
        assert!(board.quote(&FetchKey::new("^DJI")).is_empty());
    }
}
