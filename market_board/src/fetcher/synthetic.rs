//! Offline random-walk source.
//!
//! `SyntheticSource` stands in for a real provider when running without network
//! access. Every request moves the key's price by a uniform step in `[-1%, +1%]`
//! around its last value, floored at a small positive price. A configurable share
//! of requests fails on purpose so the fallback path is visible on the board.
//!
//! Design notes:
//! - Prices are kept per key so every caller observes one consistent walk.
//! - The previous close is the seed price and does not move.
//! - `request_quotes` answers a whole batch under one lock.

use super::{FetchError, HistoryWindow, QuoteSource};
use market_common::{FetchKey, RawQuote};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Seed price for keys without a known level.
const INITIAL_PRICE: f64 = 100.0;

/// Samples generated per history request.
const HISTORY_SAMPLES: usize = 30;

/// Approximate levels for the built-in watchlist keys.
const SEED_PRICES: &[(&str, f64)] = &[
    ("^N225", 38_000.0),
    ("NIY=F", 38_000.0),
    ("NK225E=F", 38_000.0),
    ("1306.T", 2_700.0),
    ("MTI=F", 2_700.0),
    ("JPY=X", 150.0),
    ("^DJI", 39_000.0),
    ("^IXIC", 16_000.0),
    ("^SOX", 4_800.0),
    ("GC=F", 2_300.0),
    ("^GSPC", 5_200.0),
    ("BTC-JPY", 10_000_000.0),
];

struct Walk {
    seed: f64,
    last: f64,
    high: f64,
    low: f64,
}

impl Walk {
    fn new(seed: f64) -> Self {
        Self {
            seed,
            last: seed,
            high: seed,
            low: seed,
        }
    }

    fn step(&mut self) -> f64 {
        self.last = next_price(self.last);
        self.high = self.high.max(self.last);
        self.low = self.low.min(self.last);
        self.last
    }
}

/// Next price of a small random walk around `current_price`, never below `0.01`.
pub fn next_price(current_price: f64) -> f64 {
    let mut rng = rand::rng();
    let change: f64 = rng.random_range(-0.01..0.01);
    let new_price = current_price * (1.0 + change);
    new_price.max(0.01)
}

/// Random-walk quote source.
pub struct SyntheticSource {
    walks: Mutex<HashMap<FetchKey, Walk>>,
    failure_rate: f64,
}

impl SyntheticSource {
    /// Source failing roughly `failure_rate` (0..=1) of requests.
    pub fn new(failure_rate: f64) -> Self {
        Self {
            walks: Mutex::new(HashMap::new()),
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    fn seed_for(key: &FetchKey) -> f64 {
        SEED_PRICES
            .iter()
            .find(|(k, _)| *k == key.as_str())
            .map(|(_, p)| *p)
            .unwrap_or(INITIAL_PRICE)
    }

    fn roll_failure(&self) -> bool {
        self.failure_rate > 0.0 && rand::rng().random_bool(self.failure_rate)
    }

    fn tick(walks: &mut HashMap<FetchKey, Walk>, key: &FetchKey) -> RawQuote {
        let walk = walks
            .entry(key.clone())
            .or_insert_with(|| Walk::new(Self::seed_for(key)));
        let price = walk.step();
        RawQuote::present(price, walk.seed, walk.high, walk.low)
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl QuoteSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn request_quote(&self, key: &FetchKey) -> Result<RawQuote, FetchError> {
        if self.roll_failure() {
            return Err(FetchError::EmptyPayload(format!("simulated outage for {key}")));
        }
        let mut walks = self.walks.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Self::tick(&mut walks, key))
    }

    fn request_history(
        &self,
        key: &FetchKey,
        _window: &HistoryWindow,
    ) -> Result<Vec<f64>, FetchError> {
        if self.roll_failure() {
            return Err(FetchError::EmptyPayload(format!("simulated outage for {key}")));
        }
        let end = {
            let walks = self.walks.lock().unwrap_or_else(PoisonError::into_inner);
            walks
                .get(key)
                .map(|w| w.last)
                .unwrap_or_else(|| Self::seed_for(key))
        };
        // Walk backwards from the current price so the series ends where the quote is.
        let mut series = Vec::with_capacity(HISTORY_SAMPLES);
        let mut price = end;
        for _ in 0..HISTORY_SAMPLES {
            series.push(price);
            price = next_price(price);
        }
        series.reverse();
        Ok(series)
    }

    fn supports_batch(&self) -> bool {
        true
    }

    fn request_quotes(&self, keys: &[FetchKey]) -> Result<HashMap<FetchKey, RawQuote>, FetchError> {
        if self.roll_failure() {
            return Err(FetchError::EmptyPayload("simulated batch outage".to_string()));
        }
        let mut walks = self.walks.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(keys
            .iter()
            .map(|key| (key.clone(), Self::tick(&mut walks, key)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_price_stays_within_one_percent() {
        for _ in 0..1000 {
            let p = next_price(100.0);
            assert!((99.0..=101.0).contains(&p));
        }
        assert!(next_price(0.001) >= 0.01);
    }

    #[test]
    fn reliable_source_always_reports_a_price() {
        let source = SyntheticSource::new(0.0);
        let key = FetchKey::new("JPY=X");
        for _ in 0..50 {
            match source.request_quote(&key).unwrap() {
                RawQuote::Present {
                    price: Some(price),
                    previous_close: Some(prev),
                    day_high: Some(high),
                    day_low: Some(low),
                } => {
                    assert!(price > 0.0);
                    assert_eq!(prev, 150.0);
                    assert!(low <= price && price <= high);
                }
                other => panic!("unexpected quote: {other:?}"),
            }
        }
    }

    #[test]
    fn history_ends_at_current_price() {
        let source = SyntheticSource::new(0.0);
        let key = FetchKey::new("UNLISTED");
        let quote = source.request_quote(&key).unwrap();
        let series = source
            .request_history(&key, &HistoryWindow::default())
            .unwrap();
        assert_eq!(series.len(), HISTORY_SAMPLES);
        match quote {
            RawQuote::Present { price, .. } => assert_eq!(series.last().copied(), price),
            RawQuote::Absent => panic!("reliable source returned absent"),
        }
    }

    #[test]
    fn always_failing_source_errors() {
        let source = SyntheticSource::new(1.0);
        assert!(source.request_quote(&FetchKey::new("A")).is_err());
        assert!(source.request_quotes(&[FetchKey::new("A")]).is_err());
    }

    #[test]
    fn batch_covers_every_key() {
        let source = SyntheticSource::new(0.0);
        let keys = [FetchKey::new("A"), FetchKey::new("B")];
        let quotes = source.request_quotes(&keys).unwrap();
        assert_eq!(quotes.len(), 2);
        assert!(quotes.values().all(RawQuote::has_price));
    }
}
