//! Last-known-good quote store.
//!
//! `QuoteCache` maps each fetch key to its most recent merged `Quote`. It lives
//! for the lifetime of the process and is owned by the `Board` driving the
//! refresh cycle:
//!
//! - `QuoteCache::get(key)` returns the stored quote, or the zero quote if the key
//!   was never populated.
//! - `QuoteCache::put(key, quote)` overwrites unconditionally; the caller applies
//!   the fallback policy first.
//!
//! No expiry, no eviction. The cache is not synchronized; it is only touched from
//! the thread running the cycle.

use market_common::{FetchKey, Quote};
use std::collections::HashMap;

/// In-memory map of fetch key to last merged quote.
#[derive(Debug, Default)]
pub struct QuoteCache {
    entries: HashMap<FetchKey, Quote>,
}

impl QuoteCache {
    /// Create a cache with an empty entry for each of `keys`.
    pub fn with_keys<'a>(keys: impl IntoIterator<Item = &'a FetchKey>) -> Self {
        Self {
            entries: keys
                .into_iter()
                .map(|k| (k.clone(), Quote::default()))
                .collect(),
        }
    }

    /// Last stored quote for `key`, or the zero quote.
    pub fn get(&self, key: &FetchKey) -> Quote {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    /// Store `quote` for `key`, replacing whatever was there.
    pub fn put(&mut self, key: &FetchKey, quote: Quote) {
        self.entries.insert(key.clone(), quote);
    }

    /// Number of keys that have received at least one positive price.
    pub fn populated(&self) -> usize {
        self.entries.values().filter(|q| !q.is_empty()).count()
    }
}
