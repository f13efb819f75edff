//! Quote data model.
//!
//! - `RawQuote` is what a provider reported for one fetch key in one cycle; it is
//!   either `Absent` (no usable data) or `Present` with any subset of fields.
//! - `Quote` is the cached, merged state for one fetch key.
//! - `Snapshot` is the read-only per-display-entry view handed to renderers, with
//!   the derived change quantities already computed.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::symbols::FetchKey;

/// Provider response for one fetch key in one cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum RawQuote {
    /// Provider returned a payload. Any field may be missing or zero.
    Present {
        /// Current price.
        price: Option<f64>,
        /// Prior reference (close) price.
        previous_close: Option<f64>,
        /// Session high.
        day_high: Option<f64>,
        /// Session low.
        day_low: Option<f64>,
    },
    /// No data this cycle (timeout, rate limit, empty payload, unknown symbol).
    #[default]
    Absent,
}

impl RawQuote {
    /// Convenience constructor with every field reported.
    pub fn present(price: f64, previous_close: f64, day_high: f64, day_low: f64) -> Self {
        RawQuote::Present {
            price: Some(price),
            previous_close: Some(previous_close),
            day_high: Some(day_high),
            day_low: Some(day_low),
        }
    }

    /// `true` when the provider reported a usable (positive) price.
    pub fn has_price(&self) -> bool {
        match self {
            RawQuote::Present { price, .. } => reported(*price).is_some(),
            RawQuote::Absent => false,
        }
    }
}

/// Keep a provider value only when it is a finite, strictly positive number.
///
/// Zero is the provider's way of saying "not reported" and is never accepted as a price.
pub fn reported(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Last known good state for one fetch key, in provider units.
///
/// The zero value means "never received".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Quote {
    /// Last known current price.
    pub price: f64,
    /// Last known prior reference price.
    pub previous_close: f64,
    /// Session high, defaults to `price` when not reported.
    pub day_high: f64,
    /// Session low, defaults to `price` when not reported.
    pub day_low: f64,
    /// Recent close samples, oldest first.
    pub history: Vec<f64>,
}

impl Quote {
    /// `true` until a positive price has been merged in.
    pub fn is_empty(&self) -> bool {
        self.price == 0.0
    }
}

/// Direction bucket used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChangeClass {
    /// Change is zero or above.
    Positive,
    /// Change is below zero.
    Negative,
}

impl ChangeClass {
    /// Classify a change amount.
    pub fn of(change: f64) -> Self {
        if change >= 0.0 {
            ChangeClass::Positive
        } else {
            ChangeClass::Negative
        }
    }
}

/// `price - previous_close`.
pub fn change(price: f64, previous_close: f64) -> f64 {
    price - previous_close
}

/// Percentage change against `previous_close`; `0` when there is no baseline.
pub fn change_percent(price: f64, previous_close: f64) -> f64 {
    if previous_close == 0.0 {
        0.0
    } else {
        change(price, previous_close) / previous_close * 100.0
    }
}

/// Read-only view of one display entry, ready for formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Name shown on the card.
    pub display_name: String,
    /// Provider key the values came from.
    pub fetch_key: FetchKey,
    /// Current price, in display units.
    pub price: f64,
    /// Prior reference price, in display units.
    pub previous_close: f64,
    /// Session high, in display units.
    pub day_high: f64,
    /// Session low, in display units.
    pub day_low: f64,
    /// Recent close samples, oldest first.
    pub history: Vec<f64>,
    /// `price - previous_close`.
    pub change: f64,
    /// Change relative to `previous_close`, in percent.
    pub change_percent: f64,
    /// Sign bucket of `change`.
    pub class: ChangeClass,
}

impl Snapshot {
    /// Build a snapshot from an already-converted quote, deriving the change fields.
    pub fn from_quote(display_name: &str, fetch_key: &FetchKey, quote: &Quote) -> Self {
        let change = change(quote.price, quote.previous_close);
        Snapshot {
            display_name: display_name.to_string(),
            fetch_key: fetch_key.clone(),
            price: quote.price,
            previous_close: quote.previous_close,
            day_high: quote.day_high,
            day_low: quote.day_low,
            history: quote.history.clone(),
            change,
            change_percent: change_percent(quote.price, quote.previous_close),
            class: ChangeClass::of(change),
        }
    }

    /// `true` while no data has ever arrived for this entry.
    pub fn is_pending(&self) -> bool {
        self.price == 0.0
    }
}
