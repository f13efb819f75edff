//! Fallback merge policy and unit conversion.
//!
//! Each cycle a fresh `RawQuote` is combined with the cached `Quote` field by field:
//! a provider value is accepted only if it is strictly positive, otherwise the
//! previous value is kept (or, for high/low, the merged price is used). A stored
//! price therefore never goes back to zero once a real price has been seen.
//!
//! The designated commodity is quoted by the provider per troy ounce in the FX
//! base currency; it is displayed per gram in the quote currency using the
//! current FX rate.

use market_common::quote::reported;
use market_common::{Quote, RawQuote};

/// Grams per troy ounce.
pub const TROY_OUNCE_GRAMS: f64 = 31.1034768;

/// FX rate substituted when the FX key has never produced a price.
pub const DEFAULT_FX_RATE: f64 = 150.0;

/// Combine this cycle's fetch results with the cached quote.
///
/// `history` is `None` when the history fetch failed; an empty series counts as a
/// failure too and keeps the cached one.
pub fn merge(raw: &RawQuote, history: Option<Vec<f64>>, cached: &Quote) -> Quote {
    let (price, previous_close, day_high, day_low) = match raw {
        RawQuote::Present {
            price,
            previous_close,
            day_high,
            day_low,
        } => (
            reported(*price),
            reported(*previous_close),
            reported(*day_high),
            reported(*day_low),
        ),
        RawQuote::Absent => (None, None, None, None),
    };

    let price = price.unwrap_or(cached.price);
    let previous_close = previous_close.unwrap_or(if cached.previous_close > 0.0 {
        cached.previous_close
    } else {
        price
    });

    let history = match history {
        Some(series) if !series.is_empty() => series,
        _ => cached.history.clone(),
    };

    Quote {
        price,
        previous_close,
        day_high: day_high.unwrap_or(price),
        day_low: day_low.unwrap_or(price),
        history,
    }
}

/// FX rate used for this cycle's conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxRate {
    /// Quote currency units per base currency unit.
    pub rate: f64,
    /// `true` when `DEFAULT_FX_RATE` was substituted.
    pub defaulted: bool,
}

impl FxRate {
    /// Resolve the rate from the FX key's merged quote.
    pub fn resolve(fx_quote: &Quote) -> Self {
        if fx_quote.price > 0.0 {
            FxRate {
                rate: fx_quote.price,
                defaulted: false,
            }
        } else {
            FxRate {
                rate: DEFAULT_FX_RATE,
                defaulted: true,
            }
        }
    }
}

/// Per-ounce provider price to per-gram display price.
pub fn convert(value: f64, fx_rate: f64) -> f64 {
    value * fx_rate / TROY_OUNCE_GRAMS
}

/// Convert price, previous close, high and low. History is left in provider units;
/// it is only drawn as a scale-free sparkline.
pub fn convert_quote(quote: &Quote, fx_rate: f64) -> Quote {
    Quote {
        price: convert(quote.price, fx_rate),
        previous_close: convert(quote.previous_close, fx_rate),
        day_high: convert(quote.day_high, fx_rate),
        day_low: convert(quote.day_low, fx_rate),
        history: quote.history.clone(),
    }
}
