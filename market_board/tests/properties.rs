//! Property tests for the fallback merge policy and the commodity conversion.

use market_board::model::merge::{TROY_OUNCE_GRAMS, convert, merge};
use market_common::{Quote, RawQuote};
use proptest::prelude::*;

fn arb_price() -> impl Strategy<Value = f64> {
    0.01..1_000_000.0_f64
}

/// Provider field: missing, zero, negative or a real price.
fn arb_field() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        Just(Some(0.0)),
        (-1_000.0..0.0_f64).prop_map(Some),
        arb_price().prop_map(Some),
    ]
}

fn arb_raw() -> impl Strategy<Value = RawQuote> {
    prop_oneof![
        Just(RawQuote::Absent),
        (arb_field(), arb_field(), arb_field(), arb_field()).prop_map(
            |(price, previous_close, day_high, day_low)| RawQuote::Present {
                price,
                previous_close,
                day_high,
                day_low,
            }
        ),
    ]
}

proptest! {
    /// A non-positive or missing price never replaces the cached one.
    #[test]
    fn rejected_price_keeps_previous(raws in prop::collection::vec(arb_raw(), 1..20)) {
        let mut cached = Quote::default();
        for raw in &raws {
            let merged = merge(raw, None, &cached);
            match raw {
                RawQuote::Present { price: Some(p), .. } if *p > 0.0 => {
                    prop_assert_eq!(merged.price, *p);
                }
                _ => prop_assert_eq!(merged.price, cached.price),
            }
            cached = merged;
        }
    }

    /// The stored price is zero only if no positive price was ever fetched.
    #[test]
    fn price_is_zero_only_before_first_success(raws in prop::collection::vec(arb_raw(), 1..20)) {
        let mut cached = Quote::default();
        let mut seen_positive = false;
        for raw in &raws {
            seen_positive |= raw.has_price();
            cached = merge(raw, None, &cached);
            prop_assert_eq!(cached.price == 0.0, !seen_positive);
            prop_assert!(cached.price >= 0.0);
        }
    }

    /// Converting and undoing the conversion returns the provider price.
    #[test]
    fn conversion_round_trip(price in arb_price(), fx in 1.0..500.0_f64) {
        let converted = convert(price, fx);
        let back = converted / fx * TROY_OUNCE_GRAMS;
        prop_assert!((back - price).abs() <= price * 1e-12);
    }
}
