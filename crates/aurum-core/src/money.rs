//! # Money & Measurement Helpers
//!
//! Decimal rounding and percentage helpers shared by every calculation.
//!
//! ## Why `rust_decimal`?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM, JEWELRY EDITION                        │
//! │                                                                     │
//! │  Gram weights carry 3 decimals: 11.460 g                            │
//! │  Karat ratios are non-terminating in binary: 22/24 = 0.91666…       │
//! │                                                                     │
//! │  In f64:   6080.0 * 22.0 / 24.0 = 5573.333333333333                 │
//! │  then summing dozens of line items drifts by paise.                 │
//! │                                                                     │
//! │  OUR SOLUTION: Decimal everywhere, with EXPLICIT rounding points:   │
//! │    • component display values  → 2 dp                               │
//! │    • net payable               → whole rupees                       │
//! │  Nothing rounds implicitly mid-calculation.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Integer-cent money was considered and rejected: metal rates are
//! quoted per gram to 2 dp and multiply against 3-dp weights, so the
//! intermediate products need more scale than a cents integer carries.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Grams per carat. Diamond and solitaire weights are entered in carats
/// but contribute to the gram weight total via this fixed conversion.
pub const CARAT_TO_GRAM: Decimal = dec!(0.2);

/// Tolerance for payment-split reconciliation (one paisa).
pub const SPLIT_TOLERANCE: Decimal = dec!(0.01);

/// Rounds a component amount for display: 2 decimals, half away from zero.
#[inline]
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a gross total to the net payable: whole rupees, half away from zero.
///
/// The invoice keeps the signed difference as its rounding delta, so
/// `net - gross == delta` and `|delta| < 1` always hold.
#[inline]
pub fn round_rupees(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `base × pct / 100`, unrounded.
#[inline]
pub fn percent_of(base: Decimal, pct: Decimal) -> Decimal {
    base * pct / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_display() {
        assert_eq!(round_display(dec!(5573.3333)), dec!(5573.33));
        assert_eq!(round_display(dec!(5573.335)), dec!(5573.34));
        assert_eq!(round_display(dec!(-0.405)), dec!(-0.41));
    }

    #[test]
    fn test_round_rupees_half_away_from_zero() {
        assert_eq!(round_rupees(dec!(9784.40)), dec!(9784));
        assert_eq!(round_rupees(dec!(9784.50)), dec!(9785));
        assert_eq!(round_rupees(dec!(-12.5)), dec!(-13));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(9500), dec!(3)), dec!(285));
        assert_eq!(percent_of(dec!(200), dec!(12.5)), dec!(25));
        assert_eq!(percent_of(dec!(100), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_carat_conversion_constant() {
        // 5 ct of diamond weighs exactly 1 g
        assert_eq!(dec!(5) * CARAT_TO_GRAM, dec!(1.0));
    }
}
