//! # Purity & Rate Resolution
//!
//! Metal purity on a linear fineness scale, and the proportional rate
//! resolver that scales a base reference price to a target purity.
//!
//! ## The Linear Scale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Gold is quoted at 24K, silver at 999 fineness. Both are points on  │
//! │  a linear scale, so one formula covers both:                        │
//! │                                                                     │
//! │      rate(target) = base_rate × target / base                       │
//! │                                                                     │
//! │  6080/g @ 24K  ──►  22K:  6080 × 22/24  = 5573.33                   │
//! │  95/g  @ 999   ──►  925:  95 × 925/999  = 87.96                     │
//! │                                                                     │
//! │  A non-positive purity on either side means "rate unknown" and      │
//! │  resolves to 0 — the invoice still calculates, and the implausible  │
//! │  zero line total is what the operator reviews.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Label Normalization
//! Operators type purity labels every way imaginable: `"22"`, `"22K"`,
//! `"22k"`, `" 22 k"`. All of them must resolve to the same purity, so
//! labels pass through [`normalize_label`] and then parse to a numeric
//! [`Purity`] — rate tables key on that parsed value, never the raw
//! spelling.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A metal purity expressed as a number on a linear fineness scale
/// (karats for gold, fineness for silver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Purity(Decimal);

impl Purity {
    /// Creates a purity from a raw scale value. Non-positive values are
    /// accepted here and resolve to a zero rate downstream.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Purity(value)
    }

    /// 24-karat gold (base reference for gold rates).
    #[inline]
    pub fn k24() -> Self {
        Purity(dec!(24))
    }

    /// 22-karat gold. Also the documented fallback for labels that fail
    /// to parse, since 22K is the dominant retail purity.
    #[inline]
    pub fn k22() -> Self {
        Purity(dec!(22))
    }

    /// 999-fineness silver (base reference for silver rates).
    #[inline]
    pub fn fine_silver() -> Self {
        Purity(dec!(999))
    }

    /// The raw scale value.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Whether this purity can anchor a rate (positive on the scale).
    #[inline]
    pub fn is_resolvable(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Parses a purity label with the documented 22K fallback.
    ///
    /// The result is tagged so callers can surface a warning when the
    /// fallback was used instead of silently absorbing it.
    ///
    /// ```rust
    /// use aurum_core::purity::{ParsedPurity, Purity};
    ///
    /// assert_eq!(Purity::parse("22k").purity(), Purity::k22());
    /// assert!(matches!(Purity::parse("twenty-two"), ParsedPurity::Fallback { .. }));
    /// ```
    pub fn parse(label: &str) -> ParsedPurity {
        let normalized = normalize_label(label);
        let numeric = normalized.strip_suffix('K').unwrap_or(&normalized);

        match numeric.parse::<Decimal>() {
            Ok(value) if value > Decimal::ZERO => ParsedPurity::Resolved(Purity(value)),
            _ => ParsedPurity::Fallback {
                raw: label.to_string(),
                assumed: Purity::k22(),
            },
        }
    }
}

/// Outcome of parsing a purity label.
///
/// The silent-default-on-parse-failure pattern is made explicit here:
/// a `Fallback` still calculates, but it names the raw label so the UI
/// can flag the line for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum ParsedPurity {
    /// The label parsed to a positive purity.
    Resolved(Purity),
    /// The label was malformed; the documented 22K fallback applies.
    Fallback { raw: String, assumed: Purity },
}

impl ParsedPurity {
    /// The purity to calculate with, fallback or not.
    #[inline]
    pub fn purity(&self) -> Purity {
        match self {
            ParsedPurity::Resolved(p) => *p,
            ParsedPurity::Fallback { assumed, .. } => *assumed,
        }
    }

    /// Whether the fallback purity was assumed.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self, ParsedPurity::Fallback { .. })
    }
}

/// Canonical spelling of a purity label: whitespace stripped, uppercased.
///
/// This only canonicalizes the spelling; `"22"` and `"22K"` remain
/// distinct strings but parse to the same [`Purity`]. Rate tables key
/// on the parsed numeric value (see [`crate::rates`]), so equivalent
/// spellings always hit the same row.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Scales a base reference rate to a target purity.
///
/// `rate = base_rate × target / base`. Any non-positive purity yields
/// zero: rate-unknown propagates as a zero rate rather than failing the
/// whole invoice.
pub fn resolve_rate(base_rate: Decimal, base: Purity, target: Purity) -> Decimal {
    if !base.is_resolvable() || !target.is_resolvable() {
        return Decimal::ZERO;
    }
    base_rate * target.value() / base.value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::round_display;

    #[test]
    fn test_resolve_rate_identity() {
        // resolveRate(r, k, k) == r for any purity
        for k in [dec!(24), dec!(22), dec!(18), dec!(999), dec!(925)] {
            let p = Purity::new(k);
            assert_eq!(resolve_rate(dec!(6080), p, p), dec!(6080));
        }
    }

    #[test]
    fn test_resolve_rate_gold_22k() {
        let rate = resolve_rate(dec!(6080), Purity::k24(), Purity::k22());
        assert_eq!(round_display(rate), dec!(5573.33));
    }

    #[test]
    fn test_resolve_rate_silver_fineness() {
        let rate = resolve_rate(dec!(95), Purity::fine_silver(), Purity::new(dec!(925)));
        assert_eq!(round_display(rate), dec!(87.96));
    }

    #[test]
    fn test_resolve_rate_unknown_purity_is_zero() {
        assert_eq!(
            resolve_rate(dec!(6080), Purity::new(Decimal::ZERO), Purity::k22()),
            Decimal::ZERO
        );
        assert_eq!(
            resolve_rate(dec!(6080), Purity::k24(), Purity::new(dec!(-1))),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_parse_equivalent_spellings() {
        let expected = Purity::k22();
        for label in ["22", "22K", "22k", " 22 k ", "22 K"] {
            let parsed = Purity::parse(label);
            assert!(!parsed.is_fallback(), "label {:?} should resolve", label);
            assert_eq!(parsed.purity(), expected, "label {:?}", label);
        }
    }

    #[test]
    fn test_parse_fineness_labels() {
        assert_eq!(Purity::parse("999").purity(), Purity::fine_silver());
        assert_eq!(Purity::parse("925").purity(), Purity::new(dec!(925)));
    }

    #[test]
    fn test_parse_malformed_falls_back_to_22k() {
        for label in ["", "gold", "K", "-22", "0"] {
            let parsed = Purity::parse(label);
            assert!(parsed.is_fallback(), "label {:?} should fall back", label);
            assert_eq!(parsed.purity(), Purity::k22());
        }
    }

    #[test]
    fn test_fallback_keeps_raw_label() {
        match Purity::parse("twenty-two") {
            ParsedPurity::Fallback { raw, assumed } => {
                assert_eq!(raw, "twenty-two");
                assert_eq!(assumed, Purity::k22());
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label(" 22 k "), "22K");
        assert_eq!(normalize_label("22"), "22");
        assert_eq!(normalize_label("999"), "999");
    }
}
