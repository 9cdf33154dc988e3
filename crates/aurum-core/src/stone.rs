//! # Stone & Material Cost Aggregation
//!
//! Heterogeneous embedded-material costs (cut stones, kundan, jarkan,
//! diamonds, solitaires) summed into one stone-cost total and one
//! stone-weight total, with carat sub-weights tracked separately.
//!
//! ## Gram vs. Carat
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Invoices display diamond and solitaire weight in CARATS, but the   │
//! │  item's net weight arithmetic runs in GRAMS. Both views come out    │
//! │  of one aggregation pass:                                           │
//! │                                                                     │
//! │   cut stone 1.2 g  ────────────────────────►  grams += 1.2          │
//! │   kundan    0.8 g  ────────────────────────►  grams += 0.8          │
//! │   diamond   0.5 ct ──► carats += 0.5  and ──►  grams += 0.5 × 0.2   │
//! │                                                                     │
//! │  Unrecognized stone names land in the Other bucket and still        │
//! │  count — entry errors must inflate a reviewable total, not drop     │
//! │  value from the invoice.                                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::CARAT_TO_GRAM;

// =============================================================================
// Stone Kind
// =============================================================================

/// Category of an embedded material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoneKind {
    /// Generic cut gemstone, weighed in grams.
    CutStone,
    /// Kundan (refined gold setting work), weighed in grams.
    Kundan,
    /// Jarkan (zircon), weighed in grams.
    Jarkan,
    /// Diamond, weighed in carats.
    Diamond,
    /// Solitaire, weighed in carats.
    Solitaire,
    /// Anything we do not recognize; weighed in grams.
    Other,
}

impl StoneKind {
    /// Classifies a free-text stone name. Unknown names are `Other`,
    /// never rejected.
    pub fn classify(name: &str) -> StoneKind {
        let name = name.trim().to_lowercase();
        // "solitaire" before "diamond": listings like "solitaire diamond"
        // bill at solitaire carat weight.
        if name.contains("solitaire") {
            StoneKind::Solitaire
        } else if name.contains("diamond") {
            StoneKind::Diamond
        } else if name.contains("kundan") {
            StoneKind::Kundan
        } else if name.contains("jarkan") || name.contains("zircon") {
            StoneKind::Jarkan
        } else if name.contains("stone") {
            StoneKind::CutStone
        } else {
            StoneKind::Other
        }
    }

    /// Whether this kind's weight is entered in carats.
    #[inline]
    pub fn is_carat_denominated(&self) -> bool {
        matches!(self, StoneKind::Diamond | StoneKind::Solitaire)
    }
}

// =============================================================================
// Stone Entry
// =============================================================================

/// One embedded material on a line item.
///
/// The amount is a cached derivation of the other fields — there is no
/// way to set it independently, which keeps every stone total
/// reproducible from its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawStoneEntry")]
pub struct StoneEntry {
    name: String,
    grade: Option<String>,
    kind: StoneKind,
    quantity: u32,
    rate: Decimal,
    weight: Decimal,
    amount: Decimal,
}

/// Wire shape for deserialization. The cached fields (`kind` and
/// `amount`) are re-derived on ingress exactly as the constructors
/// derive them, so a persisted or hand-edited entry cannot carry a
/// non-derivable amount into the aggregation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStoneEntry {
    name: String,
    #[serde(default)]
    grade: Option<String>,
    quantity: u32,
    rate: Decimal,
    weight: Decimal,
    #[serde(default)]
    amount: Decimal,
}

impl From<RawStoneEntry> for StoneEntry {
    fn from(raw: RawStoneEntry) -> Self {
        // Rate zero marks a parcel-priced entry; its amount is the
        // payload (clamped). Anything else re-derives from
        // weight × rate × quantity.
        let amount = if raw.rate.is_zero() {
            raw.amount.max(Decimal::ZERO)
        } else {
            (raw.weight * raw.rate * Decimal::from(raw.quantity)).max(Decimal::ZERO)
        };
        StoneEntry {
            kind: StoneKind::classify(&raw.name),
            name: raw.name,
            grade: raw.grade,
            quantity: raw.quantity,
            rate: raw.rate,
            weight: raw.weight,
            amount,
        }
    }
}

impl StoneEntry {
    /// A count-based gem: amount = weight × rate × quantity.
    ///
    /// Negative inputs clamp the amount to zero; a stone can subsidize
    /// nothing.
    pub fn count_based(
        name: &str,
        grade: Option<&str>,
        quantity: u32,
        rate: Decimal,
        weight: Decimal,
    ) -> Self {
        let amount = (weight * rate * Decimal::from(quantity)).max(Decimal::ZERO);
        StoneEntry {
            name: name.to_string(),
            grade: grade.map(str::to_string),
            kind: StoneKind::classify(name),
            quantity,
            rate,
            weight,
            amount,
        }
    }

    /// A weight-only gem carrying a fixed amount (typical for diamond
    /// and solitaire lots priced as a parcel).
    pub fn fixed(name: &str, grade: Option<&str>, weight: Decimal, amount: Decimal) -> Self {
        StoneEntry {
            name: name.to_string(),
            grade: grade.map(str::to_string),
            kind: StoneKind::classify(name),
            quantity: 1,
            rate: Decimal::ZERO,
            weight,
            amount: amount.max(Decimal::ZERO),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    pub fn kind(&self) -> StoneKind {
        self.kind
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Weight in the kind's native unit (grams, or carats for
    /// diamond/solitaire).
    pub fn weight(&self) -> Decimal {
        self.weight
    }

    /// The cached, derived amount. Always non-negative.
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Totals over a line item's stone list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoneTotals {
    /// Sum of all stone amounts.
    pub total_price: Decimal,
    /// Total stone weight in grams (carat weights folded in at 0.2 g/ct).
    pub total_weight_grams: Decimal,
    /// Diamond weight in carats, kept separate for display.
    pub diamond_carats: Decimal,
    /// Solitaire weight in carats, kept separate for display.
    pub solitaire_carats: Decimal,
}

/// Partitions entries by category and sums price and weight.
pub fn aggregate(entries: &[StoneEntry]) -> StoneTotals {
    let mut totals = StoneTotals::default();

    for entry in entries {
        totals.total_price += entry.amount();

        match entry.kind() {
            StoneKind::Diamond => {
                totals.diamond_carats += entry.weight();
                totals.total_weight_grams += entry.weight() * CARAT_TO_GRAM;
            }
            StoneKind::Solitaire => {
                totals.solitaire_carats += entry.weight();
                totals.total_weight_grams += entry.weight() * CARAT_TO_GRAM;
            }
            _ => totals.total_weight_grams += entry.weight(),
        }
    }

    totals
}
