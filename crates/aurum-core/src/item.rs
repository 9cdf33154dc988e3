//! # Item Price Calculator
//!
//! Combines weight, resolved metal rate, labour basis and stone costs
//! into a single line item's price breakdown.
//!
//! ## Breakdown
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  metal value   = metal weight × resolved rate                       │
//! │  labour        = metal weight × per-gram rate                       │
//! │                  OR metal value × making % / 100  (never both)      │
//! │  stone total   = Σ stone amounts              (stone::aggregate)    │
//! │  ────────────────────────────────────────────────────────────────   │
//! │  item price    = metal value + labour + stone total                 │
//! │                                                                     │
//! │  effective wt  = gross weight + making-% weight addition            │
//! │                  (display of the "after making" weight only;        │
//! │                   cost never re-derives from it)                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every component is retained in [`ItemPriceResult`], so downstream
//! consumers sum already-priced items and never re-derive — once a line
//! is priced, a later rate change cannot touch it unless the item is
//! explicitly recalculated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::percent_of;
use crate::stone::{aggregate, StoneEntry, StoneTotals};

// =============================================================================
// Labour Basis
// =============================================================================

/// The making-charge basis for one item.
///
/// The two bases are mutually exclusive per item — that exclusivity
/// lives in the type, not in a convention about which field wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "basis", content = "value")]
pub enum LabourBasis {
    /// Fixed labour rate per gram of metal.
    PerGram(Decimal),
    /// Making charge as a percentage of the metal value.
    Percentage(Decimal),
}

// =============================================================================
// Inputs & Result
// =============================================================================

/// Raw inputs for pricing one item. Constructed fresh per calculation,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPriceInputs {
    /// Gross weight of the piece in grams.
    pub gross_weight: Decimal,
    /// Metal weight in grams; defaults to gross weight when the metal
    /// portion is not tracked separately.
    pub metal_weight: Decimal,
    /// Resolved per-gram rate for the item's metal and purity.
    pub metal_rate: Decimal,
    /// Labour basis (per-gram or percentage, never both).
    pub labour: LabourBasis,
    /// Embedded materials.
    pub stones: Vec<StoneEntry>,
}

impl ItemPriceInputs {
    /// `metal_weight = None` falls back to the gross weight.
    pub fn new(
        gross_weight: Decimal,
        metal_weight: Option<Decimal>,
        metal_rate: Decimal,
        labour: LabourBasis,
        stones: Vec<StoneEntry>,
    ) -> Self {
        ItemPriceInputs {
            gross_weight,
            metal_weight: metal_weight.unwrap_or(gross_weight),
            metal_rate,
            labour,
            stones,
        }
    }
}

/// Pure output of the item calculator. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPriceResult {
    /// Gross weight plus the making-% weight addition ("after making"
    /// display weight).
    pub effective_weight: Decimal,
    /// metal weight × rate.
    pub metal_value: Decimal,
    /// Labour/making charge on the item's basis.
    pub labour_charge: Decimal,
    /// Total price of embedded stones.
    pub stone_price: Decimal,
    /// Full stone aggregation (gram total plus carat sub-weights).
    pub stones: StoneTotals,
    /// metal value + labour + stone price.
    pub total_price: Decimal,
}

// =============================================================================
// Calculator
// =============================================================================

/// Prices one item.
pub fn price(inputs: &ItemPriceInputs) -> ItemPriceResult {
    let metal_value = inputs.metal_weight * inputs.metal_rate;

    let (labour_charge, weight_addition) = match inputs.labour {
        LabourBasis::PerGram(rate) => (inputs.metal_weight * rate, Decimal::ZERO),
        LabourBasis::Percentage(pct) => (
            percent_of(metal_value, pct),
            percent_of(inputs.metal_weight, pct),
        ),
    };

    let stones = aggregate(&inputs.stones);
    let total_price = metal_value + labour_charge + stones.total_price;

    ItemPriceResult {
        effective_weight: inputs.gross_weight + weight_addition,
        metal_value,
        labour_charge,
        stone_price: stones.total_price,
        stones,
        total_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_per_gram_labour() {
        // 10 g at 5573.33/g with 350/g labour
        let inputs = ItemPriceInputs::new(
            dec!(10),
            None,
            dec!(5573.33),
            LabourBasis::PerGram(dec!(350)),
            vec![],
        );
        let result = price(&inputs);

        assert_eq!(result.metal_value, dec!(55733.30));
        assert_eq!(result.labour_charge, dec!(3500));
        assert_eq!(result.stone_price, Decimal::ZERO);
        assert_eq!(result.total_price, dec!(59233.30));
        // Per-gram basis implies no weight addition
        assert_eq!(result.effective_weight, dec!(10));
    }

    #[test]
    fn test_percentage_labour() {
        // 8 g at 5000/g with 12% making
        let inputs = ItemPriceInputs::new(
            dec!(8),
            None,
            dec!(5000),
            LabourBasis::Percentage(dec!(12)),
            vec![],
        );
        let result = price(&inputs);

        assert_eq!(result.metal_value, dec!(40000));
        assert_eq!(result.labour_charge, dec!(4800));
        assert_eq!(result.total_price, dec!(44800));
        // 8 g + 12% = 8.96 g displayed after making
        assert_eq!(result.effective_weight, dec!(8.96));
    }

    #[test]
    fn test_metal_weight_defaults_to_gross() {
        let inputs = ItemPriceInputs::new(
            dec!(12.5),
            None,
            dec!(100),
            LabourBasis::PerGram(Decimal::ZERO),
            vec![],
        );
        assert_eq!(inputs.metal_weight, dec!(12.5));

        let tracked = ItemPriceInputs::new(
            dec!(12.5),
            Some(dec!(11.0)),
            dec!(100),
            LabourBasis::PerGram(Decimal::ZERO),
            vec![],
        );
        assert_eq!(tracked.metal_weight, dec!(11.0));
        assert_eq!(price(&tracked).metal_value, dec!(1100.0));
    }

    #[test]
    fn test_stone_total_feeds_item_price() {
        let stones = vec![
            StoneEntry::count_based("ruby stone", None, 2, dec!(50), dec!(1.2)),
            StoneEntry::count_based("kundan", None, 1, dec!(30), dec!(0.8)),
        ];
        let inputs = ItemPriceInputs::new(
            dec!(10),
            Some(dec!(8)),
            dec!(5000),
            LabourBasis::Percentage(dec!(10)),
            stones,
        );
        let result = price(&inputs);

        assert_eq!(result.metal_value, dec!(40000));
        assert_eq!(result.labour_charge, dec!(4000));
        assert_eq!(result.stone_price, dec!(144.0));
        assert_eq!(result.total_price, dec!(44144.0));
        assert_eq!(result.stones.total_weight_grams, dec!(2.0));
    }

    #[test]
    fn test_zero_rate_still_prices() {
        // Unresolvable rate propagates as zero: labour and stones still
        // total, and the implausible figure is the review signal.
        let inputs = ItemPriceInputs::new(
            dec!(10),
            None,
            Decimal::ZERO,
            LabourBasis::Percentage(dec!(12)),
            vec![StoneEntry::fixed("diamond", None, dec!(0.5), dec!(25000))],
        );
        let result = price(&inputs);

        assert_eq!(result.metal_value, Decimal::ZERO);
        assert_eq!(result.labour_charge, Decimal::ZERO);
        assert_eq!(result.total_price, dec!(25000));
    }
}
