//! # Metal Rate Table
//!
//! Reference rates per material and purity, plus the [`RateProvider`]
//! seam the item calculator is injected with.
//!
//! ## No Ambient State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  The rate table is an explicit collaborator, not a singleton:       │
//! │                                                                     │
//! │     rate feed ──► MetalRateTable (owned by the app layer)           │
//! │                        │                                            │
//! │                        │ &dyn RateProvider, passed per call         │
//! │                        ▼                                            │
//! │                 item::price(inputs)                                 │
//! │                                                                     │
//! │  A priced line item NEVER observes a later rate change — pricing    │
//! │  snapshots the resolved rate into its inputs at call time.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Audit Trail
//! Each upsert displaces the previous quote into `previous`, so the UI
//! can show "rate changed from X at HH:MM" next to the live value.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::purity::{resolve_rate, Purity};

/// The displaced quote kept for audit when a rate is updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousRate {
    pub rate_per_gram: Decimal,
    pub recorded_at: DateTime<Utc>,
}

/// A reference price per gram for one material at one purity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetalRate {
    /// Material identifier, stored lowercase ("gold", "silver").
    pub material: String,

    /// The purity label as entered, canonicalized spelling.
    pub purity_label: String,

    /// The parsed purity the label resolved to.
    pub purity: Purity,

    /// Price per gram at this purity. Never negative.
    pub rate_per_gram: Decimal,

    /// When this quote was recorded.
    pub updated_at: DateTime<Utc>,

    /// The quote this one displaced, if any.
    pub previous: Option<PreviousRate>,
}

impl MetalRate {
    /// Builds a rate entry, enforcing the non-negative price invariant.
    ///
    /// The purity label goes through the documented parse-with-fallback:
    /// a malformed label resolves to 22K rather than failing, matching
    /// the calculation pipeline's behavior.
    pub fn new(
        material: &str,
        purity_label: &str,
        rate_per_gram: Decimal,
        updated_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let material = material.trim().to_lowercase();
        if material.is_empty() {
            return Err(CoreError::EmptyMaterial);
        }
        if rate_per_gram < Decimal::ZERO {
            return Err(CoreError::NegativeRate {
                material,
                purity_label: purity_label.to_string(),
                rate: rate_per_gram,
            });
        }

        let parsed = Purity::parse(purity_label);
        Ok(MetalRate {
            material,
            purity_label: crate::purity::normalize_label(purity_label),
            purity: parsed.purity(),
            rate_per_gram,
            updated_at,
            previous: None,
        })
    }
}

/// Supplies the base reference rate for a material.
///
/// This is the injection seam for the item calculator: no global
/// "current rates" object, the provider travels with the call.
pub trait RateProvider {
    /// The base reference rate for a material (e.g. gold at 24K),
    /// or `None` when the material has no quote.
    fn base_rate(&self, material: &str) -> Option<BaseRate>;

    /// Resolves the per-gram rate for a material at a target purity.
    ///
    /// Missing material or unresolvable purity yields zero — the
    /// invoice still calculates and the zero line total surfaces the
    /// problem for review.
    fn resolved_rate(&self, material: &str, target: Purity) -> Decimal {
        match self.base_rate(material) {
            Some(base) => resolve_rate(base.rate_per_gram, base.purity, target),
            None => Decimal::ZERO,
        }
    }
}

/// A base reference price: per-gram rate and the purity it is quoted at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRate {
    pub rate_per_gram: Decimal,
    pub purity: Purity,
}

/// In-memory rate table keyed by material and parsed purity.
///
/// Keys use the parsed numeric purity, not the raw label, so "22",
/// "22K" and "22k" all address the same row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetalRateTable {
    entries: HashMap<String, MetalRate>,
}

impl MetalRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(material: &str, purity: Purity) -> String {
        format!(
            "{}@{}",
            material.trim().to_lowercase(),
            purity.value().normalize()
        )
    }

    /// Inserts or replaces a quote, keeping the displaced value for audit.
    pub fn upsert(&mut self, mut rate: MetalRate) {
        let key = Self::key(&rate.material, rate.purity);
        if let Some(old) = self.entries.get(&key) {
            rate.previous = Some(PreviousRate {
                rate_per_gram: old.rate_per_gram,
                recorded_at: old.updated_at,
            });
        }
        self.entries.insert(key, rate);
    }

    /// Looks up a quote by material and purity label (any spelling).
    pub fn get(&self, material: &str, purity_label: &str) -> Option<&MetalRate> {
        let purity = Purity::parse(purity_label).purity();
        self.entries.get(&Self::key(material, purity))
    }

    /// Number of quotes in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RateProvider for MetalRateTable {
    /// The highest-purity quote for a material is its base reference
    /// (24K for gold, 999 for silver under normal data).
    fn base_rate(&self, material: &str) -> Option<BaseRate> {
        let material = material.trim().to_lowercase();
        self.entries
            .values()
            .filter(|r| r.material == material)
            .max_by_key(|r| r.purity)
            .map(|r| BaseRate {
                rate_per_gram: r.rate_per_gram,
                purity: r.purity,
            })
    }
}
