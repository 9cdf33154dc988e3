//! # Invoice Assembly (Draft → Final)
//!
//! The two-state invoice lifecycle: a mutable **Draft** edited field by
//! field, and an immutable **Final** produced by one [`calculate`] call.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Draft → Final Lifecycle                          │
//! │                                                                     │
//! │    new draft ──► edit ──► edit ──► … ──► calculate() ──► Invoice    │
//! │       ▲                                                    │        │
//! │       └──────────────────── reopen() ──────────────────────┘        │
//! │                                                                     │
//! │  • Any draft edit invalidates a previously produced Final; the      │
//! │    only path forward is a fresh calculate() call.                   │
//! │  • reopen() carries every PRESERVED per-item price verbatim —       │
//! │    header edits (discount, tax, exchange gold, parties) never       │
//! │    touch an already-issued line price. That is what makes an        │
//! │    issued invoice legally reproducible after rates move.            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals Pipeline
//! ```text
//! subtotal      = Σ preserved gross prices        (never recomputed)
//! afterExchange = max(0, subtotal − exchangeGold)
//! taxable       = afterExchange − discount        (NOT clamped)
//! tax           = taxable × pct / 100
//! grossTotal    = taxable + tax
//! netAmount     = round(grossTotal)   roundingDelta = net − gross
//! ```
//!
//! A discount larger than the subtotal legally drives `taxable`
//! negative; surfacing the negative number is how the caller detects
//! the bad discount. See [`crate::validation`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::{self, ItemPriceInputs, ItemPriceResult, LabourBasis};
use crate::money::{percent_of, round_rupees};
use crate::reference::reference_number;

// =============================================================================
// Parties & Snapshots
// =============================================================================

/// Seller or buyer details as they appear on the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub gstin: Option<String>,
}

/// Seller bank details frozen onto the invoice at calculation time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSnapshot {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc: String,
    pub branch: String,
}

/// E-way/acknowledgement details when the document was registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgement {
    pub number: String,
    pub date: DateTime<Utc>,
}

/// How the net amount was tendered.
///
/// The assembler never validates the split — it only computes. The
/// mismatch check lives in [`crate::validation`] so the front end can
/// report it while the totals stay live.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSplit {
    pub cash: Decimal,
    /// Bank, card and online amounts aggregated.
    pub non_cash: Decimal,
    pub due: Decimal,
}

impl PaymentSplit {
    pub fn total(&self) -> Decimal {
        self.cash + self.non_cash + self.due
    }
}

// =============================================================================
// Line Items: preserved vs. editable
// =============================================================================

/// The price components of a line item that are **preserved**: carried
/// through every header edit byte-identical, replaced only by an
/// explicit reprice of that line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreservedPricing {
    pub gross_price: Decimal,
    pub labour_charges: Decimal,
    pub stone_amount: Decimal,
    pub net_stone_weight: Decimal,
    pub net_metal_weight: Decimal,
}

impl PreservedPricing {
    /// Snapshots a calculator run into the preserved shape.
    pub fn capture(inputs: &ItemPriceInputs, result: &ItemPriceResult) -> Self {
        PreservedPricing {
            gross_price: result.total_price,
            labour_charges: result.labour_charge,
            stone_amount: result.stone_price,
            net_stone_weight: result.stones.total_weight_grams,
            net_metal_weight: inputs.metal_weight,
        }
    }
}

/// One editable line on a draft.
///
/// Editable fields (quantity, weights, making %, barcode) sit beside
/// the [`PreservedPricing`] block; the assembler reads the preserved
/// block and nothing else when totalling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemDraft {
    pub id: String,
    pub description: String,
    pub quantity: u32,
    pub gross_weight: Decimal,
    /// Display-only making percentage, when that basis priced the line.
    pub making_percent: Option<Decimal>,
    pub barcode: Option<String>,
    pub pricing: PreservedPricing,
}

impl InvoiceItemDraft {
    /// Prices a new line from raw inputs and freezes the result.
    pub fn priced(
        description: &str,
        quantity: u32,
        barcode: Option<&str>,
        inputs: &ItemPriceInputs,
    ) -> Self {
        let result = item::price(inputs);
        InvoiceItemDraft {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            quantity,
            gross_weight: inputs.gross_weight,
            making_percent: match inputs.labour {
                LabourBasis::Percentage(pct) => Some(pct),
                LabourBasis::PerGram(_) => None,
            },
            barcode: barcode.map(str::to_string),
            pricing: PreservedPricing::capture(inputs, &result),
        }
    }

    /// The one sanctioned way to replace a preserved price: an explicit
    /// recalculation of this line from fresh inputs.
    pub fn reprice(&mut self, inputs: &ItemPriceInputs) {
        let result = item::price(inputs);
        self.gross_weight = inputs.gross_weight;
        self.making_percent = match inputs.labour {
            LabourBasis::Percentage(pct) => Some(pct),
            LabourBasis::PerGram(_) => None,
        };
        self.pricing = PreservedPricing::capture(inputs, &result);
    }
}

/// A computed line on a Final invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub description: String,
    pub quantity: u32,
    pub gross_weight: Decimal,
    pub making_percent: Option<Decimal>,
    pub barcode: Option<String>,
    pub gross_price: Decimal,
    pub labour_charges: Decimal,
    pub stone_amount: Decimal,
    pub net_stone_weight: Decimal,
    pub net_metal_weight: Decimal,
}

// =============================================================================
// Draft
// =============================================================================

/// Caller-settable override fields. When unset, [`calculate`] derives a
/// deterministic default (see the field docs on [`Invoice`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceOverrides {
    pub memo_number: Option<String>,
    pub city: Option<String>,
    pub delivery_place: Option<String>,
}

/// The mutable, in-progress invoice. Created once per billing
/// transaction (or via [`Invoice::reopen`]), edited field by field,
/// discarded once a Final is produced or the session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub invoice_number: String,
    pub issued_at: DateTime<Utc>,
    pub seller: Party,
    pub buyer: Party,
    pub items: Vec<InvoiceItemDraft>,
    /// Credit for traded-in gold, applied before the discount.
    pub exchange_gold_value: Decimal,
    pub discount: Decimal,
    pub tax_percent: Decimal,
    pub payment: PaymentSplit,
    pub notes: Option<String>,
    pub overrides: InvoiceOverrides,
    pub acknowledgement: Option<Acknowledgement>,
    pub bank: BankSnapshot,
}

impl InvoiceDraft {
    pub fn new(
        invoice_number: &str,
        issued_at: DateTime<Utc>,
        seller: Party,
        buyer: Party,
        bank: BankSnapshot,
    ) -> Self {
        InvoiceDraft {
            invoice_number: invoice_number.to_string(),
            issued_at,
            seller,
            buyer,
            items: Vec::new(),
            exchange_gold_value: Decimal::ZERO,
            discount: Decimal::ZERO,
            tax_percent: Decimal::ZERO,
            payment: PaymentSplit::default(),
            notes: None,
            overrides: InvoiceOverrides::default(),
            acknowledgement: None,
            bank,
        }
    }
}

// =============================================================================
// Final Invoice
// =============================================================================

/// The immutable, fully computed invoice. Once produced it is never
/// mutated — any change goes through [`Invoice::reopen`] and a fresh
/// [`calculate`] cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    pub issued_at: DateTime<Utc>,
    pub seller: Party,
    pub buyer: Party,
    pub items: Vec<InvoiceItem>,

    pub subtotal: Decimal,
    pub exchange_gold_value: Decimal,
    pub discount: Decimal,
    /// May be negative when the discount exceeds the subtotal; not
    /// clamped so the condition stays visible.
    pub taxable_amount: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub gross_total: Decimal,
    /// `net_amount - gross_total`, always in (-1, 1).
    pub rounding_delta: Decimal,
    pub net_amount: Decimal,

    pub payment: PaymentSplit,
    pub notes: Option<String>,

    /// Caller override, or the last four characters of the invoice
    /// number.
    pub memo_number: String,
    /// Caller override, or the buyer address text before the first
    /// comma.
    pub city: String,
    /// Caller override, or the same default as `city`.
    pub delivery_place: String,

    /// `hex(SHA-256(invoice_number || epoch_millis))`.
    pub reference_number: String,
    pub acknowledgement: Option<Acknowledgement>,
    pub bank: BankSnapshot,
}

impl Invoice {
    /// Converts this Final back into an editable Draft.
    ///
    /// Every preserved per-item price field comes back verbatim, and
    /// the issued document's memo/city/delivery values return as
    /// explicit overrides — so an untouched reopened draft calculates
    /// back to this exact invoice.
    pub fn reopen(&self) -> InvoiceDraft {
        InvoiceDraft {
            invoice_number: self.invoice_number.clone(),
            issued_at: self.issued_at,
            seller: self.seller.clone(),
            buyer: self.buyer.clone(),
            items: self
                .items
                .iter()
                .map(|item| InvoiceItemDraft {
                    id: item.id.clone(),
                    description: item.description.clone(),
                    quantity: item.quantity,
                    gross_weight: item.gross_weight,
                    making_percent: item.making_percent,
                    barcode: item.barcode.clone(),
                    pricing: PreservedPricing {
                        gross_price: item.gross_price,
                        labour_charges: item.labour_charges,
                        stone_amount: item.stone_amount,
                        net_stone_weight: item.net_stone_weight,
                        net_metal_weight: item.net_metal_weight,
                    },
                })
                .collect(),
            exchange_gold_value: self.exchange_gold_value,
            discount: self.discount,
            tax_percent: self.tax_percent,
            payment: self.payment,
            notes: self.notes.clone(),
            overrides: InvoiceOverrides {
                memo_number: Some(self.memo_number.clone()),
                city: Some(self.city.clone()),
                delivery_place: Some(self.delivery_place.clone()),
            },
            acknowledgement: self.acknowledgement.clone(),
            bank: self.bank.clone(),
        }
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Last four characters of the invoice number (whole number if shorter).
fn default_memo_number(invoice_number: &str) -> String {
    let chars: Vec<char> = invoice_number.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

/// Buyer address text before the first comma, trimmed.
fn default_city(address: &str) -> String {
    address.split(',').next().unwrap_or("").trim().to_string()
}

/// Produces the Final invoice from a draft.
///
/// Pure and idempotent: the same unmodified draft yields a
/// bit-identical [`Invoice`], reference number included. The assembler
/// sums already-priced items; it never re-derives a line price from
/// catalog or rate data.
pub fn calculate(draft: &InvoiceDraft) -> Invoice {
    let subtotal: Decimal = draft
        .items
        .iter()
        .map(|item| item.pricing.gross_price)
        .sum();

    let after_exchange = (subtotal - draft.exchange_gold_value).max(Decimal::ZERO);
    let taxable_amount = after_exchange - draft.discount;
    let tax_amount = percent_of(taxable_amount, draft.tax_percent);
    let gross_total = taxable_amount + tax_amount;
    let net_amount = round_rupees(gross_total);
    let rounding_delta = net_amount - gross_total;

    let city = draft
        .overrides
        .city
        .clone()
        .unwrap_or_else(|| default_city(&draft.buyer.address));
    let delivery_place = draft.overrides.delivery_place.clone().unwrap_or_else(|| city.clone());
    let memo_number = draft
        .overrides
        .memo_number
        .clone()
        .unwrap_or_else(|| default_memo_number(&draft.invoice_number));

    Invoice {
        invoice_number: draft.invoice_number.clone(),
        issued_at: draft.issued_at,
        seller: draft.seller.clone(),
        buyer: draft.buyer.clone(),
        items: draft
            .items
            .iter()
            .map(|item| InvoiceItem {
                id: item.id.clone(),
                description: item.description.clone(),
                quantity: item.quantity,
                gross_weight: item.gross_weight,
                making_percent: item.making_percent,
                barcode: item.barcode.clone(),
                gross_price: item.pricing.gross_price,
                labour_charges: item.pricing.labour_charges,
                stone_amount: item.pricing.stone_amount,
                net_stone_weight: item.pricing.net_stone_weight,
                net_metal_weight: item.pricing.net_metal_weight,
            })
            .collect(),
        subtotal,
        exchange_gold_value: draft.exchange_gold_value,
        discount: draft.discount,
        taxable_amount,
        tax_percent: draft.tax_percent,
        tax_amount,
        gross_total,
        rounding_delta,
        net_amount,
        payment: draft.payment,
        notes: draft.notes.clone(),
        memo_number,
        city,
        delivery_place,
        reference_number: reference_number(&draft.invoice_number, draft.issued_at),
        acknowledgement: draft.acknowledgement.clone(),
        bank: draft.bank.clone(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
