//! # aurum-core: Pure Pricing Logic for Aurum POS
//!
//! This crate is the **heart** of Aurum POS. It turns raw jewelry inputs
//! (metal purity, weights, making charges, stone costs, discounts,
//! exchange-gold credit, tax rate) into a legally reproducible invoice,
//! as pure functions with zero I/O dependencies.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Aurum POS Pricing Pipeline                      │
//! │                                                                     │
//! │  Rate table ──► purity::resolve_rate ──┐                            │
//! │                                        │                            │
//! │  Stone list ──► stone::aggregate ──────┼──► item::price             │
//! │                                        │        │                   │
//! │  Weights, labour basis ────────────────┘        ▼                   │
//! │                                         ItemPriceResult             │
//! │                                                 │                   │
//! │  Header fields (discount, tax, exchange gold)   ▼                   │
//! │  ─────────────────────────────────────► invoice::calculate          │
//! │                                                 │                   │
//! │                                                 ▼                   │
//! │                                      Invoice (frozen, immutable)    │
//! │                                                                     │
//! │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`purity`] - Karat/fineness parsing and proportional rate resolution
//! - [`rates`] - Metal rate table and the [`rates::RateProvider`] seam
//! - [`stone`] - Stone/material cost aggregation
//! - [`item`] - Per-item price calculation
//! - [`invoice`] - Draft → Final invoice assembly
//! - [`reference`] - Deterministic reference-number generation
//! - [`validation`] - Explicit, separately callable invoice checks
//! - [`money`] - Decimal rounding helpers
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **Always produce a number**: unresolvable rates calculate as zero
//!    and malformed purity labels fall back to 22K; callers surface the
//!    problem via [`validation`] instead of a failed invoice
//! 3. **Preserve, don't recompute**: once a line item is priced, its
//!    price survives every header edit verbatim
//! 4. **Explicit decimals**: all weights, rates and amounts are
//!    `rust_decimal::Decimal` with explicit rounding points
//!
//! ## Example
//!
//! ```rust
//! use aurum_core::purity::{resolve_rate, Purity};
//! use rust_decimal_macros::dec;
//!
//! // 24K gold trades at 6080/g; price a 22K item
//! let rate = resolve_rate(dec!(6080), Purity::k24(), Purity::k22());
//! assert_eq!(aurum_core::money::round_display(rate), dec!(5573.33));
//! ```

pub mod error;
pub mod invoice;
pub mod item;
pub mod money;
pub mod purity;
pub mod rates;
pub mod reference;
pub mod stone;
pub mod validation;

// Re-exports so callers can `use aurum_core::Invoice` directly.
pub use error::{CoreError, CoreResult};
pub use invoice::{
    calculate, Acknowledgement, BankSnapshot, Invoice, InvoiceDraft, InvoiceItem,
    InvoiceItemDraft, InvoiceOverrides, Party, PaymentSplit, PreservedPricing,
};
pub use item::{price, ItemPriceInputs, ItemPriceResult, LabourBasis};
pub use purity::{resolve_rate, ParsedPurity, Purity};
pub use rates::{BaseRate, MetalRate, MetalRateTable, RateProvider};
pub use stone::{aggregate, StoneEntry, StoneKind, StoneTotals};
pub use validation::ValidationIssue;
