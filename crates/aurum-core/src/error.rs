//! # Error Types
//!
//! Domain error types for aurum-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  aurum-core errors (this file)                                      │
//! │  └── CoreError         - construction/invariant failures            │
//! │                                                                     │
//! │  aurum-core soft findings (validation module)                       │
//! │  └── ValidationIssue   - reported, never thrown mid-calculation     │
//! │                                                                     │
//! │  aurum-billing errors (separate crate)                              │
//! │  └── BillingError      - session/render/upload failures             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculation pipeline itself never returns `CoreError`: it favors
//! "always produce a number" and leaves rejection to callers via the
//! [`crate::validation`] module. `CoreError` guards the few places where
//! a value cannot even be constructed (e.g. a negative metal rate).

use rust_decimal::Decimal;
use thiserror::Error;

/// Construction and invariant errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A metal rate below zero can never enter the rate table.
    #[error("rate for {material} ({purity_label}) must be non-negative, got {rate}")]
    NegativeRate {
        material: String,
        purity_label: String,
        rate: Decimal,
    },

    /// Material identifiers key the rate table and must not be blank.
    #[error("material identifier is required")]
    EmptyMaterial,
}

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
