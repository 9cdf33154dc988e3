//! # Invoice Validation
//!
//! The explicit, separately callable validation step.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  The calculation core always produces a number — an unresolvable    │
//! │  rate prices at zero, a runaway discount drives the taxable         │
//! │  amount negative, and a payment split that doesn't add up is        │
//! │  still accepted. None of that is silently OK; it is all REPORTED    │
//! │  here instead of thrown mid-calculation:                            │
//! │                                                                     │
//! │     edit ──► calculate() ──► totals (always)                        │
//! │                  │                                                  │
//! │                  └──► validate_invoice() ──► [issues] ──► UI        │
//! │                                                                     │
//! │  A caller that wants "fail fast" runs validation and refuses to     │
//! │  issue when the list is non-empty. A caller that wants the live     │
//! │  number keeps typing and fixes the warnings afterwards.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::invoice::{Invoice, InvoiceDraft};
use crate::money::SPLIT_TOLERANCE;

/// A finding against a draft or invoice. Findings are reported, never
/// thrown — the calculation has already completed by the time these
/// are produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    #[error("discount {discount} exceeds subtotal {subtotal}")]
    DiscountExceedsSubtotal { discount: Decimal, subtotal: Decimal },

    #[error("payment split totals {split_total} but net amount is {net_amount}")]
    PaymentSplitMismatch {
        split_total: Decimal,
        net_amount: Decimal,
    },

    #[error("line '{description}' priced at zero (unresolved metal rate?)")]
    ZeroPricedItem { description: String },

    #[error("line '{description}' has a negative weight")]
    NegativeWeight { description: String },

    #[error("invoice number is empty")]
    EmptyInvoiceNumber,
}

/// Checks a draft before (or while) it is being edited.
pub fn validate_draft(draft: &InvoiceDraft) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if draft.invoice_number.trim().is_empty() {
        issues.push(ValidationIssue::EmptyInvoiceNumber);
    }

    let subtotal: Decimal = draft
        .items
        .iter()
        .map(|item| item.pricing.gross_price)
        .sum();
    if draft.discount > subtotal {
        issues.push(ValidationIssue::DiscountExceedsSubtotal {
            discount: draft.discount,
            subtotal,
        });
    }

    for item in &draft.items {
        if item.pricing.gross_price == Decimal::ZERO {
            issues.push(ValidationIssue::ZeroPricedItem {
                description: item.description.clone(),
            });
        }
        if item.gross_weight < Decimal::ZERO
            || item.pricing.net_metal_weight < Decimal::ZERO
            || item.pricing.net_stone_weight < Decimal::ZERO
        {
            issues.push(ValidationIssue::NegativeWeight {
                description: item.description.clone(),
            });
        }
    }

    issues
}

/// Checks a Final invoice before issuance, including the payment-split
/// reconciliation against the computed net amount.
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if invoice.invoice_number.trim().is_empty() {
        issues.push(ValidationIssue::EmptyInvoiceNumber);
    }

    if invoice.discount > invoice.subtotal {
        issues.push(ValidationIssue::DiscountExceedsSubtotal {
            discount: invoice.discount,
            subtotal: invoice.subtotal,
        });
    }

    let split_total = invoice.payment.total();
    if (split_total - invoice.net_amount).abs() > SPLIT_TOLERANCE {
        issues.push(ValidationIssue::PaymentSplitMismatch {
            split_total,
            net_amount: invoice.net_amount,
        });
    }

    for item in &invoice.items {
        if item.gross_price == Decimal::ZERO {
            issues.push(ValidationIssue::ZeroPricedItem {
                description: item.description.clone(),
            });
        }
    }

    issues
}
