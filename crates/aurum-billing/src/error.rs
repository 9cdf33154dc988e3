//! # Billing Error Types

use thiserror::Error;

/// Errors from session orchestration and render jobs.
#[derive(Debug, Error)]
pub enum BillingError {
    /// The session worker has shut down; its command channel is closed.
    #[error("billing session closed")]
    SessionClosed,

    /// An internal channel closed unexpectedly.
    #[error("channel error: {0}")]
    ChannelError(String),

    /// The renderer reported a failure for an invoice.
    #[error("render failed for invoice {invoice_number}: {reason}")]
    RenderFailed {
        invoice_number: String,
        reason: String,
    },

    /// The artifact store rejected or failed the upload.
    #[error("upload failed for invoice {invoice_number}: {reason}")]
    UploadFailed {
        invoice_number: String,
        reason: String,
    },
}

/// Convenience alias for Results with BillingError.
pub type BillingResult<T> = Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BillingError::RenderFailed {
            invoice_number: "INV-7".to_string(),
            reason: "font missing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "render failed for invoice INV-7: font missing"
        );
        assert_eq!(BillingError::SessionClosed.to_string(), "billing session closed");
    }
}
