//! # Render Queue
//!
//! Background rendering and upload of finalized invoices.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Render Queue                              │
//! │                                                                  │
//! │  submit(invoice) ──► in-flight set ──┬─► already queued? false   │
//! │                      (per invoice    │                           │
//! │                       number)        └─► spawn job:              │
//! │                                            render ──► upload     │
//! │                                                 │                │
//! │                                                 ▼                │
//! │                                      RenderEvent::{Completed,    │
//! │                                                    Failed}       │
//! │                                                                  │
//! │  • One job per invoice number at a time; duplicates are          │
//! │    rejected, never queued behind the running job.                │
//! │  • Failures are reported as events, not retried. The invoice     │
//! │    itself is already final — only the artifact is missing.       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use aurum_core::invoice::Invoice;

use crate::error::BillingError;

/// Event channel depth. Events are small; a UI that falls this far
/// behind back-pressures the job tasks.
const EVENT_BUFFER: usize = 32;

// =============================================================================
// Collaborator Seams
// =============================================================================

/// A rendered invoice artifact, ready to store.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub invoice_number: String,
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `application/pdf`.
    pub content_type: String,
}

/// Turns a finalized invoice into a printable document.
#[async_trait]
pub trait InvoiceRenderer: Send + Sync + 'static {
    async fn render(&self, invoice: &Invoice) -> Result<RenderedDocument, BillingError>;
}

/// Persists rendered documents and returns a retrievable location.
#[async_trait]
pub trait ArtifactStore: Send + Sync + 'static {
    async fn upload(&self, document: RenderedDocument) -> Result<String, BillingError>;
}

// =============================================================================
// Events
// =============================================================================

/// Outcome of one render job, delivered on the queue's event channel.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Completed {
        invoice_number: String,
        url: String,
    },
    Failed {
        invoice_number: String,
        reason: String,
    },
}

impl RenderEvent {
    pub fn invoice_number(&self) -> &str {
        match self {
            RenderEvent::Completed { invoice_number, .. } => invoice_number,
            RenderEvent::Failed { invoice_number, .. } => invoice_number,
        }
    }
}

// =============================================================================
// Queue
// =============================================================================

struct Inner<R, S> {
    renderer: R,
    store: S,
    events: mpsc::Sender<RenderEvent>,
    /// Invoice numbers with a job currently running.
    in_flight: Mutex<HashSet<String>>,
}

/// Deduplicating job queue over a renderer and an artifact store.
///
/// Cheap to clone; all clones share one in-flight set.
pub struct RenderQueue<R, S> {
    inner: Arc<Inner<R, S>>,
}

impl<R, S> Clone for RenderQueue<R, S> {
    fn clone(&self) -> Self {
        RenderQueue {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, S> RenderQueue<R, S>
where
    R: InvoiceRenderer,
    S: ArtifactStore,
{
    /// Builds the queue and hands back the event receiver.
    pub fn new(renderer: R, store: S) -> (Self, mpsc::Receiver<RenderEvent>) {
        let (events, event_rx) = mpsc::channel(EVENT_BUFFER);
        let queue = RenderQueue {
            inner: Arc::new(Inner {
                renderer,
                store,
                events,
                in_flight: Mutex::new(HashSet::new()),
            }),
        };
        (queue, event_rx)
    }

    /// Submits a render job for a finalized invoice.
    ///
    /// Returns `false` without spawning anything when a job for the
    /// same invoice number is still running. A fresh submit is allowed
    /// as soon as that job's event has been emitted.
    pub fn submit(&self, invoice: Invoice) -> bool {
        let number = invoice.invoice_number.clone();
        {
            // A panicked job cannot leave the set inconsistent, so a
            // poisoned lock is safe to take over.
            let mut in_flight = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !in_flight.insert(number.clone()) {
                debug!(invoice_number = %number, "render already in flight, skipping");
                return false;
            }
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let event = run_job(&inner, &invoice).await;
            inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&number);
            if inner.events.send(event).await.is_err() {
                warn!(invoice_number = %number, "render event receiver dropped");
            }
        });
        true
    }
}

async fn run_job<R, S>(inner: &Inner<R, S>, invoice: &Invoice) -> RenderEvent
where
    R: InvoiceRenderer,
    S: ArtifactStore,
{
    let number = invoice.invoice_number.clone();

    let document = match inner.renderer.render(invoice).await {
        Ok(document) => document,
        Err(err) => {
            warn!(invoice_number = %number, error = %err, "render failed");
            return RenderEvent::Failed {
                invoice_number: number,
                reason: err.to_string(),
            };
        }
    };

    match inner.store.upload(document).await {
        Ok(url) => {
            debug!(invoice_number = %number, url = %url, "render completed");
            RenderEvent::Completed {
                invoice_number: number,
                url,
            }
        }
        Err(err) => {
            warn!(invoice_number = %number, error = %err, "upload failed");
            RenderEvent::Failed {
                invoice_number: number,
                reason: err.to_string(),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
