//! # aurum-billing: Async Orchestration Around the Pricing Core
//!
//! The calculation core in `aurum-core` is synchronous and pure; this
//! crate owns the two places where concurrency genuinely enters:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        aurum-billing                                │
//! │                                                                     │
//! │  UI events ──► SessionHandle ──► [single-writer worker task]        │
//! │                                     │  owns the InvoiceDraft        │
//! │                                     │  coalesces queued edits       │
//! │                                     ▼                               │
//! │                            aurum_core::calculate                    │
//! │                                     │                               │
//! │                                     ▼                               │
//! │                        watch channel (latest Invoice)               │
//! │                                     │                               │
//! │            finalize ────────────────┤                               │
//! │                                     ▼                               │
//! │                         RenderQueue::submit(invoice)                │
//! │                            │ at most ONE job per invoice number     │
//! │                            ▼                                        │
//! │              InvoiceRenderer ──► ArtifactStore ──► RenderEvent      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`session`] - the single-writer draft edit loop
//! - [`render`] - deduplicated render/upload jobs and collaborator traits
//! - [`error`] - billing error types
//! - [`telemetry`] - tracing subscriber setup

pub mod error;
pub mod render;
pub mod session;
pub mod telemetry;

pub use error::{BillingError, BillingResult};
pub use render::{ArtifactStore, InvoiceRenderer, RenderEvent, RenderQueue, RenderedDocument};
pub use session::{DraftEdit, SessionHandle};
