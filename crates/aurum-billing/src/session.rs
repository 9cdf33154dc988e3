//! # Billing Session
//!
//! The single-writer edit loop around one invoice draft.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Billing Session Worker                           │
//! │                                                                     │
//! │   UI thread(s)                      worker task (owns the draft)    │
//! │   ───────────                       ────────────────────────────    │
//! │   edit(SetDiscount) ──┐                                             │
//! │   edit(SetTaxPercent)─┼─► mpsc ──► recv ──► apply                   │
//! │   edit(AddItem) ──────┘              │      apply   (drain: every   │
//! │                                      │      apply    queued edit)   │
//! │                                      ▼                              │
//! │                              calculate(draft)   ← ONE pass          │
//! │                                      │                              │
//! │                                      ▼                              │
//! │                           watch::send(Invoice)                      │
//! │                                                                     │
//! │  • Edits are applied strictly in arrival order.                     │
//! │  • An edit arriving while a pass runs never cancels it — the pass   │
//! │    completes, then exactly one fresh pass covers everything queued  │
//! │    since. Draining the channel before recalculating is what         │
//! │    coalesces an edit burst into one pass.                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use aurum_core::invoice::{
    calculate, Acknowledgement, Invoice, InvoiceDraft, InvoiceItemDraft, InvoiceOverrides,
    Party, PaymentSplit,
};
use aurum_core::item::ItemPriceInputs;
use rust_decimal::Decimal;

use crate::error::{BillingError, BillingResult};

/// Command channel depth; an edit burst larger than this back-pressures
/// the sender instead of growing unbounded.
const COMMAND_BUFFER: usize = 64;

// =============================================================================
// Edits
// =============================================================================

/// One field-level edit to the draft. Everything the billing screen can
/// change goes through this enum — there is no other writer.
#[derive(Debug)]
pub enum DraftEdit {
    SetDiscount(Decimal),
    SetTaxPercent(Decimal),
    SetExchangeGold(Decimal),
    SetSeller(Party),
    SetBuyer(Party),
    SetPaymentSplit(PaymentSplit),
    SetNotes(Option<String>),
    SetOverrides(InvoiceOverrides),
    SetAcknowledgement(Option<Acknowledgement>),
    AddItem(InvoiceItemDraft),
    /// Removes a line by item id. Unknown ids are ignored.
    RemoveItem(String),
    /// The explicit reprice path: recalculates ONE line from fresh
    /// inputs. Header edits never do this implicitly.
    RepriceItem {
        item_id: String,
        inputs: ItemPriceInputs,
    },
}

enum Command {
    Edit(DraftEdit),
    Finalize(oneshot::Sender<Invoice>),
    Close,
}

// =============================================================================
// Session Handle
// =============================================================================

/// Cloneable handle to a running billing session.
///
/// The worker task owns the draft; the handle only sends commands and
/// observes published invoices.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    invoices: watch::Receiver<Invoice>,
}

impl SessionHandle {
    /// Spawns the session worker for a draft and publishes the initial
    /// calculation immediately.
    pub fn spawn(draft: InvoiceDraft) -> Self {
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let initial = calculate(&draft);
        let (watch_tx, invoices) = watch::channel(initial);

        info!(invoice_number = %draft.invoice_number, "billing session started");
        tokio::spawn(run_session(draft, command_rx, watch_tx));

        SessionHandle { commands, invoices }
    }

    /// Queues one field edit. The worker recalculates after applying it
    /// (and any other edits already queued behind it).
    pub async fn edit(&self, edit: DraftEdit) -> BillingResult<()> {
        self.commands
            .send(Command::Edit(edit))
            .await
            .map_err(|_| BillingError::SessionClosed)
    }

    /// Returns the invoice reflecting every edit submitted before this
    /// call resolved.
    pub async fn finalize(&self) -> BillingResult<Invoice> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Finalize(reply_tx))
            .await
            .map_err(|_| BillingError::SessionClosed)?;
        reply_rx
            .await
            .map_err(|_| BillingError::ChannelError("finalize reply dropped".into()))
    }

    /// The most recently published invoice, without waiting.
    pub fn latest(&self) -> Invoice {
        self.invoices.borrow().clone()
    }

    /// A watch receiver for observing recalculations as they publish.
    pub fn subscribe(&self) -> watch::Receiver<Invoice> {
        self.invoices.clone()
    }

    /// Gracefully stops the worker. Commands already queued ahead of
    /// the close are still processed.
    pub async fn close(&self) -> BillingResult<()> {
        self.commands
            .send(Command::Close)
            .await
            .map_err(|_| BillingError::SessionClosed)
    }
}

// =============================================================================
// Worker
// =============================================================================

async fn run_session(
    mut draft: InvoiceDraft,
    mut commands: mpsc::Receiver<Command>,
    published: watch::Sender<Invoice>,
) {
    while let Some(first) = commands.recv().await {
        let mut finalize_replies = Vec::new();
        let mut dirty = false;
        let mut closing = false;

        // Apply the received command plus everything already queued,
        // then recalculate once for the whole batch.
        let mut next = Some(first);
        while let Some(command) = next.take() {
            match command {
                Command::Edit(edit) => {
                    apply_edit(&mut draft, edit);
                    dirty = true;
                }
                Command::Finalize(reply) => finalize_replies.push(reply),
                Command::Close => {
                    closing = true;
                    break;
                }
            }
            next = commands.try_recv().ok();
        }

        if dirty {
            let invoice = calculate(&draft);
            debug!(
                invoice_number = %invoice.invoice_number,
                net_amount = %invoice.net_amount,
                "recalculated"
            );
            // Receivers may all be gone; the draft state is still valid.
            let _ = published.send(invoice);
        }

        for reply in finalize_replies {
            let _ = reply.send(published.borrow().clone());
        }

        if closing {
            break;
        }
    }

    info!(invoice_number = %draft.invoice_number, "billing session closed");
}

fn apply_edit(draft: &mut InvoiceDraft, edit: DraftEdit) {
    match edit {
        DraftEdit::SetDiscount(value) => draft.discount = value,
        DraftEdit::SetTaxPercent(value) => draft.tax_percent = value,
        DraftEdit::SetExchangeGold(value) => draft.exchange_gold_value = value,
        DraftEdit::SetSeller(party) => draft.seller = party,
        DraftEdit::SetBuyer(party) => draft.buyer = party,
        DraftEdit::SetPaymentSplit(split) => draft.payment = split,
        DraftEdit::SetNotes(notes) => draft.notes = notes,
        DraftEdit::SetOverrides(overrides) => draft.overrides = overrides,
        DraftEdit::SetAcknowledgement(ack) => draft.acknowledgement = ack,
        DraftEdit::AddItem(item) => draft.items.push(item),
        DraftEdit::RemoveItem(item_id) => draft.items.retain(|item| item.id != item_id),
        DraftEdit::RepriceItem { item_id, inputs } => {
            if let Some(item) = draft.items.iter_mut().find(|item| item.id == item_id) {
                item.reprice(&inputs);
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use aurum_core::invoice::BankSnapshot;
    use aurum_core::item::LabourBasis;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn party(name: &str, address: &str) -> Party {
        Party {
            name: name.to_string(),
            address: address.to_string(),
            phone: None,
            gstin: None,
        }
    }

    fn draft_with_item() -> InvoiceDraft {
        let issued_at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        let mut draft = InvoiceDraft::new(
            "INV-2024-0042",
            issued_at,
            party("Aurum Jewellers", "14 Chandni Chowk, Delhi"),
            party("R. Sharma", "Lane 2, Jaipur"),
            BankSnapshot::default(),
        );
        let inputs = ItemPriceInputs::new(
            dec!(10),
            Some(dec!(8)),
            dec!(5000),
            LabourBasis::Percentage(dec!(10)),
            vec![],
        );
        draft
            .items
            .push(InvoiceItemDraft::priced("Gold ring", 1, None, &inputs));
        draft
    }

    #[tokio::test]
    async fn test_edits_reflected_in_finalize() {
        let session = SessionHandle::spawn(draft_with_item());

        session.edit(DraftEdit::SetDiscount(dec!(500))).await.unwrap();
        session.edit(DraftEdit::SetTaxPercent(dec!(3))).await.unwrap();

        let invoice = session.finalize().await.unwrap();
        // 44000 subtotal − 500 discount, 3% tax
        assert_eq!(invoice.subtotal, dec!(44000));
        assert_eq!(invoice.taxable_amount, dec!(43500));
        assert_eq!(invoice.tax_amount, dec!(1305));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_initial_invoice_published_immediately() {
        let session = SessionHandle::spawn(draft_with_item());
        let invoice = session.latest();
        assert_eq!(invoice.subtotal, dec!(44000));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_header_edits_preserve_item_pricing() {
        let session = SessionHandle::spawn(draft_with_item());
        let before = session.finalize().await.unwrap();

        session.edit(DraftEdit::SetDiscount(dec!(900))).await.unwrap();
        session
            .edit(DraftEdit::SetExchangeGold(dec!(2000)))
            .await
            .unwrap();

        let after = session.finalize().await.unwrap();
        assert_eq!(after.items, before.items);
        assert_ne!(after.net_amount, before.net_amount);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_edit_burst_lands_in_one_consistent_invoice() {
        let session = SessionHandle::spawn(draft_with_item());

        for discount in 1..=50i64 {
            session
                .edit(DraftEdit::SetDiscount(Decimal::from(discount)))
                .await
                .unwrap();
        }

        let invoice = session.finalize().await.unwrap();
        // The last edit wins regardless of how many passes coalesced
        assert_eq!(invoice.discount, dec!(50));
        assert_eq!(invoice.taxable_amount, dec!(43950));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_edit_burst_coalesces_publications() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let session = SessionHandle::spawn(draft_with_item());

        let recalcs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&recalcs);
        let mut publications = session.subscribe();
        tokio::spawn(async move {
            while publications.changed().await.is_ok() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        // Single-threaded test runtime: the worker stays parked while
        // the burst queues, so it drains the lot in a few batches at
        // most instead of one pass per edit.
        for discount in 1..=50i64 {
            session
                .edit(DraftEdit::SetDiscount(Decimal::from(discount)))
                .await
                .unwrap();
        }
        let invoice = session.finalize().await.unwrap();
        assert_eq!(invoice.discount, dec!(50));

        session.close().await.unwrap();
        // Let the worker drain, drop the watch sender, and wake the
        // counter for the final time
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        let published = recalcs.load(Ordering::SeqCst);
        assert!(published >= 1, "burst must publish at least once");
        assert!(
            published < 50,
            "50 queued edits published {} recalculations, expected coalescing",
            published
        );
    }

    #[tokio::test]
    async fn test_add_and_remove_items() {
        let session = SessionHandle::spawn(draft_with_item());

        let inputs = ItemPriceInputs::new(
            dec!(5),
            None,
            dec!(95),
            LabourBasis::PerGram(dec!(20)),
            vec![],
        );
        let anklet = InvoiceItemDraft::priced("Silver anklet", 1, None, &inputs);
        let anklet_id = anklet.id.clone();

        session.edit(DraftEdit::AddItem(anklet)).await.unwrap();
        let with_anklet = session.finalize().await.unwrap();
        // 44000 + (5 × 95 + 5 × 20)
        assert_eq!(with_anklet.subtotal, dec!(44575));

        session
            .edit(DraftEdit::RemoveItem(anklet_id))
            .await
            .unwrap();
        let without = session.finalize().await.unwrap();
        assert_eq!(without.subtotal, dec!(44000));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_explicit_reprice_replaces_preserved_pricing() {
        let session = SessionHandle::spawn(draft_with_item());
        let before = session.finalize().await.unwrap();
        let item_id = before.items[0].id.clone();

        // Rates moved; the operator explicitly reprices the line
        let inputs = ItemPriceInputs::new(
            dec!(10),
            Some(dec!(8)),
            dec!(5200),
            LabourBasis::Percentage(dec!(10)),
            vec![],
        );
        session
            .edit(DraftEdit::RepriceItem { item_id, inputs })
            .await
            .unwrap();

        let after = session.finalize().await.unwrap();
        assert_eq!(after.items[0].gross_price, dec!(45760));
        assert_ne!(after.items, before.items);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_commands_after_close_fail() {
        let session = SessionHandle::spawn(draft_with_item());
        session.close().await.unwrap();

        // The worker drains the close and shuts down; subsequent edits
        // must surface SessionClosed once the channel drops.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let result = session.edit(DraftEdit::SetDiscount(dec!(1))).await;
        assert!(matches!(result, Err(BillingError::SessionClosed)));
    }
}
