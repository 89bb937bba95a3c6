//! Ledger event feed.
//!
//! Every display surface that shows balances or transaction lists subscribes
//! here instead of polling. The optimistic projector publishes an event as
//! soon as it predicts a mutation, and a compensating event if the
//! authoritative operation later fails, so subscribers converge on the truth
//! without knowing about the protocol.

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::Transaction;

/// What happened to the ledger, carrying the full record (or just the id for
/// a deletion).
#[derive(Clone, Debug)]
pub enum LedgerEvent {
    TransactionCreated(Transaction),
    TransactionUpdated(Transaction),
    TransactionDeleted(Uuid),
}

/// Broadcast bus for [`LedgerEvent`]s.
///
/// Publishing is lossy on purpose: an event with no subscribers is not an
/// error, and a slow subscriber misses events rather than blocking the
/// publisher.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<LedgerEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: LedgerEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
