//! Client-side optimistic mirror of wallet balances.
//!
//! Every mutation follows the same two-phase protocol:
//!
//! 1. predicted: the expected outcome is applied to the local mirror and
//!    announced on the event bus before the authoritative call starts;
//! 2. confirmed: the call succeeded and the prediction already matches the
//!    stored truth, so nothing further happens; or
//! 3. reverted: the call failed, the affected wallets are re-read from the
//!    backend and a compensating event undoes the announcement.
//!
//! A failed prediction is never patched arithmetically. Resynchronization
//! always re-reads the authoritative balance, so a prediction that was wrong
//! for an unexpected reason cannot leave drift behind.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use engine::{
    CreateTransactionCmd, EngineError, EventBus, LedgerEvent, ResultEngine, TRANSFER_CATEGORY,
    Transaction, TransferCmd, UpdateTransactionCmd, Wallet,
};
use uuid::Uuid;

use crate::LedgerBackend;

/// Lifecycle of one optimistic mutation, keyed by transaction id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationPhase {
    /// Applied to the local mirror, authoritative outcome still unknown.
    Predicted,
    /// The authoritative operation succeeded.
    Confirmed,
    /// The authoritative operation failed and the prediction was undone.
    Reverted,
}

/// Optimistic projector over a [`LedgerBackend`].
///
/// One projector serves one user. The wallet mirror is filled lazily: a
/// wallet is read from the backend the first time a mutation touches it, and
/// re-read whenever a prediction has to be rolled back.
pub struct Projector<B> {
    backend: B,
    events: EventBus,
    user_id: String,
    wallets: Mutex<HashMap<Uuid, Wallet>>,
    feed: Mutex<HashMap<Uuid, MutationPhase>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B: LedgerBackend> Projector<B> {
    #[must_use]
    pub fn new(backend: B, events: EventBus, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            events,
            user_id: user_id.into(),
            wallets: Mutex::new(HashMap::new()),
            feed: Mutex::new(HashMap::new()),
        }
    }

    /// Mirrored balance, if this wallet has been synchronized.
    #[must_use]
    pub fn balance(&self, wallet_id: Uuid) -> Option<i64> {
        lock(&self.wallets).get(&wallet_id).map(|w| w.balance)
    }

    /// Mirrored wallet snapshot, if this wallet has been synchronized.
    #[must_use]
    pub fn wallet(&self, wallet_id: Uuid) -> Option<Wallet> {
        lock(&self.wallets).get(&wallet_id).cloned()
    }

    /// Phase of a mutation previously submitted through this projector.
    #[must_use]
    pub fn phase(&self, transaction_id: Uuid) -> Option<MutationPhase> {
        lock(&self.feed).get(&transaction_id).copied()
    }

    /// Re-reads a wallet from the backend into the mirror.
    pub async fn sync_wallet(&self, wallet_id: Uuid) -> ResultEngine<Wallet> {
        let wallet = self.backend.wallet(wallet_id, &self.user_id).await?;
        lock(&self.wallets).insert(wallet.id, wallet.clone());
        Ok(wallet)
    }

    async fn ensure_synced(&self, wallet_id: Uuid) -> ResultEngine<Wallet> {
        if let Some(wallet) = lock(&self.wallets).get(&wallet_id) {
            return Ok(wallet.clone());
        }
        self.sync_wallet(wallet_id).await
    }

    fn apply_delta(&self, wallet_id: Uuid, delta: i64) {
        if let Some(wallet) = lock(&self.wallets).get_mut(&wallet_id) {
            wallet.balance += delta;
        }
    }

    fn set_phase(&self, transaction_id: Uuid, phase: MutationPhase) {
        lock(&self.feed).insert(transaction_id, phase);
    }

    /// Discards predicted state by re-reading the backend. A wallet that can
    /// no longer be read is dropped from the mirror rather than left stale.
    async fn resync(&self, wallet_ids: &[Uuid]) {
        for &wallet_id in wallet_ids {
            match self.backend.wallet(wallet_id, &self.user_id).await {
                Ok(wallet) => {
                    lock(&self.wallets).insert(wallet.id, wallet);
                }
                Err(err) => {
                    tracing::warn!(%wallet_id, %err, "resync failed, dropping wallet from mirror");
                    lock(&self.wallets).remove(&wallet_id);
                }
            }
        }
    }

    /// Creates a transaction, predicting its effect locally first.
    pub async fn create(&self, cmd: CreateTransactionCmd) -> ResultEngine<Uuid> {
        // Validation failures happen before the mirror is touched.
        let predicted = cmd.record()?;
        self.ensure_synced(predicted.wallet_id).await?;

        self.apply_delta(predicted.wallet_id, predicted.signed_effect());
        self.set_phase(predicted.id, MutationPhase::Predicted);
        self.events
            .publish(LedgerEvent::TransactionCreated(predicted.clone()));

        match self.backend.create_transaction(cmd).await {
            Ok(id) => {
                self.set_phase(id, MutationPhase::Confirmed);
                Ok(id)
            }
            Err(err) => {
                self.resync(&[predicted.wallet_id]).await;
                self.set_phase(predicted.id, MutationPhase::Reverted);
                self.events
                    .publish(LedgerEvent::TransactionDeleted(predicted.id));
                Err(err)
            }
        }
    }

    /// Applies a patch to `old`, predicting the balance movement on the old
    /// wallet (and the new one, when the row changes wallet).
    pub async fn update(&self, old: &Transaction, cmd: UpdateTransactionCmd) -> ResultEngine<()> {
        if old.is_transfer() {
            return Err(EngineError::UnsupportedOperation(
                "transfer rows cannot be edited".to_string(),
            ));
        }
        if cmd.category.as_deref() == Some(TRANSFER_CATEGORY) {
            return Err(EngineError::UnsupportedOperation(
                "a transaction cannot be turned into a transfer".to_string(),
            ));
        }
        let new = cmd.patched(old)?;

        self.ensure_synced(old.wallet_id).await?;
        let mut affected = vec![old.wallet_id];
        if new.wallet_id == old.wallet_id {
            self.apply_delta(old.wallet_id, new.signed_effect() - old.signed_effect());
        } else {
            self.ensure_synced(new.wallet_id).await?;
            affected.push(new.wallet_id);
            self.apply_delta(old.wallet_id, -old.signed_effect());
            self.apply_delta(new.wallet_id, new.signed_effect());
        }
        self.set_phase(new.id, MutationPhase::Predicted);
        self.events
            .publish(LedgerEvent::TransactionUpdated(new.clone()));

        match self.backend.update_transaction(cmd).await {
            Ok(()) => {
                self.set_phase(new.id, MutationPhase::Confirmed);
                Ok(())
            }
            Err(err) => {
                self.resync(&affected).await;
                self.set_phase(new.id, MutationPhase::Reverted);
                self.events
                    .publish(LedgerEvent::TransactionUpdated(old.clone()));
                Err(err)
            }
        }
    }

    /// Deletes `record`, predicting the reversal of its effect. On failure
    /// the row is re-announced so subscribers put it back.
    pub async fn delete(&self, record: &Transaction) -> ResultEngine<()> {
        if record.is_transfer() {
            return Err(EngineError::UnsupportedOperation(
                "transfer rows cannot be deleted one by one".to_string(),
            ));
        }
        self.ensure_synced(record.wallet_id).await?;

        self.apply_delta(record.wallet_id, -record.signed_effect());
        self.set_phase(record.id, MutationPhase::Predicted);
        self.events.publish(LedgerEvent::TransactionDeleted(record.id));

        match self
            .backend
            .delete_transaction(record.id, &self.user_id)
            .await
        {
            Ok(()) => {
                self.set_phase(record.id, MutationPhase::Confirmed);
                Ok(())
            }
            Err(err) => {
                self.resync(&[record.wallet_id]).await;
                self.set_phase(record.id, MutationPhase::Reverted);
                self.events
                    .publish(LedgerEvent::TransactionCreated(record.clone()));
                Err(err)
            }
        }
    }

    /// Moves money between two wallets, predicting both rows of the pair.
    /// The pair is rolled back together: either both rows are confirmed or
    /// both compensating deletions are published.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<(Uuid, Uuid)> {
        if cmd.from_wallet_id == cmd.to_wallet_id {
            return Err(EngineError::InvalidAmount(
                "from_wallet_id and to_wallet_id must differ".to_string(),
            ));
        }
        let from = self.ensure_synced(cmd.from_wallet_id).await?;
        let to = self.ensure_synced(cmd.to_wallet_id).await?;
        let (expense, income) = cmd.record_pair(&from.name, &to.name)?;

        self.apply_delta(expense.wallet_id, expense.signed_effect());
        self.apply_delta(income.wallet_id, income.signed_effect());
        self.set_phase(expense.id, MutationPhase::Predicted);
        self.set_phase(income.id, MutationPhase::Predicted);
        self.events
            .publish(LedgerEvent::TransactionCreated(expense.clone()));
        self.events
            .publish(LedgerEvent::TransactionCreated(income.clone()));

        match self.backend.transfer(cmd).await {
            Ok((expense_id, income_id)) => {
                self.set_phase(expense_id, MutationPhase::Confirmed);
                self.set_phase(income_id, MutationPhase::Confirmed);
                Ok((expense_id, income_id))
            }
            Err(err) => {
                self.resync(&[expense.wallet_id, income.wallet_id]).await;
                self.set_phase(expense.id, MutationPhase::Reverted);
                self.set_phase(income.id, MutationPhase::Reverted);
                self.events
                    .publish(LedgerEvent::TransactionDeleted(expense.id));
                self.events
                    .publish(LedgerEvent::TransactionDeleted(income.id));
                Err(err)
            }
        }
    }
}
