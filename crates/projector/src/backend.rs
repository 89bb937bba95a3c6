//! Seam between the projector and the authoritative ledger.

use std::future::Future;
use std::sync::Arc;

use engine::{
    CreateTransactionCmd, Engine, ResultEngine, TransferCmd, UpdateTransactionCmd, Wallet,
};
use uuid::Uuid;

/// The authoritative side of the optimistic protocol.
///
/// The engine is the production implementation. Tests substitute a scripted
/// fake to exercise the failure paths without a database.
pub trait LedgerBackend: Send + Sync {
    fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> impl Future<Output = ResultEngine<Uuid>> + Send;

    fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    fn delete_transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    fn transfer(&self, cmd: TransferCmd) -> impl Future<Output = ResultEngine<(Uuid, Uuid)>> + Send;

    /// Authoritative read of a single wallet. This is the resynchronization
    /// source after a failed prediction.
    fn wallet(&self, wallet_id: Uuid, user_id: &str)
    -> impl Future<Output = ResultEngine<Wallet>> + Send;
}

impl<B: LedgerBackend> LedgerBackend for Arc<B> {
    fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> impl Future<Output = ResultEngine<Uuid>> + Send {
        (**self).create_transaction(cmd)
    }

    fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> impl Future<Output = ResultEngine<()>> + Send {
        (**self).update_transaction(cmd)
    }

    fn delete_transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<()>> + Send {
        (**self).delete_transaction(transaction_id, user_id)
    }

    fn transfer(&self, cmd: TransferCmd) -> impl Future<Output = ResultEngine<(Uuid, Uuid)>> + Send {
        (**self).transfer(cmd)
    }

    fn wallet(
        &self,
        wallet_id: Uuid,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<Wallet>> + Send {
        (**self).wallet(wallet_id, user_id)
    }
}

/// [`LedgerBackend`] backed by the real [`Engine`].
#[derive(Clone)]
pub struct EngineBackend {
    engine: Arc<Engine>,
}

impl EngineBackend {
    #[must_use]
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

impl LedgerBackend for EngineBackend {
    async fn create_transaction(&self, cmd: CreateTransactionCmd) -> ResultEngine<Uuid> {
        self.engine.create_transaction(cmd).await
    }

    async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<()> {
        self.engine.update_transaction(cmd).await
    }

    async fn delete_transaction(&self, transaction_id: Uuid, user_id: &str) -> ResultEngine<()> {
        self.engine.delete_transaction(transaction_id, user_id).await
    }

    async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<(Uuid, Uuid)> {
        self.engine.transfer(cmd).await
    }

    async fn wallet(&self, wallet_id: Uuid, user_id: &str) -> ResultEngine<Wallet> {
        self.engine.wallet(wallet_id, user_id).await
    }
}
