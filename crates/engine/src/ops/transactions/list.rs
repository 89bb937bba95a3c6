use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{ResultEngine, Transaction, transactions};

use super::super::{Engine, with_tx};

impl Engine {
    /// Return a single transaction.
    pub async fn transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let (tx_model, _) = self
                .require_transaction(&db_tx, transaction_id, user_id)
                .await?;
            Transaction::try_from(tx_model)
        })
    }

    /// Newest-first transaction feed for one wallet.
    pub async fn transactions_for_wallet(
        &self,
        wallet_id: Uuid,
        user_id: &str,
        limit: u64,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet_id, user_id).await?;

            let models = transactions::Entity::find()
                .filter(transactions::Column::WalletId.eq(wallet_id.to_string()))
                .order_by_desc(transactions::Column::OccurredAt)
                .limit(limit)
                .all(&db_tx)
                .await?;

            models.into_iter().map(Transaction::try_from).collect()
        })
    }
}
