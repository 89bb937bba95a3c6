use uuid::Uuid;

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, Transaction, transactions, wallets};

use super::super::super::{Engine, with_tx};

impl Engine {
    /// Deletes a transaction, reversing its original effect on the wallet
    /// first.
    ///
    /// The reversal and the row removal are one atomic step. The row is gone
    /// for good afterwards: the ledger keeps no tombstones and no history.
    pub async fn delete_transaction(&self, transaction_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (tx_model, wallet_model) = self
                .require_transaction(&db_tx, transaction_id, user_id)
                .await?;
            let tx = Transaction::try_from(tx_model)?;
            if tx.is_transfer() {
                return Err(EngineError::UnsupportedOperation(
                    "transfer rows cannot be deleted one by one".to_string(),
                ));
            }

            let wallet_active = wallets::ActiveModel {
                id: ActiveValue::Set(wallet_model.id),
                balance: ActiveValue::Set(wallet_model.balance - tx.signed_effect()),
                ..Default::default()
            };
            wallet_active.update(&db_tx).await?;

            transactions::Entity::delete_by_id(tx.id.to_string())
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }
}
