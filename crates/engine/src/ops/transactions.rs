use uuid::Uuid;

use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine, transactions, wallets};

use super::Engine;

mod list;
mod write;

impl Engine {
    /// Loads a transaction row together with the wallet it posts against,
    /// verifying that the wallet belongs to `user_id`.
    pub(in crate::ops) async fn require_transaction(
        &self,
        db_tx: &DatabaseTransaction,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(transactions::Model, wallets::Model)> {
        let tx_model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;

        let wallet_id = Uuid::parse_str(&tx_model.wallet_id)
            .map_err(|_| EngineError::KeyNotFound("wallet not exists".to_string()))?;
        let wallet_model = self.require_wallet(db_tx, wallet_id, user_id).await?;

        Ok((tx_model, wallet_model))
    }
}
