use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, TRANSFER_CATEGORY, Transaction, UpdateTransactionCmd, transactions,
    wallets,
};

use super::super::super::{Engine, with_tx};

impl Engine {
    /// Updates an existing transaction, recomputing the net balance effect.
    ///
    /// - Same wallet: one balance write of
    ///   `current - old_signed_effect + new_signed_effect`. A kind flip with
    ///   the amount unchanged still moves `2 × amount`.
    /// - Different wallet: the old effect is reversed on the old wallet and
    ///   the new effect applied on the new one, both inside the same DB
    ///   transaction, so partial success cannot be observed.
    ///
    /// Transfer rows are rejected with `UnsupportedOperation`; so is setting
    /// a category to `"Transfer"`, which would manufacture half a pair.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<()> {
        if cmd.category.as_deref() == Some(TRANSFER_CATEGORY) {
            return Err(EngineError::UnsupportedOperation(
                "a transaction cannot be turned into a transfer".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let (tx_model, old_wallet) = self
                .require_transaction(&db_tx, cmd.transaction_id, &cmd.user_id)
                .await?;
            let old = Transaction::try_from(tx_model)?;
            if old.is_transfer() {
                return Err(EngineError::UnsupportedOperation(
                    "transfer rows cannot be edited".to_string(),
                ));
            }

            // Validates the patched amount before touching any balance.
            let new = cmd.patched(&old)?;

            if new.wallet_id == old.wallet_id {
                let wallet_active = wallets::ActiveModel {
                    id: ActiveValue::Set(old_wallet.id),
                    balance: ActiveValue::Set(
                        old_wallet.balance - old.signed_effect() + new.signed_effect(),
                    ),
                    ..Default::default()
                };
                wallet_active.update(&db_tx).await?;
            } else {
                let new_wallet = self
                    .require_wallet(&db_tx, new.wallet_id, &cmd.user_id)
                    .await?;

                let old_active = wallets::ActiveModel {
                    id: ActiveValue::Set(old_wallet.id),
                    balance: ActiveValue::Set(old_wallet.balance - old.signed_effect()),
                    ..Default::default()
                };
                old_active.update(&db_tx).await?;

                let new_active = wallets::ActiveModel {
                    id: ActiveValue::Set(new_wallet.id),
                    balance: ActiveValue::Set(new_wallet.balance + new.signed_effect()),
                    ..Default::default()
                };
                new_active.update(&db_tx).await?;
            }

            transactions::ActiveModel::from(&new).update(&db_tx).await?;

            Ok(())
        })
    }
}
