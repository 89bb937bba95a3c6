use uuid::Uuid;

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{CreateTransactionCmd, ResultEngine, transactions, wallets};

use super::super::super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Creates a transaction and applies its signed effect to the wallet
    /// balance.
    ///
    /// Row insert and balance write happen in one DB transaction: there is no
    /// observable state where the row exists but the balance has not moved.
    /// Negative resulting balances are allowed; warning the user about a
    /// deficit is the caller's job (see `would_go_negative`).
    pub async fn create_transaction(&self, cmd: CreateTransactionCmd) -> ResultEngine<Uuid> {
        let mut cmd = cmd;
        cmd.category = normalize_required_name(&cmd.category, "category")?;
        cmd.sub_category = normalize_optional_text(cmd.sub_category.as_deref());
        cmd.note = normalize_optional_text(cmd.note.as_deref());

        // Validates amount_minor > 0 before any I/O.
        let tx = cmd.record()?;

        with_tx!(self, |db_tx| {
            let wallet_model = self
                .require_wallet(&db_tx, cmd.wallet_id, &cmd.user_id)
                .await?;

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            let wallet_active = wallets::ActiveModel {
                id: ActiveValue::Set(wallet_model.id),
                balance: ActiveValue::Set(wallet_model.balance + tx.signed_effect()),
                ..Default::default()
            };
            wallet_active.update(&db_tx).await?;

            Ok(tx.id)
        })
    }
}
