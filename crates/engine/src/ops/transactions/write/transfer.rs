use uuid::Uuid;

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, TransferCmd, transactions, wallets};

use super::super::super::{Engine, with_tx};

impl Engine {
    /// Moves money between two wallets.
    ///
    /// Persists the expense/income pair (category `"Transfer"`, notes
    /// referencing the counterpart wallet) and adjusts both balances, all in
    /// one DB transaction. Either both rows and both balance writes land, or
    /// none do; there is no rollback path once the pair is visible.
    ///
    /// Returns `(expense_id, income_id)`.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<(Uuid, Uuid)> {
        if cmd.from_wallet_id == cmd.to_wallet_id {
            return Err(EngineError::InvalidAmount(
                "from_wallet_id and to_wallet_id must differ".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let from = self
                .require_wallet(&db_tx, cmd.from_wallet_id, &cmd.user_id)
                .await?;
            let to = self
                .require_wallet(&db_tx, cmd.to_wallet_id, &cmd.user_id)
                .await?;

            // Validates amount_minor > 0.
            let (expense, income) = cmd.record_pair(&from.name, &to.name)?;

            transactions::ActiveModel::from(&expense)
                .insert(&db_tx)
                .await?;
            transactions::ActiveModel::from(&income)
                .insert(&db_tx)
                .await?;

            let from_active = wallets::ActiveModel {
                id: ActiveValue::Set(from.id),
                balance: ActiveValue::Set(from.balance - cmd.amount_minor),
                ..Default::default()
            };
            from_active.update(&db_tx).await?;

            let to_active = wallets::ActiveModel {
                id: ActiveValue::Set(to.id),
                balance: ActiveValue::Set(to.balance + cmd.amount_minor),
                ..Default::default()
            };
            to_active.update(&db_tx).await?;

            Ok((expense.id, income.id))
        })
    }
}
