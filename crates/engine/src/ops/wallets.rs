use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{EngineError, ResultEngine, Wallet, transactions, wallets};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Loads a wallet owned by `user_id`, or fails with `KeyNotFound`.
    pub(in crate::ops) async fn require_wallet(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<wallets::Model> {
        wallets::Entity::find_by_id(wallet_id.to_string())
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
    }

    /// Return a wallet snapshot from DB.
    ///
    /// This is also the resynchronization source for the optimistic
    /// projector: after a failed prediction it re-reads the true balance from
    /// here instead of computing a reversal.
    pub async fn wallet(&self, wallet_id: Uuid, user_id: &str) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, wallet_id, user_id).await?;
            Wallet::try_from(model)
        })
    }

    /// Return every wallet of `user_id`, default wallet first.
    pub async fn wallets(&self, user_id: &str) -> ResultEngine<Vec<Wallet>> {
        with_tx!(self, |db_tx| {
            let models = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(wallets::Column::IsDefault)
                .order_by_asc(wallets::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Wallet::try_from).collect()
        })
    }

    /// Add a new wallet.
    ///
    /// `balance_minor` becomes the wallet's opening balance; it is the
    /// `initial_balance` term of the ledger invariant, not a transaction.
    /// Wallet names are unique per user, case-insensitively.
    pub async fn new_wallet(
        &self,
        name: &str,
        balance_minor: i64,
        is_default: bool,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "wallet name")?;
        with_tx!(self, |db_tx| {
            let exists = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            // Only one default wallet per user.
            if is_default {
                wallets::Entity::update_many()
                    .col_expr(wallets::Column::IsDefault, Expr::value(false))
                    .filter(wallets::Column::UserId.eq(user_id.to_string()))
                    .exec(&db_tx)
                    .await?;
            }

            let wallet = Wallet::new(name, balance_minor, is_default);
            let wallet_id = wallet.id;
            let mut wallet_model: wallets::ActiveModel = (&wallet).into();
            wallet_model.user_id = ActiveValue::Set(user_id.to_string());
            wallet_model.insert(&db_tx).await?;

            Ok(wallet_id)
        })
    }

    /// Deletes a wallet.
    ///
    /// Refused while any transaction still references it: deleting the rows
    /// or orphaning them would both break the ledger invariant.
    pub async fn delete_wallet(&self, wallet_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, wallet_id, user_id).await?;

            let referencing = transactions::Entity::find()
                .filter(transactions::Column::WalletId.eq(wallet_id.to_string()))
                .count(&db_tx)
                .await?;
            if referencing > 0 {
                return Err(EngineError::WalletInUse(model.name));
            }

            wallets::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Advisory check: would an expense of `amount_minor` drive the wallet
    /// negative?
    ///
    /// This is a warning for the caller to surface, never a precondition;
    /// the engine accepts expenses that push a wallet into deficit.
    pub async fn would_go_negative(
        &self,
        wallet_id: Uuid,
        amount_minor: i64,
        user_id: &str,
    ) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, wallet_id, user_id).await?;
            Ok(model.balance - amount_minor < 0)
        })
    }
}
