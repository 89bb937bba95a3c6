//! Transaction primitives.
//!
//! A `Transaction` is a flat ledger row against exactly one wallet. The sign
//! of its effect on the wallet balance is derived from the kind, never stored.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Category reserved for the two rows of a transfer pair.
///
/// Rows carrying it are not editable or deletable one by one: touching half a
/// pair would break the paired bookkeeping.
pub const TRANSFER_CATEGORY: &str = "Transfer";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Signed effect of an amount of this kind on a wallet balance.
    pub fn signed(self, amount_minor: i64) -> i64 {
        match self {
            Self::Income => amount_minor,
            Self::Expense => -amount_minor,
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
    /// Always positive; the sign comes from `kind`.
    pub amount_minor: i64,
    pub category: String,
    pub sub_category: Option<String>,
    pub note: Option<String>,
    pub linked_debt_id: Option<Uuid>,
    pub created_by: String,
}

impl Transaction {
    pub fn new(
        id: Uuid,
        wallet_id: Uuid,
        kind: TransactionKind,
        occurred_at: DateTime<Utc>,
        amount_minor: i64,
        category: String,
        sub_category: Option<String>,
        note: Option<String>,
        linked_debt_id: Option<Uuid>,
        created_by: String,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id,
            wallet_id,
            kind,
            occurred_at,
            amount_minor,
            category,
            sub_category,
            note,
            linked_debt_id,
            created_by,
        })
    }

    /// `+amount` for income, `-amount` for expense.
    pub fn signed_effect(&self) -> i64 {
        self.kind.signed(self.amount_minor)
    }

    /// Whether this row is half of a transfer pair.
    pub fn is_transfer(&self) -> bool {
        self.category == TRANSFER_CATEGORY
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub wallet_id: String,
    pub kind: String,
    pub occurred_at: DateTimeUtc,
    pub amount_minor: i64,
    pub category: String,
    pub sub_category: Option<String>,
    pub note: Option<String>,
    pub linked_debt_id: Option<String>,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            category: ActiveValue::Set(tx.category.clone()),
            sub_category: ActiveValue::Set(tx.sub_category.clone()),
            note: ActiveValue::Set(tx.note.clone()),
            linked_debt_id: ActiveValue::Set(tx.linked_debt_id.map(|id| id.to_string())),
            created_by: ActiveValue::Set(tx.created_by.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            wallet_id: Uuid::parse_str(&model.wallet_id)
                .map_err(|_| EngineError::KeyNotFound("wallet not exists".to_string()))?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            occurred_at: model.occurred_at,
            amount_minor: model.amount_minor,
            category: model.category,
            sub_category: model.sub_category,
            note: model.note,
            linked_debt_id: model.linked_debt_id.and_then(|s| Uuid::parse_str(&s).ok()),
            created_by: model.created_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    #[test]
    fn signed_effect_follows_kind() {
        assert_eq!(TransactionKind::Income.signed(1040), 1040);
        assert_eq!(TransactionKind::Expense.signed(1040), -1040);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        for amount in [0, -500] {
            let result = Transaction::new(
                Uuid::new_v4(),
                Uuid::new_v4(),
                TransactionKind::Expense,
                Utc.timestamp_opt(0, 0).unwrap(),
                amount,
                "Food".to_string(),
                None,
                None,
                None,
                "alice".to_string(),
            );
            assert!(matches!(result, Err(EngineError::InvalidAmount(_))));
        }
    }

    #[test]
    fn transfer_rows_are_flagged() {
        let tx = Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TransactionKind::Expense,
            Utc.timestamp_opt(0, 0).unwrap(),
            1000,
            TRANSFER_CATEGORY.to_string(),
            None,
            None,
            None,
            "alice".to_string(),
        )
        .unwrap();
        assert!(tx.is_transfer());
    }
}
