//! The module contains the `Wallet` struct and its sea-orm entity.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// A wallet.
///
/// A wallet is a representation of a real wallet, a bank account or anything
/// else where money is kept. The balance is denormalized: it must always equal
/// the opening balance plus the signed effect of every live transaction, and
/// it is mutated only through the engine's atomic operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Stable identifier, generated once and persisted, so the wallet can be
    /// renamed without breaking references.
    pub id: Uuid,
    pub name: String,
    /// Minor currency units. May go negative: a wallet in deficit is a
    /// warning condition, not an error.
    pub balance: i64,
    pub is_default: bool,
}

impl Wallet {
    pub fn new(name: String, balance: i64, is_default: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            balance,
            is_default,
        }
    }

    pub fn with_id(id: Uuid, name: String, balance: i64, is_default: bool) -> Self {
        Self {
            id,
            name,
            balance,
            is_default,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub balance: i64,
    pub is_default: bool,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            balance: ActiveValue::Set(value.balance),
            is_default: ActiveValue::Set(value.is_default),
            user_id: ActiveValue::NotSet,
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("wallet not exists".to_string()))?,
            name: model.name,
            balance: model.balance,
            is_default: model.is_default,
        })
    }
}
