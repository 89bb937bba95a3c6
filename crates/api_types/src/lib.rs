use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod wallet {
    use super::*;

    /// Request body for creating a wallet.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        /// Opening balance in minor currency units. Not a transaction: it is
        /// the baseline the ledger sums on top of.
        pub balance_minor: Option<i64>,
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub name: String,
        pub balance_minor: i64,
        pub is_default: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletsResponse {
        pub wallets: Vec<WalletView>,
    }

    /// Request body for the overdraft pre-check.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OverdraftCheck {
        /// Must be > 0. The hypothetical expense to test against the balance.
        pub amount_minor: i64,
    }

    /// Advisory answer: the mutation is still allowed either way.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OverdraftView {
        pub would_go_negative: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub wallet_id: Uuid,
        pub kind: TransactionKind,
        /// Free-text amount, e.g. `"20000+5000"`. Evaluated server-side into
        /// minor units.
        pub amount: String,
        pub category: String,
        pub sub_category: Option<String>,
        pub note: Option<String>,
        pub linked_debt_id: Option<Uuid>,
        /// RFC3339 timestamp. Defaults to now when absent.
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    /// Patch body: absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub wallet_id: Option<Uuid>,
        pub kind: Option<TransactionKind>,
        pub amount: Option<String>,
        pub category: Option<String>,
        pub sub_category: Option<String>,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub wallet_id: Uuid,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub wallet_id: Uuid,
        pub kind: TransactionKind,
        /// RFC3339 timestamp.
        pub occurred_at: DateTime<Utc>,
        pub amount_minor: i64,
        pub category: String,
        pub sub_category: Option<String>,
        pub note: Option<String>,
        pub linked_debt_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_wallet_id: Uuid,
        pub to_wallet_id: Uuid,
        /// Free-text amount, evaluated server-side into minor units.
        pub amount: String,
        pub note: Option<String>,
        /// RFC3339 timestamp. Defaults to now when absent.
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferCreated {
        pub expense_id: Uuid,
        pub income_id: Uuid,
    }
}
