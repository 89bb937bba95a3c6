//! Command structs for engine operations.
//!
//! These types group parameters for the write operations
//! (create/update/delete/transfer), keeping call sites readable and avoiding
//! long argument lists.
//!
//! Row ids are generated when the command is built, not when it is persisted:
//! the optimistic projector predicts the exact record the engine will store,
//! so both sides must agree on the id before the round-trip starts.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, TRANSFER_CATEGORY, Transaction, TransactionKind};

/// Create a single income or expense transaction.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category: String,
    pub sub_category: Option<String>,
    pub note: Option<String>,
    pub linked_debt_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        wallet_id: Uuid,
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount_minor: i64,
        category: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            kind,
            amount_minor,
            category: category.into(),
            sub_category: None,
            note: None,
            linked_debt_id: None,
            occurred_at,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn sub_category(mut self, sub_category: impl Into<String>) -> Self {
        self.sub_category = Some(sub_category.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn linked_debt_id(mut self, debt_id: Uuid) -> Self {
        self.linked_debt_id = Some(debt_id);
        self
    }

    /// The record this command persists, validated.
    ///
    /// The `"Transfer"` category is reserved for the rows a transfer writes:
    /// a lone row with that category would be locked against both update and
    /// delete, so it cannot be created directly.
    pub fn record(&self) -> ResultEngine<Transaction> {
        if self.category == TRANSFER_CATEGORY {
            return Err(EngineError::UnsupportedOperation(
                "transfer rows can only be created in pairs".to_string(),
            ));
        }
        Transaction::new(
            self.id,
            self.wallet_id,
            self.kind,
            self.occurred_at,
            self.amount_minor,
            self.category.clone(),
            self.sub_category.clone(),
            self.note.clone(),
            self.linked_debt_id,
            self.user_id.clone(),
        )
    }
}

/// Update an existing transaction. `None` fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub transaction_id: Uuid,
    pub amount_minor: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub wallet_id: Option<Uuid>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub user_id: String,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(transaction_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            transaction_id,
            amount_minor: None,
            kind: None,
            wallet_id: None,
            category: None,
            sub_category: None,
            note: None,
            occurred_at: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn wallet_id(mut self, wallet_id: Uuid) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn sub_category(mut self, sub_category: impl Into<String>) -> Self {
        self.sub_category = Some(sub_category.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    /// The record that results from applying this patch to `old`, validated.
    pub fn patched(&self, old: &Transaction) -> ResultEngine<Transaction> {
        Transaction::new(
            old.id,
            self.wallet_id.unwrap_or(old.wallet_id),
            self.kind.unwrap_or(old.kind),
            self.occurred_at.unwrap_or(old.occurred_at),
            self.amount_minor.unwrap_or(old.amount_minor),
            self.category.clone().unwrap_or_else(|| old.category.clone()),
            self.sub_category
                .clone()
                .or_else(|| old.sub_category.clone()),
            self.note.clone().or_else(|| old.note.clone()),
            old.linked_debt_id,
            old.created_by.clone(),
        )
    }
}

/// Move money between two wallets.
///
/// A transfer is not a storable transaction variant: it is a compound command
/// that persists an expense on the source wallet and an income on the
/// destination, created atomically.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub expense_id: Uuid,
    pub income_id: Uuid,
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        from_wallet_id: Uuid,
        to_wallet_id: Uuid,
        user_id: impl Into<String>,
        amount_minor: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            expense_id: Uuid::new_v4(),
            income_id: Uuid::new_v4(),
            from_wallet_id,
            to_wallet_id,
            amount_minor,
            note: None,
            occurred_at,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Builds the expense/income pair, with each note referencing the
    /// counterpart wallet by name. A user-supplied note is appended.
    pub fn record_pair(
        &self,
        from_wallet_name: &str,
        to_wallet_name: &str,
    ) -> ResultEngine<(Transaction, Transaction)> {
        let describe = |reference: String| match self.note.as_deref() {
            Some(note) => format!("{reference} ({note})"),
            None => reference,
        };

        let expense = Transaction::new(
            self.expense_id,
            self.from_wallet_id,
            TransactionKind::Expense,
            self.occurred_at,
            self.amount_minor,
            TRANSFER_CATEGORY.to_string(),
            None,
            Some(describe(format!("Transfer to {to_wallet_name}"))),
            None,
            self.user_id.clone(),
        )?;
        let income = Transaction::new(
            self.income_id,
            self.to_wallet_id,
            TransactionKind::Income,
            self.occurred_at,
            self.amount_minor,
            TRANSFER_CATEGORY.to_string(),
            None,
            Some(describe(format!("Transfer from {from_wallet_name}"))),
            None,
            self.user_id.clone(),
        )?;
        Ok((expense, income))
    }
}
