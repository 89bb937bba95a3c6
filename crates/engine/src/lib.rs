//! Ledger consistency engine.
//!
//! The engine keeps one invariant: for every wallet,
//! `balance == initial_balance + Σ(signed effect of every live transaction)`.
//! Each mutating operation (create/update/delete/transfer) computes a balance
//! delta from a freshly read value and applies row changes and balance changes
//! inside a single database transaction, so no intermediate state is ever
//! observable.

pub use amount::evaluate_amount;
pub use commands::{CreateTransactionCmd, TransferCmd, UpdateTransactionCmd};
pub use error::EngineError;
pub use events::{EventBus, LedgerEvent};
pub use ops::{Engine, EngineBuilder};
pub use transactions::{TRANSFER_CATEGORY, Transaction, TransactionKind};
pub use wallets::Wallet;

mod amount;
mod commands;
mod error;
mod events;
mod ops;
mod transactions;
mod wallets;

pub type ResultEngine<T> = Result<T, EngineError>;
