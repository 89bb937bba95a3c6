//! Optimistic projection over the ledger engine.
//!
//! The projector keeps a client-local mirror of wallet balances and applies
//! the expected outcome of every mutation before the authoritative call
//! returns, so display surfaces update instantly. When a call fails, the
//! affected wallets are re-read from the backend and a compensating event is
//! published, so subscribers converge on the stored truth without knowing
//! about the protocol.

pub use backend::{EngineBackend, LedgerBackend};
pub use projector::{MutationPhase, Projector};

mod backend;
mod projector;
