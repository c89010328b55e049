//! Single-level transactions.
//!
//! A store has at most one open transaction. Its pending buffer collects
//! writes that stay invisible to reads until commit, and are discarded
//! wholesale on rollback.

mod state;

pub use state::{Transaction, TransactionState};
