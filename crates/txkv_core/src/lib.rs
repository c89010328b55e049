//! # txkv Core
//!
//! In-memory key-value store with single-level transactions.
//!
//! This crate provides:
//! - [`TransactionalStore`]: string keys, integer values, begin/put/get/commit/rollback
//! - [`SharedStore`]: the same store behind one mutex for multi-threaded callers
//! - A text [`Command`] form for scripting and testing
//! - [`StoreStats`] counters
//!
//! Writes made inside a transaction are invisible to `get` until the
//! transaction commits, and `rollback` discards them.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod error;
mod shared;
mod stats;
mod store;
mod transaction;
mod types;

pub use command::{parse_script, Command, Outcome};
pub use config::StoreConfig;
pub use error::{ParseError, ParseResult, StoreError, StoreResult};
pub use shared::SharedStore;
pub use stats::{StatsSnapshot, StoreStats};
pub use store::TransactionalStore;
pub use transaction::TransactionState;
pub use types::{TransactionId, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
