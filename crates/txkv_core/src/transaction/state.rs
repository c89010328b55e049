//! Transaction state.

use crate::types::{TransactionId, Value};
use std::collections::HashMap;

/// State of the store's transaction flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No transaction is open. Initial state.
    Closed,
    /// A transaction is open and accepts writes.
    Open,
}

impl TransactionState {
    /// Returns true if a transaction is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// An open transaction and its pending buffer.
///
/// Writes accumulate here and are invisible to store reads until the
/// transaction is committed. The buffer holds at most one value per key.
#[derive(Debug)]
pub struct Transaction {
    /// Transaction ID.
    id: TransactionId,
    /// Pending writes: key -> value.
    writes: HashMap<String, Value>,
}

impl Transaction {
    /// Creates a transaction with an empty pending buffer.
    pub(crate) fn new(id: TransactionId) -> Self {
        Self {
            id,
            writes: HashMap::new(),
        }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Records a put, replacing any earlier pending value for `key`.
    pub(crate) fn put(&mut self, key: String, value: Value) {
        self.writes.insert(key, value);
    }

    /// Gets the pending value for a key.
    #[must_use]
    pub fn get_pending_write(&self, key: &str) -> Option<Value> {
        self.writes.get(key).copied()
    }

    /// Returns the number of distinct keys written.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Consumes the transaction, yielding its pending buffer.
    pub(crate) fn into_writes(self) -> HashMap<String, Value> {
        self.writes
    }
}
