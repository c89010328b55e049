//! Core type definitions for txkv.

use serde::Serialize;
use std::fmt;

/// Value type stored under each key.
pub type Value = i64;

/// Identifier of a transaction.
///
/// Transaction IDs are monotonically increasing per store and never reused.
/// They exist for diagnostics; no operation takes one as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Creates a new transaction ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the ID that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The first ID a store hands out.
impl Default for TransactionId {
    fn default() -> Self {
        Self::new(1)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_id_display() {
        assert_eq!(TransactionId::new(7).to_string(), "txn:7");
    }

    #[test]
    fn transaction_id_next() {
        let id = TransactionId::new(1);
        assert_eq!(id.next().as_u64(), 2);
        assert!(id.next() > id);
    }
}
