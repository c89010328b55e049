//! Store configuration.

use crate::types::Value;

/// Configuration for a [`TransactionalStore`](crate::TransactionalStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Whether `begin` also clears the committed mapping.
    ///
    /// This reproduces a legacy behavior in which every new transaction
    /// erased all previously committed data. Off by default.
    pub reset_committed_on_begin: bool,

    /// Value returned by `get` for a key that has never been committed.
    pub absent_value: Value,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            reset_committed_on_begin: false,
            absent_value: 0,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration matching the legacy behavior of clearing committed
    /// data on every `begin`.
    #[must_use]
    pub fn legacy() -> Self {
        Self::default().reset_committed_on_begin(true)
    }

    /// Sets whether `begin` clears committed data.
    #[must_use]
    pub const fn reset_committed_on_begin(mut self, value: bool) -> Self {
        self.reset_committed_on_begin = value;
        self
    }

    /// Sets the value `get` reports for absent keys.
    #[must_use]
    pub const fn absent_value(mut self, value: Value) -> Self {
        self.absent_value = value;
        self
    }
}
