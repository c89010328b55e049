//! The transactional key-value store.

use crate::command::{Command, Outcome};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::stats::StoreStats;
use crate::transaction::{Transaction, TransactionState};
use crate::types::{TransactionId, Value};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// In-memory key-value store with single-level transactions.
///
/// The store owns a committed mapping and, while a transaction is open, a
/// pending buffer. Writes go to the pending buffer only; reads always
/// resolve against the committed mapping, so a put is invisible until its
/// transaction commits.
///
/// ```rust
/// use txkv_core::{StoreError, TransactionalStore};
///
/// let mut store = TransactionalStore::new();
/// assert_eq!(store.put("A", 5), Err(StoreError::NoOpenTransaction));
///
/// store.begin().unwrap();
/// store.put("A", 5).unwrap();
/// store.put("A", 6).unwrap();
/// assert_eq!(store.get("A"), 0);
///
/// store.commit().unwrap();
/// assert_eq!(store.get("A"), 6);
/// ```
///
/// The store is not synchronized. Use [`SharedStore`](crate::SharedStore)
/// to share one store between threads.
#[derive(Debug, Default)]
pub struct TransactionalStore {
    config: StoreConfig,
    committed: HashMap<String, Value>,
    /// The open transaction, if any. `None` is the Closed state.
    active: Option<Transaction>,
    next_txid: TransactionId,
    stats: StoreStats,
}

impl TransactionalStore {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens a transaction with an empty pending buffer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TransactionAlreadyOpen`] if a transaction is
    /// already open.
    pub fn begin(&mut self) -> StoreResult<TransactionId> {
        if self.active.is_some() {
            return Err(self.reject(StoreError::TransactionAlreadyOpen));
        }

        if self.config.reset_committed_on_begin && !self.committed.is_empty() {
            warn!(
                discarded = self.committed.len(),
                "begin is clearing committed data (reset_committed_on_begin)"
            );
            self.committed.clear();
        }

        let id = self.next_txid;
        self.next_txid = id.next();
        self.active = Some(Transaction::new(id));
        self.stats.record_begin();
        debug!(txid = %id, "transaction opened");
        Ok(id)
    }

    /// Buffers a write in the open transaction.
    ///
    /// A later put to the same key replaces this one. The committed mapping
    /// is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoOpenTransaction`] if no transaction is open.
    pub fn put(&mut self, key: impl Into<String>, value: Value) -> StoreResult<()> {
        match self.active.as_mut() {
            Some(txn) => {
                let key = key.into();
                trace!(txid = %txn.id(), key = %key, value, "put buffered");
                txn.put(key, value);
            }
            None => return Err(self.reject(StoreError::NoOpenTransaction)),
        }
        self.stats.record_put();
        Ok(())
    }

    /// Reads the committed value for `key`.
    ///
    /// Absent keys read as the configured absent value (`0` by default),
    /// which cannot be told apart from a stored value equal to it. Use
    /// [`get_opt`](Self::get_opt) when that distinction matters.
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        self.get_opt(key).unwrap_or(self.config.absent_value)
    }

    /// Reads the committed value for `key`, or `None` if it was never committed.
    #[must_use]
    pub fn get_opt(&self, key: &str) -> Option<Value> {
        let value = self.committed.get(key).copied();
        self.stats.record_read(value.is_some());
        trace!(key, ?value, "get");
        value
    }

    /// Returns true if `key` has a committed value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.committed.contains_key(key)
    }

    /// Merges the pending buffer into the committed mapping and closes the
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoOpenTransaction`] if no transaction is open.
    pub fn commit(&mut self) -> StoreResult<()> {
        let txn = self
            .active
            .take()
            .ok_or_else(|| self.reject(StoreError::NoOpenTransaction))?;

        let id = txn.id();
        let writes = txn.into_writes();
        let keys = writes.len();
        self.committed.extend(writes);

        self.stats.record_commit(keys);
        debug!(txid = %id, keys, "transaction committed");
        Ok(())
    }

    /// Discards the pending buffer and closes the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoOpenTransaction`] if no transaction is open.
    pub fn rollback(&mut self) -> StoreResult<()> {
        let txn = self
            .active
            .take()
            .ok_or_else(|| self.reject(StoreError::NoOpenTransaction))?;

        let keys = txn.write_count();
        self.stats.record_rollback(keys);
        debug!(txid = %txn.id(), keys, "transaction rolled back");
        Ok(())
    }

    /// Runs a single command against the store.
    ///
    /// `Get` reports absence explicitly rather than via the absent value.
    ///
    /// # Errors
    ///
    /// Propagates the state error of the underlying operation.
    pub fn execute(&mut self, command: &Command) -> StoreResult<Outcome> {
        match command {
            Command::Begin => self.begin().map(Outcome::Begun),
            Command::Put { key, value } => {
                self.put(key.as_str(), *value).map(|()| Outcome::Written)
            }
            Command::Get { key } => Ok(Outcome::Value(self.get_opt(key))),
            Command::Commit => {
                let keys = self.pending_len();
                self.commit().map(|()| Outcome::Committed { keys })
            }
            Command::Rollback => {
                let keys = self.pending_len();
                self.rollback().map(|()| Outcome::RolledBack { keys })
            }
        }
    }

    /// Returns the current transaction state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        if self.active.is_some() {
            TransactionState::Open
        } else {
            TransactionState::Closed
        }
    }

    /// Returns true if a transaction is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the ID of the open transaction.
    #[must_use]
    pub fn current_transaction(&self) -> Option<TransactionId> {
        self.active.as_ref().map(Transaction::id)
    }

    /// Returns the number of distinct keys in the pending buffer.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.active.as_ref().map_or(0, Transaction::write_count)
    }

    /// Peeks at the pending buffer. Never affects what `get` returns.
    #[must_use]
    pub fn pending_value(&self, key: &str) -> Option<Value> {
        self.active.as_ref()?.get_pending_write(key)
    }

    /// Returns the number of committed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Returns true if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Iterates over committed entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.committed.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns the store statistics.
    #[must_use]
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    fn reject(&self, err: StoreError) -> StoreError {
        self.stats.record_rejected();
        debug!(error = %err, state = ?self.state(), "operation rejected");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_store_is_closed_and_empty() {
        let store = TransactionalStore::new();
        assert_eq!(store.state(), TransactionState::Closed);
        assert!(store.is_empty());
        assert_eq!(store.current_transaction(), None);
    }

    #[test]
    fn get_absent_key_returns_default() {
        let store = TransactionalStore::new();
        assert_eq!(store.get("missing"), 0);
        assert_eq!(store.get_opt("missing"), None);
    }

    #[test]
    fn put_without_transaction_fails() {
        let mut store = TransactionalStore::new();
        assert_eq!(store.put("A", 5), Err(StoreError::NoOpenTransaction));
        assert_eq!(store.stats().rejected(), 1);
    }

    #[test]
    fn begin_twice_fails() {
        let mut store = TransactionalStore::new();
        let id = store.begin().unwrap();

        assert_eq!(store.begin(), Err(StoreError::TransactionAlreadyOpen));
        assert_eq!(store.current_transaction(), Some(id));
    }

    #[test]
    fn put_is_invisible_until_commit() {
        let mut store = TransactionalStore::new();
        store.begin().unwrap();
        store.put("A", 5).unwrap();

        assert_eq!(store.get("A"), 0);
        assert_eq!(store.get_opt("A"), None);
        assert_eq!(store.pending_value("A"), Some(5));
    }

    #[test]
    fn last_write_wins_on_commit() {
        let mut store = TransactionalStore::new();
        store.begin().unwrap();
        store.put("A", 5).unwrap();
        store.put("A", 6).unwrap();
        assert_eq!(store.pending_len(), 1);

        store.commit().unwrap();

        assert_eq!(store.get("A"), 6);
        assert_eq!(store.state(), TransactionState::Closed);
        assert_eq!(store.pending_len(), 0);
    }

    #[test]
    fn rollback_discards_pending_and_keeps_committed() {
        let mut store = TransactionalStore::new();
        store.begin().unwrap();
        store.put("A", 1).unwrap();
        store.commit().unwrap();

        store.begin().unwrap();
        store.put("A", 2).unwrap();
        store.put("B", 10).unwrap();
        store.rollback().unwrap();

        assert_eq!(store.get("A"), 1);
        assert_eq!(store.get_opt("B"), None);
        assert_eq!(store.stats().keys_discarded(), 2);
    }

    #[test]
    fn commit_and_rollback_require_open_transaction() {
        let mut store = TransactionalStore::new();
        assert_eq!(store.commit(), Err(StoreError::NoOpenTransaction));
        assert_eq!(store.rollback(), Err(StoreError::NoOpenTransaction));

        store.begin().unwrap();
        store.commit().unwrap();
        assert_eq!(store.commit(), Err(StoreError::NoOpenTransaction));
        assert_eq!(store.put("A", 1), Err(StoreError::NoOpenTransaction));
    }

    #[test]
    fn begin_preserves_committed_by_default() {
        let mut store = TransactionalStore::new();
        store.begin().unwrap();
        store.put("A", 6).unwrap();
        store.commit().unwrap();

        store.begin().unwrap();
        assert_eq!(store.get("A"), 6);
    }

    #[test]
    fn legacy_begin_clears_committed() {
        let mut store = TransactionalStore::with_config(StoreConfig::legacy());
        store.begin().unwrap();
        store.put("A", 6).unwrap();
        store.commit().unwrap();
        assert_eq!(store.get("A"), 6);

        store.begin().unwrap();
        assert_eq!(store.get_opt("A"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn stored_zero_is_distinguishable_via_get_opt() {
        let mut store = TransactionalStore::new();
        store.begin().unwrap();
        store.put("zero", 0).unwrap();
        store.commit().unwrap();

        assert_eq!(store.get("zero"), 0);
        assert_eq!(store.get_opt("zero"), Some(0));
        assert!(store.contains_key("zero"));
    }

    #[test]
    fn custom_absent_value() {
        let store = TransactionalStore::with_config(StoreConfig::new().absent_value(-1));
        assert_eq!(store.get("missing"), -1);
    }

    #[test]
    fn transaction_ids_increase() {
        let mut store = TransactionalStore::new();
        let first = store.begin().unwrap();
        store.rollback().unwrap();
        let second = store.begin().unwrap();

        assert!(second > first);
    }

    #[test]
    fn rejected_operations_do_not_change_state() {
        let mut store = TransactionalStore::new();
        store.begin().unwrap();
        store.put("A", 1).unwrap();

        assert!(store.begin().is_err());
        assert!(store.is_open());
        assert_eq!(store.pending_value("A"), Some(1));
    }

    #[test]
    fn execute_reports_outcomes() {
        let mut store = TransactionalStore::new();
        let id = match store.execute(&Command::Begin).unwrap() {
            Outcome::Begun(id) => id,
            other => panic!("expected Begun, got {other:?}"),
        };
        assert_eq!(store.current_transaction(), Some(id));

        let put = Command::Put {
            key: "A".into(),
            value: 3,
        };
        assert_eq!(store.execute(&put).unwrap(), Outcome::Written);
        assert_eq!(
            store.execute(&Command::Commit).unwrap(),
            Outcome::Committed { keys: 1 }
        );
        assert_eq!(
            store.execute(&Command::Get { key: "A".into() }).unwrap(),
            Outcome::Value(Some(3))
        );
        assert_eq!(
            store.execute(&Command::Rollback),
            Err(StoreError::NoOpenTransaction)
        );
    }

    #[test]
    fn iter_lists_committed_only() {
        let mut store = TransactionalStore::new();
        store.begin().unwrap();
        store.put("a", 1).unwrap();
        store.put("b", 2).unwrap();
        store.commit().unwrap();
        store.begin().unwrap();
        store.put("c", 3).unwrap();

        let mut entries: Vec<_> = store.iter().collect();
        entries.sort();
        assert_eq!(entries, vec![("a", 1), ("b", 2)]);
        assert_eq!(store.len(), 2);
    }

    proptest! {
        #[test]
        fn commit_applies_last_write_per_key(
            writes in prop::collection::vec(("[a-d]", any::<i64>()), 0..32)
        ) {
            let mut expected = HashMap::new();
            let mut store = TransactionalStore::new();
            store.begin().unwrap();
            for (key, value) in &writes {
                store.put(key.as_str(), *value).unwrap();
                expected.insert(key.clone(), *value);
            }
            prop_assert!(store.is_empty());

            store.commit().unwrap();
            prop_assert_eq!(store.len(), expected.len());
            for (key, value) in &expected {
                prop_assert_eq!(store.get_opt(key), Some(*value));
            }
        }
    }
}
