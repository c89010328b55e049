//! Thread-safe handle to a single store.

use crate::command::{Command, Outcome};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::store::TransactionalStore;
use crate::types::{TransactionId, Value};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// A cloneable, lock-protected [`TransactionalStore`].
///
/// One mutex guards the committed mapping, the transaction flag and the
/// pending buffer together, so each operation's check-then-act sequence is
/// atomic. There is still only one transaction per store: every clone of
/// the handle shares it. Use [`transaction`](Self::transaction) to run a
/// begin/commit sequence without other callers interleaving.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<TransactionalStore>>,
}

impl SharedStore {
    /// Creates an empty shared store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty shared store with the given configuration.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self::from_store(TransactionalStore::with_config(config))
    }

    /// Wraps an existing store.
    #[must_use]
    pub fn from_store(store: TransactionalStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// See [`TransactionalStore::begin`].
    pub fn begin(&self) -> StoreResult<TransactionId> {
        self.inner.lock().begin()
    }

    /// See [`TransactionalStore::put`].
    pub fn put(&self, key: impl Into<String>, value: Value) -> StoreResult<()> {
        self.inner.lock().put(key, value)
    }

    /// See [`TransactionalStore::get`].
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        self.inner.lock().get(key)
    }

    /// See [`TransactionalStore::get_opt`].
    #[must_use]
    pub fn get_opt(&self, key: &str) -> Option<Value> {
        self.inner.lock().get_opt(key)
    }

    /// See [`TransactionalStore::commit`].
    pub fn commit(&self) -> StoreResult<()> {
        self.inner.lock().commit()
    }

    /// See [`TransactionalStore::rollback`].
    pub fn rollback(&self) -> StoreResult<()> {
        self.inner.lock().rollback()
    }

    /// See [`TransactionalStore::execute`].
    pub fn execute(&self, command: &Command) -> StoreResult<Outcome> {
        self.inner.lock().execute(command)
    }

    /// Returns true if a transaction is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.lock().is_open()
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut TransactionalStore) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// Runs `f` inside a transaction while holding the lock.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back if it
    /// returns `Err` or panics. A panic is re-raised after the rollback, so
    /// the store is never left with an open transaction nobody owns.
    ///
    /// `f` may close the transaction itself with `commit` or `rollback`; its
    /// result is then returned as is. A transaction `f` opens after that is
    /// left to the caller.
    ///
    /// # Errors
    ///
    /// Returns `f`'s error, or a [`StoreError`] if the transaction could not
    /// be opened (for example because one was already open).
    pub fn transaction<T, E>(
        &self,
        f: impl FnOnce(&mut TransactionalStore) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut store = self.inner.lock();
        let id = store.begin()?;

        let result = match panic::catch_unwind(AssertUnwindSafe(|| f(&mut *store))) {
            Ok(result) => result,
            Err(payload) => {
                if store.current_transaction() == Some(id) {
                    warn!(txid = %id, "transaction closure panicked, rolling back");
                    let _ = store.rollback();
                }
                drop(store);
                panic::resume_unwind(payload);
            }
        };

        let still_open = store.current_transaction() == Some(id);
        match result {
            Ok(value) => {
                if still_open {
                    store.commit()?;
                }
                Ok(value)
            }
            Err(err) => {
                if still_open {
                    store.rollback()?;
                }
                Err(err)
            }
        }
    }
}
