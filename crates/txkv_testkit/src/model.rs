//! Reference model for differential testing.
//!
//! [`ReferenceModel`] is a deliberately naive restatement of the store's
//! contract. [`compare_with_model`] runs the same commands through both and
//! reports the first step where they disagree.

use std::collections::BTreeMap;
use std::fmt;
use txkv_core::{
    Command, Outcome, StoreConfig, StoreError, StoreResult, TransactionId, TransactionalStore,
    Value,
};

/// Naive model of a transactional store.
#[derive(Debug, Default)]
pub struct ReferenceModel {
    reset_on_begin: bool,
    committed: BTreeMap<String, Value>,
    pending: Option<BTreeMap<String, Value>>,
    transactions: u64,
}

impl ReferenceModel {
    /// Creates a model matching the given store configuration.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            reset_on_begin: config.reset_committed_on_begin,
            ..Self::default()
        }
    }

    /// Applies a command, returning what a store must return for it.
    pub fn apply(&mut self, command: &Command) -> StoreResult<Outcome> {
        match command {
            Command::Begin => {
                if self.pending.is_some() {
                    return Err(StoreError::TransactionAlreadyOpen);
                }
                if self.reset_on_begin {
                    self.committed.clear();
                }
                self.pending = Some(BTreeMap::new());
                self.transactions += 1;
                Ok(Outcome::Begun(TransactionId::new(self.transactions)))
            }
            Command::Put { key, value } => {
                let pending = self.pending.as_mut().ok_or(StoreError::NoOpenTransaction)?;
                pending.insert(key.clone(), *value);
                Ok(Outcome::Written)
            }
            Command::Get { key } => Ok(Outcome::Value(self.committed.get(key).copied())),
            Command::Commit => {
                let pending = self.pending.take().ok_or(StoreError::NoOpenTransaction)?;
                let keys = pending.len();
                self.committed.extend(pending);
                Ok(Outcome::Committed { keys })
            }
            Command::Rollback => {
                let pending = self.pending.take().ok_or(StoreError::NoOpenTransaction)?;
                Ok(Outcome::RolledBack {
                    keys: pending.len(),
                })
            }
        }
    }

    /// Returns the committed mapping.
    #[must_use]
    pub fn committed(&self) -> &BTreeMap<String, Value> {
        &self.committed
    }

    /// Returns true if the model has an open transaction.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }
}

/// First point at which a store and the model disagreed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// Index of the offending command, or `None` for end-state checks.
    pub step: Option<usize>,
    /// What the model expected.
    pub expected: String,
    /// What the store produced.
    pub actual: String,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Some(step) => write!(
                f,
                "step {step}: expected {}, got {}",
                self.expected, self.actual
            ),
            None => write!(
                f,
                "final state: expected {}, got {}",
                self.expected, self.actual
            ),
        }
    }
}

/// Runs `commands` through a fresh store and a fresh model and compares
/// every result plus the final committed mapping and transaction state.
///
/// # Errors
///
/// Returns the first [`Divergence`] found.
pub fn compare_with_model(commands: &[Command], config: StoreConfig) -> Result<(), Divergence> {
    let mut model = ReferenceModel::new(&config);
    let mut store = TransactionalStore::with_config(config);

    for (step, command) in commands.iter().enumerate() {
        let expected = model.apply(command);
        let actual = store.execute(command);
        if expected != actual {
            return Err(Divergence {
                step: Some(step),
                expected: format!("{command} => {expected:?}"),
                actual: format!("{command} => {actual:?}"),
            });
        }
    }

    let committed: BTreeMap<String, Value> =
        store.iter().map(|(k, v)| (k.to_string(), v)).collect();
    if &committed != model.committed() {
        return Err(Divergence {
            step: None,
            expected: format!("{:?}", model.committed()),
            actual: format!("{committed:?}"),
        });
    }

    if store.is_open() != model.is_open() {
        return Err(Divergence {
            step: None,
            expected: format!("open={}", model.is_open()),
            actual: format!("open={}", store.is_open()),
        });
    }

    Ok(())
}
