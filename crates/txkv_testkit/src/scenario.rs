//! Scripted scenarios with expected results.

use std::fmt;
use txkv_core::{Command, Outcome, StoreError, StoreResult, TransactionId, TransactionalStore};

/// One command and the result it must produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Command to execute.
    pub command: Command,
    /// Required result.
    pub expected: StoreResult<Outcome>,
}

impl Step {
    /// Creates a step.
    pub fn new(command: Command, expected: StoreResult<Outcome>) -> Self {
        Self { command, expected }
    }
}

/// A scenario step whose result did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioFailure {
    /// Index of the failing step.
    pub index: usize,
    /// The step definition.
    pub step: Step,
    /// What the store actually returned.
    pub actual: StoreResult<Outcome>,
}

impl fmt::Display for ScenarioFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} ({}): expected {:?}, got {:?}",
            self.index, self.step.command, self.step.expected, self.actual
        )
    }
}

impl std::error::Error for ScenarioFailure {}

fn put(key: &str, value: i64) -> Command {
    Command::Put {
        key: key.to_string(),
        value,
    }
}

fn get(key: &str) -> Command {
    Command::Get {
        key: key.to_string(),
    }
}

/// The reference acceptance scenario, for a fresh store with default config.
///
/// Reads before any write, a put with no transaction, an overwrite that
/// commits once, a second commit with nothing open, and a rolled-back
/// write that never becomes visible.
#[must_use]
pub fn reference_scenario() -> Vec<Step> {
    vec![
        Step::new(get("A"), Ok(Outcome::Value(None))),
        Step::new(put("A", 5), Err(StoreError::NoOpenTransaction)),
        Step::new(Command::Begin, Ok(Outcome::Begun(TransactionId::new(1)))),
        Step::new(put("A", 5), Ok(Outcome::Written)),
        Step::new(get("A"), Ok(Outcome::Value(None))),
        Step::new(put("A", 6), Ok(Outcome::Written)),
        Step::new(Command::Commit, Ok(Outcome::Committed { keys: 1 })),
        Step::new(get("A"), Ok(Outcome::Value(Some(6)))),
        Step::new(Command::Commit, Err(StoreError::NoOpenTransaction)),
        Step::new(Command::Rollback, Err(StoreError::NoOpenTransaction)),
        Step::new(get("B"), Ok(Outcome::Value(None))),
        Step::new(Command::Begin, Ok(Outcome::Begun(TransactionId::new(2)))),
        Step::new(put("B", 10), Ok(Outcome::Written)),
        Step::new(Command::Rollback, Ok(Outcome::RolledBack { keys: 1 })),
        Step::new(get("B"), Ok(Outcome::Value(None))),
        // Committed data survives the later begin/rollback
        Step::new(get("A"), Ok(Outcome::Value(Some(6)))),
    ]
}

/// Scenario showing the legacy `reset_committed_on_begin` behavior.
#[must_use]
pub fn legacy_reset_scenario() -> Vec<Step> {
    vec![
        Step::new(Command::Begin, Ok(Outcome::Begun(TransactionId::new(1)))),
        Step::new(put("A", 6), Ok(Outcome::Written)),
        Step::new(Command::Commit, Ok(Outcome::Committed { keys: 1 })),
        Step::new(get("A"), Ok(Outcome::Value(Some(6)))),
        Step::new(Command::Begin, Ok(Outcome::Begun(TransactionId::new(2)))),
        Step::new(get("A"), Ok(Outcome::Value(None))),
        Step::new(Command::Rollback, Ok(Outcome::RolledBack { keys: 0 })),
    ]
}

/// Runs a scenario, stopping at the first mismatch.
///
/// # Errors
///
/// Returns the first step whose result differs from its expectation.
pub fn run_scenario(store: &mut TransactionalStore, steps: &[Step]) -> Result<(), ScenarioFailure> {
    for (index, step) in steps.iter().enumerate() {
        let actual = store.execute(&step.command);
        if actual != step.expected {
            return Err(ScenarioFailure {
                index,
                step: step.clone(),
                actual,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use txkv_core::StoreConfig;

    #[test]
    fn reference_scenario_passes() {
        let mut store = TransactionalStore::new();
        run_scenario(&mut store, &reference_scenario()).unwrap();
    }

    #[test]
    fn legacy_scenario_needs_legacy_config() {
        let mut legacy = TransactionalStore::with_config(StoreConfig::legacy());
        run_scenario(&mut legacy, &legacy_reset_scenario()).unwrap();

        let mut default = TransactionalStore::new();
        let failure = run_scenario(&mut default, &legacy_reset_scenario()).unwrap_err();
        assert_eq!(failure.index, 5);
        assert_eq!(failure.actual, Ok(Outcome::Value(Some(6))));
    }

    #[test]
    fn failure_reports_step() {
        let mut store = TransactionalStore::new();
        let steps = vec![Step::new(Command::Commit, Ok(Outcome::Committed { keys: 0 }))];
        let failure = run_scenario(&mut store, &steps).unwrap_err();

        assert_eq!(failure.index, 0);
        assert_eq!(failure.actual, Err(StoreError::NoOpenTransaction));
        assert!(failure.to_string().starts_with("step 0 (COMMIT)"));
    }
}
