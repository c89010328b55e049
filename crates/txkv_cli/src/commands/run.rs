//! Run command implementation.

use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};
use txkv_core::{parse_script, Command, Outcome, StatsSnapshot, StoreConfig, TransactionalStore};

/// Result of one executed command.
#[derive(Debug, Serialize)]
pub struct StepResult {
    /// The command as executed.
    pub command: Command,
    /// Outcome on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Error message on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full report of a script run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Per-command results, in order.
    pub steps: Vec<StepResult>,
    /// Whether a transaction was still open at the end.
    pub open_at_end: bool,
    /// Number of committed keys at the end.
    pub committed_keys: usize,
    /// Store counters at the end.
    pub stats: StatsSnapshot,
}

/// Runs the run command.
pub fn run(
    file: Option<&Path>,
    config: StoreConfig,
    format: &str,
    fail_fast: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !matches!(format, "text" | "json") {
        return Err(format!("unknown output format: {format}").into());
    }

    let input = match file {
        Some(path) => {
            info!("Reading script from {:?}", path);
            fs::read_to_string(path)?
        }
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let commands = parse_script(&input)?;
    debug!(count = commands.len(), "script parsed");

    let absent = config.absent_value;
    let report = execute_all(commands, config, fail_fast)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for step in &report.steps {
            match (&step.outcome, &step.error) {
                (Some(Outcome::Value(None)), _) => {
                    println!("{:<20} -> {absent} (absent)", step.command.to_string());
                }
                (Some(outcome), _) => println!("{:<20} -> {outcome}", step.command.to_string()),
                (None, Some(err)) => println!("{:<20} -> error: {err}", step.command.to_string()),
                (None, None) => {}
            }
        }
        if report.open_at_end {
            println!("warning: transaction left open; pending writes were not committed");
        }
        println!(
            "{} committed key(s), {} commit(s), {} rollback(s), {} rejected",
            report.committed_keys,
            report.stats.transactions_committed,
            report.stats.transactions_rolled_back,
            report.stats.rejected
        );
    }

    Ok(())
}

/// Executes commands against a fresh store, collecting one result per command.
pub fn execute_all(
    commands: Vec<Command>,
    config: StoreConfig,
    fail_fast: bool,
) -> Result<RunReport, Box<dyn std::error::Error>> {
    let mut store = TransactionalStore::with_config(config);
    let mut steps = Vec::with_capacity(commands.len());

    for command in commands {
        let step = match store.execute(&command) {
            Ok(outcome) => StepResult {
                command,
                outcome: Some(outcome),
                error: None,
            },
            Err(err) if fail_fast => {
                return Err(format!("{command}: {err}").into());
            }
            Err(err) => StepResult {
                command,
                outcome: None,
                error: Some(err.to_string()),
            },
        };
        steps.push(step);
    }

    Ok(RunReport {
        steps,
        open_at_end: store.is_open(),
        committed_keys: store.len(),
        stats: store.stats().snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(text: &str) -> Vec<Command> {
        parse_script(text).unwrap()
    }

    #[test]
    fn collects_outcomes_and_errors() {
        let commands = script("PUT A 5\nBEGIN\nPUT A 6\nCOMMIT\nGET A\nCOMMIT\n");
        let report = execute_all(commands, StoreConfig::default(), false).unwrap();

        assert_eq!(report.steps.len(), 6);
        assert!(report.steps[0].error.is_some());
        assert_eq!(report.steps[4].outcome, Some(Outcome::Value(Some(6))));
        assert!(report.steps[5].error.is_some());
        assert_eq!(report.stats.rejected, 2);
        assert!(!report.open_at_end);
    }

    #[test]
    fn fail_fast_stops_at_first_rejection() {
        let commands = script("BEGIN\nBEGIN\nCOMMIT\n");
        let err = execute_all(commands, StoreConfig::default(), true).unwrap_err();
        assert!(err.to_string().contains("transaction already in progress"));
    }

    #[test]
    fn reports_open_transaction() {
        let commands = script("BEGIN\nPUT A 1\n");
        let report = execute_all(commands, StoreConfig::default(), false).unwrap();
        assert!(report.open_at_end);
        assert_eq!(report.committed_keys, 0);
    }

    #[test]
    fn report_serializes_to_json() {
        let commands = script("BEGIN\nPUT A 1\nCOMMIT\nGET A\nGET B\n");
        let report = execute_all(commands, StoreConfig::default(), false).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["steps"][1]["command"]["op"], "put");
        assert_eq!(json["steps"][3]["outcome"]["detail"], 1);
        assert!(json["steps"][4]["outcome"]["detail"].is_null());
        assert_eq!(json["stats"]["transactions_committed"], 1);
    }
}
