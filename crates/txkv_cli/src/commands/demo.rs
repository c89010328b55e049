//! Demo command implementation.
//!
//! Walks a fresh store through the reference scenario: reads before any
//! write, a rejected put, an overwritten key committed once, a double
//! commit, and a rolled-back transaction.

use std::io::{self, Write};
use tracing::info;
use txkv_core::{StoreConfig, StoreError, TransactionalStore};

/// Runs the demo command.
pub fn run(config: StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(?config, "starting demo");
    let store = walk(&mut io::stdout().lock(), config)?;

    let stats = store.stats();
    info!(
        committed = stats.transactions_committed(),
        rolled_back = stats.transactions_rolled_back(),
        rejected = stats.rejected(),
        "demo finished"
    );

    Ok(())
}

/// Replays the scenario, reporting each step to `out`.
fn walk<W: Write>(
    out: &mut W,
    config: StoreConfig,
) -> Result<TransactionalStore, Box<dyn std::error::Error>> {
    let mut store = TransactionalStore::with_config(config);

    // A has never been written
    match store.get_opt("A") {
        None => writeln!(out, "GET A       -> not found")?,
        Some(v) => writeln!(out, "GET A       -> {v}")?,
    }

    // No transaction is open yet
    expect_rejected(out, "PUT A 5", store.put("A", 5), StoreError::NoOpenTransaction)?;

    let txid = store.begin()?;
    writeln!(out, "BEGIN       -> {txid}")?;

    store.put("A", 5)?;
    writeln!(out, "PUT A 5     -> buffered")?;

    // Uncommitted writes stay invisible
    match store.get_opt("A") {
        None => writeln!(out, "GET A       -> not committed yet")?,
        Some(v) => writeln!(out, "GET A       -> {v}")?,
    }

    store.put("A", 6)?;
    writeln!(out, "PUT A 6     -> buffered")?;

    store.commit()?;
    writeln!(out, "COMMIT      -> ok")?;

    writeln!(out, "GET A       -> {}", store.get("A"))?;

    expect_rejected(out, "COMMIT", store.commit(), StoreError::NoOpenTransaction)?;
    expect_rejected(out, "ROLLBACK", store.rollback(), StoreError::NoOpenTransaction)?;

    match store.get_opt("B") {
        None => writeln!(out, "GET B       -> not found")?,
        Some(v) => writeln!(out, "GET B       -> {v}")?,
    }

    let txid = store.begin()?;
    writeln!(out, "BEGIN       -> {txid}")?;

    store.put("B", 10)?;
    writeln!(out, "PUT B 10    -> buffered")?;

    store.rollback()?;
    writeln!(out, "ROLLBACK    -> changes reverted")?;

    match store.get_opt("B") {
        None => writeln!(out, "GET B       -> not found (rolled back)")?,
        Some(v) => writeln!(out, "GET B       -> {v}")?,
    }

    Ok(store)
}

fn expect_rejected<W: Write>(
    out: &mut W,
    label: &str,
    result: Result<(), StoreError>,
    expected: StoreError,
) -> io::Result<()> {
    match result {
        Err(err) if err == expected => writeln!(out, "{label:<11} -> error: {err}"),
        Err(err) => writeln!(out, "{label:<11} -> unexpected error: {err}"),
        Ok(()) => writeln!(out, "{label:<11} -> unexpectedly succeeded"),
    }
}
