//! Stress tests for txkv.
//!
//! These exercise [`SharedStore`] under heavy load and concurrent access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use txkv_core::{SharedStore, StoreError};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Number of distinct keys.
    pub key_count: usize,
    /// Puts per transaction.
    pub batch_size: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            key_count: 1_000,
            batch_size: 4,
        }
    }
}

fn key_for(i: usize, key_count: usize) -> String {
    format!("key{}", i % key_count.max(1))
}

/// Sequential committed transactions of `batch_size` puts each.
pub fn stress_sequential_commits(store: &SharedStore, config: &StressConfig) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        let result = store.transaction(|tx| {
            for b in 0..config.batch_size {
                tx.put(key_for(i + b, config.key_count), i as i64)?;
            }
            Ok::<_, StoreError>(())
        });

        match result {
            Ok(()) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Threads racing whole transactions through [`SharedStore::transaction`].
///
/// Each thread writes its own key space, so every commit must survive.
pub fn stress_concurrent_transactions(
    store: &SharedStore,
    config: &StressConfig,
) -> StressTestResult {
    let successful = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let ops_per_thread = config.operations / config.threads.max(1);

    let start = Instant::now();

    thread::scope(|scope| {
        for t in 0..config.threads {
            let store = store.clone();
            let successful = &successful;
            let failed = &failed;

            scope.spawn(move || {
                for i in 0..ops_per_thread {
                    let key = format!("t{t}-{i}");
                    match store.transaction(|tx| tx.put(key, i as i64)) {
                        Ok(()) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            });
        }
    });

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Threads calling `begin` directly and contending for the single
/// transaction slot.
///
/// A thread that loses the race sees `TransactionAlreadyOpen` and counts it
/// as a failed operation. Only winners commit, so a commit never finds the
/// slot already closed.
pub fn stress_begin_contention(store: &SharedStore, config: &StressConfig) -> StressTestResult {
    let successful = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let ops_per_thread = config.operations / config.threads.max(1);

    let start = Instant::now();

    thread::scope(|scope| {
        for _ in 0..config.threads {
            let store = store.clone();
            let successful = &successful;
            let failed = &failed;

            scope.spawn(move || {
                for _ in 0..ops_per_thread {
                    match store.begin() {
                        Ok(_) => {
                            let counter = if store.commit().is_ok() {
                                successful
                            } else {
                                failed
                            };
                            counter.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(_) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            });
        }
    });

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Transactions that always roll back; nothing may be committed.
pub fn stress_rollbacks(store: &SharedStore, config: &StressConfig) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        let outcome = store.begin().and_then(|_| {
            store.put(key_for(i, config.key_count), i as i64)?;
            store.rollback()
        });

        match outcome {
            Ok(()) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}
