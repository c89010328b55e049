//! Store statistics.
//!
//! Counters for transaction lifecycle and key traffic.
//!
//! # Usage
//!
//! ```rust
//! use txkv_core::TransactionalStore;
//!
//! let mut store = TransactionalStore::new();
//! store.begin().unwrap();
//! store.put("a", 1).unwrap();
//! store.commit().unwrap();
//!
//! let stats = store.stats().snapshot();
//! assert_eq!(stats.transactions_committed, 1);
//! assert_eq!(stats.keys_committed, 1);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Store statistics.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct StoreStats {
    // Transaction counters
    transactions_started: AtomicU64,
    transactions_committed: AtomicU64,
    transactions_rolled_back: AtomicU64,

    // Key traffic
    puts: AtomicU64,
    read_hits: AtomicU64,
    read_misses: AtomicU64,
    keys_committed: AtomicU64,
    keys_discarded: AtomicU64,

    // Operations refused because of the transaction state
    rejected: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_begin(&self) {
        self.transactions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self, keys: usize) {
        self.transactions_committed.fetch_add(1, Ordering::Relaxed);
        self.keys_committed.fetch_add(keys as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_rollback(&self, keys: usize) {
        self.transactions_rolled_back
            .fetch_add(1, Ordering::Relaxed);
        self.keys_discarded.fetch_add(keys as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self, hit: bool) {
        if hit {
            self.read_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.read_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of transactions started.
    pub fn transactions_started(&self) -> u64 {
        self.transactions_started.load(Ordering::Relaxed)
    }

    /// Returns the number of transactions committed.
    pub fn transactions_committed(&self) -> u64 {
        self.transactions_committed.load(Ordering::Relaxed)
    }

    /// Returns the number of transactions rolled back.
    pub fn transactions_rolled_back(&self) -> u64 {
        self.transactions_rolled_back.load(Ordering::Relaxed)
    }

    /// Returns the number of accepted puts.
    pub fn puts(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }

    /// Returns the number of reads that found a committed value.
    pub fn read_hits(&self) -> u64 {
        self.read_hits.load(Ordering::Relaxed)
    }

    /// Returns the number of reads of absent keys.
    pub fn read_misses(&self) -> u64 {
        self.read_misses.load(Ordering::Relaxed)
    }

    /// Returns the total number of keys merged by commits.
    pub fn keys_committed(&self) -> u64 {
        self.keys_committed.load(Ordering::Relaxed)
    }

    /// Returns the total number of pending keys dropped by rollbacks.
    pub fn keys_discarded(&self) -> u64 {
        self.keys_discarded.load(Ordering::Relaxed)
    }

    /// Returns the number of operations refused with a state error.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            transactions_started: self.transactions_started(),
            transactions_committed: self.transactions_committed(),
            transactions_rolled_back: self.transactions_rolled_back(),
            puts: self.puts(),
            read_hits: self.read_hits(),
            read_misses: self.read_misses(),
            keys_committed: self.keys_committed(),
            keys_discarded: self.keys_discarded(),
            rejected: self.rejected(),
        }
    }
}

/// A point-in-time copy of [`StoreStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Transactions started.
    pub transactions_started: u64,
    /// Transactions committed.
    pub transactions_committed: u64,
    /// Transactions rolled back.
    pub transactions_rolled_back: u64,
    /// Accepted puts.
    pub puts: u64,
    /// Reads that found a committed value.
    pub read_hits: u64,
    /// Reads of absent keys.
    pub read_misses: u64,
    /// Keys merged by commits.
    pub keys_committed: u64,
    /// Pending keys dropped by rollbacks.
    pub keys_discarded: u64,
    /// Operations refused with a state error.
    pub rejected: u64,
}
