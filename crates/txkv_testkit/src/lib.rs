//! # txkv Testkit
//!
//! Test utilities for txkv.
//!
//! This crate provides:
//! - Property-based test generators using proptest
//! - A reference model for differential testing
//! - The reference acceptance scenario as data
//! - Stress testing utilities for [`SharedStore`](txkv_core::SharedStore)
//!
//! ## Usage
//!
//! ```rust
//! use txkv_testkit::prelude::*;
//! use txkv_core::TransactionalStore;
//!
//! let mut store = TransactionalStore::new();
//! run_scenario(&mut store, &reference_scenario()).unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod generators;
pub mod model;
pub mod scenario;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::generators::*;
    pub use crate::model::*;
    pub use crate::scenario::*;
    pub use crate::stress::*;
}

pub use generators::*;
pub use model::*;
pub use scenario::*;
pub use stress::*;
