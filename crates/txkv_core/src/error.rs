//! Error types for txkv core.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by illegal transaction state transitions.
///
/// Both variants leave the store exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `begin` was called while a transaction is already open.
    #[error("transaction already in progress")]
    TransactionAlreadyOpen,

    /// `put`, `commit` or `rollback` was called with no open transaction.
    #[error("no open transaction")]
    NoOpenTransaction,
}

/// Result type for command parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors produced while parsing the text form of a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input had no command keyword.
    #[error("empty command")]
    Empty,

    /// The keyword is not a known command.
    #[error("unknown command: {keyword}")]
    UnknownCommand {
        /// The unrecognised keyword.
        keyword: String,
    },

    /// The command was given the wrong number of arguments.
    #[error("{command} expects {expected} argument(s), got {actual}")]
    WrongArity {
        /// Command keyword.
        command: &'static str,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// A value argument was not a valid integer.
    #[error("invalid integer value: {value}")]
    InvalidValue {
        /// The text that failed to parse.
        value: String,
    },

    /// A parse failure inside a multi-line script.
    #[error("line {line}: {source}")]
    AtLine {
        /// 1-based line number.
        line: usize,
        /// The underlying failure.
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Creates an unknown command error.
    pub fn unknown_command(keyword: impl Into<String>) -> Self {
        Self::UnknownCommand {
            keyword: keyword.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(value: impl Into<String>) -> Self {
        Self::InvalidValue {
            value: value.into(),
        }
    }

    /// Attaches a script line number to this error.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }
}
