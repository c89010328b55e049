//! Text commands and their outcomes.
//!
//! Each store operation has a line-oriented text form:
//!
//! ```text
//! BEGIN
//! PUT <key> <value>
//! GET <key>
//! COMMIT
//! ROLLBACK
//! ```
//!
//! Keywords are case-insensitive. Keys are single whitespace-free tokens.

use crate::error::{ParseError, ParseResult};
use crate::types::{TransactionId, Value};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A single store operation.
///
/// The text form only round-trips keys that are a single non-empty token
/// without whitespace. The store API accepts any string as a key, so a
/// `Put` or `Get` built in code with an empty key or a key containing
/// whitespace still displays, but the displayed line will not parse back to
/// the same command. [`has_text_form`](Self::has_text_form) reports whether
/// a command round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Open a transaction.
    Begin,
    /// Buffer a write.
    Put {
        /// Key to write.
        key: String,
        /// Value to write.
        value: Value,
    },
    /// Read a committed value.
    Get {
        /// Key to read.
        key: String,
    },
    /// Commit the open transaction.
    Commit,
    /// Roll back the open transaction.
    Rollback,
}

impl Command {
    /// Returns the command keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Begin => "BEGIN",
            Self::Put { .. } => "PUT",
            Self::Get { .. } => "GET",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
        }
    }

    /// Returns true if the displayed form parses back to this command.
    #[must_use]
    pub fn has_text_form(&self) -> bool {
        match self {
            Self::Put { key, .. } | Self::Get { key } => {
                !key.is_empty() && !key.chars().any(char::is_whitespace)
            }
            _ => true,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put { key, value } => write!(f, "PUT {key} {value}"),
            Self::Get { key } => write!(f, "GET {key}"),
            other => f.write_str(other.keyword()),
        }
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        let mut parts = s.split_whitespace();
        let keyword = parts.next().ok_or(ParseError::Empty)?;
        let args: Vec<&str> = parts.collect();

        let arity = |command: &'static str, expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(ParseError::WrongArity {
                    command,
                    expected,
                    actual: args.len(),
                })
            }
        };

        if keyword.eq_ignore_ascii_case("BEGIN") {
            arity("BEGIN", 0)?;
            Ok(Self::Begin)
        } else if keyword.eq_ignore_ascii_case("PUT") {
            arity("PUT", 2)?;
            let value = args[1]
                .parse::<Value>()
                .map_err(|_| ParseError::invalid_value(args[1]))?;
            Ok(Self::Put {
                key: args[0].to_string(),
                value,
            })
        } else if keyword.eq_ignore_ascii_case("GET") {
            arity("GET", 1)?;
            Ok(Self::Get {
                key: args[0].to_string(),
            })
        } else if keyword.eq_ignore_ascii_case("COMMIT") {
            arity("COMMIT", 0)?;
            Ok(Self::Commit)
        } else if keyword.eq_ignore_ascii_case("ROLLBACK") {
            arity("ROLLBACK", 0)?;
            Ok(Self::Rollback)
        } else {
            Err(ParseError::unknown_command(keyword))
        }
    }
}

/// Parses a script of commands, one per line.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns the first parse failure, tagged with its 1-based line number.
pub fn parse_script(input: &str) -> ParseResult<Vec<Command>> {
    input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| line.parse::<Command>().map_err(|e| e.at_line(line_no)))
        .collect()
}

/// Result of a successfully executed [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// A transaction was opened.
    Begun(TransactionId),
    /// A write was buffered.
    Written,
    /// A read completed; `None` means the key has no committed value.
    Value(Option<Value>),
    /// The transaction committed this many distinct keys.
    Committed {
        /// Keys merged.
        keys: usize,
    },
    /// The transaction was rolled back, dropping this many pending keys.
    RolledBack {
        /// Keys discarded.
        keys: usize,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begun(id) => write!(f, "began {id}"),
            Self::Written => f.write_str("ok"),
            Self::Value(Some(value)) => write!(f, "{value}"),
            Self::Value(None) => f.write_str("(absent)"),
            Self::Committed { keys } => write!(f, "committed {keys} key(s)"),
            Self::RolledBack { keys } => write!(f, "rolled back {keys} key(s)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_commands() {
        assert_eq!("BEGIN".parse::<Command>().unwrap(), Command::Begin);
        assert_eq!(
            "put A 5".parse::<Command>().unwrap(),
            Command::Put {
                key: "A".into(),
                value: 5
            }
        );
        assert_eq!(
            "Get A".parse::<Command>().unwrap(),
            Command::Get { key: "A".into() }
        );
        assert_eq!("commit".parse::<Command>().unwrap(), Command::Commit);
        assert_eq!("  ROLLBACK  ".parse::<Command>().unwrap(), Command::Rollback);
    }

    #[test]
    fn parse_negative_value() {
        assert_eq!(
            "PUT k -42".parse::<Command>().unwrap(),
            Command::Put {
                key: "k".into(),
                value: -42
            }
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!(
            "DELETE A".parse::<Command>(),
            Err(ParseError::unknown_command("DELETE"))
        );
        assert_eq!(
            "PUT A".parse::<Command>(),
            Err(ParseError::WrongArity {
                command: "PUT",
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            "PUT A five".parse::<Command>(),
            Err(ParseError::invalid_value("five"))
        );
        assert!("BEGIN now".parse::<Command>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        let commands = [
            Command::Begin,
            Command::Put {
                key: "A".into(),
                value: 6,
            },
            Command::Get { key: "A".into() },
            Command::Commit,
            Command::Rollback,
        ];
        for command in commands {
            assert_eq!(command.to_string().parse::<Command>().unwrap(), command);
        }
    }

    #[test]
    fn keys_outside_text_form_do_not_round_trip() {
        let spaced = Command::Put {
            key: "a b".into(),
            value: 1,
        };
        let empty = Command::Get { key: String::new() };

        assert!(!spaced.has_text_form());
        assert!(!empty.has_text_form());
        assert_ne!(spaced.to_string().parse::<Command>(), Ok(spaced.clone()));
        assert_ne!(empty.to_string().parse::<Command>(), Ok(empty.clone()));

        assert!(Command::Get { key: "A".into() }.has_text_form());
        assert!(Command::Commit.has_text_form());
    }

    #[test]
    fn script_skips_comments_and_blank_lines() {
        let script = "# setup\nBEGIN\n\nPUT A 5\n  # trailing\nCOMMIT\n";
        let commands = parse_script(script).unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[2], Command::Commit);
    }

    #[test]
    fn script_error_reports_line() {
        let err = parse_script("BEGIN\nPUT A\n").unwrap_err();
        assert!(matches!(err, ParseError::AtLine { line: 2, .. }));
    }

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::Value(None).to_string(), "(absent)");
        assert_eq!(Outcome::Value(Some(6)).to_string(), "6");
        assert_eq!(
            Outcome::Begun(TransactionId::new(2)).to_string(),
            "began txn:2"
        );
    }
}
