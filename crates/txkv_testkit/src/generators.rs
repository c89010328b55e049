//! Property-based test generators using proptest.
//!
//! Keys are drawn from a small alphabet so generated command sequences
//! revisit the same keys often enough to exercise overwrites.

use proptest::prelude::*;
use txkv_core::{Command, Value};

/// Strategy for keys from a small pool (`a`..`e`).
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(str::to_string)
}

/// Strategy for arbitrary keys, including ones outside the small pool.
pub fn wide_key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9_]{1,16}").expect("Invalid regex")
}

/// Strategy for values, biased toward zero so absent/zero collisions show up.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(0i64),
        4 => -100i64..100,
        1 => any::<Value>(),
    ]
}

/// Strategy for a single command.
pub fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        2 => Just(Command::Begin),
        5 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| Command::Put { key, value }),
        3 => key_strategy().prop_map(|key| Command::Get { key }),
        2 => Just(Command::Commit),
        1 => Just(Command::Rollback),
    ]
}

/// Strategy for a sequence of commands.
pub fn command_sequence_strategy(max_len: usize) -> impl Strategy<Value = Vec<Command>> {
    prop::collection::vec(command_strategy(), 0..max_len)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn pool_keys_are_single_letters(key in key_strategy()) {
            prop_assert_eq!(key.len(), 1);
        }

        #[test]
        fn wide_keys_have_no_whitespace(key in wide_key_strategy()) {
            prop_assert!(!key.is_empty());
            prop_assert!(!key.chars().any(char::is_whitespace));
        }

        #[test]
        fn commands_survive_text_form(command in command_strategy()) {
            prop_assert!(command.has_text_form());
            let text = command.to_string();
            prop_assert_eq!(text.parse::<Command>().unwrap(), command);
        }
    }
}
