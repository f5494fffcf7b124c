// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable signal reader.
//!
//! This module provides a reader that takes signals from the process
//! environment, which is where web servers pass `SetEnv` values and where CLI
//! invocations receive theirs.

use crate::ports::SignalReader;
use std::collections::HashMap;
use std::env;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Signal reader for environment variables.
///
/// Reads the process environment on every lookup, so a resolution pass always
/// sees the current environment and nothing outlives it. Signal names are used
/// verbatim; no prefix stripping or case folding is applied.
///
/// # Priority
///
/// Environment variables have a priority of 2, which means they are overridden by
/// command-line signals (priority 3).
///
/// # Examples
///
/// ```rust
/// use plite::adapters::EnvSignalReader;
/// use plite::ports::SignalReader;
///
/// let reader = EnvSignalReader::new();
/// assert_eq!(reader.name(), "env");
/// ```
#[derive(Debug, Default)]
pub struct EnvSignalReader {
    /// Fixed values used instead of the process environment
    values: Option<HashMap<String, String>>,
}

impl EnvSignalReader {
    /// Creates a reader over the process environment.
    pub fn new() -> Self {
        Self { values: None }
    }

    /// Creates a reader over a fixed set of signals.
    ///
    /// **Note**: This is intended for tests, to resolve against a known signal set
    /// without touching the process environment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use plite::adapters::EnvSignalReader;
    /// use plite::ports::SignalReader;
    /// use std::collections::HashMap;
    ///
    /// let mut values = HashMap::new();
    /// values.insert("_plite_app".to_string(), "demo".to_string());
    ///
    /// let reader = EnvSignalReader::with_values(values);
    /// assert!(reader.has_signal("_plite_app"));
    /// ```
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            values: Some(values),
        }
    }

    fn within_limits(key: &str, value: &str) -> bool {
        if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
            tracing::debug!(
                "Skipping oversized environment signal: key_len={}, value_len={} (max key={}, max value={})",
                key.len(),
                value.len(),
                MAX_ENV_KEY_LEN,
                MAX_ENV_VALUE_LEN
            );
            return false;
        }
        true
    }
}

impl SignalReader for EnvSignalReader {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let value = match &self.values {
            Some(values) => values.get(key).cloned(),
            // non-unicode values are treated as absent
            None => env::var(key).ok(),
        }?;
        Self::within_limits(key, &value).then_some(value)
    }
}
