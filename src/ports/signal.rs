// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment signal reader trait definition.
//!
//! A signal is a named value from the request or process environment (a web
//! server variable, a process environment variable, a command-line flag). The
//! resolver never touches the environment directly; it goes through this port so
//! tests can inject a fixed signal set.

use crate::domain::{PliteError, Result};

/// A source of environment signals.
///
/// Implementations only need to provide [`name`], [`priority`] and [`lookup`];
/// presence checks and trimmed reads are derived from `lookup`.
///
/// # Priority
///
/// When several readers are layered, the one with the highest priority value is
/// consulted first and the first reader holding a signal wins.
///
/// # Examples
///
/// ```rust
/// use plite::ports::SignalReader;
///
/// struct Fixed;
///
/// impl SignalReader for Fixed {
///     fn name(&self) -> &str { "fixed" }
///     fn priority(&self) -> u8 { 1 }
///     fn lookup(&self, key: &str) -> Option<String> {
///         (key == "_plite_app").then(|| " demo ".to_string())
///     }
/// }
///
/// let reader = Fixed;
/// assert!(reader.has_signal("_plite_app"));
/// assert_eq!(reader.read_signal("_plite_app").unwrap(), "demo");
/// assert!(reader.read_signal("_plite_config").is_err());
/// ```
///
/// [`name`]: SignalReader::name
/// [`priority`]: SignalReader::priority
/// [`lookup`]: SignalReader::lookup
pub trait SignalReader: Send + Sync {
    /// Returns the name of this reader, used in log messages.
    fn name(&self) -> &str;

    /// Returns the priority of this reader. Higher values win.
    fn priority(&self) -> u8;

    /// Returns the raw, untrimmed value of a signal if it is present.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Returns `true` iff the named signal is present.
    fn has_signal(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Returns the trimmed value of a signal.
    ///
    /// Fails with `MissingSignal` when the signal is absent; callers for whom
    /// absence is an expected branch should check [`has_signal`] first.
    ///
    /// [`has_signal`]: SignalReader::has_signal
    fn read_signal(&self, key: &str) -> Result<String> {
        self.lookup(key)
            .map(|value| value.trim().to_string())
            .ok_or_else(|| PliteError::MissingSignal {
                key: key.to_string(),
            })
    }
}

/// Several signal readers consulted in priority order.
///
/// # Examples
///
/// ```rust
/// use plite::adapters::EnvSignalReader;
/// use plite::ports::{LayeredSignals, SignalReader};
/// use std::collections::HashMap;
///
/// let low = EnvSignalReader::with_values(HashMap::from([("k".to_string(), "env".to_string())]));
/// let layered = LayeredSignals::new(vec![Box::new(low)]);
/// assert_eq!(layered.read_signal("k").unwrap(), "env");
/// ```
#[derive(Default)]
pub struct LayeredSignals {
    readers: Vec<Box<dyn SignalReader>>,
}

impl LayeredSignals {
    /// Creates a layered reader, sorting the readers by priority (highest first).
    pub fn new(readers: Vec<Box<dyn SignalReader>>) -> Self {
        let mut layered = Self { readers };
        layered.sort_readers();
        layered
    }

    /// Adds a reader, keeping priority order.
    pub fn push(&mut self, reader: Box<dyn SignalReader>) {
        self.readers.push(reader);
        self.sort_readers();
    }

    /// Returns the number of layered readers.
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    /// Returns `true` if no reader is layered.
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    fn sort_readers(&mut self) {
        // stable: equal priorities keep insertion order
        self.readers.sort_by_key(|r| std::cmp::Reverse(r.priority()));
    }
}

impl SignalReader for LayeredSignals {
    fn name(&self) -> &str {
        "layered"
    }

    fn priority(&self) -> u8 {
        self.readers.iter().map(|r| r.priority()).max().unwrap_or(0)
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.readers.iter().find_map(|reader| {
            let value = reader.lookup(key);
            if value.is_some() {
                tracing::debug!("Signal '{}' found in reader '{}'", key, reader.name());
            }
            value
        })
    }
}
