// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which turns the raw content of a
//! per-application configuration file into a [`ParameterStore`].

use crate::domain::{ParameterStore, Result};

/// A trait for parsing configuration files.
///
/// Parsers keep the document's top-level keys as parameter names. Nested
/// structures are kept as nested values, not flattened, so that callers can
/// descend into them (e.g. a secret stored as an object).
///
/// # Examples
///
/// ```rust
/// use plite::domain::{ParameterStore, Result};
/// use plite::ports::ConfigParser;
///
/// struct KeyEqualsValue;
///
/// impl ConfigParser for KeyEqualsValue {
///     fn parse(&self, content: &str) -> Result<ParameterStore> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["env"]
///     }
/// }
///
/// let store = KeyEqualsValue.parse("app = demo").unwrap();
/// assert!(store.matches("app", "demo"));
/// ```
pub trait ConfigParser {
    /// Parses configuration content into a parameter store.
    ///
    /// # Returns
    ///
    /// * `Ok(ParameterStore)` - The parsed parameters
    /// * `Err(PliteError)` - The content could not be parsed
    fn parse(&self, content: &str) -> Result<ParameterStore>;

    /// Returns the file extensions (without the leading dot) this parser supports.
    fn supported_extensions(&self) -> &[&str];
}
