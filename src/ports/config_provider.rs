// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded configuration provider trait definition.

use crate::domain::{ParameterStore, Result};

/// A configuration compiled into the application.
///
/// Production deployments select one of these by name through the
/// `_plite_config` signal instead of reading configuration files. The returned
/// parameters must include the `app` key naming the application.
///
/// # Examples
///
/// ```rust
/// use plite::domain::{ParameterStore, Result};
/// use plite::ports::ConfigurationProvider;
///
/// struct DemoConfig;
///
/// impl ConfigurationProvider for DemoConfig {
///     fn get_config(&self) -> Result<ParameterStore> {
///         Ok(ParameterStore::from_pairs([
///             ("app", "demo"),
///             ("file", "file"),
///             ("file_provider", "cloud"),
///         ]))
///     }
/// }
///
/// assert!(DemoConfig.get_config().unwrap().has("app"));
/// ```
pub trait ConfigurationProvider: Send + Sync {
    /// Returns the application's parameters.
    fn get_config(&self) -> Result<ParameterStore>;
}

impl<F> ConfigurationProvider for F
where
    F: Fn() -> Result<ParameterStore> + Send + Sync,
{
    fn get_config(&self) -> Result<ParameterStore> {
        self()
    }
}
