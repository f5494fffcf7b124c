// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of embedded configurations.
//!
//! The `_plite_config` signal names a configuration compiled into the
//! application. The registry maps those names to constructors so the resolver
//! can build the selected one without any runtime type loading.

use crate::domain::{PliteError, Result};
use crate::ports::ConfigurationProvider;
use std::collections::BTreeMap;

/// Constructor for a registered configuration.
pub type ProviderConstructor = Box<dyn Fn() -> Box<dyn ConfigurationProvider> + Send + Sync>;

/// Named constructors for embedded configurations.
///
/// # Examples
///
/// ```rust
/// use plite::domain::{ParameterStore, Result};
/// use plite::service::ConfigProviderRegistry;
///
/// let mut registry = ConfigProviderRegistry::new();
/// registry.register("demo_config", || -> Result<ParameterStore> {
///     Ok(ParameterStore::from_pairs([("app", "demo")]))
/// });
///
/// assert!(registry.contains("demo_config"));
/// let provider = registry.instantiate("demo_config").unwrap();
/// assert!(provider.get_config().unwrap().matches("app", "demo"));
/// ```
#[derive(Default)]
pub struct ConfigProviderRegistry {
    constructors: BTreeMap<String, ProviderConstructor>,
}

impl ConfigProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider value under `name`, replacing any previous entry.
    ///
    /// The provider must be cloneable since every instantiation yields a fresh one.
    pub fn register<P>(&mut self, name: impl Into<String>, provider: P)
    where
        P: ConfigurationProvider + Clone + 'static,
    {
        self.register_with(name, move || {
            Box::new(provider.clone()) as Box<dyn ConfigurationProvider>
        });
    }

    /// Registers a constructor under `name`, replacing any previous entry.
    pub fn register_with<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn ConfigurationProvider> + Send + Sync + 'static,
    {
        let name = name.into();
        if self
            .constructors
            .insert(name.clone(), Box::new(constructor))
            .is_some()
        {
            tracing::debug!("Replaced registered configuration '{}'", name);
        }
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Builds the configuration registered under `name`.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn ConfigurationProvider>> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| PliteError::UnknownConfigClass {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Debug for ConfigProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProviderRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParameterStore;

    #[derive(Clone)]
    struct Fixed(&'static str);

    impl ConfigurationProvider for Fixed {
        fn get_config(&self) -> Result<ParameterStore> {
            Ok(ParameterStore::from_pairs([("app", self.0)]))
        }
    }

    #[test]
    fn test_unknown_name() {
        let registry = ConfigProviderRegistry::new();
        let result = registry.instantiate("missing");
        assert!(matches!(result, Err(PliteError::UnknownConfigClass { name }) if name == "missing"));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ConfigProviderRegistry::new();
        registry.register("cfg", Fixed("one"));
        registry.register("cfg", Fixed("two"));

        let config = registry.instantiate("cfg").unwrap().get_config().unwrap();
        assert!(config.matches("app", "two"));
        assert_eq!(registry.names().count(), 1);
    }

    #[test]
    fn test_register_with_constructor() {
        let mut registry = ConfigProviderRegistry::new();
        registry.register_with("b", || Box::new(Fixed("b")));
        registry.register_with("a", || Box::new(Fixed("a")));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_debug_lists_names() {
        let mut registry = ConfigProviderRegistry::new();
        registry.register("demo", Fixed("demo"));
        assert!(format!("{:?}", registry).contains("demo"));
    }
}
