// SPDX-License-Identifier: MIT OR Apache-2.0

//! The result of configuration resolution.
//!
//! A [`ResolverContext`] is produced exactly once by the resolver and is
//! read-only afterwards. Provider selection and secret lookup borrow it.

use crate::domain::errors::Result;
use crate::domain::parameter_store::ParameterStore;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which combination of environment signals selected the configuration source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionMode {
    /// Local root plus URL regex: app name taken from the request path.
    LocalFile,
    /// Local root plus explicit app name signal.
    LocalFileWithExplicitApp,
    /// A registered embedded configuration provider.
    EmbeddedClass,
}

impl ResolutionMode {
    /// Returns `true` for the modes that load parameters from the filesystem.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ResolutionMode::LocalFile | ResolutionMode::LocalFileWithExplicitApp
        )
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionMode::LocalFile => "local-file",
            ResolutionMode::LocalFileWithExplicitApp => "local-file-explicit-app",
            ResolutionMode::EmbeddedClass => "embedded",
        };
        f.write_str(name)
    }
}

/// The resolved application name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AppIdentity(String);

impl AppIdentity {
    /// Creates an app identity, trimming surrounding whitespace.
    ///
    /// Returns `None` when the trimmed name is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use plite::domain::AppIdentity;
    ///
    /// assert_eq!(AppIdentity::new(" demo ").unwrap().as_str(), "demo");
    /// assert!(AppIdentity::new("  ").is_none());
    /// ```
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            None
        } else {
            Some(AppIdentity(name.to_string()))
        }
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AppIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolved configuration: mode, application identity and parameters.
///
/// # Examples
///
/// ```
/// use plite::domain::{AppIdentity, ParameterStore, ResolutionMode, ResolverContext};
///
/// let ctx = ResolverContext::new(
///     ResolutionMode::EmbeddedClass,
///     AppIdentity::new("demo").unwrap(),
///     ParameterStore::from_pairs([("app", "demo")]),
/// );
/// assert_eq!(ctx.app_name(), "demo");
/// assert!(ctx.local_root().is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ResolverContext {
    mode: ResolutionMode,
    app: AppIdentity,
    params: ParameterStore,
    local_root: Option<PathBuf>,
}

impl ResolverContext {
    /// Creates a context without a local root.
    pub fn new(mode: ResolutionMode, app: AppIdentity, params: ParameterStore) -> Self {
        Self {
            mode,
            app,
            params,
            local_root: None,
        }
    }

    /// Records the local configuration root the parameters were loaded from.
    pub fn with_local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = Some(root.into());
        self
    }

    /// Returns the resolution mode.
    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Returns the application identity.
    pub fn app(&self) -> &AppIdentity {
        &self.app
    }

    /// Returns the application name.
    pub fn app_name(&self) -> &str {
        self.app.as_str()
    }

    /// Returns the resolved parameters.
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// Returns the local configuration root signal, when a local mode was used.
    pub fn local_root(&self) -> Option<&Path> {
        self.local_root.as_deref()
    }
}

/// Read access to resolved parameters.
///
/// Implemented by anything that can produce a [`ParameterStore`], possibly by
/// resolving it on first use. All lookups go through [`parameters`], so a lazily
/// resolving implementation never needs explicit initialization by callers.
///
/// [`parameters`]: ParameterLookup::parameters
pub trait ParameterLookup {
    /// Returns the resolved parameters, resolving them first if necessary.
    fn parameters(&self) -> Result<&ParameterStore>;

    /// Returns the resolved application name.
    fn app_name(&self) -> Result<&str>;

    /// Returns `true` if the key is present.
    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.parameters()?.has(key))
    }

    /// Returns the value for the key, if present.
    fn get(&self, key: &str) -> Result<Option<&crate::domain::ParamValue>> {
        Ok(self.parameters()?.get(key))
    }

    /// Returns the parameters whose keys start with `prefix` (case-insensitive).
    fn get_with_prefix(&self, prefix: &str) -> Result<ParameterStore> {
        Ok(self.parameters()?.get_with_prefix(prefix))
    }

    /// Returns `true` if the key exists and strictly equals `expected`.
    fn matches(&self, key: &str, expected: crate::domain::ParamValue) -> Result<bool> {
        Ok(self.parameters()?.matches(key, expected))
    }
}

impl ParameterLookup for ResolverContext {
    fn parameters(&self) -> Result<&ParameterStore> {
        Ok(&self.params)
    }

    fn app_name(&self) -> Result<&str> {
        Ok(self.app.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParamValue;

    fn context() -> ResolverContext {
        ResolverContext::new(
            ResolutionMode::LocalFileWithExplicitApp,
            AppIdentity::new("demo").unwrap(),
            ParameterStore::from_pairs([("file", "file"), ("file_provider", "local")]),
        )
        .with_local_root("/srv")
    }

    #[test]
    fn test_mode_is_local() {
        assert!(ResolutionMode::LocalFile.is_local());
        assert!(ResolutionMode::LocalFileWithExplicitApp.is_local());
        assert!(!ResolutionMode::EmbeddedClass.is_local());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ResolutionMode::EmbeddedClass.to_string(), "embedded");
        assert_eq!(ResolutionMode::LocalFile.to_string(), "local-file");
    }

    #[test]
    fn test_context_accessors() {
        let ctx = context();
        assert_eq!(ctx.mode(), ResolutionMode::LocalFileWithExplicitApp);
        assert_eq!(ctx.app_name(), "demo");
        assert_eq!(ctx.local_root(), Some(Path::new("/srv")));
        assert_eq!(ctx.params().len(), 2);
    }

    #[test]
    fn test_lookup_through_trait() {
        let ctx = context();
        let lookup: &dyn ParameterLookup = &ctx;
        assert!(lookup.has("file").unwrap());
        assert!(lookup.matches("file_provider", ParamValue::from("local")).unwrap());
        assert_eq!(lookup.get_with_prefix("FILE").unwrap().len(), 2);
        assert_eq!(ParameterLookup::app_name(&ctx).unwrap(), "demo");
    }
}
