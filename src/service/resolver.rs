// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration resolver.
//!
//! The resolver inspects the environment signals once, picks a resolution mode,
//! loads the application's parameters and caches the result for the lifetime of
//! the resolver.
//!
//! | Signals present                   | Mode                          |
//! |-----------------------------------|-------------------------------|
//! | local root + URL regex            | local files, app from the URL |
//! | local root + app                  | local files, explicit app     |
//! | config                            | embedded configuration        |
//!
//! Any other non-empty combination is reported as incomplete rather than
//! falling through to another mode.

use crate::adapters::AppConfigPaths;
use crate::domain::{
    AppIdentity, ParameterLookup, ParameterStore, PliteError, ResolutionMode, ResolverContext,
    Result, SignalNames,
};
use crate::ports::{ConfigurationProvider, LayeredSignals, SignalReader};
use crate::service::registry::ConfigProviderRegistry;
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use std::path::PathBuf;

/// Key an embedded configuration uses to name its application.
pub const APP_KEY: &str = "app";

/// Delimiters accepted around a delimited URL regex such as `#^/(\w+)/#i`.
const REGEX_DELIMITERS: &[char] = &['/', '#', '~', '!', '@', '%', '|', '+', ',', ';', '`'];

/// Flags accepted after the closing delimiter.
const REGEX_FLAGS: &[char] = &['i', 'm', 's', 'x', 'u', 'U'];

/// Resolves the application's configuration from environment signals.
///
/// Resolution runs at most once. Concurrent first callers block until the single
/// resolution finishes; later calls return the cached [`ResolverContext`] without
/// reading signals or files again. A failed resolution is not cached, so the next
/// call retries.
///
/// # Examples
///
/// ```rust
/// use plite::adapters::EnvSignalReader;
/// use plite::domain::{ParameterLookup, ParameterStore, ResolutionMode, Result};
/// use plite::service::ConfigurationResolver;
/// use std::collections::HashMap;
///
/// # fn main() -> Result<()> {
/// let mut signals = HashMap::new();
/// signals.insert("_plite_config".to_string(), "demo_config".to_string());
///
/// let resolver = ConfigurationResolver::builder()
///     .with_signals(Box::new(EnvSignalReader::with_values(signals)))
///     .register_config("demo_config", || -> Result<ParameterStore> {
///         Ok(ParameterStore::from_pairs([("app", "demo"), ("file", "file")]))
///     })
///     .build()?;
///
/// let context = resolver.resolve()?;
/// assert_eq!(context.mode(), ResolutionMode::EmbeddedClass);
/// assert_eq!(resolver.app_name()?, "demo");
/// assert!(resolver.has("file")?);
/// # Ok(())
/// # }
/// ```
pub struct ConfigurationResolver {
    signals: LayeredSignals,
    names: SignalNames,
    request_path: Option<String>,
    registry: ConfigProviderRegistry,
    context: OnceCell<ResolverContext>,
}

impl ConfigurationResolver {
    /// Creates a new resolver builder.
    pub fn builder() -> ConfigurationResolverBuilder {
        ConfigurationResolverBuilder::new()
    }

    /// Creates a resolver reading signals from the process environment.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env_signals().build()
    }

    /// Returns the signal names this resolver looks for.
    pub fn signal_names(&self) -> &SignalNames {
        &self.names
    }

    /// Returns `true` once resolution has succeeded.
    pub fn is_resolved(&self) -> bool {
        self.context.get().is_some()
    }

    /// Resolves the configuration, or returns the cached result.
    pub fn resolve(&self) -> Result<&ResolverContext> {
        self.context.get_or_try_init(|| {
            let context = self.resolve_uncached()?;
            tracing::debug!(
                "Resolved configuration for app '{}' ({}, {} parameters)",
                context.app(),
                context.mode(),
                context.params().len()
            );
            Ok(context)
        })
    }

    fn resolve_uncached(&self) -> Result<ResolverContext> {
        let names = &self.names;
        let has_root = self.signals.has_signal(&names.local_root);
        let has_regex = self.signals.has_signal(&names.url_app_regex);
        let has_app = self.signals.has_signal(&names.app);
        let has_config = self.signals.has_signal(&names.config);

        tracing::debug!(
            "Signals: local_root={}, url_app_regex={}, app={}, config={}",
            has_root,
            has_regex,
            has_app,
            has_config
        );

        match (has_root, has_regex, has_app, has_config) {
            (true, true, _, _) => self.resolve_local_from_url(),
            (true, false, true, _) => self.resolve_local_with_app(),
            (true, false, false, _) => Err(PliteError::IncompleteSignals {
                present: names.local_root.clone(),
                missing: format!("{} or {}", names.url_app_regex, names.app),
            }),
            (false, true, _, _) => Err(PliteError::IncompleteSignals {
                present: names.url_app_regex.clone(),
                missing: names.local_root.clone(),
            }),
            (false, false, _, true) => self.resolve_embedded(has_app),
            (false, false, true, false) => Err(PliteError::IncompleteSignals {
                present: names.app.clone(),
                missing: format!("{} or {}", names.local_root, names.config),
            }),
            (false, false, false, false) => Err(PliteError::UnresolvableConfiguration {
                expected: names.mode_signals().join(", "),
            }),
        }
    }

    /// Reads a signal that must also be non-empty once trimmed.
    fn read_non_empty(&self, key: &str) -> Result<String> {
        let value = self.signals.read_signal(key)?;
        if value.is_empty() {
            return Err(PliteError::MissingSignal {
                key: key.to_string(),
            });
        }
        Ok(value)
    }

    fn local_root(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(self.read_non_empty(&self.names.local_root)?))
    }

    fn request_path(&self) -> Result<String> {
        match &self.request_path {
            Some(path) => Ok(path.clone()),
            None => self.signals.read_signal(&self.names.request_path),
        }
    }

    fn resolve_local_from_url(&self) -> Result<ResolverContext> {
        let root = self.local_root()?;
        let pattern = self.read_non_empty(&self.names.url_app_regex)?;
        let path = self.request_path()?;
        let app = extract_app_name(&pattern, &path)?;
        tracing::debug!("App '{}' extracted from request path {}", app, path);

        self.load_local(ResolutionMode::LocalFile, root, app)
    }

    fn resolve_local_with_app(&self) -> Result<ResolverContext> {
        let root = self.local_root()?;
        let app = AppIdentity::new(self.signals.read_signal(&self.names.app)?).ok_or_else(|| {
            PliteError::MissingSignal {
                key: self.names.app.clone(),
            }
        })?;

        self.load_local(ResolutionMode::LocalFileWithExplicitApp, root, app)
    }

    fn load_local(
        &self,
        mode: ResolutionMode,
        root: PathBuf,
        app: AppIdentity,
    ) -> Result<ResolverContext> {
        let paths = AppConfigPaths::new(&root, app.as_str());
        tracing::debug!(
            "Loading {} and {}",
            paths.config_file().display(),
            paths.auth_file().display()
        );
        let params = paths.load()?;
        Ok(ResolverContext::new(mode, app, params).with_local_root(root))
    }

    fn resolve_embedded(&self, has_app: bool) -> Result<ResolverContext> {
        let name = self.read_non_empty(&self.names.config)?;
        let provider = self.registry.instantiate(&name)?;
        let params = provider.get_config()?;

        let app = params
            .get_str(APP_KEY)
            .and_then(AppIdentity::new)
            .ok_or_else(|| PliteError::MissingAppName {
                class_name: name.clone(),
                key: APP_KEY.to_string(),
            })?;

        if has_app {
            let signalled = self.signals.read_signal(&self.names.app)?;
            if signalled != app.as_str() {
                tracing::warn!(
                    "Signal '{}' names app '{}' but configuration '{}' names '{}'; using '{}'",
                    self.names.app,
                    signalled,
                    name,
                    app,
                    app
                );
            }
        }

        Ok(ResolverContext::new(ResolutionMode::EmbeddedClass, app, params))
    }
}

impl ParameterLookup for ConfigurationResolver {
    fn parameters(&self) -> Result<&ParameterStore> {
        Ok(self.resolve()?.params())
    }

    fn app_name(&self) -> Result<&str> {
        Ok(self.resolve()?.app_name())
    }
}

impl std::fmt::Debug for ConfigurationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationResolver")
            .field("signals", &self.signals.len())
            .field("names", &self.names)
            .field("registry", &self.registry)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Compiles a URL-to-app regex.
///
/// Accepts a bare pattern, or a pattern wrapped in delimiters with trailing
/// flags (`#^/(\w+)/#i`). Supported flags are `i`, `m`, `s`, `x` and `U`; `u` is
/// accepted and ignored.
///
/// # Examples
///
/// ```rust
/// use plite::service::resolver::compile_app_regex;
///
/// let regex = compile_app_regex(r"#^/(\w+)/#i").unwrap();
/// assert!(regex.is_match("/DEMO/index"));
///
/// let regex = compile_app_regex(r"^/(\w+)/").unwrap();
/// assert!(!regex.is_match("/DEMO"));
/// ```
pub fn compile_app_regex(pattern: &str) -> Result<Regex> {
    let (body, flags) = split_delimited(pattern).unwrap_or((pattern.to_string(), ""));

    let mut builder = RegexBuilder::new(&body);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            _ => &mut builder,
        };
    }

    builder.build().map_err(|source| PliteError::InvalidAppRegex {
        regex: pattern.to_string(),
        source,
    })
}

/// Splits `#body#flags` into the body (with escaped delimiters unescaped) and flags.
fn split_delimited(pattern: &str) -> Option<(String, &str)> {
    let delimiter = pattern.chars().next().filter(|c| REGEX_DELIMITERS.contains(c))?;
    let close = pattern.rfind(delimiter).filter(|&i| i > 0)?;
    let flags = &pattern[close + 1..];
    if !flags.chars().all(|c| REGEX_FLAGS.contains(&c)) {
        return None;
    }

    let body = &pattern[1..close];
    let escaped = format!("\\{}", delimiter);
    Some((body.replace(&escaped, &delimiter.to_string()), flags))
}

/// Applies the URL-to-app regex to `path` and returns the first capture group.
pub fn extract_app_name(pattern: &str, path: &str) -> Result<AppIdentity> {
    let regex = compile_app_regex(pattern)?;
    regex
        .captures(path)
        .and_then(|captures| captures.get(1))
        .and_then(|group| AppIdentity::new(group.as_str()))
        .ok_or_else(|| PliteError::AppNameExtraction {
            path: path.to_string(),
            regex: pattern.to_string(),
        })
}

/// Builder for constructing a [`ConfigurationResolver`].
///
/// # Examples
///
/// ```rust
/// use plite::service::ConfigurationResolverBuilder;
///
/// # fn main() -> plite::domain::Result<()> {
/// let resolver = ConfigurationResolverBuilder::new()
///     .with_env_signals()
///     .with_request_path("/demo/index")
///     .build()?;
/// assert!(!resolver.is_resolved());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigurationResolverBuilder {
    readers: Vec<Box<dyn SignalReader>>,
    #[cfg(feature = "cli")]
    cli_args: Option<Vec<std::ffi::OsString>>,
    names: SignalNames,
    request_path: Option<String>,
    registry: ConfigProviderRegistry,
}

impl ConfigurationResolverBuilder {
    /// Creates a new builder with the canonical signal names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a signal reader. Readers are consulted in priority order.
    pub fn with_signals(mut self, reader: Box<dyn SignalReader>) -> Self {
        self.readers.push(reader);
        self
    }

    /// Adds the process environment as a signal reader.
    #[cfg(feature = "env")]
    pub fn with_env_signals(self) -> Self {
        use crate::adapters::EnvSignalReader;
        self.with_signals(Box::new(EnvSignalReader::new()))
    }

    /// Adds command-line flags as a signal reader.
    ///
    /// The arguments are parsed in [`build`](Self::build) against the final
    /// signal names, so they must not include the binary name.
    #[cfg(feature = "cli")]
    pub fn with_cli_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString>,
    {
        self.cli_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the signal names.
    pub fn with_signal_names(mut self, names: SignalNames) -> Self {
        self.names = names;
        self
    }

    /// Sets the request path directly instead of reading it from a signal.
    pub fn with_request_path(mut self, path: impl Into<String>) -> Self {
        self.request_path = Some(path.into());
        self
    }

    /// Replaces the embedded configuration registry.
    pub fn with_registry(mut self, registry: ConfigProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers one embedded configuration.
    pub fn register_config<P>(mut self, name: impl Into<String>, provider: P) -> Self
    where
        P: ConfigurationProvider + Clone + 'static,
    {
        self.registry.register(name, provider);
        self
    }

    #[cfg(feature = "cli")]
    fn cli_signals(&self) -> Result<Option<Box<dyn SignalReader>>> {
        use crate::adapters::CommandLineSignals;
        match &self.cli_args {
            Some(args) => {
                let cli = CommandLineSignals::from_args_with_names(args.clone(), &self.names)?;
                Ok(Some(Box::new(cli)))
            }
            None => Ok(None),
        }
    }

    #[cfg(not(feature = "cli"))]
    fn cli_signals(&self) -> Result<Option<Box<dyn SignalReader>>> {
        Ok(None)
    }

    /// Builds the resolver. Nothing is resolved until first use.
    pub fn build(self) -> Result<ConfigurationResolver> {
        let cli = self.cli_signals()?;
        let readers = self.readers.into_iter().chain(cli).collect();

        Ok(ConfigurationResolver {
            signals: LayeredSignals::new(readers),
            names: self.names,
            request_path: self.request_path,
            registry: self.registry,
            context: OnceCell::new(),
        })
    }
}
