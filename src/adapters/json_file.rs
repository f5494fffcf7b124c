// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file configuration adapter.
//!
//! Per-application parameters live in two files under the local root:
//!
//! ```text
//! {root}/{app}/config/{app}-config.js
//! {root}/{app}/auth/{app}-auth.js
//! ```
//!
//! Both hold a JSON object. The auth file is merged over the config file.

use crate::domain::{ParameterStore, PliteError, Result};
use crate::ports::ConfigParser;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for configuration files (10MB)
const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// JSON parser implementation.
///
/// The document must be a JSON object; its top-level keys become parameter names
/// in document order.
///
/// # Examples
///
/// ```rust
/// use plite::adapters::JsonParser;
/// use plite::ports::ConfigParser;
///
/// let store = JsonParser::new()
///     .parse(r#"{"file": "file", "file_provider": "local"}"#)
///     .unwrap();
/// assert!(store.matches("file_provider", "local"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &str) -> Result<ParameterStore> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| PliteError::Parse {
                message: format!("Failed to parse JSON: {}", e),
                source: Some(Box::new(e)),
            })?;
        ParameterStore::from_json_object(value)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["js", "json"]
    }
}

/// Locations of an application's config and auth files under a local root.
///
/// # Examples
///
/// ```rust
/// use plite::adapters::AppConfigPaths;
/// use std::path::Path;
///
/// let paths = AppConfigPaths::new("/srv/apps", "demo");
/// assert_eq!(paths.config_file(), Path::new("/srv/apps/demo/config/demo-config.js"));
/// assert_eq!(paths.auth_file(), Path::new("/srv/apps/demo/auth/demo-auth.js"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfigPaths {
    config_file: PathBuf,
    auth_file: PathBuf,
}

impl AppConfigPaths {
    /// Builds the paths for `app` under `root`.
    pub fn new(root: impl AsRef<Path>, app: &str) -> Self {
        let app_dir = root.as_ref().join(app);
        Self {
            config_file: app_dir.join("config").join(format!("{}-config.js", app)),
            auth_file: app_dir.join("auth").join(format!("{}-auth.js", app)),
        }
    }

    /// Path of the non-secret config file.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Path of the auth (secret) file.
    pub fn auth_file(&self) -> &Path {
        &self.auth_file
    }

    /// Loads both files permissively and merges auth over config.
    ///
    /// Returns [`PliteError::ConfigLoad`] when neither file yields any parameter.
    pub fn load(&self) -> Result<ParameterStore> {
        let config = load_permissive(&self.config_file);
        let auth = load_permissive(&self.auth_file);
        let merged = config.merged(&auth);

        if merged.is_empty() {
            return Err(PliteError::ConfigLoad {
                config_path: self.config_file.display().to_string(),
                auth_path: self.auth_file.display().to_string(),
            });
        }

        tracing::debug!(
            "Loaded {} parameters ({} config, {} auth)",
            merged.len(),
            config.len(),
            auth.len()
        );
        Ok(merged)
    }
}

/// Loads a JSON config file, degrading every failure to an empty store.
///
/// A missing, unreadable, oversized or unparseable file, or one whose extension
/// the JSON parser does not handle, is logged as a warning and treated as holding
/// no parameters.
pub fn load_permissive(path: &Path) -> ParameterStore {
    match try_load(path) {
        Ok(store) => {
            tracing::debug!("Read {} parameters from {}", store.len(), path.display());
            store
        }
        Err(e) => {
            tracing::warn!("Ignoring config file {}: {}", path.display(), e);
            ParameterStore::new()
        }
    }
}

fn try_load(path: &Path) -> Result<ParameterStore> {
    let parser = JsonParser::new();
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !parser.supported_extensions().contains(&extension) {
        return Err(PliteError::Parse {
            message: format!("Unsupported configuration file extension '{}'", extension),
            source: None,
        });
    }

    let metadata = fs::metadata(path)?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(PliteError::Parse {
            message: format!(
                "Configuration file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ),
            source: None,
        });
    }

    let content = fs::read_to_string(path)?;
    parser.parse(&content)
}
