// SPDX-License-Identifier: MIT OR Apache-2.0

//! Names of the environment signals consulted during resolution.

/// Default name of the local configuration root signal.
pub const LOCAL_ROOT_SIGNAL: &str = "_plite_local_root";

/// Default name of the URL-to-app regex signal.
pub const URL_APP_REGEX_SIGNAL: &str = "_plite_url_app_regex";

/// Default name of the explicit app name signal.
pub const APP_SIGNAL: &str = "_plite_app";

/// Default name of the embedded configuration signal.
pub const CONFIG_SIGNAL: &str = "_plite_config";

/// Default name of the signal holding the current request path.
pub const REQUEST_PATH_SIGNAL: &str = "REQUEST_URI";

/// The set of signal names the resolver looks for.
///
/// The defaults are the canonical `_plite_*` names; an embedding application can
/// rename any of them.
///
/// # Examples
///
/// ```
/// use plite::domain::SignalNames;
///
/// let names = SignalNames::default().with_app("MYAPP_NAME");
/// assert_eq!(names.app, "MYAPP_NAME");
/// assert_eq!(names.local_root, "_plite_local_root");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalNames {
    /// Local filesystem root for config files
    pub local_root: String,
    /// Regex applied to the request path to extract the app name
    pub url_app_regex: String,
    /// Explicit application name
    pub app: String,
    /// Name of a registered embedded configuration
    pub config: String,
    /// Current request path
    pub request_path: String,
}

impl SignalNames {
    /// Renames the local root signal.
    pub fn with_local_root(mut self, name: impl Into<String>) -> Self {
        self.local_root = name.into();
        self
    }

    /// Renames the URL-to-app regex signal.
    pub fn with_url_app_regex(mut self, name: impl Into<String>) -> Self {
        self.url_app_regex = name.into();
        self
    }

    /// Renames the explicit app signal.
    pub fn with_app(mut self, name: impl Into<String>) -> Self {
        self.app = name.into();
        self
    }

    /// Renames the embedded configuration signal.
    pub fn with_config(mut self, name: impl Into<String>) -> Self {
        self.config = name.into();
        self
    }

    /// Renames the request path signal.
    pub fn with_request_path(mut self, name: impl Into<String>) -> Self {
        self.request_path = name.into();
        self
    }

    /// Returns the signals that select a resolution mode, in precedence order.
    pub fn mode_signals(&self) -> [&str; 4] {
        [
            self.local_root.as_str(),
            self.url_app_regex.as_str(),
            self.app.as_str(),
            self.config.as_str(),
        ]
    }
}

impl Default for SignalNames {
    fn default() -> Self {
        Self {
            local_root: LOCAL_ROOT_SIGNAL.to_string(),
            url_app_regex: URL_APP_REGEX_SIGNAL.to_string(),
            app: APP_SIGNAL.to_string(),
            config: CONFIG_SIGNAL.to_string(),
            request_path: REQUEST_PATH_SIGNAL.to_string(),
        }
    }
}
