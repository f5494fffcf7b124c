// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for configuration resolution and provider selection.
//!
//! Every fallible operation in the crate returns [`PliteError`]. All variants are
//! fatal to the calling operation; the one recoverable failure (a backend `write`)
//! is reported as a boolean by the storage handles instead of an error.

use thiserror::Error;

/// Boxed error produced by a remote client (object store, secrets service).
pub type RemoteError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for resolution, lookup and provider operations.
///
/// # Examples
///
/// ```
/// use plite::domain::errors::PliteError;
///
/// fn read_root() -> Result<String, PliteError> {
///     Err(PliteError::MissingSignal {
///         key: "_plite_local_root".to_string(),
///     })
/// }
///
/// assert!(read_root().unwrap_err().to_string().contains("_plite_local_root"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PliteError {
    /// An environment signal was read unconditionally but is not present.
    #[error("Environment signal [ {key} ] doesn't exist")]
    MissingSignal {
        /// The signal name
        key: String,
    },

    /// No recognized combination of signals was found.
    #[error("Invalid configuration; no configuration signals found (expected one of: {expected})")]
    UnresolvableConfiguration {
        /// Comma-separated list of the signals that were looked for
        expected: String,
    },

    /// A signal was present without the companion it requires.
    #[error("Incomplete configuration signals: [ {present} ] is set but [ {missing} ] is missing")]
    IncompleteSignals {
        /// The signal that was found
        present: String,
        /// The companion signal(s) that were expected alongside it
        missing: String,
    },

    /// The URL-to-app regex could not be compiled.
    #[error("Invalid app regex [ {regex} ]: {source}")]
    InvalidAppRegex {
        /// The regex as given in the signal
        regex: String,
        /// The compilation error
        source: regex::Error,
    },

    /// The app name could not be extracted from the request path.
    #[error("Cannot get app from request path ({path}); check regex [ {regex} ]")]
    AppNameExtraction {
        /// The request path the regex was applied to
        path: String,
        /// The regex that failed to produce a capture
        regex: String,
    },

    /// Neither the config file nor the auth file produced any parameters.
    #[error("Cannot load local config: no parameters in [ {config_path} ] or [ {auth_path} ]")]
    ConfigLoad {
        /// Path of the `<app>-config.js` file
        config_path: String,
        /// Path of the `<app>-auth.js` file
        auth_path: String,
    },

    /// An embedded configuration did not name its application.
    #[error("Embedded configuration [ {class_name} ] is missing the '{key}' key")]
    MissingAppName {
        /// The registered configuration name
        class_name: String,
        /// The key that was expected
        key: String,
    },

    /// The configuration name in the signal is not registered.
    #[error("Cannot load configuration [ {name} ]; not registered")]
    UnknownConfigClass {
        /// The requested name
        name: String,
    },

    /// A capability key holds a different type than the caller expected.
    #[error("Capability '{capability}' type mismatch: expected '{expected}', found {}", found.as_deref().unwrap_or("<missing>"))]
    CapabilityTypeMismatch {
        /// The capability that was requested
        capability: String,
        /// The type the caller expected
        expected: String,
        /// The type found in the parameters, if any
        found: Option<String>,
    },

    /// The `<capability>_provider` key is missing.
    #[error("Missing provider source '{capability}_provider'")]
    MissingProviderSource {
        /// The capability that was requested
        capability: String,
    },

    /// The `<capability>_provider` key holds an unsupported discriminator.
    #[error("{capability} provider source '{value}' not supported")]
    UnsupportedProviderSource {
        /// The capability that was requested
        capability: String,
        /// The discriminator found
        value: String,
    },

    /// A parameter required to construct a backend is missing.
    #[error("Missing required parameter '{key}'")]
    MissingParameter {
        /// The parameter key
        key: String,
    },

    /// The remote secrets service failed or returned an undecodable value.
    #[error("Failed to get secret [ {name} ]: {message}")]
    SecretRetrieval {
        /// The secret name
        name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<RemoteError>,
    },

    /// A locally configured secret does not exist.
    #[error("Cannot find secret [ {name} ] in local parameters")]
    SecretNotFound {
        /// The secret name
        name: String,
    },

    /// A path into a secret does not exist.
    #[error("Secret [ {name} ] has no value at path '{path}'")]
    SecretPathNotFound {
        /// The secret name
        name: String,
        /// The dot-separated path
        path: String,
    },

    /// A storage backend failed to read an entry.
    #[error("Storage error for '{path}': {message}")]
    Storage {
        /// The entry path
        path: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<RemoteError>,
    },

    /// A storage path escapes the backend root.
    #[error("Invalid storage path '{path}'")]
    InvalidPath {
        /// The rejected path
        path: String,
    },

    /// The email service could not be reached.
    #[error("Email service error: {message}")]
    Email {
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<RemoteError>,
    },

    /// Failed to convert a parameter value to the requested type.
    #[error("Failed to convert parameter '{key}' to type {target_type}: {source}")]
    TypeConversion {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: RemoteError,
    },

    /// Failed to parse configuration content.
    #[error("Failed to parse configuration: {message}")]
    Parse {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<RemoteError>,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PliteError {
    /// Creates a `TypeConversion` error for a value that has the wrong JSON type.
    pub fn wrong_type(key: &str, target_type: &str, found: &serde_json::Value) -> Self {
        PliteError::TypeConversion {
            key: key.to_string(),
            target_type: target_type.to_string(),
            source: format!("found {}", json_type_name(found)).into(),
        }
    }

    /// Creates a `Storage` error wrapping a remote client failure.
    pub fn storage(path: impl Into<String>, err: RemoteError) -> Self {
        PliteError::Storage {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Returns a short name for the JSON type of a value.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// A specialized Result type for plite operations.
pub type Result<T> = std::result::Result<T, PliteError>;
