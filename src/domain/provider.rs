// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider discriminators and descriptors.
//!
//! Each capability (`file`, `secrets`, `db`, ...) names its backend in a
//! `<capability>_provider` parameter. The value is parsed into a
//! [`ProviderSource`]; anything unrecognized is an error, never a default.

use crate::domain::credentials::CredentialBundle;
use crate::domain::errors::PliteError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Suffix appended to a capability name to form its discriminator key.
pub const PROVIDER_KEY_SUFFIX: &str = "_provider";

/// Returns the discriminator key for a capability, e.g. `file_provider`.
pub fn provider_key(capability: &str) -> String {
    format!("{}{}", capability, PROVIDER_KEY_SUFFIX)
}

/// The backend family selected for a capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderSource {
    /// Local filesystem or locally configured values.
    Local,
    /// Reserved; always rejected when a backend is constructed.
    Proxy,
    /// Remote cloud services (`cloud`, or its alias `aws`).
    Cloud,
}

impl ProviderSource {
    /// Returns the canonical discriminator string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderSource::Local => "local",
            ProviderSource::Proxy => "proxy",
            ProviderSource::Cloud => "cloud",
        }
    }
}

impl fmt::Display for ProviderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a discriminator string is not recognized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownProviderSource(pub String);

impl fmt::Display for UnknownProviderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown provider source '{}'", self.0)
    }
}

impl std::error::Error for UnknownProviderSource {}

impl FromStr for ProviderSource {
    type Err = UnknownProviderSource;

    /// Parses a discriminator, ignoring surrounding whitespace and ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use plite::domain::ProviderSource;
    ///
    /// assert_eq!("local".parse::<ProviderSource>().unwrap(), ProviderSource::Local);
    /// assert_eq!(" AWS ".parse::<ProviderSource>().unwrap(), ProviderSource::Cloud);
    /// assert!("bogus".parse::<ProviderSource>().is_err());
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ProviderSource::Local),
            "proxy" => Ok(ProviderSource::Proxy),
            "cloud" | "aws" => Ok(ProviderSource::Cloud),
            _ => Err(UnknownProviderSource(value.to_string())),
        }
    }
}

/// Backend-specific construction parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendParams {
    /// A local directory holding the capability's data.
    Local {
        /// Root directory of the backend
        root: PathBuf,
    },
    /// A remote bucket reached with the given credentials.
    Cloud {
        /// Region, version and optional static credentials
        credentials: CredentialBundle,
        /// Bucket holding the capability's data
        bucket: String,
    },
}

/// The backend chosen for one capability request.
///
/// Descriptors are derived afresh on every request and never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Capability name, e.g. `file`
    pub capability: String,
    /// The parsed discriminator
    pub source: ProviderSource,
    /// Parameters for constructing the backend
    pub params: BackendParams,
}

impl ProviderDescriptor {
    /// Returns `true` when the descriptor points at a local backend.
    pub fn is_local(&self) -> bool {
        matches!(self.params, BackendParams::Local { .. })
    }
}

/// Parses a discriminator for `capability`, mapping unknown values to
/// `UnsupportedProviderSource`.
pub(crate) fn parse_source(capability: &str, value: &str) -> Result<ProviderSource, PliteError> {
    value
        .parse::<ProviderSource>()
        .map_err(|_| PliteError::UnsupportedProviderSource {
            capability: capability.to_string(),
            value: value.to_string(),
        })
}
