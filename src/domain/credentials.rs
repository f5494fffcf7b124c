// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud credential bundle derived from the resolved parameters.

use crate::domain::errors::Result;
use crate::domain::parameter_store::ParameterStore;
use serde::Serialize;
use std::fmt;

/// Parameter holding the cloud region.
pub const REGION_KEY: &str = "aws_region";

/// Parameter holding the cloud API version.
pub const VERSION_KEY: &str = "aws_version";

/// Parameter holding the access key id.
pub const ACCESS_KEY_KEY: &str = "aws_access_key_id";

/// Parameter holding the secret access key.
pub const SECRET_KEY_KEY: &str = "aws_secret_access_key";

/// API version used when `aws_version` is not configured.
pub const DEFAULT_VERSION: &str = "latest";

/// A static access key pair.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AccessKeyPair {
    /// Access key id
    pub key: String,
    /// Secret access key
    pub secret: String,
}

impl fmt::Debug for AccessKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyPair")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Region, version and optional static credentials for a remote backend.
///
/// When `credentials` is `None` the backend client is expected to use ambient
/// (platform or role provided) identity.
///
/// # Examples
///
/// ```
/// use plite::domain::{CredentialBundle, ParameterStore};
///
/// let store = ParameterStore::from_pairs([("aws_region", "eu-west-1")]);
/// let bundle = CredentialBundle::from_parameters(&store).unwrap();
/// assert_eq!(bundle.region, "eu-west-1");
/// assert_eq!(bundle.version, "latest");
/// assert!(bundle.credentials.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CredentialBundle {
    /// Cloud region
    pub region: String,
    /// API version
    pub version: String,
    /// Static credentials, omitted for ambient identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<AccessKeyPair>,
}

impl CredentialBundle {
    /// Derives the bundle from the parameters.
    ///
    /// The region is required. The access key pair is included only when both
    /// halves are present and non-empty.
    pub fn from_parameters(params: &ParameterStore) -> Result<Self> {
        let region = params.require_str(REGION_KEY)?.to_string();
        let version = params
            .get_str(VERSION_KEY)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VERSION)
            .to_string();

        let access = non_empty(params, ACCESS_KEY_KEY);
        let secret = non_empty(params, SECRET_KEY_KEY);
        let credentials = match (access, secret) {
            (Some(key), Some(secret)) => Some(AccessKeyPair {
                key: key.to_string(),
                secret: secret.to_string(),
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "Only one of '{}' / '{}' is set; using ambient credentials",
                    ACCESS_KEY_KEY,
                    SECRET_KEY_KEY
                );
                None
            }
            (None, None) => None,
        };

        tracing::debug!(
            "Credential bundle: region={}, version={}, static_credentials={}",
            region,
            version,
            credentials.is_some()
        );

        Ok(Self {
            region,
            version,
            credentials,
        })
    }
}

fn non_empty<'a>(params: &'a ParameterStore, key: &str) -> Option<&'a str> {
    params
        .get_str(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
