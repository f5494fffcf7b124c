// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote service client traits.
//!
//! The object store, the secrets manager and the email service are external
//! services. The crate talks to them only through these vendor-agnostic traits; an application wires
//! in a concrete SDK client through a connector that builds the client from a
//! [`CredentialBundle`].

use crate::domain::{CredentialBundle, RemoteError};
use crate::ports::email::{EmailAddress, EmailMessage};
use crate::ports::storage::Metadata;
use std::sync::Arc;

/// Result type for remote client calls.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// The response of a delimited object listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListObjectsOutput {
    /// Keys rolled up at the delimiter ("directories"), each ending in the delimiter
    pub common_prefixes: Vec<String>,
    /// Object keys directly under the prefix
    pub contents: Vec<String>,
}

/// The response of an object fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetObjectOutput {
    /// The object body
    pub body: Vec<u8>,
    /// Object metadata as reported by the service
    pub metadata: Metadata,
}

/// A client for a remote object store.
pub trait ObjectStoreClient: Send + Sync {
    /// Lists keys in `bucket` under `prefix`, rolling up at `delimiter`.
    fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
    ) -> RemoteResult<ListObjectsOutput>;

    /// Stores `body` with `metadata` under `key`.
    fn put_object(&self, bucket: &str, key: &str, body: &[u8], metadata: &Metadata)
        -> RemoteResult<()>;

    /// Fetches the object stored under `key`.
    fn get_object(&self, bucket: &str, key: &str) -> RemoteResult<GetObjectOutput>;
}

/// The value of a secret as returned by a secrets service.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretValue {
    /// A text secret
    String(String),
    /// A binary secret holding base64-encoded text
    Binary(Vec<u8>),
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretValue::String(_) => f.write_str("SecretValue::String(<redacted>)"),
            SecretValue::Binary(b) => write!(f, "SecretValue::Binary(<{} bytes>)", b.len()),
        }
    }
}

/// A client for a remote secrets service.
pub trait SecretsClient: Send + Sync {
    /// Fetches the secret named `name`.
    fn get_secret_value(&self, name: &str) -> RemoteResult<SecretValue>;
}

/// A client for a remote email delivery service.
pub trait EmailClient: Send + Sync {
    /// Sends `message` from `from`, returning the service's message id.
    fn send_email(&self, from: &EmailAddress, message: &EmailMessage) -> RemoteResult<String>;
}

/// Builds object store clients from credentials.
pub trait ObjectStoreConnector: Send + Sync {
    /// Creates a client for the given region and credentials.
    fn connect(&self, credentials: &CredentialBundle) -> RemoteResult<Arc<dyn ObjectStoreClient>>;
}

impl<F> ObjectStoreConnector for F
where
    F: Fn(&CredentialBundle) -> RemoteResult<Arc<dyn ObjectStoreClient>> + Send + Sync,
{
    fn connect(&self, credentials: &CredentialBundle) -> RemoteResult<Arc<dyn ObjectStoreClient>> {
        self(credentials)
    }
}

/// Builds secrets clients from credentials.
pub trait SecretsConnector: Send + Sync {
    /// Creates a client for the given region and credentials.
    fn connect(&self, credentials: &CredentialBundle) -> RemoteResult<Arc<dyn SecretsClient>>;
}

impl<F> SecretsConnector for F
where
    F: Fn(&CredentialBundle) -> RemoteResult<Arc<dyn SecretsClient>> + Send + Sync,
{
    fn connect(&self, credentials: &CredentialBundle) -> RemoteResult<Arc<dyn SecretsClient>> {
        self(credentials)
    }
}

/// Builds email clients from credentials.
pub trait EmailConnector: Send + Sync {
    /// Creates a client for the given region and credentials.
    fn connect(&self, credentials: &CredentialBundle) -> RemoteResult<Arc<dyn EmailClient>>;
}

impl<F> EmailConnector for F
where
    F: Fn(&CredentialBundle) -> RemoteResult<Arc<dyn EmailClient>> + Send + Sync,
{
    fn connect(&self, credentials: &CredentialBundle) -> RemoteResult<Arc<dyn EmailClient>> {
        self(credentials)
    }
}
