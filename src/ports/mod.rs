// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the traits that define how the resolver reads signals
//! and configuration, and how backends reach remote services. They are
//! implemented by adapters in the adapters layer, or by the embedding
//! application for the remote clients.

pub mod config_provider;
pub mod email;
pub mod parser;
pub mod remote;
pub mod signal;
pub mod storage;

// Re-export commonly used types
pub use config_provider::ConfigurationProvider;
pub use email::{EmailAddress, EmailMessage, EmailSender};
pub use parser::ConfigParser;
pub use remote::{
    EmailClient, EmailConnector, GetObjectOutput, ListObjectsOutput, ObjectStoreClient,
    ObjectStoreConnector, RemoteResult, SecretValue, SecretsClient, SecretsConnector,
};
pub use signal::{LayeredSignals, SignalReader};
pub use storage::{FileStorage, Metadata, StoredObject};
