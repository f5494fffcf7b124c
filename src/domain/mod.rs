// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module holds the parameter store, resolution results, provider
//! descriptors and the error type. It depends on no adapter and performs no I/O.

pub mod context;
pub mod credentials;
pub mod errors;
pub mod param_value;
pub mod parameter_store;
pub mod provider;
pub mod signals;

// Re-export commonly used types
pub use context::{AppIdentity, ParameterLookup, ResolutionMode, ResolverContext};
pub use credentials::{AccessKeyPair, CredentialBundle};
pub use errors::{PliteError, RemoteError, Result};
pub use param_value::ParamValue;
pub use parameter_store::ParameterStore;
pub use provider::{provider_key, BackendParams, ProviderDescriptor, ProviderSource};
pub use signals::SignalNames;
