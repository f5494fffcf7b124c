// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime configuration and provider resolution from environment signals.
//!
//! An application built on this crate doesn't know at compile time where its
//! configuration lives or which backends it talks to. At startup the
//! [`ConfigurationResolver`](service::ConfigurationResolver) inspects a small set
//! of signals (web-server environment variables, process environment, command-line
//! flags), decides how to load the application's parameters, and caches them.
//! Callers then ask for a capability such as `file` or `secrets` and get a handle
//! to whichever backend the parameters select.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ParameterStore`, `ResolverContext`,
//!   `ProviderDescriptor`, errors)
//! - **Ports**: Trait definitions (`SignalReader`, `ConfigurationProvider`,
//!   `FileStorage`, `EmailSender`, remote client traits)
//! - **Adapters**: Signal readers, the JSON config file loader, storage backends
//!   and email senders
//! - **Service**: The resolver, the provider selector, secrets and database lookup
//!
//! # Resolution modes
//!
//! - `_plite_local_root` + `_plite_url_app_regex`: the app name is captured from
//!   the request path and its JSON config files are read from the local root.
//! - `_plite_local_root` + `_plite_app`: as above with an explicit app name.
//! - `_plite_config`: a configuration compiled into the application and
//!   registered by name.
//!
//! # Feature Flags
//!
//! - `env`: Enable the process environment signal reader (default)
//! - `cli`: Enable command-line signal flags (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use plite::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let resolver = ConfigurationResolver::from_env()?;
//! let context = resolver.resolve()?;
//!
//! let files = ProviderSelector::new(context).get_provider("file", "file")?;
//! for entry in files.list(None)? {
//!     println!("{}", entry);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ParamValue, ParameterLookup, ParameterStore, PliteError, ResolutionMode, ResolverContext,
        Result,
    };
    pub use crate::ports::{
        ConfigurationProvider, EmailAddress, EmailMessage, EmailSender, FileStorage, SignalReader,
    };
    pub use crate::service::{
        ConfigProviderRegistry, ConfigurationResolver, DatabaseParams, ProviderSelector, Secrets,
    };

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineSignals;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvSignalReader;
}
