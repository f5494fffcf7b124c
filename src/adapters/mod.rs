// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing signal readers, config file loading and storage
//! backends.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: signal readers for the process environment and the command line,
//! the JSON parser for per-application config files, the local and object
//! store implementations of `FileStorage`, and the email senders.

#[cfg(feature = "cli")]
pub mod cli;
pub mod email;
#[cfg(feature = "env")]
pub mod env_var;
pub mod json_file;
pub mod local_storage;
pub mod object_storage;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineSignals;
pub use email::{CloudEmail, LocalOutbox};
#[cfg(feature = "env")]
pub use env_var::EnvSignalReader;
pub use json_file::{AppConfigPaths, JsonParser};
pub use local_storage::LocalFileStorage;
pub use object_storage::ObjectStorage;
