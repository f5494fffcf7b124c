// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing configuration resolution and provider selection.
//!
//! The [`ConfigurationResolver`] turns environment signals into a resolved
//! [`ResolverContext`](crate::domain::ResolverContext). The
//! [`ProviderSelector`], [`Secrets`] and [`DatabaseParams`] read capabilities
//! (file storage, secrets, database, email) out of that context.

pub mod database;
pub mod registry;
pub mod resolver;
pub mod secrets;
pub mod selector;

// Re-export commonly used types
pub use database::DatabaseParams;
pub use registry::ConfigProviderRegistry;
pub use resolver::{ConfigurationResolver, ConfigurationResolverBuilder};
pub use secrets::Secrets;
pub use selector::{EmailBackend, EmailDescriptor, ProviderSelector};
