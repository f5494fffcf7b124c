// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider selection.
//!
//! A capability is configured by two keys: `<capability>` naming its type and
//! `<capability>_provider` naming the backend (`local` or `cloud`). The selector
//! checks both and builds the backend's handle.

use crate::adapters::{CloudEmail, LocalFileStorage, LocalOutbox, ObjectStorage};
use crate::domain::provider::parse_source;
use crate::domain::signals::LOCAL_ROOT_SIGNAL;
use crate::domain::{
    provider_key, BackendParams, CredentialBundle, ParameterStore, PliteError, ProviderDescriptor,
    ProviderSource, ResolverContext, Result,
};
use crate::ports::{
    EmailAddress, EmailConnector, EmailSender, FileStorage, ObjectStoreConnector, SecretsConnector,
};
use crate::service::secrets::Secrets;
use std::path::PathBuf;
use std::sync::Arc;

/// Subdirectory of an application's directory holding its local data.
pub const LOCAL_DATA_DIR: &str = "data";

/// Subdirectory of an application's directory receiving locally sent email.
pub const LOCAL_OUTBOX_DIR: &str = "outbox";

/// Name and expected type of the email capability.
pub const EMAIL_CAPABILITY: &str = "email";

/// Backend parameters for the email capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailBackend {
    /// Messages are written into a local outbox directory.
    Local {
        /// Directory receiving message files
        outbox: PathBuf,
    },
    /// Messages are handed to a remote delivery service.
    Cloud {
        /// Region, version and optional static credentials
        credentials: CredentialBundle,
    },
}

/// The email backend and sender address chosen for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailDescriptor {
    /// The parsed discriminator
    pub source: ProviderSource,
    /// Address messages are sent from
    pub from: EmailAddress,
    /// Parameters for constructing the backend
    pub backend: EmailBackend,
}

/// Selects and constructs backends for capabilities of a resolved configuration.
///
/// Every call derives a fresh [`ProviderDescriptor`] from the parameters; nothing
/// is cached.
///
/// # Examples
///
/// ```rust
/// use plite::domain::{AppIdentity, ParameterStore, ResolutionMode, ResolverContext};
/// use plite::service::ProviderSelector;
/// use std::path::Path;
///
/// let context = ResolverContext::new(
///     ResolutionMode::EmbeddedClass,
///     AppIdentity::new("demo").unwrap(),
///     ParameterStore::from_pairs([
///         ("file", "file"),
///         ("file_provider", "local"),
///         ("_plite_local_root", "/x"),
///     ]),
/// );
///
/// let selector = ProviderSelector::new(&context);
/// let descriptor = selector.describe("file", "file").unwrap();
/// assert!(descriptor.is_local());
/// # use plite::domain::BackendParams;
/// # if let BackendParams::Local { root } = descriptor.params {
/// #     assert_eq!(root, Path::new("/x/demo/data"));
/// # }
/// ```
#[derive(Clone)]
pub struct ProviderSelector<'a> {
    context: &'a ResolverContext,
    object_store: Option<Arc<dyn ObjectStoreConnector>>,
    secrets: Option<Arc<dyn SecretsConnector>>,
    email: Option<Arc<dyn EmailConnector>>,
}

impl<'a> ProviderSelector<'a> {
    /// Creates a selector over a resolved context, with no remote connectors.
    pub fn new(context: &'a ResolverContext) -> Self {
        Self {
            context,
            object_store: None,
            secrets: None,
            email: None,
        }
    }

    /// Sets the connector used to build object store clients.
    pub fn with_object_store(mut self, connector: impl ObjectStoreConnector + 'static) -> Self {
        self.object_store = Some(Arc::new(connector));
        self
    }

    /// Sets the connector used to build secrets clients.
    pub fn with_secrets(mut self, connector: impl SecretsConnector + 'static) -> Self {
        self.secrets = Some(Arc::new(connector));
        self
    }

    /// Sets the connector used to build email clients.
    pub fn with_email(mut self, connector: impl EmailConnector + 'static) -> Self {
        self.email = Some(Arc::new(connector));
        self
    }

    /// Returns the secrets service for this context.
    pub fn secrets(&self) -> Secrets<'a> {
        let secrets = Secrets::new(self.context);
        match &self.secrets {
            Some(connector) => secrets.with_shared_connector(Arc::clone(connector)),
            None => secrets,
        }
    }

    /// Checks that `capability` is configured with type `expected`.
    pub fn check_type(&self, capability: &str, expected: &str) -> Result<()> {
        let value = self.context.params().get(capability);
        match value.and_then(|v| v.as_str()) {
            Some(found) if found.trim().eq_ignore_ascii_case(expected) => Ok(()),
            _ => Err(PliteError::CapabilityTypeMismatch {
                capability: capability.to_string(),
                expected: expected.to_string(),
                found: value.map(|v| v.to_string()),
            }),
        }
    }

    /// Returns the discriminator configured for `capability`.
    pub fn source(&self, capability: &str) -> Result<ProviderSource> {
        let key = provider_key(capability);
        let value = self
            .context
            .params()
            .get_str(&key)
            .ok_or_else(|| PliteError::MissingProviderSource {
                capability: capability.to_string(),
            })?;
        parse_source(capability, value)
    }

    /// Checks the capability and derives its backend parameters.
    pub fn describe(&self, capability: &str, expected: &str) -> Result<ProviderDescriptor> {
        self.check_type(capability, expected)?;
        let source = self.source(capability)?;
        let params = self.context.params();

        let backend = match source {
            ProviderSource::Local => BackendParams::Local {
                root: self.local_root(capability, LOCAL_DATA_DIR)?,
            },
            ProviderSource::Cloud => BackendParams::Cloud {
                credentials: CredentialBundle::from_parameters(params)?,
                bucket: params.require_str(&bucket_key(capability))?.to_string(),
            },
            ProviderSource::Proxy => return Err(unsupported(capability, source)),
        };

        tracing::debug!("Provider for '{}': {}", capability, source);
        Ok(ProviderDescriptor {
            capability: capability.to_string(),
            source,
            params: backend,
        })
    }

    /// Builds the file storage handle for `capability`.
    pub fn get_provider(&self, capability: &str, expected: &str) -> Result<Box<dyn FileStorage>> {
        let descriptor = self.describe(capability, expected)?;
        match descriptor.params {
            BackendParams::Local { root } => {
                tracing::debug!("Local storage for '{}' at {}", capability, root.display());
                Ok(Box::new(LocalFileStorage::new(root)))
            }
            BackendParams::Cloud {
                credentials,
                bucket,
            } => {
                let Some(connector) = &self.object_store else {
                    tracing::error!("No object store connector configured for '{}'", capability);
                    return Err(unsupported(capability, descriptor.source));
                };
                let client = connector.connect(&credentials).map_err(|e| {
                    tracing::error!("Cannot connect to object store: {}", e);
                    PliteError::storage(bucket.clone(), e)
                })?;
                Ok(Box::new(ObjectStorage::new(client, bucket)))
            }
        }
    }

    /// Checks the `email` capability and derives its backend and sender.
    ///
    /// The sender comes from `email_<source>_from_email`, with an optional
    /// display name in `email_<source>_from_name`.
    pub fn describe_email(&self) -> Result<EmailDescriptor> {
        self.check_type(EMAIL_CAPABILITY, EMAIL_CAPABILITY)?;
        let source = self.source(EMAIL_CAPABILITY)?;

        let backend = match source {
            ProviderSource::Local => EmailBackend::Local {
                outbox: self.local_root(EMAIL_CAPABILITY, LOCAL_OUTBOX_DIR)?,
            },
            ProviderSource::Cloud => EmailBackend::Cloud {
                credentials: CredentialBundle::from_parameters(self.context.params())?,
            },
            ProviderSource::Proxy => return Err(unsupported(EMAIL_CAPABILITY, source)),
        };
        let from = self.sender_address(source)?;

        tracing::debug!("Email provider: {} (from {})", source, from);
        Ok(EmailDescriptor {
            source,
            from,
            backend,
        })
    }

    /// Builds the email sender for this context.
    pub fn get_email_provider(&self) -> Result<Box<dyn EmailSender>> {
        let descriptor = self.describe_email()?;
        match descriptor.backend {
            EmailBackend::Local { outbox } => {
                tracing::debug!("Local email outbox at {}", outbox.display());
                Ok(Box::new(LocalOutbox::new(outbox, descriptor.from)))
            }
            EmailBackend::Cloud { credentials } => {
                let Some(connector) = &self.email else {
                    tracing::error!("No email connector configured");
                    return Err(unsupported(EMAIL_CAPABILITY, descriptor.source));
                };
                let client = connector.connect(&credentials).map_err(|e| {
                    tracing::error!("Cannot connect to email service: {}", e);
                    PliteError::Email {
                        message: e.to_string(),
                        source: Some(e),
                    }
                })?;
                Ok(Box::new(CloudEmail::new(client, descriptor.from)))
            }
        }
    }

    fn sender_address(&self, source: ProviderSource) -> Result<EmailAddress> {
        let params = self.context.params();
        let email_key = format!("{}_{}_from_email", EMAIL_CAPABILITY, source);
        let name_key = format!("{}_{}_from_name", EMAIL_CAPABILITY, source);

        let email = non_empty(params, &email_key)
            .ok_or(PliteError::MissingParameter { key: email_key })?;
        let address = EmailAddress::new(email);
        Ok(match non_empty(params, &name_key) {
            Some(name) => address.with_name(name),
            None => address,
        })
    }

    /// Derives the local root directory for `capability`.
    ///
    /// In order: `<capability>_local_root_dir`; `<capability>_local_root_prefix`
    /// + app + `<capability>_local_root_suffix`; `{local root}/{app}/{leaf}`.
    fn local_root(&self, capability: &str, leaf: &str) -> Result<PathBuf> {
        let params = self.context.params();
        let app = self.context.app_name();

        let dir_key = format!("{}_local_root_dir", capability);
        if let Some(dir) = non_empty(params, &dir_key) {
            return Ok(PathBuf::from(dir));
        }

        let prefix_key = format!("{}_local_root_prefix", capability);
        let suffix_key = format!("{}_local_root_suffix", capability);
        match (non_empty(params, &prefix_key), non_empty(params, &suffix_key)) {
            (Some(prefix), Some(suffix)) => {
                return Ok(PathBuf::from(format!("{}{}{}", prefix, app, suffix)))
            }
            (Some(_), None) => return Err(PliteError::MissingParameter { key: suffix_key }),
            (None, Some(_)) => return Err(PliteError::MissingParameter { key: prefix_key }),
            (None, None) => {}
        }

        let base = self
            .context
            .local_root()
            .map(PathBuf::from)
            .or_else(|| non_empty(params, LOCAL_ROOT_SIGNAL).map(PathBuf::from))
            .ok_or(PliteError::MissingParameter { key: dir_key })?;
        Ok(base.join(app).join(leaf))
    }
}

impl std::fmt::Debug for ProviderSelector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSelector")
            .field("app", &self.context.app_name())
            .field("object_store", &self.object_store.is_some())
            .field("secrets", &self.secrets.is_some())
            .field("email", &self.email.is_some())
            .finish()
    }
}

fn unsupported(capability: &str, source: ProviderSource) -> PliteError {
    PliteError::UnsupportedProviderSource {
        capability: capability.to_string(),
        value: source.to_string(),
    }
}

fn bucket_key(capability: &str) -> String {
    format!("{}_bucket", capability)
}

fn non_empty<'p>(params: &'p ParameterStore, key: &str) -> Option<&'p str> {
    params
        .get_str(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
