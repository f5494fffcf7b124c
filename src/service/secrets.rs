// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret lookup.
//!
//! With `secrets_provider` set to `cloud`, secrets come from the remote secrets
//! service; any other value (or none) reads them from the local parameters.

use crate::domain::{
    provider_key, CredentialBundle, PliteError, ProviderSource, RemoteError,
    ResolverContext, Result,
};
use crate::ports::{SecretValue, SecretsConnector};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;
use std::sync::Arc;

/// Capability name of the secrets service.
pub const SECRETS_CAPABILITY: &str = "secrets";

/// Looks up secrets for a resolved configuration.
///
/// # Examples
///
/// ```rust
/// use plite::domain::{AppIdentity, ParameterStore, ResolutionMode, ResolverContext};
/// use plite::service::Secrets;
/// use serde_json::json;
///
/// let params = ParameterStore::from_json_object(json!({
///     "secrets_provider": "local",
///     "db": {"host": "localhost", "ports": [5432, 5433]},
/// })).unwrap();
/// let context = ResolverContext::new(
///     ResolutionMode::EmbeddedClass,
///     AppIdentity::new("demo").unwrap(),
///     params,
/// );
///
/// let secrets = Secrets::new(&context);
/// assert_eq!(secrets.get("db", Some("host")).unwrap(), json!("localhost"));
/// assert_eq!(secrets.get("db", Some("ports.1")).unwrap(), json!(5433));
/// ```
#[derive(Clone)]
pub struct Secrets<'a> {
    context: &'a ResolverContext,
    connector: Option<Arc<dyn SecretsConnector>>,
}

impl<'a> Secrets<'a> {
    /// Creates a secrets service with no remote connector.
    pub fn new(context: &'a ResolverContext) -> Self {
        Self {
            context,
            connector: None,
        }
    }

    /// Sets the connector used when secrets come from the remote service.
    pub fn with_connector(self, connector: impl SecretsConnector + 'static) -> Self {
        self.with_shared_connector(Arc::new(connector))
    }

    /// Sets a shared connector used when secrets come from the remote service.
    pub fn with_shared_connector(mut self, connector: Arc<dyn SecretsConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Returns `true` when secrets are read from the remote service.
    pub fn is_remote(&self) -> bool {
        self.context
            .params()
            .get_str(&provider_key(SECRETS_CAPABILITY))
            .and_then(|value| value.parse::<ProviderSource>().ok())
            == Some(ProviderSource::Cloud)
    }

    /// Returns the secret `name`, or the value at the dot-separated `path` inside it.
    ///
    /// Numeric path segments index into arrays.
    pub fn get(&self, name: &str, path: Option<&str>) -> Result<Value> {
        let secret = if self.is_remote() {
            self.fetch_remote(name)?
        } else {
            self.lookup_local(name)?
        };

        match path {
            None => Ok(secret),
            Some(path) => descend(&secret, path).cloned().ok_or_else(|| {
                PliteError::SecretPathNotFound {
                    name: name.to_string(),
                    path: path.to_string(),
                }
            }),
        }
    }

    fn lookup_local(&self, name: &str) -> Result<Value> {
        tracing::debug!("Reading secret [{}] from local parameters", name);
        self.context
            .params()
            .get(name)
            .map(|value| value.as_json().clone())
            .ok_or_else(|| PliteError::SecretNotFound {
                name: name.to_string(),
            })
    }

    fn fetch_remote(&self, name: &str) -> Result<Value> {
        let retrieval = |message: String, source: Option<RemoteError>| {
            tracing::error!("Failed to get secret [{}]: {}", name, message);
            PliteError::SecretRetrieval {
                name: name.to_string(),
                message,
                source,
            }
        };

        let Some(connector) = &self.connector else {
            return Err(retrieval("no secrets connector configured".to_string(), None));
        };

        let credentials = CredentialBundle::from_parameters(self.context.params())
            .map_err(|e| retrieval(format!("no credentials: {}", e), Some(Box::new(e))))?;
        tracing::debug!("Getting secret [{}] in {}", name, credentials.region);
        let client = connector
            .connect(&credentials)
            .map_err(|e| retrieval(format!("cannot create client: {}", e), Some(e)))?;
        let value = client
            .get_secret_value(name)
            .map_err(|e| retrieval(e.to_string(), Some(e)))?;

        let text = match value {
            SecretValue::String(text) => text,
            SecretValue::Binary(bytes) => {
                let decoded = STANDARD
                    .decode(&bytes)
                    .map_err(|e| retrieval("invalid base64 secret".to_string(), Some(Box::new(e))))?;
                String::from_utf8(decoded).map_err(|e| {
                    retrieval("secret is not valid UTF-8".to_string(), Some(Box::new(e)))
                })?
            }
        };

        serde_json::from_str(&text)
            .map_err(|e| retrieval("secret is not valid JSON".to_string(), Some(Box::new(e))))
    }
}

impl std::fmt::Debug for Secrets<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("remote", &self.is_remote())
            .field("connector", &self.connector.is_some())
            .finish()
    }
}

/// Follows a dot-separated path into a JSON value.
fn descend<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppIdentity, ParameterStore, ResolutionMode};
    use crate::ports::{RemoteResult, SecretsClient};
    use serde_json::json;

    struct OneSecret(SecretValue);

    impl SecretsClient for OneSecret {
        fn get_secret_value(&self, name: &str) -> RemoteResult<SecretValue> {
            match name {
                "app/db" => Ok(self.0.clone()),
                _ => Err(format!("ResourceNotFoundException: {}", name).into()),
            }
        }
    }

    fn context(params: Value) -> ResolverContext {
        ResolverContext::new(
            ResolutionMode::EmbeddedClass,
            AppIdentity::new("demo").unwrap(),
            ParameterStore::from_json_object(params).unwrap(),
        )
    }

    fn cloud_context() -> ResolverContext {
        context(json!({"secrets_provider": "cloud", "aws_region": "eu-west-1"}))
    }

    fn connector(
        value: SecretValue,
    ) -> impl Fn(&CredentialBundle) -> RemoteResult<Arc<dyn SecretsClient>> {
        move |_: &CredentialBundle| -> RemoteResult<Arc<dyn SecretsClient>> {
            Ok(Arc::new(OneSecret(value.clone())))
        }
    }

    #[test]
    fn test_remote_string_secret_with_path() {
        let ctx = cloud_context();
        let secrets = Secrets::new(&ctx)
            .with_connector(connector(SecretValue::String(r#"{"k": "v"}"#.to_string())));
        assert_eq!(secrets.get("app/db", Some("k")).unwrap(), json!("v"));
        assert_eq!(secrets.get("app/db", None).unwrap(), json!({"k": "v"}));
    }

    #[test]
    fn test_remote_binary_secret() {
        let ctx = cloud_context();
        let encoded = STANDARD.encode(r#"{"password": "hunter2"}"#);
        let secrets = Secrets::new(&ctx)
            .with_connector(connector(SecretValue::Binary(encoded.into_bytes())));
        assert_eq!(
            secrets.get("app/db", Some("password")).unwrap(),
            json!("hunter2")
        );
    }

    #[test]
    fn test_remote_failures() {
        let ctx = cloud_context();
        let secrets = Secrets::new(&ctx)
            .with_connector(connector(SecretValue::String("not json".to_string())));
        assert!(matches!(
            secrets.get("app/db", None),
            Err(PliteError::SecretRetrieval { .. })
        ));
        assert!(matches!(
            secrets.get("other", None),
            Err(PliteError::SecretRetrieval { .. })
        ));

        let secrets = Secrets::new(&ctx)
            .with_connector(connector(SecretValue::Binary(b"%%%".to_vec())));
        assert!(matches!(
            secrets.get("app/db", None),
            Err(PliteError::SecretRetrieval { .. })
        ));
    }

    #[test]
    fn test_remote_without_connector() {
        let ctx = cloud_context();
        assert!(matches!(
            Secrets::new(&ctx).get("app/db", None),
            Err(PliteError::SecretRetrieval { source: None, .. })
        ));
    }

    #[test]
    fn test_remote_requires_region() {
        let ctx = context(json!({"secrets_provider": "aws"}));
        let secrets = Secrets::new(&ctx)
            .with_connector(connector(SecretValue::String("{}".to_string())));
        match secrets.get("app/db", None) {
            Err(PliteError::SecretRetrieval { message, source, .. }) => {
                assert!(message.contains("aws_region"), "{}", message);
                assert!(source.is_some());
            }
            other => panic!("expected retrieval error, got {:?}", other),
        }
    }

    #[test]
    fn test_local_lookup() {
        let ctx = context(json!({"api_key": "abc", "secrets_provider": "proxy"}));
        let secrets = Secrets::new(&ctx);
        assert!(!secrets.is_remote());
        assert_eq!(secrets.get("api_key", None).unwrap(), json!("abc"));
        assert!(matches!(
            secrets.get("missing", None),
            Err(PliteError::SecretNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_path() {
        let ctx = context(json!({"db": {"host": "h", "list": [1]}}));
        let secrets = Secrets::new(&ctx);
        for path in ["port", "host.name", "list.3", "list.x"] {
            assert!(matches!(
                secrets.get("db", Some(path)),
                Err(PliteError::SecretPathNotFound { .. })
            ));
        }
    }

    #[test]
    fn test_descend() {
        let value = json!({"a": {"b": [{"c": 1}]}});
        assert_eq!(descend(&value, "a.b.0.c"), Some(&json!(1)));
        assert_eq!(descend(&value, "a.z"), None);
    }
}
