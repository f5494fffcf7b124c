// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test utilities for integration tests.
//!
//! Provides an in-memory object store, scripted secrets and email clients, a
//! fixed signal reader and a temporary application tree on disk.

#![allow(dead_code)]

use plite::domain::{CredentialBundle, ParameterStore, ResolverContext};
use plite::ports::{
    EmailAddress, EmailClient, EmailMessage, GetObjectOutput, ListObjectsOutput, Metadata,
    ObjectStoreClient, RemoteResult, SecretValue, SecretsClient, SignalReader,
};
use plite::service::ConfigurationResolver;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Routes log output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A signal reader over a fixed map with a configurable priority.
pub struct FixedSignals {
    name: String,
    priority: u8,
    values: HashMap<String, String>,
}

impl FixedSignals {
    pub fn new(name: &str, priority: u8) -> Self {
        Self {
            name: name.to_string(),
            priority,
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl SignalReader for FixedSignals {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Builds a resolver over a single fixed signal set.
pub fn resolver_with(pairs: &[(&str, &str)]) -> ConfigurationResolver {
    let signals = pairs
        .iter()
        .fold(FixedSignals::new("fixed", 2), |s, (k, v)| s.with(k, v));
    ConfigurationResolver::builder()
        .with_signals(Box::new(signals))
        .build()
        .unwrap()
}

/// A local root holding one or more application trees.
pub struct AppTree {
    dir: TempDir,
}

impl AppTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn root_str(&self) -> &str {
        self.dir.path().to_str().unwrap()
    }

    pub fn write_config(&self, app: &str, content: &str) -> PathBuf {
        self.write(app, "config", &format!("{}-config.js", app), content)
    }

    pub fn write_auth(&self, app: &str, content: &str) -> PathBuf {
        self.write(app, "auth", &format!("{}-auth.js", app), content)
    }

    fn write(&self, app: &str, sub: &str, file: &str, content: &str) -> PathBuf {
        let dir = self.dir.path().join(app).join(sub);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file);
        fs::write(&path, content).unwrap();
        path
    }
}

/// An object store held in memory, keyed by bucket then key.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), (Vec<u8>, Metadata)>>,
    pub fail_puts: bool,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_puts: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, bucket: &str, key: &str, body: &str) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (body.as_bytes().to_vec(), Metadata::new()),
        );
    }
}

impl ObjectStoreClient for InMemoryObjectStore {
    fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
    ) -> RemoteResult<ListObjectsOutput> {
        let prefix = prefix.unwrap_or("");
        let objects = self.objects.lock().unwrap();
        let mut output = ListObjectsOutput::default();

        for (b, key) in objects.keys() {
            if b != bucket || !key.starts_with(prefix) {
                continue;
            }
            let rest = &key[prefix.len()..];
            match delimiter.and_then(|d| rest.find(d).map(|i| (d, i))) {
                Some((d, i)) => {
                    let common = format!("{}{}{}", prefix, &rest[..i], d);
                    if !output.common_prefixes.contains(&common) {
                        output.common_prefixes.push(common);
                    }
                }
                None => output.contents.push(key.clone()),
            }
        }
        Ok(output)
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        metadata: &Metadata,
    ) -> RemoteResult<()> {
        if self.fail_puts {
            return Err("AccessDenied: put not allowed".into());
        }
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (body.to_vec(), metadata.clone()),
        );
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> RemoteResult<GetObjectOutput> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(body, metadata)| GetObjectOutput {
                body: body.clone(),
                metadata: metadata.clone(),
            })
            .ok_or_else(|| format!("NoSuchKey: {}", key).into())
    }
}

/// A secrets client answering from a fixed map and counting calls.
#[derive(Default)]
pub struct ScriptedSecrets {
    secrets: HashMap<String, SecretValue>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string(mut self, name: &str, value: &str) -> Self {
        self.secrets
            .insert(name.to_string(), SecretValue::String(value.to_string()));
        self
    }

    pub fn with_binary(mut self, name: &str, value: &[u8]) -> Self {
        self.secrets
            .insert(name.to_string(), SecretValue::Binary(value.to_vec()));
        self
    }
}

impl SecretsClient for ScriptedSecrets {
    fn get_secret_value(&self, name: &str) -> RemoteResult<SecretValue> {
        self.calls.lock().unwrap().push(name.to_string());
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| format!("ResourceNotFoundException: {}", name).into())
    }
}

/// An email client that records what it sends, or rejects everything.
#[derive(Default)]
pub struct ScriptedEmail {
    pub reject: bool,
    pub sent: Mutex<Vec<(EmailAddress, EmailMessage)>>,
}

impl ScriptedEmail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }
}

impl EmailClient for ScriptedEmail {
    fn send_email(&self, from: &EmailAddress, message: &EmailMessage) -> RemoteResult<String> {
        if self.reject {
            return Err("MessageRejected: Email address is not verified".into());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((from.clone(), message.clone()));
        Ok(format!("msg-{}", sent.len()))
    }
}

/// Returns an object store connector that always hands out `store`.
pub fn object_store_connector(
    store: Arc<InMemoryObjectStore>,
) -> impl Fn(&CredentialBundle) -> RemoteResult<Arc<dyn ObjectStoreClient>> {
    move |_: &CredentialBundle| -> RemoteResult<Arc<dyn ObjectStoreClient>> {
        Ok(store.clone() as Arc<dyn ObjectStoreClient>)
    }
}

/// Returns a secrets connector that always hands out `client`.
pub fn secrets_connector(
    client: Arc<ScriptedSecrets>,
) -> impl Fn(&CredentialBundle) -> RemoteResult<Arc<dyn SecretsClient>> {
    move |_: &CredentialBundle| -> RemoteResult<Arc<dyn SecretsClient>> {
        Ok(client.clone() as Arc<dyn SecretsClient>)
    }
}

/// Returns an email connector that always hands out `client`.
pub fn email_connector(
    client: Arc<ScriptedEmail>,
) -> impl Fn(&CredentialBundle) -> RemoteResult<Arc<dyn EmailClient>> {
    move |_: &CredentialBundle| -> RemoteResult<Arc<dyn EmailClient>> {
        Ok(client.clone() as Arc<dyn EmailClient>)
    }
}

/// Builds a context from a JSON object of parameters.
pub fn embedded_context(params: serde_json::Value) -> ResolverContext {
    use plite::domain::{AppIdentity, ResolutionMode};
    ResolverContext::new(
        ResolutionMode::EmbeddedClass,
        AppIdentity::new("demo").unwrap(),
        ParameterStore::from_json_object(params).unwrap(),
    )
}
