// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for secret lookup and database parameters.

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use common::{embedded_context, init_tracing, secrets_connector, ScriptedSecrets};
use plite::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn cloud_context() -> ResolverContext {
    embedded_context(json!({
        "secrets_provider": "cloud",
        "db_provider": "cloud",
        "db_secret_name": "demo/rds",
        "aws_region": "us-east-2",
    }))
}

#[test]
fn test_remote_secret_path() {
    let client = Arc::new(ScriptedSecrets::new().with_string("s", r#"{"k": "v"}"#));
    let context = cloud_context();
    let secrets = ProviderSelector::new(&context)
        .with_secrets(secrets_connector(Arc::clone(&client)))
        .secrets();

    assert!(secrets.is_remote());
    assert_eq!(secrets.get("s", Some("k")).unwrap(), json!("v"));
    assert_eq!(*client.calls.lock().unwrap(), vec!["s".to_string()]);
}

#[test]
fn test_remote_binary_secret() {
    let encoded = STANDARD.encode(r#"{"token": {"value": "t0k"}}"#);
    let client = Arc::new(ScriptedSecrets::new().with_binary("bin", encoded.as_bytes()));
    let context = cloud_context();
    let secrets = Secrets::new(&context).with_connector(secrets_connector(client));

    assert_eq!(
        secrets.get("bin", Some("token.value")).unwrap(),
        json!("t0k")
    );
}

#[test]
fn test_remote_errors() {
    init_tracing();
    let client = Arc::new(
        ScriptedSecrets::new()
            .with_string("text", "plain text")
            .with_binary("bad", b"not base64!"),
    );
    let context = cloud_context();
    let secrets = Secrets::new(&context).with_connector(secrets_connector(client));

    for name in ["missing", "text", "bad"] {
        assert!(
            matches!(secrets.get(name, None), Err(PliteError::SecretRetrieval { .. })),
            "secret {}",
            name
        );
    }

    let client = Arc::new(ScriptedSecrets::new().with_string("s", r#"{"k": "v"}"#));
    let secrets = Secrets::new(&context).with_connector(secrets_connector(client));
    assert!(matches!(
        secrets.get("s", Some("nope")),
        Err(PliteError::SecretPathNotFound { .. })
    ));
}

#[test]
fn test_local_secrets_never_call_remote() {
    let client = Arc::new(ScriptedSecrets::new());
    let context = embedded_context(json!({
        "secrets_provider": "local",
        "mail": {"smtp": {"password": "pw"}},
    }));
    let secrets = Secrets::new(&context).with_connector(secrets_connector(Arc::clone(&client)));

    assert!(!secrets.is_remote());
    assert_eq!(
        secrets.get("mail", Some("smtp.password")).unwrap(),
        json!("pw")
    );
    assert!(client.calls.lock().unwrap().is_empty());
}

#[test]
fn test_database_params_from_cloud_secret() {
    let client = Arc::new(ScriptedSecrets::new().with_string(
        "demo/rds",
        r#"{"host": "db.internal", "port": 5432, "dbname": "demo", "username": "app", "password": "pw"}"#,
    ));
    let context = cloud_context();
    let selector = ProviderSelector::new(&context).with_secrets(secrets_connector(client));

    let params = DatabaseParams::from_context(&context, &selector.secrets()).unwrap();
    assert_eq!(
        params,
        DatabaseParams {
            host: "db.internal".to_string(),
            port: 5432,
            dbname: "demo".to_string(),
            user: "app".to_string(),
            password: "pw".to_string(),
        }
    );
}

#[test]
fn test_database_secret_missing_field() {
    let client = Arc::new(
        ScriptedSecrets::new().with_string("demo/rds", r#"{"host": "db.internal", "port": 5432}"#),
    );
    let context = cloud_context();
    let secrets = Secrets::new(&context).with_connector(secrets_connector(client));

    assert!(matches!(
        DatabaseParams::from_context(&context, &secrets),
        Err(PliteError::MissingParameter { key }) if key == "dbname"
    ));
}
