// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for provider selection and the storage backends.

mod common;

use common::{
    embedded_context, init_tracing, object_store_connector, resolver_with, AppTree,
    InMemoryObjectStore,
};
use plite::domain::{BackendParams, ProviderSource};
use plite::ports::Metadata;
use plite::prelude::*;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

fn cloud_context() -> ResolverContext {
    embedded_context(json!({
        "file": "file",
        "file_provider": "cloud",
        "file_bucket": "demo-files",
        "aws_region": "us-east-2",
        "aws_access_key_id": "AKIDEXAMPLE",
        "aws_secret_access_key": "secret",
    }))
}

#[test]
fn test_local_descriptor_from_parameters() {
    let context = embedded_context(json!({
        "file": "file",
        "file_provider": "local",
        "_plite_local_root": "/x",
        "app": "demo",
    }));

    let descriptor = ProviderSelector::new(&context)
        .describe("file", "file")
        .unwrap();
    assert_eq!(descriptor.source, ProviderSource::Local);
    match descriptor.params {
        BackendParams::Local { root } => assert_eq!(root, Path::new("/x/demo/data")),
        other => panic!("expected local params, got {:?}", other),
    }
}

#[test]
fn test_unsupported_discriminators() {
    for value in ["bogus", "proxy", ""] {
        let context = embedded_context(json!({"file": "file", "file_provider": value}));
        let result = ProviderSelector::new(&context).get_provider("file", "file");
        assert!(
            matches!(result, Err(PliteError::UnsupportedProviderSource { .. })),
            "value {:?}",
            value
        );
    }
}

#[test]
fn test_local_round_trip_after_resolution() {
    let tree = AppTree::new();
    tree.write_config("demo", r#"{"file": "file", "file_provider": "local"}"#);
    let resolver = resolver_with(&[
        ("_plite_local_root", tree.root_str()),
        ("_plite_app", "demo"),
    ]);

    let context = resolver.resolve().unwrap();
    let storage = ProviderSelector::new(context)
        .get_provider("file", "file")
        .unwrap();
    assert_eq!(storage.name(), "local");

    assert!(storage.write("invoices/march.csv", "id,total\n1,20\n\n", None));
    assert!(storage.write("notes.txt", "hello", None));

    assert!(tree.root().join("demo/data/invoices/march.csv").exists());
    assert_eq!(
        storage.read("invoices/march.csv").unwrap(),
        "id,total\n1,20\n"
    );
    assert_eq!(storage.list(None).unwrap(), vec!["invoices/", "notes.txt"]);
    assert_eq!(storage.list_directories(None).unwrap(), vec!["invoices"]);
    assert_eq!(storage.list_files(Some("invoices/")).unwrap(), vec!["march.csv"]);
}

#[test]
fn test_local_storage_rejects_escaping_paths() {
    let tree = AppTree::new();
    let storage = plite::adapters::LocalFileStorage::new(tree.root().join("data"));

    assert!(!storage.write("../outside.txt", "x", None));
    assert!(!tree.root().join("outside.txt").exists());
    assert!(matches!(
        storage.read("/etc/passwd"),
        Err(PliteError::InvalidPath { .. })
    ));
}

#[test]
fn test_object_store_listing() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.insert("demo-files", "docs/", "");
    store.insert("demo-files", "docs/a.txt", "a");
    store.insert("demo-files", "docs/b.txt", "b");
    store.insert("demo-files", "docs/old/c.txt", "c");
    store.insert("demo-files", "readme.md", "r");
    store.insert("other-bucket", "docs/z.txt", "z");

    let context = cloud_context();
    let storage = ProviderSelector::new(&context)
        .with_object_store(object_store_connector(Arc::clone(&store)))
        .get_provider("file", "file")
        .unwrap();
    assert_eq!(storage.name(), "object-store");

    assert_eq!(storage.list(None).unwrap(), vec!["docs/", "readme.md"]);
    assert_eq!(
        storage.list(Some("docs/")).unwrap(),
        vec!["old/", "a.txt", "b.txt"]
    );
    assert_eq!(storage.list_directories(Some("docs/")).unwrap(), vec!["old"]);
}

#[test]
fn test_object_store_listing_nested_directory_marker() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.insert("demo-files", "a/a/", "");
    let storage = plite::adapters::ObjectStorage::new(store.clone(), "demo-files");

    assert_eq!(storage.list(Some("a/")).unwrap(), vec!["a/"]);
    assert_eq!(storage.list_directories(Some("a/")).unwrap(), vec!["a"]);

    store.insert("demo-files", "a/", "");
    assert_eq!(storage.list(Some("a/")).unwrap(), vec!["a/"]);
    assert_eq!(storage.list(None).unwrap(), vec!["a/"]);
}

#[test]
fn test_object_store_write_and_read() {
    let store = Arc::new(InMemoryObjectStore::new());
    let context = cloud_context();
    let storage = ProviderSelector::new(&context)
        .with_object_store(object_store_connector(Arc::clone(&store)))
        .get_provider("file", "file")
        .unwrap();

    let mut metadata = Metadata::new();
    metadata.insert("owner".to_string(), "billing".to_string());
    assert!(storage.write("reports/q1.txt", "  ok  ", Some(&metadata)));

    let stored = storage.read_with_metadata("reports/q1.txt").unwrap();
    assert_eq!(stored.data, "ok\n");
    assert_eq!(stored.metadata.get("owner").map(String::as_str), Some("billing"));

    assert!(matches!(
        storage.read("reports/missing.txt"),
        Err(PliteError::Storage { .. })
    ));
}

#[test]
fn test_object_store_write_failure_returns_false() {
    init_tracing();
    let store = Arc::new(InMemoryObjectStore::failing());
    let context = cloud_context();
    let storage = ProviderSelector::new(&context)
        .with_object_store(object_store_connector(Arc::clone(&store)))
        .get_provider("file", "file")
        .unwrap();

    assert!(!storage.write("a.txt", "data", None));
    assert!(storage.list(None).unwrap().is_empty());
}

#[test]
fn test_cloud_without_connector() {
    let context = cloud_context();
    assert!(matches!(
        ProviderSelector::new(&context).get_provider("file", "file"),
        Err(PliteError::UnsupportedProviderSource { .. })
    ));
}

#[test]
fn test_descriptor_is_rederived_per_call() {
    let context = cloud_context();
    let selector = ProviderSelector::new(&context);
    let first = selector.describe("file", "file").unwrap();
    let second = selector.describe("file", "file").unwrap();
    assert_eq!(first, second);
}
