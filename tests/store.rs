// Loader guard rails: the bundled document, invariant enforcement and the
// malformed/schema/not-found error split.
mod support;

use anyhow::Result;
use rws_config::{ConfigError, ConfigStore, PackageBase};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::thread;

use support::{bundled_config, sample_document, write_document, write_raw};

fn bundled() -> Result<ConfigStore> {
    Ok(ConfigStore::load_path(&bundled_config())?)
}

#[test]
fn bundled_document_answers_series_queries() -> Result<()> {
    let store = bundled()?;
    assert!(store.is_series_enabled("2.8"));
    assert!(!store.is_series_enabled("3.0"));
    assert!(store.model().is_series_supported("3.0"));
    assert!(store.is_repo_kind_supported("live"));
    assert!(store.is_repo_kind_supported("release"));
    assert!(!store.is_repo_kind_supported("nightly"));
    Ok(())
}

#[test]
fn bundled_debian_entry() -> Result<()> {
    let store = bundled()?;
    let debian = store.get_distribution("debian")?;
    assert_eq!(debian.base, PackageBase::Deb);
    assert_eq!(debian.versions, vec!["bullseye", "buster", "jessie", "stretch"]);
    Ok(())
}

#[test]
fn unknown_distribution_is_not_found() -> Result<()> {
    let store = bundled()?;
    match store.get_distribution("nonexistent") {
        Err(ConfigError::NotFound(name)) => assert_eq!(name, "nonexistent"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    Ok(())
}

#[test]
fn distributions_follow_document_order() -> Result<()> {
    let store = bundled()?;
    let first = store.list_distributions();
    assert_eq!(first, vec!["el", "fedora", "opensuse-leap", "debian", "ubuntu"]);
    assert_eq!(first, store.list_distributions());

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(bundled_config())?)?;
    let mut from_source: Vec<String> = raw["model"]["supported_repos"]["distrs"]
        .as_object()
        .expect("distrs is an object")
        .keys()
        .cloned()
        .collect();
    let mut listed: Vec<String> = first.iter().map(|s| s.to_string()).collect();
    from_source.sort();
    listed.sort();
    assert_eq!(listed, from_source);
    Ok(())
}

#[test]
fn load_is_idempotent() -> Result<()> {
    let bytes = fs::read(bundled_config())?;
    let first = ConfigStore::load(&bytes)?;
    let second = ConfigStore::load(&bytes)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn every_enabled_series_is_a_known_series() -> Result<()> {
    let store = bundled()?;
    for series in store.model().enabled_series() {
        assert!(store.model().series().contains(series));
    }

    let mut doc = sample_document();
    doc["model"]["supported_repos"]["enabled"] = json!(["2.8", "2.11"]);
    let file = write_document(&doc)?;
    assert!(matches!(
        ConfigStore::load_path(file.path()),
        Err(ConfigError::SchemaValidation(_))
    ));
    Ok(())
}

#[test]
fn unknown_base_fails_schema_validation() -> Result<()> {
    let mut doc = sample_document();
    doc["model"]["supported_repos"]["distrs"]["macos"] =
        json!({"base": "dmg", "versions": ["13"]});
    let err = ConfigStore::load(doc.to_string().as_bytes()).unwrap_err();
    match err {
        ConfigError::SchemaValidation(message) => assert!(message.contains("macos")),
        other => panic!("expected SchemaValidation, got {other:?}"),
    }
    Ok(())
}

#[test]
fn duplicate_versions_fail_schema_validation() -> Result<()> {
    let mut doc = sample_document();
    doc["model"]["supported_repos"]["distrs"]["debian"]["versions"] =
        json!(["buster", "bullseye", "buster"]);
    assert!(matches!(
        ConfigStore::load(doc.to_string().as_bytes()),
        Err(ConfigError::SchemaValidation(_))
    ));
    Ok(())
}

#[test]
fn missing_and_mistyped_fields_fail_schema_validation() -> Result<()> {
    let mut missing = sample_document();
    missing["model"]["supported_repos"]
        .as_object_mut()
        .expect("supported_repos is an object")
        .remove("repo_kind");
    let mut mistyped = sample_document();
    mistyped["model"]["supported_repos"]["tarantool_series"] = json!("2.8");

    for doc in [missing, mistyped, json!({}), json!([1, 2, 3])] {
        assert!(
            matches!(
                ConfigStore::load(doc.to_string().as_bytes()),
                Err(ConfigError::SchemaValidation(_))
            ),
            "document should be rejected: {doc}"
        );
    }
    Ok(())
}

#[test]
fn invalid_json_is_malformed() -> Result<()> {
    for raw in ["", "{", "{\"model\": [}", "not json at all"] {
        assert!(
            matches!(
                ConfigStore::load(raw.as_bytes()),
                Err(ConfigError::MalformedInput(_))
            ),
            "input should be malformed: {raw:?}"
        );
    }
    let file = write_raw(b"\xff\xfe")?;
    assert!(matches!(
        ConfigStore::load_path(file.path()),
        Err(ConfigError::MalformedInput(_))
    ));
    Ok(())
}

#[test]
fn queries_are_shareable_across_threads() -> Result<()> {
    let store = Arc::new(bundled()?);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (
                    store.is_series_enabled("2.8"),
                    store.list_distributions().len(),
                )
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("reader panicked"), (true, 5));
    }
    Ok(())
}
