//! Validated, read-only view of the supported-repository taxonomy.
//!
//! Loading runs four gates in order: JSON syntax, the bundled JSON Schema,
//! strict typed deserialization, and the cross-reference invariants below.
//! Nothing here is mutated after `ConfigStore::load` returns, so a store can be
//! shared freely across threads behind a plain `&` or `Arc`.

use crate::error::{ConfigError, Result};
use crate::model::{DistributionSpec, Document, SupportedRepos};
use crate::schema::validate_document;
use crate::settings::StorageSettings;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Upload paths may name this instead of a series to mean "every enabled series".
pub const ENABLED_SERIES_ALIAS: &str = "enabled";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Repository kinds, product series and distributions accepted by the service.
pub struct SupportedModel {
    repo_kinds: Vec<String>,
    series: Vec<String>,
    enabled: Vec<String>,
    distribution_order: Vec<String>,
    distributions: BTreeMap<String, DistributionSpec>,
}

impl SupportedModel {
    fn from_raw(raw: SupportedRepos) -> Result<Self> {
        ensure_unique("repo_kind", &raw.repo_kind)?;
        ensure_unique("tarantool_series", &raw.tarantool_series)?;
        ensure_unique("enabled", &raw.enabled)?;

        let known_series: BTreeSet<&str> =
            raw.tarantool_series.iter().map(String::as_str).collect();
        for series in &raw.enabled {
            if !known_series.contains(series.as_str()) {
                return Err(ConfigError::schema(format!(
                    "enabled series '{series}' is not listed in tarantool_series"
                )));
            }
        }

        let (distribution_order, distributions) = build_distributions(raw.distrs.0)?;

        Ok(Self {
            repo_kinds: raw.repo_kind,
            series: raw.tarantool_series,
            enabled: raw.enabled,
            distribution_order,
            distributions,
        })
    }

    pub fn repo_kinds(&self) -> &[String] {
        &self.repo_kinds
    }

    /// Every known series, in document order.
    pub fn series(&self) -> &[String] {
        &self.series
    }

    /// Enabled series, in document order.
    pub fn enabled_series(&self) -> &[String] {
        &self.enabled
    }

    pub fn is_repo_kind_supported(&self, kind: &str) -> bool {
        self.repo_kinds.iter().any(|k| k == kind)
    }

    pub fn is_series_supported(&self, series: &str) -> bool {
        self.series.iter().any(|s| s == series)
    }

    pub fn is_series_enabled(&self, series: &str) -> bool {
        self.enabled.iter().any(|s| s == series)
    }

    /// Distribution names in order of first appearance in the document.
    pub fn list_distributions(&self) -> Vec<&str> {
        self.distribution_order.iter().map(String::as_str).collect()
    }

    /// Resolve a distribution by name.
    pub fn get_distribution(&self, name: &str) -> Result<&DistributionSpec> {
        self.distributions
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))
    }

    /// Iterates `(name, spec)` pairs in document order.
    pub fn distributions(&self) -> impl Iterator<Item = (&str, &DistributionSpec)> {
        self.distribution_order.iter().filter_map(|name| {
            self.distributions
                .get(name)
                .map(|spec| (name.as_str(), spec))
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Loaded configuration: the taxonomy plus the storage location it applies to.
pub struct ConfigStore {
    model: SupportedModel,
    storage: StorageSettings,
}

impl ConfigStore {
    /// Parse and validate a serialized document.
    pub fn load(source: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(source).map_err(ConfigError::from_json)?;
        debug!("configuration parsed, checking schema");
        validate_document(&value)?;

        // Re-read from the bytes rather than `value`: the typed pass needs the
        // distribution order and any repeated keys, which `Value` discards.
        let document: Document =
            serde_json::from_slice(source).map_err(ConfigError::from_json)?;
        let model = SupportedModel::from_raw(document.model.supported_repos)?;

        info!(
            repo_kinds = model.repo_kinds.len(),
            series = model.series.len(),
            enabled = model.enabled.len(),
            distributions = model.distribution_order.len(),
            "supported repositories loaded"
        );

        Ok(Self {
            model,
            storage: document.model.storage,
        })
    }

    /// Read and load a document from disk.
    pub fn load_path(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "reading configuration");
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&bytes)
    }

    /// Locate the document via `RWS_CFG`, load it and apply `S3_*` overrides.
    pub fn load_from_env() -> Result<Self> {
        let path = crate::find_config_path()?;
        let mut store = Self::load_path(&path)?;
        store.storage.apply_env();
        Ok(store)
    }

    pub fn model(&self) -> &SupportedModel {
        &self.model
    }

    pub fn storage(&self) -> &StorageSettings {
        &self.storage
    }

    pub fn is_series_enabled(&self, series: &str) -> bool {
        self.model.is_series_enabled(series)
    }

    pub fn list_distributions(&self) -> Vec<&str> {
        self.model.list_distributions()
    }

    pub fn get_distribution(&self, name: &str) -> Result<&DistributionSpec> {
        self.model.get_distribution(name)
    }

    pub fn is_repo_kind_supported(&self, kind: &str) -> bool {
        self.model.is_repo_kind_supported(kind)
    }
}

fn ensure_unique(field: &str, values: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for value in values {
        if value.is_empty() {
            return Err(ConfigError::schema(format!(
                "{field} must not contain empty entries"
            )));
        }
        if !seen.insert(value.as_str()) {
            return Err(ConfigError::schema(format!(
                "{field} contains duplicate entry '{value}'"
            )));
        }
    }
    Ok(())
}

fn build_distributions(
    entries: Vec<(String, DistributionSpec)>,
) -> Result<(Vec<String>, BTreeMap<String, DistributionSpec>)> {
    let mut order = Vec::with_capacity(entries.len());
    let mut map = BTreeMap::new();
    for (name, spec) in entries {
        if name.is_empty() {
            return Err(ConfigError::schema("distrs contains a distribution with no name"));
        }
        if map.contains_key(&name) {
            return Err(ConfigError::schema(format!(
                "duplicate distribution '{name}' in distrs"
            )));
        }
        ensure_unique(&format!("distrs.{name}.versions"), &spec.versions)?;
        order.push(name.clone());
        map.insert(name, spec);
    }
    Ok((order, map))
}
