//! Serde types mirroring the configuration document.
//!
//! The wire structs here are strict about the `supported_repos` subtree
//! (unknown keys are rejected) and permissive about the rest of `model`, which
//! also carries deployment settings and secrets owned by other components.
//! `SupportedModel` in `store` is built from these after validation.

use crate::settings::StorageSettings;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Packaging family of a distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageBase {
    Deb,
    Rpm,
}

impl PackageBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageBase::Deb => "deb",
            PackageBase::Rpm => "rpm",
        }
    }
}

impl fmt::Display for PackageBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One target distribution: its packaging family and supported releases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionSpec {
    pub base: PackageBase,
    pub versions: Vec<String>,
}

impl DistributionSpec {
    pub fn supports_version(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Document {
    pub model: ModelSection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelSection {
    pub supported_repos: SupportedRepos,
    #[serde(flatten)]
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SupportedRepos {
    pub repo_kind: Vec<String>,
    pub tarantool_series: Vec<String>,
    pub enabled: Vec<String>,
    pub distrs: OrderedEntries<DistributionSpec>,
}

/// JSON object entries in document order, duplicates included.
///
/// Deserializing straight into a map would sort (BTreeMap) or silently keep
/// the last duplicate; validation needs to see both the order and the repeats.
#[derive(Debug)]
pub(crate) struct OrderedEntries<T>(pub Vec<(String, T)>);

impl<'de, T> Deserialize<'de> for OrderedEntries<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T> Visitor<'de> for EntriesVisitor<T>
        where
            T: Deserialize<'de>,
        {
            type Value = OrderedEntries<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of distribution names to descriptions")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}
