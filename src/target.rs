//! Upload targets: `repo_kind/series/distro/version` paths checked against
//! the taxonomy (for example `live/1.10/el/7`).

use crate::error::{ConfigError, Result};
use crate::store::{ENABLED_SERIES_ALIAS, SupportedModel};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesSelector {
    /// One explicit series.
    Single(String),
    /// The `enabled` alias.
    Enabled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadTarget {
    pub repo_kind: String,
    pub series: SeriesSelector,
    pub distribution: String,
    pub version: String,
}

impl UploadTarget {
    /// Parse and validate an upload path against `model`.
    ///
    /// Segments are checked left to right and the first unsupported one is
    /// reported; leading and trailing slashes are not accepted.
    pub fn parse(path: &str, model: &SupportedModel) -> Result<Self> {
        let segments: Vec<&str> = path.split('/').collect();
        let [kind, series, distribution, version] = segments.as_slice() else {
            return Err(ConfigError::UnsupportedTarget("Invalid URL.".to_string()));
        };

        if !model.is_repo_kind_supported(kind) {
            return Err(unsupported(format!("Repo kind \"{kind}\" is not supported.")));
        }

        let series = if *series == ENABLED_SERIES_ALIAS {
            SeriesSelector::Enabled
        } else if model.is_series_supported(series) {
            SeriesSelector::Single(series.to_string())
        } else {
            return Err(unsupported(format!(
                "Tarantool series \"{series}\" is not supported."
            )));
        };

        let spec = model
            .get_distribution(distribution)
            .map_err(|_| unsupported(format!("Distribution \"{distribution}\" is not supported.")))?;
        if !spec.supports_version(version) {
            return Err(unsupported(format!(
                "Distribution version \"{version}\" is not supported."
            )));
        }

        Ok(Self {
            repo_kind: kind.to_string(),
            series,
            distribution: distribution.to_string(),
            version: version.to_string(),
        })
    }

    /// Concrete series this target fans out to.
    pub fn series_list<'a>(&'a self, model: &'a SupportedModel) -> Vec<&'a str> {
        match &self.series {
            SeriesSelector::Single(series) => vec![series.as_str()],
            SeriesSelector::Enabled => model.enabled_series().iter().map(String::as_str).collect(),
        }
    }
}

fn unsupported(message: String) -> ConfigError {
    ConfigError::UnsupportedTarget(message)
}
