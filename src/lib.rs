//! Supported-repository taxonomy for the repository web service.
//!
//! The service reads one JSON document naming the repository kinds, product
//! series and target distributions it accepts uploads for. `ConfigStore`
//! loads that document once, validates it, and answers read-only queries;
//! `target` and `layout` build on it to check upload paths and compute where
//! package files belong.

use std::env;
use std::path::{Path, PathBuf};

pub mod error;
pub mod layout;
pub mod model;
pub mod schema;
pub mod settings;
pub mod store;
pub mod target;

pub use error::{ConfigError, Result};
pub use layout::{
    ALLOWED_EXTENSIONS, Placement, PlacementAction, PlannedFile, UploadPlan, distribution_path,
    is_allowed_filename, place_file, plan_upload, sync_prefixes,
};
pub use model::{DistributionSpec, PackageBase};
pub use settings::StorageSettings;
pub use store::{ConfigStore, ENABLED_SERIES_ALIAS, SupportedModel};
pub use target::{SeriesSelector, UploadTarget};

/// Environment variable naming the configuration document.
pub const ENV_CONFIG_PATH: &str = "RWS_CFG";

/// Bundled example document, relative to the repository root.
pub const DEFAULT_CONFIG_PATH: &str = "config/supported_repos.json";

fn existing_file(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    let candidate = Path::new(raw);
    candidate.is_file().then(|| candidate.to_path_buf())
}

/// Locate the configuration document named by `RWS_CFG`.
pub fn find_config_path() -> Result<PathBuf> {
    let raw = env::var(ENV_CONFIG_PATH).map_err(|_| ConfigError::NotConfigured)?;
    existing_file(&raw).ok_or_else(|| {
        tracing::debug!(path = %raw, "RWS_CFG does not name a file");
        ConfigError::NotConfigured
    })
}
