//! Repository tree layout.
//!
//! Pure path arithmetic over the taxonomy: where a package file lands inside
//! a repository, which repositories need their metadata regenerated after an
//! upload, and which prefixes a full metadata sync walks. Nothing here touches
//! storage.

use crate::error::{ConfigError, Result};
use crate::model::PackageBase;
use crate::store::ConfigStore;
use crate::target::UploadTarget;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Extensions accepted for upload, dot included.
pub const ALLOWED_EXTENSIONS: [&str; 5] = [".rpm", ".deb", ".dsc", ".xz", ".gz"];

const RPM_BINARY_SUFFIXES: [&str; 2] = [".x86_64.rpm", ".noarch.rpm"];
const RPM_SOURCE_SUFFIX: &str = ".src.rpm";
const DEB_SUFFIXES: [&str; 4] = [".deb", ".dsc", ".tar.xz", ".tar.gz"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Root of the repository whose metadata covers the file.
    pub repo_path: String,
    /// Full object key of the file.
    pub object_path: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum PlacementAction {
    Upload,
    /// Copy an object already placed earlier in the same plan.
    CopyFrom(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub series: String,
    pub filename: String,
    #[serde(flatten)]
    pub placement: Placement,
    pub action: PlacementAction,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UploadPlan {
    pub files: Vec<PlannedFile>,
    /// Repositories touched by the plan, first-touch order, no repeats.
    pub repos_to_sync: Vec<String>,
}

/// True when `filename` has one of [`ALLOWED_EXTENSIONS`].
pub fn is_allowed_filename(filename: &str) -> bool {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => {
            let ext = &filename[idx..];
            ALLOWED_EXTENSIONS.iter().any(|allowed| *allowed == ext)
        }
        _ => false,
    }
}

/// `[base_path/]kind/series/distro`, skipping an empty base path.
pub fn distribution_path(
    base_path: Option<&str>,
    repo_kind: &str,
    series: &str,
    distribution: &str,
) -> String {
    let mut parts = Vec::with_capacity(4);
    if let Some(base) = base_path.filter(|b| !b.is_empty()) {
        parts.push(base);
    }
    parts.extend([repo_kind, series, distribution]);
    parts.join("/")
}

/// Where `filename` goes inside the distribution tree rooted at `dist_path`.
pub fn place_file(
    dist_path: &str,
    version: &str,
    base: PackageBase,
    filename: &str,
) -> Result<Placement> {
    match base {
        PackageBase::Rpm => {
            let arch_dir = if has_suffix(filename, &RPM_BINARY_SUFFIXES) {
                "x86_64"
            } else if has_suffix(filename, &[RPM_SOURCE_SUFFIX]) {
                "SRPMS"
            } else {
                return Err(unsupported_file(filename, base));
            };
            let repo_path = format!("{dist_path}/{version}/{arch_dir}");
            let object_path = format!("{repo_path}/Packages/{filename}");
            Ok(Placement {
                repo_path,
                object_path,
            })
        }
        PackageBase::Deb => {
            if !has_suffix(filename, &DEB_SUFFIXES) {
                return Err(unsupported_file(filename, base));
            }
            // Debian pool layout: pool/<dist>/main/<initial>/<source>/<file>.
            let initial = filename.chars().next().map(String::from).unwrap_or_default();
            let source = filename.split('_').next().unwrap_or(filename);
            Ok(Placement {
                repo_path: dist_path.to_string(),
                object_path: format!(
                    "{dist_path}/pool/{version}/main/{initial}/{source}/{filename}"
                ),
            })
        }
    }
}

/// Lay out `filenames` for every series the target fans out to.
///
/// The first placement of a filename is an upload; later series copy that
/// object instead of uploading the same bytes again.
pub fn plan_upload(
    store: &ConfigStore,
    target: &UploadTarget,
    filenames: &[&str],
) -> Result<UploadPlan> {
    if let Some(bad) = filenames.iter().find(|f| !is_allowed_filename(f)) {
        return Err(ConfigError::UnsupportedTarget(format!(
            "Invalid filename \"{bad}\". Allowed file extensions: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let model = store.model();
    let spec = model.get_distribution(&target.distribution)?;
    let base_path = store.storage().base_path();

    let mut plan = UploadPlan::default();
    let mut origins: BTreeMap<&str, String> = BTreeMap::new();
    for series in target.series_list(model) {
        let dist_path = distribution_path(base_path, &target.repo_kind, series, &target.distribution);
        for filename in filenames {
            let placement = place_file(&dist_path, &target.version, spec.base, filename)?;
            let action = match origins.entry(*filename) {
                Entry::Occupied(origin) => PlacementAction::CopyFrom(origin.get().clone()),
                Entry::Vacant(slot) => {
                    slot.insert(placement.object_path.clone());
                    PlacementAction::Upload
                }
            };
            if !plan.repos_to_sync.contains(&placement.repo_path) {
                plan.repos_to_sync.push(placement.repo_path.clone());
            }
            plan.files.push(PlannedFile {
                series: series.to_string(),
                filename: filename.to_string(),
                placement,
                action,
            });
        }
    }
    Ok(plan)
}

/// Every repository prefix a full metadata sync would inspect.
///
/// Deb distributions keep one archive root for all releases; rpm releases
/// each own a directory holding per-arch repositories.
pub fn sync_prefixes(store: &ConfigStore) -> Vec<String> {
    let model = store.model();
    let base_path = store.storage().base_path();
    let mut prefixes = Vec::new();
    for kind in model.repo_kinds() {
        for series in model.series() {
            for (name, spec) in model.distributions() {
                let dist_path = distribution_path(base_path, kind, series, name);
                match spec.base {
                    PackageBase::Deb => prefixes.push(format!("{dist_path}/")),
                    PackageBase::Rpm => prefixes.extend(
                        spec.versions
                            .iter()
                            .map(|version| format!("{dist_path}/{version}/")),
                    ),
                }
            }
        }
    }
    prefixes
}

// The stem may be empty: `.x86_64.rpm` is placed like any other binary rpm.
fn has_suffix(filename: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|suffix| filename.ends_with(suffix))
}

fn unsupported_file(filename: &str, base: PackageBase) -> ConfigError {
    ConfigError::UnsupportedFile {
        filename: filename.to_string(),
        base: base.to_string(),
    }
}
