#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::NamedTempFile;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn bundled_config() -> PathBuf {
    repo_root().join(rws_config::DEFAULT_CONFIG_PATH)
}

// Small document covering both packaging families, used where the bundled
// config would make assertions brittle. Kept as text: tests that depend on
// distribution order must load these exact bytes, since a `Value` object
// re-serializes with sorted keys.
pub const SAMPLE_DOCUMENT: &str = r#"{
  "model": {
    "supported_repos": {
      "repo_kind": ["live", "release"],
      "tarantool_series": ["1.10", "2.8", "3.0"],
      "enabled": ["1.10", "2.8"],
      "distrs": {
        "fedora": {"base": "rpm", "versions": ["33", "34"]},
        "debian": {"base": "deb", "versions": ["bullseye", "buster"]}
      }
    },
    "base_path": "tarantool"
  }
}"#;

// Editable copy of `SAMPLE_DOCUMENT` for order-insensitive mutations.
pub fn sample_document() -> Value {
    serde_json::from_str(SAMPLE_DOCUMENT).expect("sample document is valid JSON")
}

pub fn write_document(value: &Value) -> Result<NamedTempFile> {
    write_raw(value.to_string().as_bytes())
}

pub fn write_raw(bytes: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("failed to allocate config file")?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

// Runs the CLI with a clean view of the variables it reads.
pub fn run_cli(config: Option<&Path>, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rws-config"));
    for var in [
        "RWS_CFG",
        "S3_REGION",
        "S3_URL",
        "S3_BUCKET",
        "S3_BASE_PATH",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    if let Some(path) = config {
        cmd.arg("--config").arg(path);
    }
    cmd.args(args);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().context("failed to execute rws-config")
}
