//! Deployment settings stored beside the taxonomy in the `model` section.
//!
//! Only the non-secret storage location is modeled. Values from the document
//! can be replaced by `S3_*` environment variables; an unset or empty
//! variable leaves the document value alone.

use serde::{Deserialize, Serialize};
use std::env;

pub const ENV_REGION: &str = "S3_REGION";
pub const ENV_ENDPOINT_URL: &str = "S3_URL";
pub const ENV_BUCKET: &str = "S3_BUCKET";
pub const ENV_BASE_PATH: &str = "S3_BASE_PATH";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
}

impl StorageSettings {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let slots: [(&str, &mut Option<String>); 4] = [
            (ENV_REGION, &mut self.region),
            (ENV_ENDPOINT_URL, &mut self.endpoint_url),
            (ENV_BUCKET, &mut self.bucket_name),
            (ENV_BASE_PATH, &mut self.base_path),
        ];
        for (key, slot) in slots {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                tracing::debug!(variable = key, "storage setting overridden from environment");
                *slot = Some(value);
            }
        }
    }

    /// Prefix inside the bucket; `None` when unset or empty.
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref().filter(|p| !p.is_empty())
    }
}
