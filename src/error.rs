use serde_json::error::Category;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced while loading or querying the repository taxonomy.
///
/// Nothing is retried internally; callers halt startup or reject the request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration document: {0}")]
    MalformedInput(String),

    #[error("configuration failed schema validation: {0}")]
    SchemaValidation(String),

    #[error("distribution '{0}' is not supported")]
    NotFound(String),

    #[error("{0}")]
    UnsupportedTarget(String),

    #[error("the \"{filename}\" file does not match the type of files used in the {base}-based repositories")]
    UnsupportedFile { filename: String, base: String },

    #[error("reading configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file does not exist; set RWS_CFG to the path of the JSON document")]
    NotConfigured,
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

impl ConfigError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        ConfigError::SchemaValidation(message.into())
    }

    /// Sort a serde_json failure into the malformed/schema split.
    ///
    /// Syntax and EOF errors mean the bytes were never well-formed JSON;
    /// data errors mean the JSON parsed but had the wrong shape.
    pub(crate) fn from_json(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Syntax | Category::Eof | Category::Io => {
                ConfigError::MalformedInput(err.to_string())
            }
            Category::Data => ConfigError::SchemaValidation(err.to_string()),
        }
    }
}
