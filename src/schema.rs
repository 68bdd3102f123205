//! JSON Schema contract for the configuration document.
//!
//! The schema ships inside the binary (`schema/supported_repos.schema.json`)
//! and is checked before typed deserialization so every shape violation is
//! reported at once, each with the JSON pointer of the offending value.
//! Cross-reference rules that JSON Schema cannot express live in `store`.

use crate::error::{ConfigError, Result};
use jsonschema::JSONSchema;
use serde_json::Value;

/// Raw text of the bundled document schema.
pub const DOCUMENT_SCHEMA: &str = include_str!("../schema/supported_repos.schema.json");

/// Validate a parsed document against the bundled schema.
pub fn validate_document(instance: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(DOCUMENT_SCHEMA)
        .map_err(|err| ConfigError::schema(format!("bundled schema is not valid JSON: {err}")))?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| ConfigError::schema(format!("compiling bundled schema: {err}")))?;

    if let Err(errors) = compiled.validate(instance) {
        let details = errors
            .map(|err| {
                let pointer = err.instance_path.to_string();
                let location = if pointer.is_empty() { "/" } else { pointer.as_str() };
                format!("{location}: {err}")
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::schema(details));
    }

    Ok(())
}
