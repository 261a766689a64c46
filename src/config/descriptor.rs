//! Service descriptor loading
//!
//! The descriptor names the service being announced. It is read once at
//! startup from `$CONFIG_PATH` (default `service.json`). Files ending in
//! `.toml` are parsed as TOML; everything else is parsed as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::ConfigError;

/// Static description of the running service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl ServiceDescriptor {
    /// Load and validate a descriptor from a JSON or TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let descriptor = Self::parse(path, &contents)?;
        descriptor.validate()?;

        info!(
            path = %path.display(),
            name = %descriptor.name,
            version = %descriptor.version,
            "Loaded service descriptor"
        );
        Ok(descriptor)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(contents)
                .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))
        } else {
            serde_json::from_str(contents)
                .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))
        }
    }

    /// Every field is required and must contain more than whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("name", &self.name),
            ("description", &self.description),
            ("version", &self.version),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }
        Ok(())
    }
}

/// Load the service descriptor from `path`.
pub fn load_descriptor(path: &Path) -> Result<ServiceDescriptor, ConfigError> {
    ServiceDescriptor::load_from_file(path)
}
