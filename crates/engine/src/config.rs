//! Engine configuration via `schemata.toml`
//!
//! On first start a default `schemata.toml` is written next to the data the
//! engine serves. To change settings, edit the file and restart.

use schemata_core::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "schemata.toml";

/// Engine configuration loaded from `schemata.toml`.
///
/// # Example
///
/// ```toml
/// # Keep loaded type descriptions in memory (default: true)
/// cache_enabled = true
///
/// # Extract text from documents built from raw bytes (default: true)
/// extract_document_text = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Keep loaded types in the schema cache.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    /// Run text extraction for documents built from raw bytes.
    #[serde(default = "default_true")]
    pub extract_document_text: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            extract_document_text: true,
        }
    }
}

impl EngineConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Schemata engine configuration
#
# Keep loaded type descriptions in memory (default: true).
# The cache is cleared in full whenever an alter commits.
cache_enabled = true

# Extract text from documents built from raw bytes (default: true).
# When false, such documents get an empty text.
extract_document_text = true
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns a `config` error if the file cannot be read or parsed, or
    /// contains unknown keys.
    pub fn from_file(path: &Path) -> SchemaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SchemaError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            SchemaError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        info!(
            target: "schemata::config",
            path = %path.display(),
            cache_enabled = config.cache_enabled,
            extract_document_text = config.extract_document_text,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> SchemaResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                SchemaError::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            info!(target: "schemata::config", path = %path.display(), "Wrote default configuration");
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> SchemaResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SchemaError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            SchemaError::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load `schemata.toml` from `dir`, writing the default first if missing.
    pub fn load_or_init(dir: &Path) -> SchemaResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        Self::write_default_if_missing(&path)?;
        Self::from_file(&path)
    }
}
