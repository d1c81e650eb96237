//! Double configuration via `doubles.toml`
//!
//! Test suites keep their defaults for new definitions in a small TOML
//! file next to the tests. Definitions built through a factory (or with
//! [`EntityDoubleDefinitionBuilder::with_config`]) start from these values.
//!
//! [`EntityDoubleDefinitionBuilder::with_config`]: crate::definition::EntityDoubleDefinitionBuilder::with_config

use crate::error::{DoubleError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally placed in a test directory.
pub const CONFIG_FILE_NAME: &str = "doubles.toml";

/// Defaults applied to new definitions.
///
/// # Example
///
/// ```toml
/// # Return neutral defaults for unimplemented methods (default: false)
/// lenient = false
///
/// # Allow field writes on produced doubles (default: false)
/// mutable = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleConfig {
    /// Default for the lenient flag.
    #[serde(default)]
    pub lenient: bool,
    /// Default for the mutable flag.
    #[serde(default)]
    pub mutable: bool,
}

impl DoubleConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Entity double defaults
#
# Lenient doubles return a neutral default (null, false, 0, "", [] or {})
# for methods that no override or resolver implements, instead of failing.
# Guardrailed methods such as save() still fail.
lenient = false

# Mutable doubles accept field writes; reads see the latest write.
mutable = false
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            DoubleError::configuration(format!("Failed to parse double config: {}", e))
        })
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DoubleError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                DoubleError::configuration(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}
