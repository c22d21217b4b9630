//! Configuration via `tessera.toml`
//!
//! Every setting has a default, so an empty (or absent) file is a valid
//! configuration. Settings are read once at startup.

use crate::projection::DEFAULT_MAX_PUSHDOWN_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_core::{Error, Limits, Result};

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "tessera.toml";

/// What a query does when a predicate cannot be pushed down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Decode every row and filter in process
    #[default]
    Automatic,
    /// Return the pushdown error to the caller
    Explicit,
}

/// Configuration loaded from `tessera.toml`.
///
/// # Example
///
/// ```toml
/// # "automatic" (default) or "explicit"
/// fallback = "automatic"
///
/// # Deepest field path compiled for storage-side evaluation
/// max_pushdown_depth = 2
///
/// [limits]
/// max_text_bytes = 65536
/// max_encoded_bytes = 1048576
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TesseraConfig {
    /// Behavior when pushdown is unsupported.
    #[serde(default)]
    pub fallback: FallbackPolicy,
    /// Deepest path compiled for pushdown.
    #[serde(default = "default_max_pushdown_depth")]
    pub max_pushdown_depth: usize,
    /// Codec size limits.
    #[serde(default)]
    pub limits: Limits,
}

fn default_max_pushdown_depth() -> usize {
    DEFAULT_MAX_PUSHDOWN_DEPTH
}

impl Default for TesseraConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackPolicy::default(),
            max_pushdown_depth: default_max_pushdown_depth(),
            limits: Limits::default(),
        }
    }
}

impl TesseraConfig {
    /// Check that the values are usable.
    ///
    /// # Errors
    ///
    /// Returns `Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.max_pushdown_depth == 0 {
            return Err(Error::config("max_pushdown_depth must be at least 1"));
        }
        self.limits.validate().map_err(Error::config)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Tessera configuration
#
# What a query does when a predicate cannot be evaluated by storage:
#   "automatic" = decode every row and filter in process (default)
#   "explicit"  = return the error to the caller
fallback = "automatic"

# Deepest field path compiled for storage-side evaluation (default: 2).
# "amount" has depth 1, "owner.first" has depth 2.
max_pushdown_depth = 2

[limits]
# Maximum length of a single text field in bytes (default: 64KB)
max_text_bytes = 65536
# Maximum length of an encoded value in bytes (default: 1MB)
max_encoded_bytes = 1048576
"#
    }

    /// Parse and validate config text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TesseraConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("invalid tessera config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read, parsed, or holds an
    /// invalid value.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{} ({})", msg, path.display())),
            other => other,
        })
    }

    /// Load `tessera.toml` from `dir`, or the defaults if it does not exist.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        std::fs::write(path, Self::default_toml())
            .map_err(|e| Error::config(format!("cannot create {}: {e}", path.display())))
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("tessera config is not representable as TOML: {e}")))?;
        std::fs::write(path, text).map_err(|e| Error::config(format!("cannot write {}: {e}", path.display())))
    }
}
