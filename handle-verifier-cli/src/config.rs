//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use handle_verifier_core::services::DEFAULT_FIELD_ID;
use handle_verifier_provider::DirectoryConfig;
use serde::Deserialize;

/// Config file size limit
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Contents of `config.json`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub directory: DirectoryConfig,
    pub field_id: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            directory: DirectoryConfig::default(),
            field_id: DEFAULT_FIELD_ID.to_string(),
        }
    }
}

/// Command-line values that win over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub scheme: Option<String>,
    pub max_retries: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub field_id: Option<String>,
}

impl CliConfig {
    /// Platform config location:
    /// - Linux: `~/.config/handle-verifier/config.json`
    /// - macOS: `~/Library/Application Support/handle-verifier/config.json`
    /// - Windows: `%APPDATA%\handle-verifier\config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("handle-verifier").join("config.json"))
    }

    /// Load from `explicit` if given (it must exist), else from the default
    /// location if a file is there, else use defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                tracing::debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            anyhow::bail!(
                "Config file too large: {} bytes (max: {MAX_CONFIG_FILE_SIZE} bytes)",
                metadata.len()
            );
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_json(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(scheme) = overrides.scheme {
            self.directory.scheme = scheme;
        }
        if let Some(retries) = overrides.max_retries {
            self.directory.max_retries = retries;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.directory.request_timeout_secs = secs;
        }
        if let Some(field_id) = overrides.field_id {
            self.field_id = field_id;
        }
        self
    }
}
