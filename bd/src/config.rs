//! Badge coordinator configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = ".badgedisplay.yml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Persistence of badge state across restarts
    pub persistence: PersistenceConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.persistence.enabled && self.persistence.storage_key.trim().is_empty() {
            return Err(eyre::eyre!("persistence.storage-key must not be empty"));
        }
        Ok(())
    }

    /// Load configuration from `config_path`, or search the default
    /// candidates when no path is given
    ///
    /// An explicit path must exist and parse; searched candidates that fail
    /// are skipped.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path).with_context(|| format!("Failed to load config from {}", path.display())),
            None => Ok(Self::load_first(&Self::search_paths())),
        }
    }

    /// Candidate config files, most specific first: `.badgedisplay.yml` in
    /// the working directory, then `<config_dir>/badgedisplay/badgedisplay.yml`
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("badgedisplay").join("badgedisplay.yml"));
        }
        paths
    }

    /// First candidate that exists and is a valid config, else defaults
    pub fn load_first<P: AsRef<Path>>(candidates: &[P]) -> Self {
        for candidate in candidates {
            let path = candidate.as_ref();
            if !path.is_file() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => warn!(path = %path.display(), error = %e, "Config::load_first: skipping config"),
            }
        }
        debug!(candidates = candidates.len(), "Config::load_first: no usable config file, using defaults");
        Self::default()
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        info!(path = %path.display(), "Config::load: loaded");
        Ok(config)
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Whether badge state is persisted at all
    pub enabled: bool,

    /// Key the record document is stored under
    #[serde(rename = "storage-key")]
    pub storage_key: String,

    /// Directory of the file-backed settings store
    #[serde(rename = "store-path")]
    pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("badgedisplay")
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            storage_key: crate::DEFAULT_STORAGE_KEY.to_string(),
            store_path: default_store_path(),
        }
    }
}
