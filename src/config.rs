use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::deserialize_duration;

/// Default per-attempt budget for upstream holdings sources.
fn default_attempt_timeout() -> Duration {
    Duration::from_secs(2)
}

/// Holdings-source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Base URL of the structured portfolio API (primary source).
    pub primary_url: Option<String>,

    /// Base URL of the legacy portfolio API (secondary source).
    pub legacy_url: Option<String>,

    /// How long each source attempt may run before the selector
    /// advances to the next source.
    #[serde(
        default = "default_attempt_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub attempt_timeout: Duration,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary_url: None,
            legacy_url: None,
            attempt_timeout: default_attempt_timeout(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from config file location.
    /// If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    /// Holdings-source settings.
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            sources: SourcesConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the data directory path.
    ///
    /// If `data_dir` is set and relative, it's resolved relative to `config_dir`.
    /// If `data_dir` is not set, returns `config_dir`.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The resolved data directory path.
    pub data_dir: PathBuf,

    /// Holdings-source settings.
    pub sources: SourcesConfig,
}

impl ResolvedConfig {
    /// Load and resolve configuration from a config file path.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

        Ok(Self {
            data_dir: config.resolve_data_dir(config_dir),
            sources: config.sources,
        })
    }
}
