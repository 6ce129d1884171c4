//! TOML configuration parsing and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::environment::EnvironmentLoader;
use crate::backend::{StorageBackend, StorageBackendBuilder, StorageKind, StorageResult};
use crate::handler::{StorageHandler, StorageSettings};
use crate::version::FormatVersion;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Marker and sentinel settings shared by both stores
    #[serde(default)]
    pub storage: StorageSettings,
    /// Which backend to build for each store
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Backend selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend name understood by [`StorageBackendBuilder`] ("web", "memory")
    #[serde(rename = "type", default = "default_backend_type")]
    pub backend_type: String,
    /// Capacity in UTF-16 code units for the memory backend
    pub quota: Option<usize>,
}

fn default_backend_type() -> String {
    if cfg!(feature = "web") {
        "web".to_string()
    } else {
        "memory".to_string()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_type: default_backend_type(),
            quota: None,
        }
    }
}

/// Loads and manages TOML configuration.
#[derive(Debug)]
pub struct ConfigurationLoader {
    /// Path the configuration was (or would have been) read from
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to TOML config file. If None, uses
    ///   `config/storage.toml`; a missing file yields the defaults.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("config/storage.toml"));

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            Configuration::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a configuration loader from a pre-built Configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config_path: PathBuf::from("config/storage.toml"),
            config,
        }
    }

    /// Load configuration from TOML file.
    fn load_config(path: &Path) -> Result<Configuration> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Apply overrides from the environment.
    pub fn apply_environment(&mut self, env: &EnvironmentLoader) -> Result<()> {
        if let Some(raw) = env.format_version() {
            let parsed: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("STORAGE_FORMAT_VERSION is not an integer: {}", raw))?;
            self.config.storage.format_version = FormatVersion::new(parsed)
                .context("STORAGE_FORMAT_VERSION must be at least 1")?;
        }

        if let Some(backend_type) = env.backend_type() {
            self.config.backend.backend_type = backend_type;
        }

        self.config
            .storage
            .validate()
            .context("Invalid [storage] settings")?;

        Ok(())
    }

    /// Get configuration value by dot-notation key.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match key {
            "storage.format_version" => Some(self.config.storage.format_version.to_string()),
            "storage.version_key" => Some(self.config.storage.version_key.clone()),
            "storage.probe_key" => Some(self.config.storage.probe_key.clone()),
            "backend.type" => Some(self.config.backend.backend_type.clone()),
            "backend.quota" => self.config.backend.quota.map(|q| q.to_string()),
            _ => None,
        }
    }

    /// Build both backends and the handler described by this configuration.
    pub fn build_handler(&self) -> StorageResult<StorageHandler<Box<dyn StorageBackend>>> {
        let durable = self.backend_builder(StorageKind::Durable).build()?;
        let ephemeral = self.backend_builder(StorageKind::Ephemeral).build()?;
        StorageHandler::with_settings(durable, ephemeral, self.config.storage.clone())
    }

    fn backend_builder(&self, kind: StorageKind) -> StorageBackendBuilder {
        let builder = StorageBackendBuilder::new(&self.config.backend.backend_type).with_kind(kind);
        match self.config.backend.quota {
            Some(quota) => builder.with_quota(quota),
            None => builder,
        }
    }
}
