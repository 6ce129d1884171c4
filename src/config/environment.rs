//! Environment variable loading and management.
//!
//! Only host-level overrides live here; everything else comes from the TOML
//! configuration.

use std::env;
use std::path::Path;

/// Loads environment variables from .env file and system environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    env_file: Option<String>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to .env file. Nothing is loaded unless a path is given.
    pub fn new(env_file: Option<&Path>) -> Self {
        // Only load a .env file if an explicit path was provided. This avoids
        // picking up repository .env files during unit tests.
        if let Some(path) = env_file {
            if path.exists() {
                if let Err(e) = dotenv::from_path(path) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load .env file");
                }
            }
        }

        Self {
            env_file: env_file.map(|p| p.to_string_lossy().to_string()),
        }
    }

    /// The .env file this loader was created with
    pub fn env_file(&self) -> Option<&str> {
        self.env_file.as_deref()
    }

    /// Raw `STORAGE_FORMAT_VERSION` override
    pub fn format_version(&self) -> Option<String> {
        env::var("STORAGE_FORMAT_VERSION").ok()
    }

    /// Raw `STORAGE_BACKEND` override ("web", "memory")
    pub fn backend_type(&self) -> Option<String> {
        env::var("STORAGE_BACKEND").ok()
    }
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
