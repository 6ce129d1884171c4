//! Configuration management for storage handlers.
//!
//! This module provides configuration loading through TOML files and
//! environment variable overrides via `.env` files.
//!
//! # Example
//!
//! ```no_run
//! use storage_handler::config::{ConfigurationLoader, EnvironmentLoader};
//! use storage_handler::StorageKind;
//! use std::path::Path;
//!
//! let env = EnvironmentLoader::new(Some(Path::new(".env")));
//!
//! let mut loader = ConfigurationLoader::new(Some(Path::new("config/storage.toml"))).unwrap();
//! loader.apply_environment(&env).unwrap();
//!
//! let handler = loader.build_handler().unwrap();
//! if handler.available(StorageKind::Durable) && handler.durable().is_outdated_or_not_set() {
//!     handler.durable().clear().ok();
//!     handler.durable().set_format_version().ok();
//! }
//! ```

pub mod config;
pub mod environment;

// Re-export main types for convenience
pub use self::config::{BackendConfig, Configuration, ConfigurationLoader};
pub use self::environment::EnvironmentLoader;
