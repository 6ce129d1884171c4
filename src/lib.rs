//! Storage Handler - defensive accessors over browser key/value storage
//!
//! Web Storage only holds strings and may refuse any write (quota exhausted,
//! private browsing, storage disabled). This crate wraps both browser stores
//! behind one accessor type that:
//!
//! - **checks** whether a store is usable at all;
//! - **contains failures**: writes return a [`StorageResult`], nothing panics;
//! - **decodes** stored text back into booleans, numbers or text
//!   ([`StoredValue`]);
//! - keeps a **format-version marker** so callers can wipe stale data after a
//!   breaking change.
//!
//! # Features
//!
//! - **`web`** - `window.localStorage` / `window.sessionStorage` via `web-sys`
//! - **`config`** - TOML configuration and `.env` overrides
//!
//! ```toml
//! [dependencies]
//! storage-handler = { version = "0.1", features = ["web"] }
//! ```
//!
//! # Example
//!
//! ```
//! use storage_handler::{StorageHandler, StorageKind, StoredValue};
//!
//! let handler = StorageHandler::in_memory();
//! assert!(handler.available(StorageKind::Durable));
//!
//! let local = handler.durable();
//! if local.is_outdated_or_not_set() {
//!     local.clear().ok();
//!     local.set_format_version().ok();
//! }
//!
//! local.set("count", 5).ok();
//! local.set("flag", true).ok();
//! assert_eq!(local.get("count"), StoredValue::Number(5.0));
//! assert_eq!(local.get("flag"), StoredValue::Bool(true));
//! assert_eq!(local.get("missing"), StoredValue::Text(String::new()));
//! ```
//!
//! In the browser, build the handler with `StorageHandler::browser()`.

#![warn(missing_docs)]

pub mod accessor;
pub mod backend;
pub mod handler;
pub mod value;
pub mod version;

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

pub use accessor::{StorageAccessor, PROBE_KEY};
pub use backend::{
    MemoryStorageBackend, StorageBackend, StorageBackendBuilder, StorageError, StorageKind,
    StorageResult,
};
#[cfg(feature = "web")]
pub use backend::WebStorageBackend;
pub use handler::{StorageHandler, StorageSettings};
pub use value::StoredValue;
pub use version::{FormatVersion, VERSION_KEY};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        FormatVersion, StorageAccessor, StorageBackend, StorageError, StorageHandler, StorageKind,
        StorageResult, StoredValue,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{Configuration, ConfigurationLoader, EnvironmentLoader};
}
