//! Storage Backend Traits
//!
//! Defines the core trait for string-only key/value stores.

use std::fmt;
use std::rc::Rc;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Error types for storage operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The store rejected the write because its capacity is exhausted
    #[error("Storage quota exceeded")]
    QuotaExceeded,

    /// The store is absent or disabled in this environment
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Access was refused (private browsing, sandboxed frames, policy)
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Invalid handler or backend settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Generic backend error
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Whether this failure is a capacity failure
    pub fn is_quota(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded)
    }
}

/// Which of the two browser stores a backend or accessor is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Origin-scoped storage surviving restarts (`localStorage`)
    Durable,
    /// Storage scoped to one browsing session (`sessionStorage`)
    Ephemeral,
}

impl StorageKind {
    /// Short name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Durable => "durable",
            StorageKind::Ephemeral => "ephemeral",
        }
    }

    /// Name of the matching `window` property
    pub fn window_property(&self) -> &'static str {
        match self {
            StorageKind::Durable => "localStorage",
            StorageKind::Ephemeral => "sessionStorage",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core trait for storage backends
///
/// Mirrors the Web Storage surface: every key and value is a string, and any
/// operation may fail. Calls are synchronous and single-threaded, so there is
/// no `Send`/`Sync` bound (browser handles are not thread-safe).
pub trait StorageBackend {
    /// Get the backend type name (e.g., "memory", "web")
    fn backend_type(&self) -> &'static str;

    /// Read the raw text for `key`, `None` when absent
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write raw text for `key`
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`; deleting an absent key succeeds
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Delete every entry
    fn clear(&self) -> StorageResult<()>;

    /// Number of stored entries
    fn len(&self) -> StorageResult<usize>;

    /// Whether the store holds no entries
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Rc<T> {
    fn backend_type(&self) -> &'static str {
        (**self).backend_type()
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }

    fn len(&self) -> StorageResult<usize> {
        (**self).len()
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Box<T> {
    fn backend_type(&self) -> &'static str {
        (**self).backend_type()
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }

    fn len(&self) -> StorageResult<usize> {
        (**self).len()
    }
}

/// Builder for creating storage backends by name
pub struct StorageBackendBuilder {
    backend_type: String,
    kind: StorageKind,
    quota: Option<usize>,
}

impl StorageBackendBuilder {
    /// Create a new builder
    pub fn new(backend_type: &str) -> Self {
        Self {
            backend_type: backend_type.to_string(),
            kind: StorageKind::Durable,
            quota: None,
        }
    }

    /// Select which store the backend represents
    pub fn with_kind(mut self, kind: StorageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set a capacity in UTF-16 code units (memory backend only)
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Build the storage backend
    pub fn build(self) -> StorageResult<Box<dyn StorageBackend>> {
        match self.backend_type.as_str() {
            "memory" => {
                let backend = match self.quota {
                    Some(quota) => super::MemoryStorageBackend::with_quota(quota),
                    None => super::MemoryStorageBackend::new(),
                };
                Ok(Box::new(backend))
            }
            #[cfg(feature = "web")]
            "web" | "browser" => Ok(Box::new(super::WebStorageBackend::new(self.kind))),
            unknown => Err(StorageError::Configuration(format!(
                "Unknown backend type: {} ({} store)",
                unknown, self.kind
            ))),
        }
    }
}
