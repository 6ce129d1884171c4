//! The durable and ephemeral stores side by side.

use serde::{Deserialize, Serialize};

use crate::accessor::{StorageAccessor, PROBE_KEY};
use crate::backend::{
    MemoryStorageBackend, StorageBackend, StorageError, StorageKind, StorageResult,
};
use crate::version::{FormatVersion, VERSION_KEY};

/// Settings fixed when a handler is built
///
/// The two keys must be non-empty and distinct; deserialization and
/// [`StorageHandler::with_settings`] reject anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStorageSettings")]
pub struct StorageSettings {
    /// Version written by `set_format_version` and checked by
    /// `is_outdated_or_not_set`
    pub format_version: FormatVersion,
    /// Reserved key for the version marker
    pub version_key: String,
    /// Sentinel key written and removed by the availability check
    pub probe_key: String,
}

/// Unchecked form used while deserializing
#[derive(Deserialize)]
struct RawStorageSettings {
    #[serde(default)]
    format_version: FormatVersion,
    #[serde(default = "default_version_key")]
    version_key: String,
    #[serde(default = "default_probe_key")]
    probe_key: String,
}

impl TryFrom<RawStorageSettings> for StorageSettings {
    type Error = StorageError;

    fn try_from(raw: RawStorageSettings) -> Result<Self, Self::Error> {
        StorageSettings::new(raw.format_version, raw.version_key, raw.probe_key)
    }
}

fn default_version_key() -> String {
    VERSION_KEY.to_string()
}

fn default_probe_key() -> String {
    PROBE_KEY.to_string()
}

impl StorageSettings {
    /// Build checked settings
    pub fn new(
        format_version: FormatVersion,
        version_key: impl Into<String>,
        probe_key: impl Into<String>,
    ) -> StorageResult<Self> {
        let settings = Self {
            format_version,
            version_key: version_key.into(),
            probe_key: probe_key.into(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check the key invariants.
    ///
    /// The availability check writes and removes its sentinel key, so the
    /// sentinel must never be the version marker's key.
    pub fn validate(&self) -> StorageResult<()> {
        if self.version_key.is_empty() {
            return Err(StorageError::Configuration(
                "version_key must not be empty".to_string(),
            ));
        }
        if self.probe_key.is_empty() {
            return Err(StorageError::Configuration(
                "probe_key must not be empty".to_string(),
            ));
        }
        if self.probe_key == self.version_key {
            return Err(StorageError::Configuration(format!(
                "probe_key and version_key must differ (both are {:?})",
                self.probe_key
            )));
        }
        Ok(())
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            format_version: FormatVersion::CURRENT,
            version_key: default_version_key(),
            probe_key: default_probe_key(),
        }
    }
}

/// A durable store and an ephemeral store sharing one set of settings
#[derive(Debug, Clone)]
pub struct StorageHandler<B> {
    durable: StorageAccessor<B>,
    ephemeral: StorageAccessor<B>,
    settings: StorageSettings,
}

impl<B: StorageBackend> StorageHandler<B> {
    /// Build a handler with default settings
    pub fn new(durable: B, ephemeral: B) -> Self {
        Self::build(durable, ephemeral, StorageSettings::default())
    }

    /// Build a handler with explicit settings, rejecting invalid keys
    pub fn with_settings(
        durable: B,
        ephemeral: B,
        settings: StorageSettings,
    ) -> StorageResult<Self> {
        settings.validate()?;
        Ok(Self::build(durable, ephemeral, settings))
    }

    fn build(durable: B, ephemeral: B, settings: StorageSettings) -> Self {
        Self {
            durable: Self::accessor(durable, StorageKind::Durable, &settings),
            ephemeral: Self::accessor(ephemeral, StorageKind::Ephemeral, &settings),
            settings,
        }
    }

    fn accessor(backend: B, kind: StorageKind, settings: &StorageSettings) -> StorageAccessor<B> {
        StorageAccessor::new(backend, kind)
            .with_format_version(settings.format_version)
            .with_version_key(settings.version_key.clone())
            .with_probe_key(settings.probe_key.clone())
    }

    /// Whether the named store accepts a write/remove cycle right now
    pub fn available(&self, kind: StorageKind) -> bool {
        self.store(kind).is_available()
    }

    /// Accessor for the named store
    pub fn store(&self, kind: StorageKind) -> &StorageAccessor<B> {
        match kind {
            StorageKind::Durable => &self.durable,
            StorageKind::Ephemeral => &self.ephemeral,
        }
    }

    /// Accessor for the durable store
    pub fn durable(&self) -> &StorageAccessor<B> {
        &self.durable
    }

    /// Accessor for the ephemeral store
    pub fn ephemeral(&self) -> &StorageAccessor<B> {
        &self.ephemeral
    }

    /// Settings the handler was built with
    pub fn settings(&self) -> &StorageSettings {
        &self.settings
    }
}

impl StorageHandler<MemoryStorageBackend> {
    /// Two fresh in-memory stores
    pub fn in_memory() -> Self {
        Self::new(MemoryStorageBackend::new(), MemoryStorageBackend::new())
    }
}

#[cfg(feature = "web")]
impl StorageHandler<crate::backend::WebStorageBackend> {
    /// `window.localStorage` and `window.sessionStorage`
    pub fn browser() -> Self {
        use crate::backend::WebStorageBackend;

        Self::new(
            WebStorageBackend::new(StorageKind::Durable),
            WebStorageBackend::new(StorageKind::Ephemeral),
        )
    }

    /// Browser stores with explicit settings
    pub fn browser_with_settings(settings: StorageSettings) -> StorageResult<Self> {
        use crate::backend::WebStorageBackend;

        Self::with_settings(
            WebStorageBackend::new(StorageKind::Durable),
            WebStorageBackend::new(StorageKind::Ephemeral),
            settings,
        )
    }
}
