//! Typed, failure-contained access to one store.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::{StorageBackend, StorageError, StorageKind, StorageResult};
use crate::value::StoredValue;
use crate::version::{FormatVersion, VERSION_KEY};

/// Sentinel written and removed by the availability check
pub const PROBE_KEY: &str = "__storage_test__";

/// Accessor over a single store.
///
/// Keys and values go in as anything `Display`; values come back as
/// [`StoredValue`]. Writes return [`StorageResult`] and never panic, so
/// persistence stays best-effort: check the result or ignore it.
#[derive(Debug, Clone)]
pub struct StorageAccessor<B> {
    backend: B,
    kind: StorageKind,
    format_version: FormatVersion,
    version_key: String,
    probe_key: String,
}

impl<B: StorageBackend> StorageAccessor<B> {
    /// Create an accessor using the current format version and default keys
    pub fn new(backend: B, kind: StorageKind) -> Self {
        Self {
            backend,
            kind,
            format_version: FormatVersion::CURRENT,
            version_key: VERSION_KEY.to_string(),
            probe_key: PROBE_KEY.to_string(),
        }
    }

    /// Use a different format version constant
    pub fn with_format_version(mut self, version: FormatVersion) -> Self {
        self.format_version = version;
        self
    }

    /// Use a different reserved key for the version marker
    pub fn with_version_key(mut self, key: impl Into<String>) -> Self {
        self.version_key = key.into();
        self
    }

    /// Use a different sentinel key for the availability check
    pub fn with_probe_key(mut self, key: impl Into<String>) -> Self {
        self.probe_key = key.into();
        self
    }

    /// Underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Which store this accessor is bound to
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Format version this accessor writes and checks against
    pub fn format_version(&self) -> FormatVersion {
        self.format_version
    }

    /// Check the store with a throwaway write/remove cycle.
    ///
    /// `false` if either step fails (quota of zero, disabled storage, missing
    /// store). An entry already held under the sentinel key is written back
    /// unchanged and kept; otherwise the sentinel is gone afterwards whenever
    /// the removal succeeds.
    pub fn is_available(&self) -> bool {
        let key = self.probe_key.as_str();
        let result = self.backend.get_item(key).and_then(|existing| match existing {
            Some(value) => self.backend.set_item(key, &value),
            None => self
                .backend
                .set_item(key, key)
                .and_then(|()| self.backend.remove_item(key)),
        });

        match result {
            Ok(()) => true,
            Err(e) => {
                debug!(store = self.kind.as_str(), error = %e, "storage availability check failed");
                false
            }
        }
    }

    /// Store `value` under `key`, both converted to text
    pub fn set<K: Display, V: Display>(&self, key: K, value: V) -> StorageResult<()> {
        let key = key.to_string();
        self.backend
            .set_item(&key, &value.to_string())
            .map_err(|e| {
                warn!(store = self.kind.as_str(), key = %key, error = %e, "storage write failed");
                e
            })
    }

    /// Read and decode `key`; a missing key or failed read gives empty text
    pub fn get<K: Display>(&self, key: K) -> StoredValue {
        StoredValue::decode(self.read_raw(&key.to_string()).as_deref())
    }

    /// Delete `key` and return the decoded value it held in this store
    pub fn remove<K: Display>(&self, key: K) -> StorageResult<StoredValue> {
        let key = key.to_string();
        let previous = self.read_raw(&key);

        self.backend.remove_item(&key).map_err(|e| {
            warn!(store = self.kind.as_str(), key = %key, error = %e, "storage remove failed");
            e
        })?;

        Ok(StoredValue::decode(previous.as_deref()))
    }

    /// Whether an entry exists for `key`
    pub fn contains<K: Display>(&self, key: K) -> bool {
        self.read_raw(&key.to_string()).is_some()
    }

    /// Delete every entry in the store
    pub fn clear(&self) -> StorageResult<()> {
        self.backend.clear().map_err(|e| {
            warn!(store = self.kind.as_str(), error = %e, "storage clear failed");
            e
        })
    }

    /// Store a value as JSON
    pub fn set_json<K: Display, T: Serialize + ?Sized>(
        &self,
        key: K,
        value: &T,
    ) -> StorageResult<()> {
        let json =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.set(key, json)
    }

    /// Read a JSON value; `Ok(None)` when the key is missing
    pub fn get_json<K: Display, T: DeserializeOwned>(&self, key: K) -> StorageResult<Option<T>> {
        match self.read_raw(&key.to_string()) {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Deserialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Write the current format version into the reserved key
    pub fn set_format_version(&self) -> StorageResult<()> {
        self.set(&self.version_key, self.format_version)
    }

    /// `true` when the marker is missing, falsy, or older than the current
    /// version. Text that is not numeric never counts as older.
    pub fn is_outdated_or_not_set(&self) -> bool {
        let stored = self.get(&self.version_key);
        !stored.is_truthy() || stored.to_number() < f64::from(self.format_version.get())
    }

    /// Wipe the store and stamp the current version if the marker is stale.
    ///
    /// Returns whether a wipe happened.
    pub fn ensure_format_version(&self) -> StorageResult<bool> {
        if !self.is_outdated_or_not_set() {
            return Ok(false);
        }

        debug!(
            store = self.kind.as_str(),
            version = self.format_version.get(),
            "stored format outdated or missing, resetting store"
        );
        self.clear()?;
        self.set_format_version()?;
        Ok(true)
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(store = self.kind.as_str(), key = %key, error = %e, "storage read failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStorageBackend;

    fn accessor() -> StorageAccessor<MemoryStorageBackend> {
        StorageAccessor::new(MemoryStorageBackend::new(), StorageKind::Durable)
    }

    #[test]
    fn test_set_get_coerces_types() {
        let store = accessor();
        store.set("count", 5).unwrap();
        store.set("flag", true).unwrap();
        store.set("pi", "3.14").unwrap();
        store.set("name", "hello").unwrap();

        assert_eq!(store.get("count"), StoredValue::Number(5.0));
        assert_eq!(store.get("flag"), StoredValue::Bool(true));
        assert_eq!(store.get("pi"), StoredValue::Number(3.14));
        assert_eq!(store.get("name"), StoredValue::Text("hello".to_string()));
        assert_eq!(
            store.backend().get_item("count").unwrap(),
            Some("5".to_string())
        );
    }

    #[test]
    fn test_keys_are_coerced_to_text() {
        let store = accessor();
        store.set(7, "seven").unwrap();
        assert_eq!(store.get("7"), StoredValue::Text("seven".to_string()));
    }

    #[test]
    fn test_get_missing_is_empty_text() {
        let store = accessor();
        assert_eq!(store.get("never"), StoredValue::Text(String::new()));
        assert!(!store.contains("never"));
    }

    #[test]
    fn test_get_on_unavailable_store_is_empty_text() {
        let store = StorageAccessor::new(MemoryStorageBackend::unavailable(), StorageKind::Durable);
        assert_eq!(store.get("anything"), StoredValue::missing());
    }

    #[test]
    fn test_set_failure_is_reported() {
        let store = StorageAccessor::new(MemoryStorageBackend::with_quota(0), StorageKind::Durable);
        assert_eq!(store.set("k", "v"), Err(StorageError::QuotaExceeded));
        assert_eq!(store.get("k"), StoredValue::missing());
    }

    #[test]
    fn test_remove_returns_previous_value() {
        let store = accessor();
        store.set("count", 5).unwrap();
        assert_eq!(store.remove("count").unwrap(), StoredValue::Number(5.0));
        assert_eq!(store.get("count"), StoredValue::Text(String::new()));
        assert_eq!(store.remove("count").unwrap(), StoredValue::missing());
    }

    #[test]
    fn test_remove_failure_is_reported() {
        let store = StorageAccessor::new(MemoryStorageBackend::unavailable(), StorageKind::Ephemeral);
        assert!(matches!(
            store.remove("k"),
            Err(StorageError::Unavailable(_))
        ));
    }

    #[test]
    fn test_availability_leaves_no_sentinel() {
        let store = accessor();
        assert!(store.is_available());
        assert!(store.backend().is_empty().unwrap());
    }

    #[test]
    fn test_unavailable_with_zero_quota() {
        let store = StorageAccessor::new(MemoryStorageBackend::with_quota(0), StorageKind::Durable);
        assert!(!store.is_available());
    }

    #[test]
    fn test_custom_sentinel_key() {
        let store = accessor().with_probe_key("__check__");
        // "__check__" twice is 18 code units
        let tight = StorageAccessor::new(MemoryStorageBackend::with_quota(18), StorageKind::Durable)
            .with_probe_key("__check__");
        assert!(store.is_available());
        assert!(tight.is_available());
    }

    #[test]
    fn test_availability_keeps_user_entry_under_sentinel_key() {
        let store = accessor().with_probe_key("session");
        store.set("session", "abc123").unwrap();

        assert!(store.is_available());
        assert_eq!(store.get("session"), StoredValue::Text("abc123".to_string()));
        assert_eq!(store.backend().len().unwrap(), 1);
    }

    #[test]
    fn test_availability_keeps_marker_under_shared_key() {
        let store = accessor().with_probe_key(VERSION_KEY);
        store.set_format_version().unwrap();

        assert!(store.is_available());
        assert_eq!(store.get(VERSION_KEY), StoredValue::Number(1.0));
        assert!(!store.is_outdated_or_not_set());
    }

    #[test]
    fn test_unavailable_store_with_custom_sentinel() {
        let backend = MemoryStorageBackend::unavailable();
        let store = StorageAccessor::new(backend, StorageKind::Durable).with_probe_key("session");
        assert!(!store.is_available());
    }

    #[test]
    fn test_version_marker_lifecycle() {
        let store = accessor();
        assert!(store.is_outdated_or_not_set());

        store.set_format_version().unwrap();
        assert!(!store.is_outdated_or_not_set());
        assert_eq!(store.get(VERSION_KEY), StoredValue::Number(1.0));
    }

    #[test]
    fn test_version_marker_outdated_cases() {
        let store = accessor().with_format_version(FormatVersion::new(3).unwrap());

        store.set(VERSION_KEY, 2).unwrap();
        assert!(store.is_outdated_or_not_set());

        store.set(VERSION_KEY, 0).unwrap();
        assert!(store.is_outdated_or_not_set());

        store.set(VERSION_KEY, false).unwrap();
        assert!(store.is_outdated_or_not_set());

        store.set(VERSION_KEY, 4).unwrap();
        assert!(!store.is_outdated_or_not_set());

        // Non-numeric text never compares lower
        store.set(VERSION_KEY, "v2").unwrap();
        assert!(!store.is_outdated_or_not_set());
    }

    #[test]
    fn test_true_marker_counts_as_one() {
        let store = accessor();
        store.set(VERSION_KEY, true).unwrap();
        assert!(!store.is_outdated_or_not_set());

        let newer = accessor().with_format_version(FormatVersion::new(2).unwrap());
        newer.set(VERSION_KEY, true).unwrap();
        assert!(newer.is_outdated_or_not_set());
    }

    #[test]
    fn test_custom_version_key() {
        let store = accessor().with_version_key("schema");
        store.set_format_version().unwrap();
        assert!(store.contains("schema"));
        assert!(!store.contains(VERSION_KEY));
        assert!(!store.is_outdated_or_not_set());
    }

    #[test]
    fn test_ensure_format_version_wipes_once() {
        let store = accessor();
        store.set("stale", "data").unwrap();

        assert!(store.ensure_format_version().unwrap());
        assert!(!store.contains("stale"));
        assert!(!store.is_outdated_or_not_set());

        store.set("fresh", "data").unwrap();
        assert!(!store.ensure_format_version().unwrap());
        assert!(store.contains("fresh"));
    }

    #[test]
    fn test_json_helpers() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Draft {
            title: String,
            words: u32,
        }

        let store = accessor();
        let draft = Draft {
            title: "notes".to_string(),
            words: 12,
        };

        store.set_json("draft", &draft).unwrap();
        assert_eq!(store.get_json::<_, Draft>("draft").unwrap(), Some(draft));
        assert_eq!(store.get_json::<_, Draft>("none").unwrap(), None);

        store.set("broken", "{not json").unwrap();
        assert!(matches!(
            store.get_json::<_, Draft>("broken"),
            Err(StorageError::Deserialization(_))
        ));
    }
}
