//! In-Memory Storage Backend
//!
//! `HashMap`-backed store used off the browser and in tests. It can simulate
//! the failure modes of Web Storage: a capacity quota (Mobile Safari's private
//! mode is a quota of zero) and a store that is absent altogether.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::traits::{StorageBackend, StorageError, StorageResult};

/// In-memory storage backend
#[derive(Debug)]
pub struct MemoryStorageBackend {
    entries: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
    available: Cell<bool>,
}

impl MemoryStorageBackend {
    /// Create an unbounded, available store
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            quota: None,
            available: Cell::new(true),
        }
    }

    /// Create a store whose total size (UTF-16 code units of keys plus
    /// values, as browsers count it) may not exceed `quota`
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new()
        }
    }

    /// Create a store on which every operation fails, like a disabled or
    /// missing `window.localStorage`
    pub fn unavailable() -> Self {
        let backend = Self::new();
        backend.available.set(false);
        backend
    }

    /// Toggle availability at runtime
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    /// Configured quota, if any
    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Current size in UTF-16 code units
    pub fn used(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| entry_size(k, v))
            .sum()
    }

    /// Snapshot of the stored raw text, sorted by key
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        entries
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(StorageError::Unavailable(
                "memory store disabled".to_string(),
            ))
        }
    }
}

impl Default for MemoryStorageBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_size(key: &str, value: &str) -> usize {
    key.encode_utf16().count() + value.encode_utf16().count()
}

impl StorageBackend for MemoryStorageBackend {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_available()?;

        if let Some(quota) = self.quota {
            // Replacing an entry frees its old size first
            let entries = self.entries.borrow();
            let current = self.used()
                - entries
                    .get(key)
                    .map(|old| entry_size(key, old))
                    .unwrap_or(0);
            if current + entry_size(key, value) > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.ensure_available()?;
        self.entries.borrow_mut().clear();
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        self.ensure_available()?;
        Ok(self.entries.borrow().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_basic_operations() {
        let backend = MemoryStorageBackend::new();
        assert_eq!(backend.quota(), None);

        backend.set_item("key", "value").unwrap();
        assert_eq!(backend.get_item("key").unwrap(), Some("value".to_string()));
        assert_eq!(backend.len().unwrap(), 1);

        backend.remove_item("key").unwrap();
        assert_eq!(backend.get_item("key").unwrap(), None);
        assert!(backend.is_empty().unwrap());
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let backend = MemoryStorageBackend::new();
        assert!(backend.remove_item("missing").is_ok());
    }

    #[test]
    fn test_zero_quota_rejects_every_write() {
        let backend = MemoryStorageBackend::with_quota(0);
        assert_eq!(backend.set_item("k", ""), Err(StorageError::QuotaExceeded));
        assert!(backend.is_empty().unwrap());
    }

    #[test]
    fn test_quota_counts_utf16_units() {
        // "ab" + "é€" = 4 code units
        let backend = MemoryStorageBackend::with_quota(4);
        assert_eq!(backend.quota(), Some(4));
        backend.set_item("ab", "é€").unwrap();
        assert_eq!(backend.used(), 4);
        assert_eq!(backend.set_item("c", "d"), Err(StorageError::QuotaExceeded));
    }

    #[test]
    fn test_quota_allows_replacing_entry() {
        let backend = MemoryStorageBackend::with_quota(4);
        backend.set_item("ab", "cd").unwrap();
        backend.set_item("ab", "ef").unwrap();
        assert_eq!(backend.get_item("ab").unwrap(), Some("ef".to_string()));
        assert_eq!(
            backend.set_item("ab", "efg"),
            Err(StorageError::QuotaExceeded)
        );
        // Rejected write leaves the old value in place
        assert_eq!(backend.get_item("ab").unwrap(), Some("ef".to_string()));
    }

    #[test]
    fn test_unavailable_store_fails_everything() {
        let backend = MemoryStorageBackend::unavailable();
        assert!(matches!(
            backend.get_item("k"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(backend.set_item("k", "v").is_err());
        assert!(backend.remove_item("k").is_err());
        assert!(backend.clear().is_err());

        backend.set_available(true);
        assert!(backend.set_item("k", "v").is_ok());
    }

    #[test]
    fn test_snapshot_sorted() {
        let backend = MemoryStorageBackend::new();
        backend.set_item("b", "2").unwrap();
        backend.set_item("a", "1").unwrap();
        assert_eq!(
            backend.snapshot(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }
}
