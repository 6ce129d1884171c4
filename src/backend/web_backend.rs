//! Browser Web Storage Backend
//!
//! Wraps `window.localStorage` / `window.sessionStorage` through `web_sys`.
//! Obtaining the handle can itself throw (sandboxed iframes, disabled
//! cookies), so a missing handle is kept as a backend that fails every call.

use wasm_bindgen::{JsCast, JsValue};

use super::traits::{StorageBackend, StorageError, StorageKind, StorageResult};

/// Web Storage backend bound to one of the two browser stores
#[derive(Debug, Clone)]
pub struct WebStorageBackend {
    kind: StorageKind,
    storage: Option<web_sys::Storage>,
}

impl WebStorageBackend {
    /// Look up the store for `kind` on the global `window`
    pub fn new(kind: StorageKind) -> Self {
        let storage = web_sys::window().and_then(|window| {
            let lookup = match kind {
                StorageKind::Durable => window.local_storage(),
                StorageKind::Ephemeral => window.session_storage(),
            };
            match lookup {
                Ok(storage) => storage,
                Err(err) => {
                    tracing::debug!(
                        store = kind.as_str(),
                        error = %map_js_error(&err),
                        "storage handle lookup threw"
                    );
                    None
                }
            }
        });

        Self { kind, storage }
    }

    fn storage(&self) -> StorageResult<&web_sys::Storage> {
        self.storage.as_ref().ok_or_else(|| {
            StorageError::Unavailable(format!(
                "window.{} is not accessible",
                self.kind.window_property()
            ))
        })
    }
}

impl StorageBackend for WebStorageBackend {
    fn backend_type(&self) -> &'static str {
        "web"
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?.get_item(key).map_err(|e| map_js_error(&e))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| map_js_error(&e))
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.storage()?.remove_item(key).map_err(|e| map_js_error(&e))
    }

    fn clear(&self) -> StorageResult<()> {
        self.storage()?.clear().map_err(|e| map_js_error(&e))
    }

    fn len(&self) -> StorageResult<usize> {
        self.storage()?
            .length()
            .map(|n| n as usize)
            .map_err(|e| map_js_error(&e))
    }
}

/// Convert a thrown JS value into a [`StorageError`]
fn map_js_error(err: &JsValue) -> StorageError {
    match err.dyn_ref::<web_sys::DomException>() {
        Some(exception) => classify_dom_exception(&exception.name(), &exception.message()),
        None => StorageError::Backend(
            err.as_string()
                .unwrap_or_else(|| format!("{:?}", err)),
        ),
    }
}

/// Map a `DOMException` name to an error variant
fn classify_dom_exception(name: &str, message: &str) -> StorageError {
    match name {
        // Firefox used its own name before standardising
        "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED" => StorageError::QuotaExceeded,
        "SecurityError" => StorageError::PermissionDenied(message.to_string()),
        "InvalidStateError" => StorageError::Unavailable(message.to_string()),
        _ => StorageError::Backend(format!("{}: {}", name, message)),
    }
}
