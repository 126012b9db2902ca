//! `window.localStorage` session backend

use portal_core::{CoreError, CoreResult, SessionStorage, SessionStore};
use tracing::debug;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Session storage backed by the browser's `localStorage`.
///
/// The handle is looked up on every call. Without a window or with storage
/// disabled, reads yield nothing and writes fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub const fn new() -> Self {
        Self
    }

    /// Whether `localStorage` can be reached from this context
    pub fn is_available() -> bool {
        local_storage().is_some()
    }

    fn require() -> CoreResult<Storage> {
        local_storage().ok_or_else(|| CoreError::storage_error("localStorage is not available"))
    }
}

fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn js_error(operation: &str, key: &str, err: &JsValue) -> CoreError {
    CoreError::storage_error(format!("localStorage {operation} of '{key}' failed: {err:?}"))
}

impl SessionStorage for LocalStorageBackend {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let Some(storage) = local_storage() else {
            debug!(key, "localStorage unavailable, treating key as absent");
            return Ok(None);
        };
        storage.get_item(key).map_err(|e| js_error("read", key, &e))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        Self::require()?
            .set_item(key, value)
            .map_err(|e| js_error("write", key, &e))
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let Some(storage) = local_storage() else {
            return Ok(());
        };
        storage
            .remove_item(key)
            .map_err(|e| js_error("remove", key, &e))
    }
}

/// Session store persisted in `localStorage`
pub fn browser_session() -> SessionStore {
    SessionStore::new(LocalStorageBackend::new())
}
