//! Biometric consent boundary
//!
//! Pose analysis is gated on an explicit user opt-in that persists across
//! sessions. The store is an injected capability so the overlay never
//! touches browser storage directly and tests can substitute a double.

use wasm_bindgen::JsValue;

/// Storage key for the persisted consent flag
pub const CONSENT_KEY: &str = "consent_biometric";

/// Value written when the user grants consent
pub const CONSENT_GRANTED: &str = "granted";

/// Read/write capability for the persisted consent flag.
///
/// Read once at overlay construction, written at most once on user action.
pub trait ConsentStore {
    /// Whether consent has been granted
    fn granted(&self) -> bool;

    /// Persist the grant. Idempotent.
    fn grant(&mut self);
}

// ============================================================================
// BROWSER-BACKED STORE
// ============================================================================

/// Consent store over `window.localStorage`
pub struct LocalStorageConsent {
    storage: web_sys::Storage,
}

impl LocalStorageConsent {
    pub fn from_window() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let storage = window
            .local_storage()?
            .ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
        Ok(Self { storage })
    }
}

impl ConsentStore for LocalStorageConsent {
    fn granted(&self) -> bool {
        self.storage
            .get_item(CONSENT_KEY)
            .ok()
            .flatten()
            .as_deref()
            == Some(CONSENT_GRANTED)
    }

    fn grant(&mut self) {
        if self.storage.set_item(CONSENT_KEY, CONSENT_GRANTED).is_err() {
            log::warn!("failed to persist consent flag");
        }
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory consent store for tests and headless use
#[derive(Default)]
pub struct MemoryConsent {
    granted: bool,
}

impl MemoryConsent {
    pub fn new(granted: bool) -> Self {
        Self { granted }
    }
}

impl ConsentStore for MemoryConsent {
    fn granted(&self) -> bool {
        self.granted
    }

    fn grant(&mut self) {
        self.granted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_grant() {
        let mut store = MemoryConsent::default();
        assert!(!store.granted());
        store.grant();
        assert!(store.granted());
        // Idempotent
        store.grant();
        assert!(store.granted());
    }

    #[test]
    fn test_memory_store_preseeded() {
        let store = MemoryConsent::new(true);
        assert!(store.granted());
    }
}
