//! Platform abstraction ports
//!
//! Only persistent key-value storage is abstracted here; it backs UI chrome
//! preferences and nothing in the session protocol.

/// Persistent storage abstraction (file-based on desktop)
pub trait StorageProvider: Clone + Send + Sync + 'static {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Storage key constants
pub mod storage_keys {
    pub const COLLAPSED_STATUS_PANEL: &str = "collapsedStatusPanel";
}
