//! UI chrome preferences persisted through the platform storage port.

use crate::ports::outbound::{storage_keys, StorageProvider};

/// Whether the status panel is collapsed, stored as `"1"` / `"0"`.
#[derive(Clone)]
pub struct PreferencesService<S: StorageProvider> {
    storage: S,
}

impl<S: StorageProvider> PreferencesService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn status_panel_collapsed(&self) -> bool {
        self.storage
            .load(storage_keys::COLLAPSED_STATUS_PANEL)
            .is_some_and(|v| v == "1")
    }

    /// Flip the collapse flag and return the new value.
    pub fn toggle_status_panel(&self) -> bool {
        let collapsed = !self.status_panel_collapsed();
        self.storage.save(
            storage_keys::COLLAPSED_STATUS_PANEL,
            if collapsed { "1" } else { "0" },
        );
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::DesktopStorageProvider;

    #[test]
    fn toggle_round_trips_through_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        let prefs = PreferencesService::new(DesktopStorageProvider::open(&path));

        assert!(!prefs.status_panel_collapsed());
        assert!(prefs.toggle_status_panel());

        let reopened = PreferencesService::new(DesktopStorageProvider::open(&path));
        assert!(reopened.status_panel_collapsed());
        assert!(!reopened.toggle_status_panel());
        assert_eq!(
            DesktopStorageProvider::open(&path)
                .load(storage_keys::COLLAPSED_STATUS_PANEL)
                .as_deref(),
            Some("0")
        );
    }
}
