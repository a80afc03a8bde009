//! Desktop platform implementations

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;

use crate::ports::outbound::platform::StorageProvider;

/// Default location of the preference file:
/// - Linux: ~/.config/tiandao-player/preferences.json
/// - macOS: ~/Library/Application Support/io.tiandao.tiandao-player/preferences.json
/// - Windows: C:\Users\<User>\AppData\Roaming\tiandao\tiandao-player\config\preferences.json
pub fn default_storage_path() -> PathBuf {
    ProjectDirs::from("io", "tiandao", "tiandao-player")
        .map(|dirs| dirs.config_dir().join("preferences.json"))
        .unwrap_or_else(|| PathBuf::from("tiandao_preferences.json"))
}

/// File-backed key-value storage.
///
/// All values live in one JSON object; every write rewrites the file.
#[derive(Clone)]
pub struct DesktopStorageProvider {
    storage_path: PathBuf,
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl DesktopStorageProvider {
    /// Open the store at `storage_path`, loading existing values if the file exists.
    pub fn open(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();
        let cache = load_file(&storage_path);
        tracing::debug!(path = %storage_path.display(), entries = cache.len(), "Preference store opened");

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    fn persist(&self) {
        if let Some(parent) = self.storage_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::error!("Failed to create storage directory: {}", e);
                return;
            }
        }

        let data = match self.cache.read() {
            Ok(guard) => serde_json::to_string_pretty(&*guard),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                return;
            }
        };

        match data {
            Ok(data) => {
                if let Err(e) = fs::write(&self.storage_path, data) {
                    tracing::error!("Failed to write storage file: {}", e);
                }
            }
            Err(e) => tracing::error!("Failed to serialize storage data: {}", e),
        }
    }
}

fn load_file(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }
    match fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse storage file: {}", e);
            HashMap::new()
        }),
        Err(e) => {
            tracing::warn!("Failed to read storage file: {}", e);
            HashMap::new()
        }
    }
}

impl StorageProvider for DesktopStorageProvider {
    fn save(&self, key: &str, value: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                guard.insert(key.to_string(), value.to_string());
            }
            Err(e) => {
                tracing::error!("Failed to acquire write lock for storage: {}", e);
                return;
            }
        }
        self.persist();
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                guard.remove(key);
            }
            Err(e) => {
                tracing::error!("Failed to acquire write lock for storage: {}", e);
                return;
            }
        }
        self.persist();
    }
}
