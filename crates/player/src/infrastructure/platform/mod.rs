//! Platform-specific implementations of the platform ports.

mod desktop;

pub use desktop::{default_storage_path, DesktopStorageProvider};
