//! Path management for usermgmt
//!
//! ## Path Resolution Order
//!
//! 1. `USERMGMT_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory reported by the `directories`
//!    crate (e.g. `~/.config/usermgmt` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::UserMgmtError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "USERMGMT_DATA_DIR";

/// Manages all paths used by usermgmt
#[derive(Debug, Clone)]
pub struct UserMgmtPaths {
    base_dir: PathBuf,
}

impl UserMgmtPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, UserMgmtError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "usermgmt")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    UserMgmtError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Use a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the store file
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default destination for exports
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Users and audit entries, persisted together
    pub fn store_file(&self) -> PathBuf {
        self.data_dir().join("store.json")
    }

    /// Ensure the base, data and export directories exist
    pub fn ensure_directories(&self) -> Result<(), UserMgmtError> {
        for dir in [self.base_dir.clone(), self.data_dir(), self.export_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                UserMgmtError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Whether `init` has been run (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
