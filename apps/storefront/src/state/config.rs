//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`aali.toml`, or the path given with `--config`)
//! 3. Environment variables (`AALI_*`)
//!
//! ```toml
//! # aali.toml
//! store_name = "AALI GOLD JEWELZ"
//! gstin = "37AABCA1234M1Z5"
//! submit_dir = "/var/spool/aali/orders"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};

use aali_core::invoice::SellerInfo;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "aali.toml";

/// Database file name inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "aali.db";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Explicit database path. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Directory the spool submitter writes orders into.
    /// `None` means there is no submission endpoint and every order is
    /// saved offline.
    pub submit_dir: Option<PathBuf>,

    /// Store name (invoice header)
    pub store_name: String,

    /// Store address (invoice header)
    pub store_address: String,

    pub store_phone: String,

    pub store_email: String,

    /// GST identification number printed on invoices.
    pub gstin: String,

    /// Orders shown by `aali orders list` when no limit is given.
    pub order_history_limit: u32,

    /// Pending orders retried per `aali orders sync`.
    pub sync_batch_size: u32,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: None,
            submit_dir: None,
            store_name: "AALI GOLD JEWELZ".to_string(),
            store_address: "4th line Syamala Nagar-Guntur, Guntur District, AP 522006".to_string(),
            store_phone: "+91 8634611770".to_string(),
            store_email: "info@aaligoldjewelz.com".to_string(),
            gstin: "37AABCA1234M1Z5".to_string(),
            order_history_limit: 20,
            sync_batch_size: 50,
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` must exist; the default location is
    /// optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    ConfigState::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `AALI_*` overrides read through `lookup`.
    ///
    /// ## Environment Variables
    /// - `AALI_DB_PATH`: database file
    /// - `AALI_STORE_NAME`: store name on invoices
    /// - `AALI_GSTIN`: GSTIN on invoices
    /// - `AALI_SUBMIT_DIR`: enables the spool submitter
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty("AALI_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(name) = non_empty("AALI_STORE_NAME") {
            self.store_name = name;
        }
        if let Some(gstin) = non_empty("AALI_GSTIN") {
            self.gstin = gstin;
        }
        if let Some(dir) = non_empty("AALI_SUBMIT_DIR") {
            self.submit_dir = Some(PathBuf::from(dir));
        }
    }

    /// Resolves the database file.
    ///
    /// ## Platform-Specific Paths
    /// - **Linux**: `~/.local/share/aali/aali.db`
    /// - **macOS**: `~/Library/Application Support/com.aaligoldjewelz.aali/aali.db`
    /// - **Windows**: `%APPDATA%\aaligoldjewelz\aali\data\aali.db`
    ///
    /// Falls back to `./aali.db` when no home directory is known.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return path.clone();
        }
        match Self::project_dirs() {
            Some(dirs) => dirs.data_dir().join(DATABASE_FILE_NAME),
            None => PathBuf::from(DATABASE_FILE_NAME),
        }
    }

    /// Seller block for invoices.
    pub fn seller(&self) -> SellerInfo {
        SellerInfo {
            name: self.store_name.clone(),
            address: self.store_address.clone(),
            phone: self.store_phone.clone(),
            email: self.store_email.clone(),
            gstin: self.gstin.clone(),
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "aaligoldjewelz", "aali")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.store_name, "AALI GOLD JEWELZ");
        assert_eq!(config.gstin, "37AABCA1234M1Z5");
        assert!(config.submit_dir.is_none());
        assert!(config.database_path().ends_with(DATABASE_FILE_NAME));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "store_name = \"Aali Test Store\"").unwrap();
        writeln!(file, "sync_batch_size = 5").unwrap();

        let config = ConfigState::from_file(file.path()).unwrap();
        assert_eq!(config.store_name, "Aali Test Store");
        assert_eq!(config.sync_batch_size, 5);
        assert_eq!(config.gstin, ConfigState::default().gstin);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "store_name = ").unwrap();
        assert!(matches!(
            ConfigState::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            ConfigState::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("AALI_DB_PATH", "/tmp/aali-env.db"),
            ("AALI_STORE_NAME", "Aali Guntur"),
            ("AALI_GSTIN", "37ZZZZZ9999Z1Z9"),
            ("AALI_SUBMIT_DIR", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = ConfigState::default();
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.database_path(), PathBuf::from("/tmp/aali-env.db"));
        assert_eq!(config.seller().name, "Aali Guntur");
        assert_eq!(config.seller().gstin, "37ZZZZZ9999Z1Z9");
        // Blank values are ignored
        assert!(config.submit_dir.is_none());
    }
}
