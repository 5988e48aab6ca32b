//! Loading `config.ini`.
//!
//! Settings structs live in [`super::settings`], defaults in
//! [`super::defaults`], and INI key mapping in [`super::parser`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but could not be read or is not valid INI
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// The INI text itself is malformed
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ini::ParseError),

    /// A key has a value outside its accepted range or format
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Parse INI text.
    pub fn load_str(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text)?;
        super::parser::parse_ini(&ini)
    }
}

/// Per-user configuration directory (`<config dir>/edgeshim`).
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("edgeshim")
}

/// Default config file path (`<config dir>/edgeshim/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PREVIOUS_ITEM_TTL_MS;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("missing.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[cache]\nprevious_item_ttl_ms = 250\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.cache.previous_item_ttl_ms, 250);
        assert_ne!(config.cache.previous_item_ttl_ms, DEFAULT_PREVIOUS_ITEM_TTL_MS);
    }

    #[test]
    fn test_config_file_path_ends_with_ini() {
        let path = config_file_path();
        assert!(path.ends_with("edgeshim/config.ini"));
    }
}
