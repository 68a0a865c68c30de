//! Configuration file handling for ~/.imagesearch/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::engine::EngineConfig;
use super::settings::ConfigFile;
use crate::source::SourceConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.imagesearch/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Renders the configuration as the commented INI text `save_to` writes.
    pub fn to_ini_string(&self) -> String {
        super::writer::to_config_string(self)
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Engine settings from the `[gallery]` section.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_limit(self.gallery.limit)
            .with_per_row(self.gallery.per_row)
            .with_overfetch_margin(self.gallery.overfetch_margin)
            .with_debounce(Duration::from_millis(self.gallery.debounce_ms))
    }

    /// Image source from the `[source]` section.
    ///
    /// Fails if Pexels is selected without an API key.
    pub fn source_config(&self) -> Result<SourceConfig, ConfigFileError> {
        match self.source.provider.as_str() {
            "pexels" => match &self.source.pexels_api_key {
                Some(key) => Ok(SourceConfig::pexels(key.clone())),
                None => Err(ConfigFileError::InvalidValue {
                    section: "source".to_string(),
                    key: "pexels_api_key".to_string(),
                    value: String::new(),
                    reason: "required when provider = pexels".to_string(),
                }),
            },
            "static" => Ok(SourceConfig::Static),
            _ => Ok(SourceConfig::Wikipedia),
        }
    }
}

/// Get the path to the config directory (~/.imagesearch).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".imagesearch")
}

/// Get the path to the config file (~/.imagesearch/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
