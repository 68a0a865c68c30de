//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Image source settings
    pub source: SourceSettings,
    /// Gallery and search settings
    pub gallery: GallerySettings,
    /// HTTP client settings
    pub http: HttpSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Image source configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    /// Provider: "wikipedia", "pexels", or "static"
    pub provider: String,
    /// Pexels API key (only required for "pexels")
    pub pexels_api_key: Option<String>,
    /// Add random latency to every search
    pub throttle: bool,
}

/// Gallery configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySettings {
    pub limit: usize,
    pub per_row: usize,
    pub overfetch_margin: usize,
    pub debounce_ms: u64,
}

/// HTTP configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Timeout in seconds for every HTTP request.
    pub timeout_secs: u64,
    /// Largest image download accepted, in bytes.
    pub max_image_bytes: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
