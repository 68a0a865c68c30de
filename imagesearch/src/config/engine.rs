//! Engine configuration.

use std::time::Duration;

use thiserror::Error;

use super::defaults::{DEFAULT_LIMIT, DEFAULT_OVERFETCH_MARGIN, DEFAULT_PER_ROW};

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The gallery must hold at least one tile.
    #[error("limit must be a positive integer")]
    ZeroLimit,

    /// A row must hold at least one tile.
    #[error("per_row must be a positive integer")]
    ZeroPerRow,
}

/// Configuration for the search engine.
///
/// # Example
///
/// ```
/// use imagesearch::config::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.limit(), 16);
/// assert_eq!(config.fetch_limit(), 26);
///
/// let config = EngineConfig::new()
///     .with_limit(3)
///     .with_overfetch_margin(0)
///     .with_debounce(Duration::from_millis(250));
/// assert_eq!(config.fetch_limit(), 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Gallery capacity, and the number of results kept per search
    limit: usize,
    /// Tiles per row (presentation only)
    per_row: usize,
    /// Extra results requested from the source to absorb filtered entries
    overfetch_margin: usize,
    /// Quiet period after the last term change before a search is issued
    debounce: Duration,
}

impl EngineConfig {
    /// Create a new engine configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gallery capacity. Default: 16.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the number of tiles per row. Default: 8.
    pub fn with_per_row(mut self, per_row: usize) -> Self {
        self.per_row = per_row;
        self
    }

    /// Set how many extra results to request from the source. Default: 10.
    pub fn with_overfetch_margin(mut self, margin: usize) -> Self {
        self.overfetch_margin = margin;
        self
    }

    /// Set the debounce period.
    ///
    /// Zero (the default) issues a search for every non-empty term
    /// immediately.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn per_row(&self) -> usize {
        self.per_row
    }

    pub fn overfetch_margin(&self) -> usize {
        self.overfetch_margin
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Number of results requested from the image source.
    pub fn fetch_limit(&self) -> usize {
        self.limit + self.overfetch_margin
    }

    /// Checks that the configuration can drive an engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if self.per_row == 0 {
            return Err(ConfigError::ZeroPerRow);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            per_row: DEFAULT_PER_ROW,
            overfetch_margin: DEFAULT_OVERFETCH_MARGIN,
            debounce: Duration::ZERO,
        }
    }
}
