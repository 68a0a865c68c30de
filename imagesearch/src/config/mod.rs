//! Configuration for the image search engine.
//!
//! - [`EngineConfig`]: the values the engine itself runs with
//! - [`ConfigFile`]: the user's `~/.imagesearch/config.ini`
//!
//! # Example
//!
//! ```
//! use imagesearch::config::{ConfigFile, EngineConfig};
//!
//! let engine = EngineConfig::new().with_limit(8);
//! assert_eq!(engine.fetch_limit(), 18);
//!
//! let file = ConfigFile::default();
//! assert_eq!(file.engine_config(), EngineConfig::default());
//! ```

mod defaults;
mod engine;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_LIMIT, DEFAULT_LOG_FILE, DEFAULT_OVERFETCH_MARGIN,
    DEFAULT_PER_ROW, DEFAULT_PROVIDER, VALID_PROVIDERS,
};
pub use engine::{ConfigError, EngineConfig};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, GallerySettings, HttpSettings, LoggingSettings, SourceSettings};
