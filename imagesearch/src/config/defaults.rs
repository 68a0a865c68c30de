//! Default values and constants for all configuration settings.

use super::settings::*;
use crate::http::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_BODY_BYTES};

/// Default gallery capacity.
pub const DEFAULT_LIMIT: usize = 16;

/// Default tiles per row.
pub const DEFAULT_PER_ROW: usize = 8;

/// Default number of extra results requested from the source.
pub const DEFAULT_OVERFETCH_MARGIN: usize = 10;

/// Default debounce in milliseconds (searches are issued immediately).
pub const DEFAULT_DEBOUNCE_MS: u64 = 0;

/// Default image provider.
pub const DEFAULT_PROVIDER: &str = "wikipedia";

/// Providers accepted in `[source] provider`.
pub const VALID_PROVIDERS: &[&str] = &["wikipedia", "pexels", "static"];

/// Default log file name, inside the config directory.
pub const DEFAULT_LOG_FILE: &str = "imagesearch.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            source: SourceSettings {
                provider: DEFAULT_PROVIDER.to_string(),
                pexels_api_key: None,
                throttle: false,
            },
            gallery: GallerySettings {
                limit: DEFAULT_LIMIT,
                per_row: DEFAULT_PER_ROW,
                overfetch_margin: DEFAULT_OVERFETCH_MARGIN,
                debounce_ms: DEFAULT_DEBOUNCE_MS,
            },
            http: HttpSettings {
                timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
                max_image_bytes: DEFAULT_MAX_BODY_BYTES,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE),
            },
        }
    }
}
