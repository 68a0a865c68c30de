//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let pexels_api_key = config.source.pexels_api_key.as_deref().unwrap_or("");
    let throttle = if config.source.throttle {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[source]
; Image provider:
;   wikipedia - Wikipedia image list (free, no key required, JPEG results only)
;   pexels    - Pexels photo search (free, requires API key)
;   static    - Built-in sample list, ignores the search term
provider = {}
; Pexels API key (only required when provider = pexels)
; Get one at: https://www.pexels.com/api/
pexels_api_key = {}
; Add 0.5-2s of random latency to every search (debugging aid, default: false)
throttle = {}

[gallery]
; Number of tiles, and results kept per search (default: 16)
limit = {}
; Tiles per row (default: 8)
per_row = {}
; Extra results requested from the provider to absorb filtered entries (default: 10)
overfetch_margin = {}
; Quiet period in ms after typing before a search is issued (default: 0)
debounce_ms = {}

[http]
; Timeout in seconds for every HTTP request (default: 30)
timeout_secs = {}
; Largest image download accepted, in bytes (default: 33554432)
max_image_bytes = {}

[logging]
; Log file path (default: ~/.imagesearch/imagesearch.log)
file = {}
"#,
        config.source.provider,
        pexels_api_key,
        throttle,
        config.gallery.limit,
        config.gallery.per_row,
        config.gallery.overfetch_margin,
        config.gallery.debounce_ms,
        config.http.timeout_secs,
        config.http.max_image_bytes,
        config.logging.file.to_string_lossy(),
    )
}
