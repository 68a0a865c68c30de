//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module is the single place where INI key names are mapped to
//! struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::defaults::VALID_PROVIDERS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = section.get("provider") {
            let v = v.trim().to_lowercase();
            if !VALID_PROVIDERS.contains(&v.as_str()) {
                return Err(invalid(
                    "source",
                    "provider",
                    &v,
                    "must be one of: wikipedia, pexels, static",
                ));
            }
            config.source.provider = v;
        }
        if let Some(v) = section.get("pexels_api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.source.pexels_api_key = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("throttle") {
            config.source.throttle = parse_bool(v);
        }
    }

    // [gallery] section
    if let Some(section) = ini.section(Some("gallery")) {
        if let Some(v) = section.get("limit") {
            config.gallery.limit = parse_positive("gallery", "limit", v)?;
        }
        if let Some(v) = section.get("per_row") {
            config.gallery.per_row = parse_positive("gallery", "per_row", v)?;
        }
        if let Some(v) = section.get("overfetch_margin") {
            config.gallery.overfetch_margin = parse_number(
                "gallery",
                "overfetch_margin",
                v,
                "must be a non-negative integer",
            )?;
        }
        if let Some(v) = section.get("debounce_ms") {
            config.gallery.debounce_ms = parse_number(
                "gallery",
                "debounce_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
    }

    // [http] section
    if let Some(section) = ini.section(Some("http")) {
        if let Some(v) = section.get("timeout_secs") {
            let timeout: u64 = parse_number(
                "http",
                "timeout_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
            if timeout == 0 {
                return Err(invalid(
                    "http",
                    "timeout_secs",
                    v,
                    "must be a positive integer (seconds)",
                ));
            }
            config.http.timeout_secs = timeout;
        }
        if let Some(v) = section.get("max_image_bytes") {
            let max: u64 = parse_number(
                "http",
                "max_image_bytes",
                v,
                "must be a positive integer (bytes)",
            )?;
            if max == 0 {
                return Err(invalid(
                    "http",
                    "max_image_bytes",
                    v,
                    "must be a positive integer (bytes)",
                ));
            }
            config.http.max_image_bytes = max;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive(section: &str, key: &str, value: &str) -> Result<usize, ConfigFileError> {
    let reason = "must be a positive integer";
    match parse_number(section, key, value, reason)? {
        0 => Err(invalid(section, key, value, reason)),
        n => Ok(n),
    }
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_invalid_provider() {
        let err = load("[source]\nprovider = flickr\n").unwrap_err();
        assert!(err.to_string().contains("must be one of:"));
        assert!(err.to_string().contains("wikipedia"));
    }

    #[test]
    fn test_provider_is_case_insensitive() {
        let config = load("[source]\nprovider = Pexels\n").unwrap();
        assert_eq!(config.source.provider, "pexels");
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = load("[gallery]\nlimit = 0\n").unwrap_err();
        assert!(err.to_string().contains("gallery.limit"));
    }

    #[test]
    fn test_non_numeric_margin_rejected() {
        let err = load("[gallery]\noverfetch_margin = lots\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "overfetch_margin"
        ));
    }

    #[test]
    fn test_zero_margin_accepted() {
        let config = load("[gallery]\noverfetch_margin = 0\n").unwrap();
        assert_eq!(config.gallery.overfetch_margin, 0);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(load("[http]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_max_image_bytes() {
        let config = load("[http]\nmax_image_bytes = 1048576\n").unwrap();
        assert_eq!(config.http.max_image_bytes, 1_048_576);
        assert!(load("[http]\nmax_image_bytes = 0\n").is_err());
        assert!(load("[http]\nmax_image_bytes = lots\n").is_err());
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[source]
provider = pexels
pexels_api_key = my-key
throttle = yes

[gallery]
limit = 3
"#,
        )
        .unwrap();

        // Specified values
        assert_eq!(config.source.provider, "pexels");
        assert_eq!(config.source.pexels_api_key.as_deref(), Some("my-key"));
        assert!(config.source.throttle);
        assert_eq!(config.gallery.limit, 3);

        // Defaults
        assert_eq!(config.gallery.per_row, DEFAULT_PER_ROW);
        assert_eq!(config.gallery.overfetch_margin, DEFAULT_OVERFETCH_MARGIN);
        assert_eq!(config.gallery.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let config = load("[source]\npexels_api_key =   \n").unwrap();
        assert!(config.source.pexels_api_key.is_none());
    }

    #[test]
    fn test_parse_bool_values() {
        for v in ["true", "TRUE", "1", "yes", "on", " on "] {
            assert!(parse_bool(v), "{} should be true", v);
        }
        for v in ["false", "0", "no", "off", "maybe"] {
            assert!(!parse_bool(v), "{} should be false", v);
        }
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        // Non-tilde paths should be unchanged
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
