//! Common types and utilities shared across CLI commands.

use clap::{Args, ValueEnum};
use imagesearch::config::{ConfigFile, EngineConfig};
use imagesearch::gallery::GallerySnapshot;
use imagesearch::source::SourceConfig;
use imagesearch::tile::TileState;

use crate::error::CliError;

/// Image provider selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ProviderType {
    /// Wikipedia image search (no API key required)
    Wikipedia,
    /// Pexels photo search (requires API key)
    Pexels,
    /// Built-in sample images (offline, ignores the search term)
    Static,
}

impl ProviderType {
    /// Convert to a SourceConfig, requiring an API key for Pexels.
    pub fn to_config(self, api_key: Option<String>) -> Result<SourceConfig, CliError> {
        match self {
            ProviderType::Wikipedia => Ok(SourceConfig::Wikipedia),
            ProviderType::Static => Ok(SourceConfig::Static),
            ProviderType::Pexels => {
                let key = api_key.ok_or_else(|| {
                    CliError::Config(
                        "Pexels provider requires an API key. \
                         Set pexels_api_key in config.ini or use --pexels-api-key"
                            .to_string(),
                    )
                })?;
                Ok(SourceConfig::pexels(key))
            }
        }
    }
}

/// Engine options shared by `search` and `interactive`.
///
/// Each option overrides the matching config.ini setting.
#[derive(Debug, Clone, Default, Args)]
pub struct EngineArgs {
    /// Image provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderType>,

    /// Pexels API key (required when using --provider pexels)
    #[arg(long)]
    pub pexels_api_key: Option<String>,

    /// Number of gallery slots
    #[arg(long)]
    pub limit: Option<usize>,

    /// Delay every search by a random 0.5-2 s to provoke out-of-order results
    #[arg(long)]
    pub throttle: bool,
}

impl EngineArgs {
    /// Resolve the image source: CLI > config.
    pub fn source_config(&self, config: &ConfigFile) -> Result<SourceConfig, CliError> {
        let api_key = self
            .pexels_api_key
            .clone()
            .or_else(|| config.source.pexels_api_key.clone());

        match self.provider {
            Some(provider) => provider.to_config(api_key),
            None if api_key.is_some() && config.source.provider == "pexels" => {
                ProviderType::Pexels.to_config(api_key)
            }
            None => Ok(config.source_config()?),
        }
    }

    /// Resolve the engine settings: CLI > config.
    pub fn engine_config(&self, config: &ConfigFile) -> EngineConfig {
        let engine = config.engine_config();
        match self.limit {
            Some(limit) => engine.with_limit(limit),
            None => engine,
        }
    }

    /// Whether searches are throttled: CLI flag or config.
    pub fn throttle(&self, config: &ConfigFile) -> bool {
        self.throttle || config.source.throttle
    }
}

/// Print the gallery as a table, one line per slot.
pub fn print_gallery(gallery: &GallerySnapshot, per_row: usize) {
    for line in format_gallery(gallery, per_row) {
        println!("{}", line);
    }
}

fn format_gallery(gallery: &GallerySnapshot, per_row: usize) -> Vec<String> {
    let per_row = per_row.max(1);
    let mut lines = vec![format!(
        "{:<5} {:<8} {:<8} {:<11} URL",
        "Slot", "Cell", "State", "Size"
    )];

    for tile in &gallery.tiles {
        let cell = format!("{},{}", tile.index / per_row, tile.index % per_row);
        let size = match (tile.state, tile.dimensions, tile.progress) {
            (TileState::Loaded, Some((w, h)), _) => format!("{}x{}", w, h),
            (TileState::Loading, _, Some(progress)) => format!("{:.0}%", progress * 100.0),
            _ => "-".to_string(),
        };
        let url = tile
            .displayed_url
            .as_deref()
            .or(tile.assigned_url.as_deref())
            .unwrap_or("");
        lines.push(format!(
            "{:<5} {:<8} {:<8} {:<11} {}",
            tile.index,
            cell,
            tile.state.to_string(),
            size,
            url
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagesearch::tile::TileSnapshot;

    fn tile(index: usize, state: TileState) -> TileSnapshot {
        TileSnapshot {
            index,
            state,
            assigned_url: None,
            displayed_url: None,
            progress: None,
            dimensions: None,
        }
    }

    #[test]
    fn test_pexels_requires_key() {
        assert!(ProviderType::Pexels.to_config(None).is_err());
        assert_eq!(
            ProviderType::Pexels.to_config(Some("k".into())).unwrap(),
            SourceConfig::pexels("k")
        );
        assert_eq!(
            ProviderType::Static.to_config(None).unwrap(),
            SourceConfig::Static
        );
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = ConfigFile::default();
        let args = EngineArgs {
            provider: Some(ProviderType::Static),
            limit: Some(3),
            ..EngineArgs::default()
        };

        assert_eq!(args.source_config(&config).unwrap(), SourceConfig::Static);
        assert_eq!(args.engine_config(&config).limit(), 3);
        assert!(!args.throttle(&config));
    }

    #[test]
    fn test_config_used_without_overrides() {
        let mut config = ConfigFile::default();
        config.source.throttle = true;

        let args = EngineArgs::default();
        assert_eq!(
            args.source_config(&config).unwrap(),
            SourceConfig::Wikipedia
        );
        assert_eq!(args.engine_config(&config), config.engine_config());
        assert!(args.throttle(&config));
    }

    #[test]
    fn test_format_gallery() {
        let mut loaded = tile(0, TileState::Loaded);
        loaded.displayed_url = Some("http://x/a.jpg".into());
        loaded.dimensions = Some((640, 480));

        let mut loading = tile(1, TileState::Loading);
        loading.assigned_url = Some("http://x/b.jpg".into());
        loading.progress = Some(0.25);

        let gallery = GallerySnapshot {
            tiles: vec![loaded, loading, tile(2, TileState::Cleared)],
        };
        let lines = format_gallery(&gallery, 2);

        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("0,0"));
        assert!(lines[1].contains("640x480"));
        assert!(lines[1].ends_with("http://x/a.jpg"));
        assert!(lines[2].contains("25%"));
        assert!(lines[2].ends_with("http://x/b.jpg"));
        assert!(lines[3].contains("1,0"));
        assert!(lines[3].contains("cleared"));
    }
}
