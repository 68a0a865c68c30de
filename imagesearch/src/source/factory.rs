//! Source factory for centralized image source creation.
//!
//! `ImageSource::search` returns `impl Future`, so sources cannot be boxed as
//! trait objects. The factory instead returns [`AnySource`], an enum that
//! dispatches to the concrete source.

use tracing::info;

use super::fixed::StaticImageSource;
use super::pexels::PexelsSource;
use super::throttle::ThrottledSource;
use super::types::{ImageSource, SearchError};
use super::wikipedia::WikipediaSource;
use crate::http::AsyncReqwestClient;

/// Configuration for creating an image source.
///
/// # Example
///
/// ```
/// use imagesearch::source::SourceConfig;
///
/// let wikipedia = SourceConfig::Wikipedia;
/// let pexels = SourceConfig::pexels("YOUR_API_KEY");
/// assert!(pexels.requires_api_key());
/// assert!(!wikipedia.requires_api_key());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// Wikipedia `allimages` search. No API key required.
    Wikipedia,

    /// Pexels photo search.
    Pexels {
        /// Pexels API key
        api_key: String,
    },

    /// Built-in sample URL list, no network access for searching.
    Static,
}

impl SourceConfig {
    /// Create a Pexels configuration with the given API key.
    pub fn pexels(api_key: impl Into<String>) -> Self {
        Self::Pexels {
            api_key: api_key.into(),
        }
    }

    /// Returns the provider name for this configuration.
    pub fn name(&self) -> &str {
        match self {
            Self::Wikipedia => "Wikipedia",
            Self::Pexels { .. } => "Pexels",
            Self::Static => "Static",
        }
    }

    /// Returns whether this source requires an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Pexels { .. })
    }
}

/// Enum holding the different concrete source types.
pub enum ProviderSource {
    Wikipedia(WikipediaSource<AsyncReqwestClient>),
    Pexels(PexelsSource<AsyncReqwestClient>),
    Static(StaticImageSource),
}

impl ImageSource for ProviderSource {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        match self {
            Self::Wikipedia(s) => s.search(term, limit).await,
            Self::Pexels(s) => s.search(term, limit).await,
            Self::Static(s) => s.search(term, limit).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Wikipedia(s) => s.name(),
            Self::Pexels(s) => s.name(),
            Self::Static(s) => s.name(),
        }
    }
}

/// A provider source, optionally wrapped in a [`ThrottledSource`].
pub enum AnySource {
    Direct(ProviderSource),
    Throttled(ThrottledSource<ProviderSource>),
}

impl ImageSource for AnySource {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        match self {
            Self::Direct(s) => s.search(term, limit).await,
            Self::Throttled(s) => s.search(term, limit).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Direct(s) => s.name(),
            Self::Throttled(s) => s.name(),
        }
    }
}

/// Factory for creating image sources.
pub struct SourceFactory {
    http_client: AsyncReqwestClient,
}

impl SourceFactory {
    /// Create a new source factory with the given HTTP client.
    pub fn new(http_client: AsyncReqwestClient) -> Self {
        Self { http_client }
    }

    /// Create a source from the given configuration.
    ///
    /// When `throttle` is set the source is wrapped in a [`ThrottledSource`].
    pub fn create(self, config: &SourceConfig, throttle: bool) -> AnySource {
        let source = match config {
            SourceConfig::Wikipedia => {
                ProviderSource::Wikipedia(WikipediaSource::new(self.http_client))
            }
            SourceConfig::Pexels { api_key } => {
                ProviderSource::Pexels(PexelsSource::new(self.http_client, api_key.clone()))
            }
            SourceConfig::Static => ProviderSource::Static(StaticImageSource::sample()),
        };

        info!(source = source.name(), throttle = throttle, "Image source created");

        if throttle {
            AnySource::Throttled(ThrottledSource::new(source))
        } else {
            AnySource::Direct(source)
        }
    }
}
