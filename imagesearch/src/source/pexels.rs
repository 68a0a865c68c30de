//! Pexels image source.
//!
//! Uses the Pexels photo search API, which requires an API key sent in the
//! `Authorization` header. Only the square rendition of each photo is used,
//! since gallery tiles are square.

use serde::Deserialize;
use tracing::debug;

use super::types::{ImageSource, SearchError};
use crate::http::AsyncHttpClient;

/// Default Pexels search endpoint.
pub const PEXELS_API_URL: &str = "https://api.pexels.com/v1/search";

/// Top-level search response. Pagination fields are ignored.
#[derive(Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Deserialize)]
struct PexelsPhoto {
    src: PexelsPhotoSources,
}

/// Renditions offered per photo. Only the ones we use are deserialized.
#[derive(Deserialize)]
struct PexelsPhotoSources {
    square: Option<String>,
    medium: Option<String>,
}

/// Image source backed by the Pexels search API.
pub struct PexelsSource<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
    base_url: String,
}

impl<C: AsyncHttpClient> PexelsSource<C> {
    /// Creates a source with the given API key.
    pub fn new(http_client: C, api_key: String) -> Self {
        Self::with_base_url(http_client, api_key, PEXELS_API_URL.to_string())
    }

    /// Creates a source against a custom endpoint.
    pub fn with_base_url(http_client: C, api_key: String, base_url: String) -> Self {
        Self {
            http_client,
            api_key,
            base_url,
        }
    }

    fn build_url(&self, term: &str, limit: usize) -> String {
        format!(
            "{}?query={}&per_page={}",
            self.base_url,
            urlencoding::encode(term),
            limit
        )
    }
}

impl<C: AsyncHttpClient> ImageSource for PexelsSource<C> {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        let url = self.build_url(term, limit);
        let body = self
            .http_client
            .get_with_headers(&url, &[("Authorization", self.api_key.as_str())])
            .await?;

        let urls = parse_photos(&body, limit)?;
        debug!(term = term, found = urls.len(), "Pexels search parsed");
        Ok(urls)
    }

    fn name(&self) -> &str {
        "Pexels"
    }
}

/// Extracts one URL per photo, preferring the square rendition.
fn parse_photos(body: &[u8], limit: usize) -> Result<Vec<String>, SearchError> {
    let response: PexelsResponse =
        serde_json::from_slice(body).map_err(|e| SearchError::BadResponse(e.to_string()))?;

    Ok(response
        .photos
        .into_iter()
        .filter_map(|photo| photo.src.square.or(photo.src.medium))
        .take(limit)
        .collect())
}
