//! Offline image source returning a fixed URL list.

use super::types::{ImageSource, SearchError};

/// Built-in sample results used when no provider is configured.
pub const SAMPLE_URLS: &[&str] = &[
    "https://upload.wikimedia.org/wikipedia/en/b/bb/Empire_State_Building_from_5th_Avenue.jpg",
    "https://upload.wikimedia.org/wikipedia/en/6/6d/Empire_State_Building_timsdad.jpg",
    "https://upload.wikimedia.org/wikipedia/en/e/ec/Empire_State_Building_top.jpg",
    "https://upload.wikimedia.org/wikipedia/en/a/ab/Empire_State_College_logo.png",
    "https://upload.wikimedia.org/wikipedia/en/b/b6/Empire_State_Development_Corporation_%28logo%29.jpg",
    "https://upload.wikimedia.org/wikipedia/en/4/49/Empire_State_Games_Collage.jpg",
    "https://upload.wikimedia.org/wikipedia/en/5/54/Empire_State_Games_Logo.jpg",
    "https://upload.wikimedia.org/wikipedia/en/3/32/Empire_State_Pride_Agenda_logo.png",
    "https://upload.wikimedia.org/wikipedia/en/5/5f/Empire_State_Railway_Museum_logo.png",
];

/// Image source that ignores the term and always answers with the same list.
///
/// The list is returned untruncated so that the search coordinator's own
/// truncation is what bounds the gallery.
#[derive(Debug, Clone)]
pub struct StaticImageSource {
    urls: Vec<String>,
}

impl StaticImageSource {
    /// Creates a source answering with `urls`.
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    /// Creates a source answering with [`SAMPLE_URLS`].
    pub fn sample() -> Self {
        Self::new(SAMPLE_URLS.iter().map(|u| u.to_string()).collect())
    }
}

impl Default for StaticImageSource {
    fn default() -> Self {
        Self::sample()
    }
}

impl ImageSource for StaticImageSource {
    async fn search(&self, _term: &str, _limit: usize) -> Result<Vec<String>, SearchError> {
        Ok(self.urls.clone())
    }

    fn name(&self) -> &str {
        "Static"
    }
}
