//! Image loader types and traits.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::http::HttpError;

/// Coarse classification of a tile load failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    NetworkFailure,
    DecodeFailure,
    Timeout,
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadErrorKind::NetworkFailure => write!(f, "network failure"),
            LoadErrorKind::DecodeFailure => write!(f, "decode failure"),
            LoadErrorKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Errors that can occur while fetching a single tile image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The image could not be downloaded.
    #[error("image download failed: {0}")]
    Network(String),

    /// The downloaded bytes are not a decodable image.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// The download timed out.
    #[error("image download timed out")]
    Timeout,
}

impl LoadError {
    /// Returns the failure classification.
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::Network(_) => LoadErrorKind::NetworkFailure,
            LoadError::Decode(_) => LoadErrorKind::DecodeFailure,
            LoadError::Timeout => LoadErrorKind::Timeout,
        }
    }
}

impl From<HttpError> for LoadError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout { .. } => LoadError::Timeout,
            other => LoadError::Network(other.to_string()),
        }
    }
}

/// Opaque handle to a fetched and decoded image.
///
/// The encoded bytes are kept as-is for the presentation layer; the
/// dimensions prove the bytes decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Arc<[u8]>,
}

/// Receiver for download progress, as a fraction in `0.0..=1.0`.
///
/// Cloning is cheap. A discarding sink is used when nobody listens.
#[derive(Clone, Default)]
pub struct ProgressSink {
    callback: Option<Arc<dyn Fn(f32) + Send + Sync>>,
}

impl ProgressSink {
    /// Creates a sink forwarding to `callback`.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    /// Creates a sink that drops every report.
    pub fn discard() -> Self {
        Self::default()
    }

    /// Reports progress. Values are clamped to `0.0..=1.0`.
    pub fn report(&self, fraction: f32) {
        if let Some(callback) = &self.callback {
            callback(fraction.clamp(0.0, 1.0));
        }
    }
}

impl fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressSink")
            .field("active", &self.callback.is_some())
            .finish()
    }
}

/// Capability that fetches and decodes one image.
///
/// Abort is not part of the trait: the engine races the returned future
/// against the slot's cancellation token and drops it when superseded.
pub trait ImageLoader: Send + Sync {
    /// Fetches the image at `url`, reporting progress through `progress`.
    fn fetch(
        &self,
        url: &str,
        progress: ProgressSink,
    ) -> impl Future<Output = Result<LoadedImage, LoadError>> + Send;

    /// Returns the loader's name for logging.
    fn name(&self) -> &str;
}
