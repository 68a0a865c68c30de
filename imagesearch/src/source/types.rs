//! Image source types and traits.

use std::fmt;
use std::future::Future;

use thiserror::Error;

use crate::http::HttpError;

/// Coarse classification of a search failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchErrorKind {
    /// The source could not be reached.
    NetworkFailure,
    /// The source answered with something that could not be parsed.
    BadResponse,
    /// The source did not answer in time.
    Timeout,
}

impl fmt::Display for SearchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchErrorKind::NetworkFailure => write!(f, "network failure"),
            SearchErrorKind::BadResponse => write!(f, "bad response"),
            SearchErrorKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Errors that can occur while turning a search term into image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Transport-level failure (connection refused, HTTP error status, ...).
    #[error("image source unreachable: {0}")]
    Network(String),

    /// The response could not be parsed into a URL list.
    #[error("invalid response from image source: {0}")]
    BadResponse(String),

    /// The request timed out.
    #[error("image source timed out")]
    Timeout,
}

impl SearchError {
    /// Returns the failure classification.
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            SearchError::Network(_) => SearchErrorKind::NetworkFailure,
            SearchError::BadResponse(_) => SearchErrorKind::BadResponse,
            SearchError::Timeout => SearchErrorKind::Timeout,
        }
    }
}

impl From<HttpError> for SearchError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout { .. } => SearchError::Timeout,
            other => SearchError::Network(other.to_string()),
        }
    }
}

/// Capability that resolves a search term into an ordered list of image URLs.
///
/// Implementations encode the term for their transport, build the
/// provider-specific query, parse the provider's response, and return at
/// most `limit` URLs. They are free to return fewer.
pub trait ImageSource: Send + Sync {
    /// Searches for images matching `term`.
    ///
    /// # Arguments
    ///
    /// * `term` - Non-empty search phrase
    /// * `limit` - Maximum number of URLs to return
    fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<String>, SearchError>> + Send;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            SearchError::Network("x".into()).kind(),
            SearchErrorKind::NetworkFailure
        );
        assert_eq!(
            SearchError::BadResponse("x".into()).kind(),
            SearchErrorKind::BadResponse
        );
        assert_eq!(SearchError::Timeout.kind(), SearchErrorKind::Timeout);
    }

    #[test]
    fn test_from_http_timeout() {
        let err: SearchError = HttpError::Timeout {
            url: "http://x".into(),
        }
        .into();
        assert_eq!(err, SearchError::Timeout);
    }

    #[test]
    fn test_from_http_status() {
        let err: SearchError = HttpError::Status {
            url: "http://x".into(),
            status: 503,
        }
        .into();
        assert_eq!(err.kind(), SearchErrorKind::NetworkFailure);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_display() {
        assert_eq!(SearchError::Timeout.to_string(), "image source timed out");
        assert_eq!(SearchErrorKind::BadResponse.to_string(), "bad response");
    }
}
