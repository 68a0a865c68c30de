//! Search request and outcome types.

use tokio_util::sync::CancellationToken;

use crate::source::SearchError;
use crate::stamp::Generation;

/// One search issued to an [`ImageSource`](crate::source::ImageSource).
///
/// Immutable once created. `fetch_limit` is what the source is asked for;
/// `limit` is what the gallery keeps after the source answers.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub term: String,
    pub limit: usize,
    pub fetch_limit: usize,
    pub generation: Generation,
    /// Cancelled when a newer request supersedes this one.
    pub cancellation: CancellationToken,
}

/// Result of a search, stamped with the generation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub generation: Generation,
    pub result: Result<Vec<String>, SearchError>,
}

impl SearchOutcome {
    pub fn success(generation: Generation, urls: Vec<String>) -> Self {
        Self {
            generation,
            result: Ok(urls),
        }
    }

    pub fn failure(generation: Generation, error: SearchError) -> Self {
        Self {
            generation,
            result: Err(error),
        }
    }
}

/// What the coordinator decided to do with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResolution {
    /// The outcome is current: publish these URLs (already truncated).
    Apply {
        generation: Generation,
        urls: Vec<String>,
    },
    /// The current search failed: report it, keep the gallery as it is.
    Failed {
        generation: Generation,
        error: SearchError,
    },
    /// A newer search was issued since; drop the outcome silently.
    Stale {
        generation: Generation,
        current: Generation,
    },
}
