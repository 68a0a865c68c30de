//! Reporter trait and failure taxonomy.

use std::fmt;

use crate::loader::LoadError;
use crate::source::SearchError;

/// A failure the engine surfaces to its host.
///
/// Neither kind stops the engine. A search failure leaves the gallery as it
/// was; a tile failure clears only the affected slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineFailure {
    /// The current search failed.
    Search(SearchError),
    /// The current load of one slot failed.
    TileLoad {
        slot: usize,
        url: String,
        error: LoadError,
    },
}

impl fmt::Display for EngineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineFailure::Search(error) => write!(f, "Search failed: {}", error),
            EngineFailure::TileLoad { slot, url, error } => {
                write!(f, "Slot {} failed to load {}: {}", slot, url, error)
            }
        }
    }
}

impl std::error::Error for EngineFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineFailure::Search(error) => Some(error),
            EngineFailure::TileLoad { error, .. } => Some(error),
        }
    }
}

/// Receives failures from the engine.
///
/// Called on the engine's interactive context, so implementations must not
/// block.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, failure: EngineFailure);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display() {
        let failure = EngineFailure::Search(SearchError::Timeout);
        assert_eq!(failure.to_string(), "Search failed: image source timed out");

        let failure = EngineFailure::TileLoad {
            slot: 2,
            url: "http://x/a.jpg".to_string(),
            error: LoadError::Timeout,
        };
        assert_eq!(
            failure.to_string(),
            "Slot 2 failed to load http://x/a.jpg: image download timed out"
        );
    }

    #[test]
    fn test_source_chain() {
        let failure = EngineFailure::Search(SearchError::BadResponse("eof".into()));
        assert!(failure.source().is_some());
    }
}
