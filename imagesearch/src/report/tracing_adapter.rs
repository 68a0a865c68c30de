//! Tracing reporter implementation.

use tracing::warn;

use super::r#trait::{EngineFailure, ErrorReporter};

/// Reporter that logs every failure at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ErrorReporter for TracingReporter {
    fn report(&self, failure: EngineFailure) {
        match &failure {
            EngineFailure::Search(error) => {
                warn!(kind = %error.kind(), error = %error, "Search failed");
            }
            EngineFailure::TileLoad { slot, url, error } => {
                warn!(
                    slot = *slot,
                    url = url.as_str(),
                    kind = %error.kind(),
                    error = %error,
                    "Tile load failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SearchError;

    #[test]
    fn test_tracing_reporter_as_trait_object() {
        let reporter: Box<dyn ErrorReporter> = Box::new(TracingReporter::new());
        // Logs via tracing (may not appear without subscriber)
        reporter.report(EngineFailure::Search(SearchError::Timeout));
    }
}
