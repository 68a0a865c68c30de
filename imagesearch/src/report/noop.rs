//! No-operation reporter implementation.

use super::r#trait::{EngineFailure, ErrorReporter};

/// A reporter that discards all failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl ErrorReporter for NoOpReporter {
    #[inline]
    fn report(&self, _failure: EngineFailure) {}
}
