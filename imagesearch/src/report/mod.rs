//! Error-reporting collaborator.
//!
//! The engine hands every failure that affects what the user sees to an
//! [`ErrorReporter`]. Superseded work is never reported: a stale search or
//! tile load is expected control flow, not a failure.
//!
//! # Implementations
//!
//! - `TracingReporter`: logs through the `tracing` crate (default)
//! - `ChannelReporter`: forwards failures to an mpsc receiver
//! - `NoOpReporter`: discards everything
//!
//! ```
//! use imagesearch::report::{EngineFailure, ErrorReporter, NoOpReporter};
//! use imagesearch::source::SearchError;
//! use std::sync::Arc;
//!
//! let reporter: Arc<dyn ErrorReporter> = Arc::new(NoOpReporter);
//! reporter.report(EngineFailure::Search(SearchError::Timeout));
//! ```

mod channel;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use channel::ChannelReporter;
pub use noop::NoOpReporter;
pub use r#trait::{EngineFailure, ErrorReporter};
pub use tracing_adapter::TracingReporter;
