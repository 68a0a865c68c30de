//! Channel reporter implementation.

use tokio::sync::mpsc;
use tracing::trace;

use super::r#trait::{EngineFailure, ErrorReporter};

/// Reporter that forwards failures to an unbounded channel.
///
/// Lets a host (or a test) observe failures as values. Failures reported
/// after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<EngineFailure>,
}

impl ChannelReporter {
    /// Creates a reporter and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EngineFailure>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ErrorReporter for ChannelReporter {
    fn report(&self, failure: EngineFailure) {
        if self.tx.send(failure).is_err() {
            trace!("Failure receiver dropped, discarding report");
        }
    }
}
