//! Host-side handle to a running engine.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::bindings::HostBindings;
use super::event::EngineEvent;
use crate::tile::SelectError;

/// Errors returned by [`EngineHandle`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine loop has stopped.
    #[error("Image search engine is not running")]
    Closed,

    /// The tile could not be selected.
    #[error(transparent)]
    Rejected(#[from] SelectError),
}

/// Cloneable handle for sending host requests to the engine.
///
/// Requests are queued and handled in order on the engine loop. Dropping
/// every handle stops the loop.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    events: mpsc::UnboundedSender<EngineEvent>,
    bindings: HostBindings,
    stop: CancellationToken,
}

impl EngineHandle {
    pub(crate) fn new(
        events: mpsc::UnboundedSender<EngineEvent>,
        bindings: HostBindings,
        stop: CancellationToken,
    ) -> Self {
        Self {
            events,
            bindings,
            stop,
        }
    }

    /// Changes the search term.
    ///
    /// An empty term is recorded but issues no search. Any other term is
    /// searched exactly as given.
    pub fn set_search_term(&self, term: impl Into<String>) -> Result<(), EngineError> {
        self.events
            .send(EngineEvent::SetSearchTerm(term.into()))
            .map_err(|_| EngineError::Closed)
    }

    /// Picks the image in slot `index`.
    ///
    /// On success the URL is also published on
    /// [`HostBindings::chosen_image_url`].
    pub async fn select(&self, index: usize) -> Result<String, EngineError> {
        let (reply, response) = oneshot::channel();
        self.events
            .send(EngineEvent::Select { index, reply })
            .map_err(|_| EngineError::Closed)?;

        let url = response.await.map_err(|_| EngineError::Closed)??;
        Ok(url)
    }

    /// Observable engine state.
    pub fn bindings(&self) -> &HostBindings {
        &self.bindings
    }

    /// Asks the engine loop to stop. Returns immediately.
    pub fn shutdown(&self) {
        self.stop.cancel();
    }

    /// Returns false once the engine loop has stopped.
    pub fn is_running(&self) -> bool {
        !self.events.is_closed() && !self.stop.is_cancelled()
    }
}
