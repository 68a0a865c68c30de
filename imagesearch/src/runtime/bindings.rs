//! Observable values exposed to the host.
//!
//! ```text
//!                   ┌──────────────────────────┐
//!  set_search_term ─► engine loop              │
//!                   │   search_term      watch ├──► host
//!                   │   searching pulse  bcast ├──► every subscriber
//!                   │   result_urls      watch ├──► host / tests
//!                   │   gallery          watch ├──► presentation
//!                   │   chosen_image_url watch ├──► host
//!                   └──────────────────────────┘
//! ```
//!
//! Only the engine loop publishes. Hosts get receivers.

use tokio::sync::{broadcast, watch};

use crate::gallery::GallerySnapshot;
use crate::stamp::Generation;

/// Capacity of the pulse channel. A subscriber lagging by more than this
/// misses the oldest pulses.
const PULSE_CHANNEL_CAPACITY: usize = 64;

/// Edge signal emitted once for every search the engine issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPulse {
    pub generation: Generation,
    pub term: String,
}

/// Receiving side of the engine's observables.
#[derive(Debug, Clone)]
pub struct HostBindings {
    chosen_image_url: watch::Receiver<Option<String>>,
    search_term: watch::Receiver<String>,
    result_urls: watch::Receiver<Vec<String>>,
    gallery: watch::Receiver<GallerySnapshot>,
    pulses: broadcast::Sender<SearchPulse>,
}

impl HostBindings {
    /// URL published by the last successful tile selection.
    pub fn chosen_image_url(&self) -> watch::Receiver<Option<String>> {
        self.chosen_image_url.clone()
    }

    /// Last search term set by the host.
    pub fn search_term(&self) -> watch::Receiver<String> {
        self.search_term.clone()
    }

    /// URL list of the last applied search, in slot order.
    pub fn result_urls(&self) -> watch::Receiver<Vec<String>> {
        self.result_urls.clone()
    }

    /// Snapshot of every tile, updated on each change.
    pub fn gallery(&self) -> watch::Receiver<GallerySnapshot> {
        self.gallery.clone()
    }

    /// Subscribes to searching pulses issued from now on.
    pub fn subscribe_pulses(&self) -> broadcast::Receiver<SearchPulse> {
        self.pulses.subscribe()
    }
}

/// Publishing side, owned by the engine loop.
#[derive(Debug)]
pub(crate) struct BindingPublisher {
    chosen_image_url: watch::Sender<Option<String>>,
    search_term: watch::Sender<String>,
    result_urls: watch::Sender<Vec<String>>,
    gallery: watch::Sender<GallerySnapshot>,
    pulses: broadcast::Sender<SearchPulse>,
}

impl BindingPublisher {
    /// Creates the publisher and the host-facing receivers.
    pub(crate) fn new(initial_gallery: GallerySnapshot) -> (Self, HostBindings) {
        let (chosen_tx, chosen_rx) = watch::channel(None);
        let (term_tx, term_rx) = watch::channel(String::new());
        let (urls_tx, urls_rx) = watch::channel(Vec::new());
        let (gallery_tx, gallery_rx) = watch::channel(initial_gallery);
        let (pulses, _) = broadcast::channel(PULSE_CHANNEL_CAPACITY);

        let bindings = HostBindings {
            chosen_image_url: chosen_rx,
            search_term: term_rx,
            result_urls: urls_rx,
            gallery: gallery_rx,
            pulses: pulses.clone(),
        };

        let publisher = Self {
            chosen_image_url: chosen_tx,
            search_term: term_tx,
            result_urls: urls_tx,
            gallery: gallery_tx,
            pulses,
        };

        (publisher, bindings)
    }

    pub(crate) fn chosen_image_url(&self, url: String) {
        self.chosen_image_url.send_replace(Some(url));
    }

    pub(crate) fn search_term(&self, term: String) {
        self.search_term.send_replace(term);
    }

    pub(crate) fn result_urls(&self, urls: Vec<String>) {
        self.result_urls.send_replace(urls);
    }

    pub(crate) fn gallery(&self, snapshot: GallerySnapshot) {
        self.gallery.send_replace(snapshot);
    }

    /// Emits a pulse. Having no subscribers is not an error.
    pub(crate) fn pulse(&self, pulse: SearchPulse) {
        let _ = self.pulses.send(pulse);
    }
}
