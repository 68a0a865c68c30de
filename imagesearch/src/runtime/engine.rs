//! The engine: one event loop owning every piece of mutable state.
//!
//! ```text
//!   EngineHandle ──┐
//!                  ├─► EngineEvent channel ──► run loop ──► SearchCoordinator
//!   workers ───────┘          ▲                   │          GalleryModel
//!                             │                   │          BindingPublisher
//!                             └── spawn_search ◄──┤
//!                             └── spawn_load   ◄──┘
//! ```
//!
//! The loop is the single interactive context: the coordinator, the gallery
//! and every tile are mutated only from here, so none of them needs a lock.
//! Searches and image fetches run as spawned tasks and report back through
//! the same channel as host requests.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::bindings::{BindingPublisher, SearchPulse};
use super::event::EngineEvent;
use super::handle::EngineHandle;
use crate::config::{ConfigError, EngineConfig};
use crate::gallery::GalleryModel;
use crate::loader::{ImageLoader, LoadError, LoadedImage, ProgressSink};
use crate::report::{EngineFailure, ErrorReporter};
use crate::search::{SearchCoordinator, SearchOutcome, SearchRequest, SearchResolution};
use crate::stamp::LoadToken;
use crate::tile::{LoadTicket, TileCompletion};

/// Search orchestration and tile-loading engine.
///
/// Create with [`new`](Self::new), then drive with [`run`](Self::run) on a
/// tokio task. Interact through the returned [`EngineHandle`].
pub struct ImageSearchEngine<S, L>
where
    S: crate::source::ImageSource + 'static,
    L: ImageLoader + 'static,
{
    state: EngineState<S, L>,
    events: mpsc::UnboundedReceiver<EngineEvent>,
}

/// Everything the loop mutates, separated from the receiver so the loop can
/// poll the channel while handlers borrow the state.
struct EngineState<S, L>
where
    S: crate::source::ImageSource + 'static,
    L: ImageLoader + 'static,
{
    config: EngineConfig,
    source: Arc<S>,
    loader: Arc<L>,
    reporter: Arc<dyn ErrorReporter>,
    coordinator: SearchCoordinator,
    gallery: GalleryModel,
    publisher: BindingPublisher,
    /// Weak so that dropping every handle closes the channel.
    events: mpsc::WeakUnboundedSender<EngineEvent>,
    /// Stop requested through a handle.
    stop: CancellationToken,
    /// Cancelled when the loop exits; every worker races it.
    workers: CancellationToken,
    pending_term: Option<String>,
    debounce_deadline: Option<Instant>,
}

impl<S, L> ImageSearchEngine<S, L>
where
    S: crate::source::ImageSource + 'static,
    L: ImageLoader + 'static,
{
    /// Creates an engine and the handle used to talk to it.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(
        config: EngineConfig,
        source: S,
        loader: L,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<(Self, EngineHandle), ConfigError> {
        config.validate()?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let gallery = GalleryModel::new(config.limit());
        let (publisher, bindings) = BindingPublisher::new(gallery.snapshot());
        let stop = CancellationToken::new();

        let state = EngineState {
            config,
            source: Arc::new(source),
            loader: Arc::new(loader),
            reporter,
            coordinator: SearchCoordinator::from_config(&config),
            gallery,
            publisher,
            events: events_tx.downgrade(),
            stop: stop.clone(),
            workers: CancellationToken::new(),
            pending_term: None,
            debounce_deadline: None,
        };

        let handle = EngineHandle::new(events_tx, bindings, stop);

        Ok((
            Self {
                state,
                events: events_rx,
            },
            handle,
        ))
    }

    /// Runs the event loop until `shutdown` is cancelled, a handle calls
    /// [`EngineHandle::shutdown`], or every handle is dropped.
    ///
    /// In-flight workers are cancelled on exit.
    pub async fn run(self, shutdown: CancellationToken) {
        let ImageSearchEngine {
            mut state,
            mut events,
        } = self;

        info!(
            capacity = state.config.limit(),
            fetch_limit = state.config.fetch_limit(),
            debounce_ms = state.config.debounce().as_millis() as u64,
            source = state.source.name(),
            loader = state.loader.name(),
            "Image search engine started"
        );

        let stop = state.stop.clone();

        loop {
            let deadline = state.debounce_deadline;

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,
                _ = stop.cancelled() => break,

                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() =>
                {
                    state.fire_debounced();
                }

                event = events.recv() => {
                    let Some(event) = event else { break };
                    trace!(event = event.kind(), "Engine event");
                    state.handle_event(event);
                }
            }
        }

        let abandoned_search = state.coordinator.is_searching();
        state.workers.cancel();
        state.coordinator.cancel_in_flight();
        info!(
            generation = %state.coordinator.current_generation(),
            abandoned_search = abandoned_search,
            "Image search engine stopped"
        );
    }
}

impl<S, L> EngineState<S, L>
where
    S: crate::source::ImageSource + 'static,
    L: ImageLoader + 'static,
{
    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::SetSearchTerm(term) => self.on_search_term(term),
            EngineEvent::Select { index, reply } => {
                let result = self.gallery.select(index);
                if let Ok(url) = &result {
                    info!(slot = index, url = url.as_str(), "Image chosen");
                    self.publisher.chosen_image_url(url.clone());
                } else {
                    debug!(slot = index, "Selection rejected");
                }
                // The requester may have given up waiting.
                let _ = reply.send(result);
            }
            EngineEvent::SearchCompleted(outcome) => self.on_search_completed(outcome),
            EngineEvent::TileProgress {
                slot,
                token,
                fraction,
            } => {
                if self.gallery.record_progress(slot, token, fraction) {
                    self.publish_gallery();
                }
            }
            EngineEvent::TileCompleted {
                slot,
                token,
                result,
            } => self.on_tile_completed(slot, token, result),
        }
    }

    fn on_search_term(&mut self, term: String) {
        self.publisher.search_term(term.clone());

        let debounce = self.config.debounce();
        if debounce.is_zero() {
            self.issue_search(&term);
        } else {
            trace!(term = term.as_str(), "Search term debounced");
            self.pending_term = Some(term);
            self.debounce_deadline = Some(Instant::now() + debounce);
        }
    }

    fn fire_debounced(&mut self) {
        self.debounce_deadline = None;
        if let Some(term) = self.pending_term.take() {
            self.issue_search(&term);
        }
    }

    fn issue_search(&mut self, term: &str) {
        let Some(request) = self.coordinator.set_search_term(term) else {
            return;
        };

        self.gallery.on_searching_pulse();
        self.publisher.pulse(SearchPulse {
            generation: request.generation,
            term: request.term.clone(),
        });
        self.publish_gallery();
        self.spawn_search(request);
    }

    fn on_search_completed(&mut self, outcome: SearchOutcome) {
        match self.coordinator.complete(outcome) {
            SearchResolution::Apply { generation, urls } => {
                let tickets = self.gallery.apply_results(&urls);
                debug!(
                    generation = %generation,
                    results = urls.len(),
                    loads = tickets.len(),
                    "Search results published"
                );
                self.publisher.result_urls(urls);
                self.publish_gallery();
                for ticket in tickets {
                    self.spawn_load(ticket);
                }
            }
            SearchResolution::Failed { generation, error } => {
                debug!(generation = %generation, error = %error, "Current search failed");
                self.gallery.settle_searching();
                self.publish_gallery();
                self.reporter.report(EngineFailure::Search(error));
            }
            SearchResolution::Stale { .. } => {}
        }
    }

    fn on_tile_completed(
        &mut self,
        slot: usize,
        token: LoadToken,
        result: Result<LoadedImage, LoadError>,
    ) {
        let url = self
            .gallery
            .tile(slot)
            .and_then(|tile| tile.assigned_url())
            .map(str::to_string)
            .unwrap_or_default();

        match self.gallery.complete_load(slot, token, result) {
            TileCompletion::Displayed => {
                trace!(slot = slot, token = %token, "Tile displayed");
                self.publish_gallery();
            }
            TileCompletion::Failed(error) => {
                debug!(slot = slot, url = url.as_str(), error = %error, "Tile load failed");
                self.publish_gallery();
                self.reporter
                    .report(EngineFailure::TileLoad { slot, url, error });
            }
            TileCompletion::Stale => {}
        }
    }

    fn publish_gallery(&self) {
        self.publisher.gallery(self.gallery.snapshot());
    }

    /// Runs a search on a worker task.
    ///
    /// A cancelled worker sends nothing. A worker whose generation was
    /// superseded while it ran skips the send; the coordinator would drop
    /// the outcome anyway.
    fn spawn_search(&self, request: SearchRequest) {
        let Some(events) = self.events.upgrade() else {
            return;
        };
        let source = Arc::clone(&self.source);
        let generations = self.coordinator.generations();
        let workers = self.workers.clone();

        tokio::spawn(async move {
            let SearchRequest {
                term,
                fetch_limit,
                generation,
                cancellation,
                ..
            } = request;

            let result = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    trace!(generation = %generation, "Search worker cancelled");
                    return;
                }
                _ = workers.cancelled() => return,
                result = source.search(&term, fetch_limit) => result,
            };

            if !generations.is_current(generation) {
                trace!(generation = %generation, "Search finished after being superseded");
                return;
            }

            let _ = events.send(EngineEvent::SearchCompleted(SearchOutcome {
                generation,
                result,
            }));
        });
    }

    /// Fetches one tile image on a worker task.
    fn spawn_load(&self, ticket: LoadTicket) {
        let Some(events) = self.events.upgrade() else {
            return;
        };
        let loader = Arc::clone(&self.loader);
        let workers = self.workers.clone();

        tokio::spawn(async move {
            let LoadTicket {
                slot,
                token,
                url,
                cancellation,
            } = ticket;

            let progress_events = events.clone();
            let progress = ProgressSink::new(move |fraction| {
                let _ = progress_events.send(EngineEvent::TileProgress {
                    slot,
                    token,
                    fraction,
                });
            });

            let result = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    trace!(slot = slot, token = %token, "Tile load cancelled");
                    return;
                }
                _ = workers.cancelled() => return,
                result = loader.fetch(&url, progress) => result,
            };

            let _ = events.send(EngineEvent::TileCompleted {
                slot,
                token,
                result,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NoOpReporter;
    use crate::source::StaticImageSource;
    use crate::tile::TileState;
    use std::time::Duration;

    /// Loader that answers immediately with a 1x1 image.
    struct InstantLoader;

    impl ImageLoader for InstantLoader {
        async fn fetch(&self, url: &str, progress: ProgressSink) -> Result<LoadedImage, LoadError> {
            progress.report(1.0);
            Ok(LoadedImage {
                url: url.to_string(),
                width: 1,
                height: 1,
                bytes: Arc::from(vec![0u8]),
            })
        }

        fn name(&self) -> &str {
            "instant"
        }
    }

    fn start(
        config: EngineConfig,
        urls: &[&str],
    ) -> (EngineHandle, CancellationToken, tokio::task::JoinHandle<()>) {
        let source = StaticImageSource::new(urls.iter().map(|u| u.to_string()).collect());
        let (engine, handle) =
            ImageSearchEngine::new(config, source, InstantLoader, Arc::new(NoOpReporter)).unwrap();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(engine.run(shutdown.clone()));
        (handle, shutdown, task)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = ImageSearchEngine::new(
            EngineConfig::new().with_limit(0),
            StaticImageSource::sample(),
            InstantLoader,
            Arc::new(NoOpReporter),
        );
        assert!(matches!(result, Err(ConfigError::ZeroLimit)));
    }

    #[tokio::test]
    async fn test_search_fills_gallery() {
        let config = EngineConfig::new().with_limit(3);
        let (handle, shutdown, task) = start(config, &["a", "b", "c", "d", "e"]);
        let mut gallery = handle.bindings().gallery();

        handle.set_search_term("x").unwrap();

        let snapshot = tokio::time::timeout(
            Duration::from_secs(5),
            gallery.wait_for(|g| g.count(TileState::Loaded) == 3),
        )
        .await
        .expect("gallery did not load")
        .unwrap()
        .clone();

        assert_eq!(snapshot.displayed_urls(), vec!["a", "b", "c"]);
        assert_eq!(*handle.bindings().result_urls().borrow(), vec!["a", "b", "c"]);

        shutdown.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_term_issues_nothing() {
        let (handle, shutdown, task) = start(EngineConfig::new().with_limit(2), &["a"]);
        let mut pulses = handle.bindings().subscribe_pulses();

        handle.set_search_term("").unwrap();
        handle.set_search_term("go").unwrap();

        let pulse = tokio::time::timeout(Duration::from_secs(5), pulses.recv())
            .await
            .expect("no pulse")
            .unwrap();
        assert_eq!(pulse.term, "go");
        assert_eq!(pulse.generation.value(), 1);

        shutdown.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_issues_only_last_term() {
        let config = EngineConfig::new()
            .with_limit(2)
            .with_debounce(Duration::from_millis(300));
        let (handle, shutdown, task) = start(config, &["a"]);
        let mut pulses = handle.bindings().subscribe_pulses();

        handle.set_search_term("c").unwrap();
        handle.set_search_term("ca").unwrap();
        handle.set_search_term("cat").unwrap();

        let pulse = pulses.recv().await.unwrap();
        assert_eq!(pulse.term, "cat");
        assert_eq!(pulse.generation.value(), 1);

        shutdown.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_shutdown_stops_loop() {
        let (handle, _shutdown, task) = start(EngineConfig::new(), &[]);
        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("engine did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropping_handles_stops_loop() {
        let (handle, _shutdown, task) = start(EngineConfig::new(), &[]);
        drop(handle);
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("engine did not stop")
            .unwrap();
    }
}
