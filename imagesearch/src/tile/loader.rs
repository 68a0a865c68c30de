//! Per-slot load state machine.

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::error::SelectError;
use super::request::{LoadTicket, TileCompletion};
use crate::loader::{LoadError, LoadedImage};
use crate::stamp::LoadToken;

/// Displayed state of a gallery slot.
///
/// ```text
///   Idle ──load──► Loading ──ok──► Loaded ──load──► Loading
///                     │                │
///                     └─err─► Cleared ◄┘ clear
///                                │
///                                └──load──► Loading
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TileState {
    /// Nothing has ever been assigned.
    #[default]
    Idle,
    /// Spinner shown.
    Loading,
    /// Image shown.
    Loaded,
    /// No image and no spinner.
    Cleared,
}

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileState::Idle => write!(f, "idle"),
            TileState::Loading => write!(f, "loading"),
            TileState::Loaded => write!(f, "loaded"),
            TileState::Cleared => write!(f, "cleared"),
        }
    }
}

/// Point-in-time view of one slot, for hosts and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSnapshot {
    pub index: usize,
    pub state: TileState,
    pub assigned_url: Option<String>,
    pub displayed_url: Option<String>,
    /// Download progress of the current load, if one is in flight.
    pub progress: Option<f32>,
    /// Pixel dimensions of the displayed image.
    pub dimensions: Option<(u32, u32)>,
}

/// Proof that a tile is showing a loaded image.
///
/// Only [`TileLoader::selectable`] can construct one, and only while the
/// tile is [`TileState::Loaded`], so a selection can never publish a spinner
/// or an empty slot.
#[derive(Debug)]
pub struct SelectableTile<'a> {
    index: usize,
    url: &'a str,
    image: &'a LoadedImage,
}

impl<'a> SelectableTile<'a> {
    /// Slot index of the tile.
    pub fn index(&self) -> usize {
        self.index
    }

    /// URL of the displayed image.
    pub fn url(&self) -> &'a str {
        self.url
    }

    /// The displayed image.
    pub fn image(&self) -> &'a LoadedImage {
        self.image
    }

    /// Consumes the proof, yielding the URL to publish.
    pub fn into_url(self) -> String {
        self.url.to_string()
    }
}

/// Load lifecycle of one gallery slot.
///
/// Every [`load_image`](Self::load_image) and [`clear`](Self::clear) bumps
/// the slot's [`LoadToken`]. A result handed to [`complete`](Self::complete)
/// is applied only if it carries the current token; the comparison and the
/// state change happen in the same `&mut self` call.
#[derive(Debug)]
pub struct TileLoader {
    index: usize,
    state: TileState,
    assigned_url: Option<String>,
    /// The assigned URL whose load produced `image`. Loaders may report a
    /// redirected URL in the image itself; the slot keeps its own.
    displayed_url: Option<String>,
    image: Option<LoadedImage>,
    token: LoadToken,
    in_flight: Option<CancellationToken>,
    progress: Option<f32>,
    /// State to return to when a searching spinner is settled without a
    /// new assignment. `Some` only while the pulse spinner is shown.
    resume: Option<TileState>,
}

impl TileLoader {
    /// Creates an idle tile for slot `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            state: TileState::Idle,
            assigned_url: None,
            displayed_url: None,
            image: None,
            token: LoadToken::default(),
            in_flight: None,
            progress: None,
            resume: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    /// The current load token.
    pub fn token(&self) -> LoadToken {
        self.token
    }

    pub fn assigned_url(&self) -> Option<&str> {
        self.assigned_url.as_deref()
    }

    /// URL of the image currently shown, if any.
    pub fn displayed_url(&self) -> Option<&str> {
        self.displayed_url.as_deref()
    }

    /// Returns true while a load for the current token is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Assigns `url` to the slot.
    ///
    /// Returns the load to issue, or `None` if nothing needs fetching:
    /// either `url` is already displayed (the tile goes back to `Loaded`,
    /// abandoning any other load in flight) or `url` is already loading.
    pub fn load_image(&mut self, url: &str) -> Option<LoadTicket> {
        self.resume = None;

        if self.displayed_url() == Some(url) {
            if self.in_flight.is_some() {
                self.invalidate();
            }
            self.state = TileState::Loaded;
            self.assigned_url = Some(url.to_string());
            trace!(slot = self.index, url = url, "Tile already displays URL");
            return None;
        }

        if self.in_flight.is_some() && self.assigned_url.as_deref() == Some(url) {
            self.state = TileState::Loading;
            trace!(slot = self.index, url = url, "Tile already loading URL");
            return None;
        }

        self.invalidate();

        let cancellation = CancellationToken::new();
        self.in_flight = Some(cancellation.clone());
        self.state = TileState::Loading;
        self.assigned_url = Some(url.to_string());
        self.progress = Some(0.0);

        trace!(slot = self.index, token = %self.token, url = url, "Tile load issued");

        Some(LoadTicket {
            slot: self.index,
            token: self.token,
            url: url.to_string(),
            cancellation,
        })
    }

    /// Applies the result of the load stamped with `token`.
    pub fn complete(
        &mut self,
        token: LoadToken,
        result: Result<LoadedImage, LoadError>,
    ) -> TileCompletion {
        if token != self.token || self.in_flight.is_none() {
            trace!(
                slot = self.index,
                token = %token,
                current = %self.token,
                "Discarding superseded tile load"
            );
            return TileCompletion::Stale;
        }

        self.in_flight = None;
        self.progress = None;
        self.resume = None;

        match result {
            Ok(image) => {
                self.displayed_url = self.assigned_url.clone();
                self.image = Some(image);
                self.state = TileState::Loaded;
                TileCompletion::Displayed
            }
            Err(error) => {
                self.assigned_url = None;
                self.displayed_url = None;
                self.image = None;
                self.state = TileState::Cleared;
                TileCompletion::Failed(error)
            }
        }
    }

    /// Records download progress for the load stamped with `token`.
    ///
    /// Returns true if the whole-percent progress changed, i.e. the tile
    /// needs redrawing. Progress of a superseded load is dropped.
    pub fn record_progress(&mut self, token: LoadToken, fraction: f32) -> bool {
        if token != self.token || self.in_flight.is_none() {
            return false;
        }
        let before = self.progress.map(whole_percent);
        let fraction = fraction.clamp(0.0, 1.0);
        self.progress = Some(fraction);
        before != Some(whole_percent(fraction))
    }

    /// Empties the slot, abandoning any load in flight.
    pub fn clear(&mut self) {
        self.invalidate();
        self.state = TileState::Cleared;
        self.assigned_url = None;
        self.displayed_url = None;
        self.image = None;
        self.resume = None;
    }

    /// Shows the searching spinner over whatever the slot currently holds.
    pub fn show_searching(&mut self) {
        if self.in_flight.is_some() || self.resume.is_some() {
            return;
        }
        self.resume = Some(self.state);
        self.state = TileState::Loading;
    }

    /// Removes a searching spinner that was not followed by an assignment.
    pub fn settle_searching(&mut self) {
        if let Some(previous) = self.resume.take() {
            self.state = previous;
        }
    }

    /// Returns a selection proof if the tile shows a loaded image.
    pub fn selectable(&self) -> Option<SelectableTile<'_>> {
        match (self.state, &self.image, &self.displayed_url) {
            (TileState::Loaded, Some(image), Some(url)) => Some(SelectableTile {
                index: self.index,
                url,
                image,
            }),
            _ => None,
        }
    }

    /// Returns the URL to publish for a user selection of this tile.
    pub fn select(&self) -> Result<String, SelectError> {
        self.selectable()
            .map(SelectableTile::into_url)
            .ok_or(SelectError::NotLoaded {
                index: self.index,
                state: self.state,
            })
    }

    pub fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            index: self.index,
            state: self.state,
            assigned_url: self.assigned_url.clone(),
            displayed_url: self.displayed_url().map(str::to_string),
            progress: self.progress,
            dimensions: self.image.as_ref().map(|img| (img.width, img.height)),
        }
    }

    /// Bumps the token and cancels the load in flight, if any.
    fn invalidate(&mut self) {
        self.token = self.token.next();
        self.progress = None;
        if let Some(cancellation) = self.in_flight.take() {
            cancellation.cancel();
        }
    }
}

fn whole_percent(fraction: f32) -> u8 {
    (fraction * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn image(url: &str) -> LoadedImage {
        LoadedImage {
            url: url.to_string(),
            width: 8,
            height: 6,
            bytes: Arc::from(vec![0u8; 4]),
        }
    }

    fn loaded(url: &str) -> TileLoader {
        let mut tile = TileLoader::new(0);
        let ticket = tile.load_image(url).unwrap();
        assert_eq!(tile.complete(ticket.token, Ok(image(url))), TileCompletion::Displayed);
        tile
    }

    #[test]
    fn test_new_tile_is_idle() {
        let tile = TileLoader::new(3);
        assert_eq!(tile.index(), 3);
        assert_eq!(tile.state(), TileState::Idle);
        assert!(tile.displayed_url().is_none());
        assert!(!tile.is_loading());
    }

    #[test]
    fn test_load_then_complete() {
        let mut tile = TileLoader::new(0);
        let ticket = tile.load_image("a").unwrap();

        assert_eq!(ticket.slot, 0);
        assert_eq!(ticket.url, "a");
        assert_eq!(tile.state(), TileState::Loading);
        assert_eq!(tile.assigned_url(), Some("a"));
        assert!(tile.displayed_url().is_none());

        assert_eq!(
            tile.complete(ticket.token, Ok(image("a"))),
            TileCompletion::Displayed
        );
        assert_eq!(tile.state(), TileState::Loaded);
        assert_eq!(tile.displayed_url(), Some("a"));
        assert!(!tile.is_loading());
    }

    #[test]
    fn test_reassignment_supersedes_and_cancels() {
        let mut tile = TileLoader::new(0);
        let first = tile.load_image("a").unwrap();
        let second = tile.load_image("b").unwrap();

        assert!(first.cancellation.is_cancelled());
        assert!(!second.cancellation.is_cancelled());
        assert!(second.token > first.token);

        // B finishes first, then the stale A arrives.
        assert_eq!(
            tile.complete(second.token, Ok(image("b"))),
            TileCompletion::Displayed
        );
        assert_eq!(
            tile.complete(first.token, Ok(image("a"))),
            TileCompletion::Stale
        );
        assert_eq!(tile.displayed_url(), Some("b"));
    }

    #[test]
    fn test_stale_completion_before_current_is_ignored() {
        let mut tile = TileLoader::new(0);
        let first = tile.load_image("a").unwrap();
        let second = tile.load_image("b").unwrap();

        assert_eq!(
            tile.complete(first.token, Ok(image("a"))),
            TileCompletion::Stale
        );
        assert_eq!(tile.state(), TileState::Loading);
        assert!(tile.displayed_url().is_none());

        tile.complete(second.token, Ok(image("b")));
        assert_eq!(tile.displayed_url(), Some("b"));
    }

    #[test]
    fn test_same_url_displayed_is_idempotent() {
        let mut tile = loaded("a");
        let token = tile.token();

        assert!(tile.load_image("a").is_none());
        assert_eq!(tile.state(), TileState::Loaded);
        assert_eq!(tile.token(), token);
    }

    #[test]
    fn test_same_url_loading_keeps_load() {
        let mut tile = TileLoader::new(0);
        let ticket = tile.load_image("a").unwrap();

        assert!(tile.load_image("a").is_none());
        assert!(!ticket.cancellation.is_cancelled());
        assert_eq!(
            tile.complete(ticket.token, Ok(image("a"))),
            TileCompletion::Displayed
        );
    }

    #[test]
    fn test_back_to_displayed_url_abandons_other_load() {
        let mut tile = loaded("a");
        let ticket = tile.load_image("b").unwrap();

        assert!(tile.load_image("a").is_none());
        assert!(ticket.cancellation.is_cancelled());
        assert_eq!(tile.state(), TileState::Loaded);
        assert_eq!(
            tile.complete(ticket.token, Ok(image("b"))),
            TileCompletion::Stale
        );
        assert_eq!(tile.displayed_url(), Some("a"));
    }

    #[test]
    fn test_displayed_url_is_the_assigned_one() {
        let mut tile = TileLoader::new(0);
        let ticket = tile.load_image("http://img/a").unwrap();

        // The loader followed a redirect and reports the final location.
        tile.complete(ticket.token, Ok(image("http://cdn/a?w=200")));

        assert_eq!(tile.displayed_url(), Some("http://img/a"));
        assert_eq!(tile.select(), Ok("http://img/a".to_string()));
        assert!(tile.load_image("http://img/a").is_none());
        assert_eq!(tile.state(), TileState::Loaded);
    }

    #[test]
    fn test_failure_clears_slot() {
        let mut tile = TileLoader::new(0);
        let ticket = tile.load_image("a").unwrap();

        let completion = tile.complete(ticket.token, Err(LoadError::Decode("bad".into())));
        assert_eq!(
            completion,
            TileCompletion::Failed(LoadError::Decode("bad".into()))
        );
        assert_eq!(tile.state(), TileState::Cleared);
        assert!(tile.assigned_url().is_none());
        assert!(!tile.is_loading());
    }

    #[test]
    fn test_clear_invalidates_in_flight_load() {
        let mut tile = TileLoader::new(0);
        let ticket = tile.load_image("a").unwrap();

        tile.clear();
        assert!(ticket.cancellation.is_cancelled());
        assert_eq!(tile.state(), TileState::Cleared);
        assert_eq!(
            tile.complete(ticket.token, Ok(image("a"))),
            TileCompletion::Stale
        );
        assert!(tile.displayed_url().is_none());
    }

    #[test]
    fn test_clear_then_reload() {
        let mut tile = loaded("a");
        tile.clear();
        assert!(tile.displayed_url().is_none());

        let ticket = tile.load_image("a").unwrap();
        assert_eq!(tile.state(), TileState::Loading);
        tile.complete(ticket.token, Ok(image("a")));
        assert_eq!(tile.state(), TileState::Loaded);
    }

    #[test]
    fn test_progress_only_for_current_token() {
        let mut tile = TileLoader::new(0);
        let first = tile.load_image("a").unwrap();
        let second = tile.load_image("b").unwrap();

        assert!(!tile.record_progress(first.token, 0.9));
        assert!(tile.record_progress(second.token, 0.4));
        assert_eq!(tile.snapshot().progress, Some(0.4));
    }

    #[test]
    fn test_progress_reports_whole_percent_changes() {
        let mut tile = TileLoader::new(0);
        let ticket = tile.load_image("a").unwrap();

        assert!(!tile.record_progress(ticket.token, 0.0));
        assert!(tile.record_progress(ticket.token, 0.101));
        assert!(!tile.record_progress(ticket.token, 0.102));
        assert!(!tile.record_progress(ticket.token, 0.104));
        assert!(tile.record_progress(ticket.token, 0.11));
        assert_eq!(tile.snapshot().progress, Some(0.11));
    }

    #[test]
    fn test_searching_spinner_and_settle() {
        let mut tile = loaded("a");

        tile.show_searching();
        assert_eq!(tile.state(), TileState::Loading);
        assert_eq!(tile.displayed_url(), Some("a"));
        assert!(tile.selectable().is_none());

        tile.settle_searching();
        assert_eq!(tile.state(), TileState::Loaded);
        assert!(tile.selectable().is_some());
    }

    #[test]
    fn test_searching_spinner_then_same_url() {
        let mut tile = loaded("a");
        tile.show_searching();

        assert!(tile.load_image("a").is_none());
        assert_eq!(tile.state(), TileState::Loaded);

        // Nothing left to settle.
        tile.settle_searching();
        assert_eq!(tile.state(), TileState::Loaded);
    }

    #[test]
    fn test_searching_spinner_on_idle_tile() {
        let mut tile = TileLoader::new(0);
        tile.show_searching();
        assert_eq!(tile.state(), TileState::Loading);
        tile.settle_searching();
        assert_eq!(tile.state(), TileState::Idle);
    }

    #[test]
    fn test_select_requires_loaded() {
        let mut tile = TileLoader::new(2);
        assert_eq!(
            tile.select(),
            Err(SelectError::NotLoaded {
                index: 2,
                state: TileState::Idle
            })
        );

        let ticket = tile.load_image("a").unwrap();
        assert!(matches!(
            tile.select(),
            Err(SelectError::NotLoaded {
                state: TileState::Loading,
                ..
            })
        ));

        tile.complete(ticket.token, Ok(image("a")));
        assert_eq!(tile.select(), Ok("a".to_string()));

        tile.clear();
        assert!(tile.select().is_err());
    }

    #[test]
    fn test_selectable_tile_accessors() {
        let tile = loaded("a");
        let selectable = tile.selectable().unwrap();
        assert_eq!(selectable.index(), 0);
        assert_eq!(selectable.url(), "a");
        assert_eq!(selectable.image().width, 8);
    }

    #[test]
    fn test_snapshot() {
        let tile = loaded("a");
        let snapshot = tile.snapshot();
        assert_eq!(snapshot.index, 0);
        assert_eq!(snapshot.state, TileState::Loaded);
        assert_eq!(snapshot.displayed_url.as_deref(), Some("a"));
        assert_eq!(snapshot.dimensions, Some((8, 6)));
        assert_eq!(snapshot.progress, None);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TileState::Cleared.to_string(), "cleared");
    }
}
