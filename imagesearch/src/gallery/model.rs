//! Fixed-capacity gallery of tiles.

use tracing::{debug, trace};

use crate::loader::{LoadError, LoadedImage};
use crate::stamp::LoadToken;
use crate::tile::{LoadTicket, SelectError, TileCompletion, TileLoader, TileSnapshot, TileState};

/// Point-in-time view of the whole gallery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GallerySnapshot {
    pub tiles: Vec<TileSnapshot>,
}

impl GallerySnapshot {
    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.tiles.len()
    }

    /// Number of slots in `state`.
    pub fn count(&self, state: TileState) -> usize {
        self.tiles.iter().filter(|t| t.state == state).count()
    }

    /// Returns true once no slot is waiting on a load.
    pub fn is_settled(&self) -> bool {
        self.count(TileState::Loading) == 0
    }

    /// URLs of the displayed images, in slot order.
    pub fn displayed_urls(&self) -> Vec<String> {
        self.tiles
            .iter()
            .filter_map(|t| t.displayed_url.clone())
            .collect()
    }
}

/// Arena of `capacity` tiles indexed by slot position.
///
/// The arena is allocated once and never resized. Each slot's tile is reused
/// across unrelated result sets; only its internal state is reset.
#[derive(Debug)]
pub struct GalleryModel {
    tiles: Vec<TileLoader>,
}

impl GalleryModel {
    /// Creates a gallery of `capacity` idle tiles.
    pub fn new(capacity: usize) -> Self {
        Self {
            tiles: (0..capacity).map(TileLoader::new).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, index: usize) -> Option<&TileLoader> {
        self.tiles.get(index)
    }

    /// Assigns `urls` to slots in order and clears the slots left over.
    ///
    /// URLs beyond the capacity are ignored. Returns the loads to issue;
    /// slots whose assignment did not change produce none.
    pub fn apply_results(&mut self, urls: &[String]) -> Vec<LoadTicket> {
        let mut tickets = Vec::new();

        for (index, tile) in self.tiles.iter_mut().enumerate() {
            match urls.get(index) {
                Some(url) => tickets.extend(tile.load_image(url)),
                None => tile.clear(),
            }
        }

        debug!(
            urls = urls.len(),
            capacity = self.tiles.len(),
            loads = tickets.len(),
            "Gallery results applied"
        );
        tickets
    }

    /// Shows the searching spinner on every slot.
    pub fn on_searching_pulse(&mut self) {
        for tile in &mut self.tiles {
            tile.show_searching();
        }
    }

    /// Removes searching spinners not followed by a new assignment.
    pub fn settle_searching(&mut self) {
        for tile in &mut self.tiles {
            tile.settle_searching();
        }
    }

    /// Hands a load result to the slot it belongs to.
    pub fn complete_load(
        &mut self,
        slot: usize,
        token: LoadToken,
        result: Result<LoadedImage, LoadError>,
    ) -> TileCompletion {
        match self.tiles.get_mut(slot) {
            Some(tile) => tile.complete(token, result),
            None => {
                trace!(slot = slot, "Load completion for unknown slot");
                TileCompletion::Stale
            }
        }
    }

    /// Records download progress. Returns true if the slot needs redrawing.
    pub fn record_progress(&mut self, slot: usize, token: LoadToken, fraction: f32) -> bool {
        self.tiles
            .get_mut(slot)
            .is_some_and(|tile| tile.record_progress(token, fraction))
    }

    /// Returns the URL to publish when the user picks slot `index`.
    pub fn select(&self, index: usize) -> Result<String, SelectError> {
        self.tiles
            .get(index)
            .ok_or(SelectError::OutOfRange {
                index,
                capacity: self.tiles.len(),
            })?
            .select()
    }

    /// URLs of the displayed images, in slot order.
    pub fn displayed_urls(&self) -> Vec<String> {
        self.tiles
            .iter()
            .filter_map(|t| t.displayed_url().map(str::to_string))
            .collect()
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            tiles: self.tiles.iter().map(TileLoader::snapshot).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn image(url: &str) -> LoadedImage {
        LoadedImage {
            url: url.to_string(),
            width: 1,
            height: 1,
            bytes: Arc::from(vec![0u8]),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn complete_all(gallery: &mut GalleryModel, tickets: &[LoadTicket]) {
        for ticket in tickets {
            gallery.complete_load(ticket.slot, ticket.token, Ok(image(&ticket.url)));
        }
    }

    #[test]
    fn test_new_gallery_is_idle() {
        let gallery = GalleryModel::new(4);
        assert_eq!(gallery.capacity(), 4);
        assert_eq!(gallery.snapshot().count(TileState::Idle), 4);
        assert!(gallery.tile(4).is_none());
    }

    #[test]
    fn test_apply_results_assigns_in_order() {
        let mut gallery = GalleryModel::new(3);
        let tickets = gallery.apply_results(&strings(&["a", "b", "c"]));

        assert_eq!(tickets.len(), 3);
        assert_eq!(
            tickets.iter().map(|t| t.slot).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(gallery.snapshot().count(TileState::Loading), 3);

        complete_all(&mut gallery, &tickets);
        assert_eq!(gallery.displayed_urls(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_apply_empty_clears_everything() {
        let mut gallery = GalleryModel::new(3);
        let tickets = gallery.apply_results(&strings(&["a", "b"]));
        complete_all(&mut gallery, &tickets);

        assert!(gallery.apply_results(&[]).is_empty());
        let snapshot = gallery.snapshot();
        assert_eq!(snapshot.count(TileState::Cleared), 3);
        assert!(snapshot.displayed_urls().is_empty());
    }

    #[test]
    fn test_short_result_clears_trailing_slots() {
        let mut gallery = GalleryModel::new(4);
        gallery.apply_results(&strings(&["a", "b"]));

        let snapshot = gallery.snapshot();
        assert_eq!(snapshot.tiles[0].state, TileState::Loading);
        assert_eq!(snapshot.tiles[1].state, TileState::Loading);
        assert_eq!(snapshot.tiles[2].state, TileState::Cleared);
        assert_eq!(snapshot.tiles[3].state, TileState::Cleared);
    }

    #[test]
    fn test_excess_urls_ignored() {
        let mut gallery = GalleryModel::new(2);
        let tickets = gallery.apply_results(&strings(&["a", "b", "c"]));
        assert_eq!(tickets.len(), 2);
    }

    #[test]
    fn test_reapply_same_urls_is_idempotent() {
        let mut gallery = GalleryModel::new(2);
        let tickets = gallery.apply_results(&strings(&["a", "b"]));
        complete_all(&mut gallery, &tickets);

        let tickets = gallery.apply_results(&strings(&["a", "c"]));
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].slot, 1);
        assert_eq!(gallery.tile(0).unwrap().state(), TileState::Loaded);
    }

    #[test]
    fn test_pulse_and_settle() {
        let mut gallery = GalleryModel::new(2);
        let tickets = gallery.apply_results(&strings(&["a"]));
        complete_all(&mut gallery, &tickets);

        gallery.on_searching_pulse();
        assert_eq!(gallery.snapshot().count(TileState::Loading), 2);

        gallery.settle_searching();
        let snapshot = gallery.snapshot();
        assert_eq!(snapshot.tiles[0].state, TileState::Loaded);
        assert_eq!(snapshot.tiles[1].state, TileState::Cleared);
    }

    #[test]
    fn test_failed_load_clears_only_that_slot() {
        let mut gallery = GalleryModel::new(2);
        let tickets = gallery.apply_results(&strings(&["a", "b"]));

        gallery.complete_load(tickets[0].slot, tickets[0].token, Ok(image("a")));
        let completion = gallery.complete_load(
            tickets[1].slot,
            tickets[1].token,
            Err(LoadError::Network("refused".into())),
        );

        assert!(matches!(completion, TileCompletion::Failed(_)));
        let snapshot = gallery.snapshot();
        assert_eq!(snapshot.tiles[0].state, TileState::Loaded);
        assert_eq!(snapshot.tiles[1].state, TileState::Cleared);
    }

    #[test]
    fn test_unknown_slot_completion_is_stale() {
        let mut gallery = GalleryModel::new(1);
        assert_eq!(
            gallery.complete_load(5, LoadToken::new(1), Ok(image("a"))),
            TileCompletion::Stale
        );
        assert!(!gallery.record_progress(5, LoadToken::new(1), 0.5));
    }

    #[test]
    fn test_select() {
        let mut gallery = GalleryModel::new(2);
        let tickets = gallery.apply_results(&strings(&["a", "b"]));
        gallery.complete_load(tickets[0].slot, tickets[0].token, Ok(image("a")));

        assert_eq!(gallery.select(0), Ok("a".to_string()));
        assert_eq!(
            gallery.select(1),
            Err(SelectError::NotLoaded {
                index: 1,
                state: TileState::Loading
            })
        );
        assert_eq!(
            gallery.select(2),
            Err(SelectError::OutOfRange {
                index: 2,
                capacity: 2
            })
        );
    }

    #[test]
    fn test_snapshot_settled() {
        let mut gallery = GalleryModel::new(2);
        let tickets = gallery.apply_results(&strings(&["a"]));
        assert!(!gallery.snapshot().is_settled());
        complete_all(&mut gallery, &tickets);
        assert!(gallery.snapshot().is_settled());
    }
}
