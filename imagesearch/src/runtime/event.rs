//! Messages processed by the engine's event loop.
//!
//! Host requests (through [`EngineHandle`](super::EngineHandle)) and worker
//! completions arrive on the same channel, so the loop sees them in a single
//! order and applies them one at a time.

use tokio::sync::oneshot;

use crate::loader::{LoadError, LoadedImage};
use crate::search::SearchOutcome;
use crate::stamp::LoadToken;
use crate::tile::SelectError;

/// Reply channel for a tile selection.
pub type SelectReply = oneshot::Sender<Result<String, SelectError>>;

/// Input to the engine loop.
#[derive(Debug)]
pub enum EngineEvent {
    /// The host changed the search term.
    SetSearchTerm(String),

    /// The user activated a tile.
    Select { index: usize, reply: SelectReply },

    /// A search worker finished.
    SearchCompleted(SearchOutcome),

    /// A tile worker received more of its image.
    TileProgress {
        slot: usize,
        token: LoadToken,
        fraction: f32,
    },

    /// A tile worker finished.
    TileCompleted {
        slot: usize,
        token: LoadToken,
        result: Result<LoadedImage, LoadError>,
    },
}

impl EngineEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::SetSearchTerm(_) => "set_search_term",
            EngineEvent::Select { .. } => "select",
            EngineEvent::SearchCompleted(_) => "search_completed",
            EngineEvent::TileProgress { .. } => "tile_progress",
            EngineEvent::TileCompleted { .. } => "tile_completed",
        }
    }
}
