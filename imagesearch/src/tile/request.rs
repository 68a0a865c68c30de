//! Load requests handed out by a tile and their completion results.

use tokio_util::sync::CancellationToken;

use crate::loader::LoadError;
use crate::stamp::LoadToken;

/// Instruction to fetch one image for one slot.
///
/// Issued by [`TileLoader::load_image`](super::TileLoader::load_image). The
/// fetch result must be handed back together with `token`; the tile drops
/// it if the slot has moved on in the meantime.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    /// Slot index the load belongs to
    pub slot: usize,
    /// Token stamped on this load
    pub token: LoadToken,
    /// Image to fetch
    pub url: String,
    /// Cancelled when the load is superseded or the slot is cleared
    pub cancellation: CancellationToken,
}

/// What happened when a load result was handed back to its tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileCompletion {
    /// The image is now displayed.
    Displayed,
    /// The current load failed; the slot was cleared.
    Failed(LoadError),
    /// The load had been superseded; nothing changed.
    Stale,
}
