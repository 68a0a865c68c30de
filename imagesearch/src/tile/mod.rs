//! Gallery tiles: the load lifecycle of a single slot.
//!
//! A [`TileLoader`] never performs I/O itself. It hands out a [`LoadTicket`]
//! describing what to fetch and later receives the result through
//! [`TileLoader::complete`]. This keeps every state change on the engine's
//! single interactive context, while the fetches run elsewhere.
//!
//! ```text
//!  load_image(url) ──► LoadTicket{token} ──► worker fetches url
//!                                                   │
//!  complete(token, result) ◄────────────────────────┘
//!     token == current ? apply : drop
//! ```

mod error;
mod loader;
mod request;

pub use error::SelectError;
pub use loader::{SelectableTile, TileLoader, TileSnapshot, TileState};
pub use request::{LoadTicket, TileCompletion};
