//! The gallery: a fixed arena of tiles fed by search results.

mod model;

pub use model::{GalleryModel, GallerySnapshot};
