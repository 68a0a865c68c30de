//! Image loaders: fetch and decode the image behind one gallery tile.

mod http;
mod types;

pub use http::HttpImageLoader;
pub use types::{ImageLoader, LoadError, LoadErrorKind, LoadedImage, ProgressSink};
