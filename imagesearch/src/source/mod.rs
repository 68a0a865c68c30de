//! Image sources: turn a search term into an ordered list of image URLs.
//!
//! Every source implements [`ImageSource`]. Network-backed sources are
//! generic over [`AsyncHttpClient`](crate::http::AsyncHttpClient) so they can
//! be tested with a canned client.

mod factory;
mod fixed;
mod pexels;
mod throttle;
mod types;
mod wikipedia;

pub use factory::{AnySource, ProviderSource, SourceConfig, SourceFactory};
pub use fixed::{StaticImageSource, SAMPLE_URLS};
pub use pexels::{PexelsSource, PEXELS_API_URL};
pub use throttle::{ThrottledSource, DEFAULT_THROTTLE_MS};
pub use types::{ImageSource, SearchError, SearchErrorKind};
pub use wikipedia::{WikipediaSource, WIKIPEDIA_API_URL};
