//! Random-latency wrapper for exercising out-of-order completions.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use tracing::trace;

use super::types::{ImageSource, SearchError};

/// Default delay range in milliseconds.
pub const DEFAULT_THROTTLE_MS: RangeInclusive<u64> = 500..=2000;

/// Delays every search by a random amount before delegating.
///
/// With several searches in flight, the random delays make later requests
/// regularly finish before earlier ones, which is exactly the situation the
/// search coordinator's generation check exists for.
pub struct ThrottledSource<S: ImageSource> {
    inner: S,
    delay_ms: RangeInclusive<u64>,
}

impl<S: ImageSource> ThrottledSource<S> {
    /// Wraps `inner` with the default delay range.
    pub fn new(inner: S) -> Self {
        Self::with_delay_range(inner, DEFAULT_THROTTLE_MS)
    }

    /// Wraps `inner` with a custom delay range in milliseconds.
    pub fn with_delay_range(inner: S, delay_ms: RangeInclusive<u64>) -> Self {
        Self { inner, delay_ms }
    }

    /// Returns the wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn pick_delay(&self) -> Duration {
        let ms = if self.delay_ms.is_empty() {
            *self.delay_ms.start()
        } else {
            rand::thread_rng().gen_range(self.delay_ms.clone())
        };
        Duration::from_millis(ms)
    }
}

impl<S: ImageSource> ImageSource for ThrottledSource<S> {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        let delay = self.pick_delay();
        trace!(term = term, delay_ms = delay.as_millis() as u64, "Throttling search");
        tokio::time::sleep(delay).await;
        self.inner.search(term, limit).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticImageSource;

    #[test]
    fn test_delay_within_range() {
        let source = ThrottledSource::with_delay_range(StaticImageSource::sample(), 10..=20);
        for _ in 0..50 {
            let delay = source.pick_delay();
            assert!(delay >= Duration::from_millis(10));
            assert!(delay <= Duration::from_millis(20));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delegates_after_delay() {
        let inner = StaticImageSource::new(vec!["a".into()]);
        let source = ThrottledSource::new(inner);

        let started = tokio::time::Instant::now();
        let urls = source.search("x", 5).await.unwrap();

        assert_eq!(urls, vec!["a"]);
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert_eq!(source.name(), "Static");
    }
}
