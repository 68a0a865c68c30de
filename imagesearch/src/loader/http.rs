//! HTTP image loader.

use std::sync::Arc;

use tracing::{debug, trace};

use super::types::{ImageLoader, LoadError, LoadedImage, ProgressSink};
use crate::http::AsyncHttpClient;

/// Downloads images over HTTP and verifies that they decode.
///
/// The body is streamed so progress can be reported while it arrives.
/// Decoding is CPU-bound and runs on the blocking pool.
pub struct HttpImageLoader<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> HttpImageLoader<C> {
    /// Creates a loader using the given HTTP client.
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }
}

impl<C: AsyncHttpClient> ImageLoader for HttpImageLoader<C> {
    async fn fetch(&self, url: &str, progress: ProgressSink) -> Result<LoadedImage, LoadError> {
        progress.report(0.0);

        let body = self
            .http_client
            .get_streaming(url, |received, total| {
                if let Some(total) = total.filter(|t| *t > 0) {
                    progress.report(received as f32 / total as f32);
                }
            })
            .await?;

        trace!(url = url, bytes = body.len(), "Image downloaded, decoding");

        let bytes: Arc<[u8]> = Arc::from(body);
        let to_decode = Arc::clone(&bytes);
        let (width, height) = tokio::task::spawn_blocking(move || decode_dimensions(&to_decode))
            .await
            .map_err(|e| LoadError::Decode(format!("decode task failed: {}", e)))??;

        progress.report(1.0);
        debug!(url = url, width = width, height = height, "Image loaded");

        Ok(LoadedImage {
            url: url.to_string(),
            width,
            height,
            bytes,
        })
    }

    fn name(&self) -> &str {
        "HTTP"
    }
}

/// Decodes the image and returns its dimensions.
fn decode_dimensions(data: &[u8]) -> Result<(u32, u32), LoadError> {
    let img = image::load_from_memory(data).map_err(|e| LoadError::Decode(e.to_string()))?;
    Ok((img.width(), img.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockAsyncHttpClient;
    use crate::http::HttpError;
    use crate::loader::LoadErrorKind;
    use std::io::Cursor;
    use std::sync::Mutex;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn test_fetch_decodes_dimensions() {
        let png = png_bytes(4, 3);
        let loader = HttpImageLoader::new(MockAsyncHttpClient::ok(png.clone()));

        let image = loader
            .fetch("http://img/a.png", ProgressSink::discard())
            .await
            .unwrap();

        assert_eq!(image.url, "http://img/a.png");
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(image.bytes.len(), png.len());
    }

    #[tokio::test]
    async fn test_fetch_reports_progress() {
        let loader = HttpImageLoader::new(MockAsyncHttpClient::ok(png_bytes(2, 2)));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            ProgressSink::new(move |f| seen.lock().unwrap().push(f))
        };

        loader.fetch("http://img/b.png", sink).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.first(), Some(&0.0));
        assert_eq!(seen.last(), Some(&1.0));
        assert!(seen.iter().any(|f| *f > 0.0 && *f < 1.0));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let loader = HttpImageLoader::new(MockAsyncHttpClient::ok(b"not an image".to_vec()));
        let err = loader
            .fetch("http://img/c.ogg", ProgressSink::discard())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::DecodeFailure);
    }

    #[tokio::test]
    async fn test_network_failure() {
        let loader = HttpImageLoader::new(MockAsyncHttpClient::err(HttpError::Request {
            url: "http://img/d.jpg".into(),
            reason: "connection refused".into(),
        }));
        let err = loader
            .fetch("http://img/d.jpg", ProgressSink::discard())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::NetworkFailure);
        assert_eq!(loader.name(), "HTTP");
    }
}
