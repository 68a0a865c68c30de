//! Engine runtime: spawns the engine loop and manages its lifecycle.
//!
//! # Usage
//!
//! ```ignore
//! use imagesearch::runtime::EngineRuntime;
//!
//! let runtime = EngineRuntime::start(config, source, loader, reporter)?;
//! let handle = runtime.handle();
//!
//! handle.set_search_term("empire state building")?;
//!
//! runtime.shutdown().await;
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::engine::ImageSearchEngine;
use super::handle::EngineHandle;
use crate::config::{ConfigError, EngineConfig};
use crate::loader::ImageLoader;
use crate::report::ErrorReporter;
use crate::source::ImageSource;

/// Owns the background engine task.
///
/// # Lifecycle
///
/// 1. **Creation**: `start()` builds the engine and spawns its loop
/// 2. **Operation**: hosts talk to it through `handle()`
/// 3. **Shutdown**: `shutdown()` cancels the loop and waits for it
pub struct EngineRuntime {
    handle: EngineHandle,
    engine_task: Option<JoinHandle<()>>,
    shutdown_token: CancellationToken,
}

impl EngineRuntime {
    /// Builds an engine from its collaborators and starts it.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn start<S, L>(
        config: EngineConfig,
        source: S,
        loader: L,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self, ConfigError>
    where
        S: ImageSource + 'static,
        L: ImageLoader + 'static,
    {
        info!("Starting image search runtime");

        let (engine, handle) = ImageSearchEngine::new(config, source, loader, reporter)?;

        let shutdown_token = CancellationToken::new();
        let engine_shutdown = shutdown_token.clone();
        let engine_task = Some(tokio::spawn(async move {
            engine.run(engine_shutdown).await;
        }));

        Ok(Self {
            handle,
            engine_task,
            shutdown_token,
        })
    }

    /// Handle for host requests. Clone freely.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Returns `false` once the engine loop has stopped.
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
            && self
                .engine_task
                .as_ref()
                .is_some_and(|task| !task.is_finished())
    }

    /// Token cancelled when the runtime shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Stops the engine and waits for its loop to exit.
    ///
    /// In-flight searches and image loads are cancelled; their results are
    /// never applied.
    pub async fn shutdown(mut self) {
        info!("Shutting down image search runtime");

        self.shutdown_token.cancel();

        if let Some(task) = self.engine_task.take() {
            match task.await {
                Ok(()) => info!("Engine loop shut down cleanly"),
                Err(e) => tracing::error!("Engine loop task panicked: {}", e),
            }
        }

        info!("Image search runtime stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadError, LoadedImage, ProgressSink};
    use crate::report::NoOpReporter;
    use crate::source::StaticImageSource;
    use std::time::Duration;

    /// Loader that never finishes.
    struct PendingLoader;

    impl ImageLoader for PendingLoader {
        async fn fetch(&self, _url: &str, _progress: ProgressSink) -> Result<LoadedImage, LoadError> {
            std::future::pending().await
        }

        fn name(&self) -> &str {
            "pending"
        }
    }

    fn start() -> EngineRuntime {
        EngineRuntime::start(
            EngineConfig::new().with_limit(4),
            StaticImageSource::sample(),
            PendingLoader,
            Arc::new(NoOpReporter),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_runtime_creation_and_shutdown() {
        let runtime = start();
        assert!(runtime.is_running());

        tokio::time::timeout(Duration::from_secs(5), runtime.shutdown())
            .await
            .expect("Shutdown should complete within 5 seconds");
    }

    #[tokio::test]
    async fn test_shutdown_with_loads_in_flight() {
        let runtime = start();
        let handle = runtime.handle();
        let mut result_urls = handle.bindings().result_urls();

        handle.set_search_term("anything").unwrap();
        tokio::time::timeout(Duration::from_secs(5), result_urls.changed())
            .await
            .expect("results never published")
            .unwrap();

        tokio::time::timeout(Duration::from_secs(5), runtime.shutdown())
            .await
            .expect("Shutdown should not wait for pending loads");

        assert!(!handle.is_running());
        assert!(handle.set_search_term("again").is_err());
    }

    #[tokio::test]
    async fn test_runtime_multiple_instances() {
        let runtime1 = start();
        let runtime2 = start();

        assert!(runtime1.is_running());
        assert!(runtime2.is_running());

        runtime2.shutdown().await;
        assert!(runtime1.is_running());
        runtime1.shutdown().await;
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let result = EngineRuntime::start(
            EngineConfig::new().with_per_row(0),
            StaticImageSource::sample(),
            PendingLoader,
            Arc::new(NoOpReporter),
        );
        assert!(matches!(result, Err(ConfigError::ZeroPerRow)));
    }
}
