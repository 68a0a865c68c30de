//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization, config loading, the async runtime
//! and engine creation to reduce duplication across command handlers.

use std::future::Future;
use std::sync::Arc;

use imagesearch::config::{ConfigFile, EngineConfig};
use imagesearch::http::AsyncReqwestClient;
use imagesearch::loader::HttpImageLoader;
use imagesearch::logging::{init_logging_full, split_log_path, LoggingGuard};
use imagesearch::report::{ChannelReporter, EngineFailure, ErrorReporter, TracingReporter};
use imagesearch::runtime::EngineRuntime;
use imagesearch::source::{SourceConfig, SourceFactory};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::info;

use crate::error::CliError;

/// Reporter used by the CLI: logs every failure and forwards it to the
/// command so it can be shown to the user.
struct CliReporter {
    log: TracingReporter,
    forward: ChannelReporter,
}

impl ErrorReporter for CliReporter {
    fn report(&self, failure: EngineFailure) {
        self.log.report(failure.clone());
        self.forward.report(failure);
    }
}

/// A started engine plus the receiver of its failures.
pub struct StartedEngine {
    pub runtime: EngineRuntime,
    pub failures: mpsc::UnboundedReceiver<EngineFailure>,
    pub config: EngineConfig,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    /// Async runtime the engine runs on
    runtime: Runtime,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `verbose` - Also log to stdout, at debug level
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging_full(&log_dir, &log_file, verbose, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = Runtime::new().map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("imagesearch v{}", imagesearch::VERSION);
        info!("imagesearch CLI: {} command", command);
    }

    /// Run a future to completion on the runner's async runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Build the image source, loader and reporter, and start an engine.
    pub fn start_engine(
        &self,
        source_config: &SourceConfig,
        throttle: bool,
        engine_config: EngineConfig,
    ) -> Result<StartedEngine, CliError> {
        // The engine spawns its loop onto the current runtime.
        let _guard = self.runtime.enter();

        let client = AsyncReqwestClient::with_timeout(self.config.http.timeout_secs)?
            .with_max_body_bytes(self.config.http.max_image_bytes);
        let source = SourceFactory::new(client.clone()).create(source_config, throttle);
        let loader = HttpImageLoader::new(client);

        let (forward, failures) = ChannelReporter::new();
        let reporter = Arc::new(CliReporter {
            log: TracingReporter,
            forward,
        });

        let runtime = EngineRuntime::start(engine_config, source, loader, reporter)?;
        info!(
            source = source_config.name(),
            throttle = throttle,
            "Engine created successfully"
        );

        Ok(StartedEngine {
            runtime,
            failures,
            config: engine_config,
        })
    }
}
