//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use imagesearch::config::{ConfigError, ConfigFileError};
use imagesearch::http::HttpError;
use imagesearch::report::EngineFailure;
use imagesearch::runtime::EngineError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to read or write the config file
    ConfigFile(ConfigFileError),
    /// Invalid engine settings
    EngineConfig(ConfigError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to create the HTTP client
    Http(HttpError),
    /// The engine rejected a request or stopped
    Engine(EngineError),
    /// The search itself failed
    Search(EngineFailure),
    /// Nothing happened within the allotted time
    Timeout(String),
    /// Failed to read from stdin
    Input(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::ConfigFile(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Check the file with: imagesearch config show");
            }
            CliError::Search(_) | CliError::Timeout(_) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. No network connection to the image provider");
                eprintln!("  2. Pexels API key missing or revoked");
                eprintln!("  3. Try the offline source: --provider static");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::EngineConfig(e) => write!(f, "Invalid gallery settings: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Http(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Engine(e) => write!(f, "{}", e),
            CliError::Search(failure) => write!(f, "{}", failure),
            CliError::Timeout(what) => write!(f, "Timed out waiting for {}", what),
            CliError::Input(e) => write!(f, "Failed to read input: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::EngineConfig(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Http(e) => Some(e),
            CliError::Engine(e) => Some(e),
            CliError::Search(e) => Some(e),
            CliError::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::EngineConfig(e)
    }
}

impl From<HttpError> for CliError {
    fn from(e: HttpError) -> Self {
        CliError::Http(e)
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Engine(e)
    }
}
