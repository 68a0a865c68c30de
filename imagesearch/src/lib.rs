//! imagesearch - search-as-you-type image gallery engine
//!
//! Turns a stream of search terms into a gallery of image tiles. Each term
//! supersedes the previous one: only the latest search's results reach the
//! gallery, and each tile shows only the image it was last assigned.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use imagesearch::config::EngineConfig;
//! use imagesearch::http::AsyncReqwestClient;
//! use imagesearch::loader::HttpImageLoader;
//! use imagesearch::report::TracingReporter;
//! use imagesearch::runtime::EngineRuntime;
//! use imagesearch::source::{SourceConfig, SourceFactory};
//!
//! let client = AsyncReqwestClient::new()?;
//! let source = SourceFactory::new(client.clone()).create(&SourceConfig::Wikipedia, true);
//! let loader = HttpImageLoader::new(client);
//!
//! let runtime = EngineRuntime::start(EngineConfig::default(), source, loader, Arc::new(TracingReporter))?;
//! let handle = runtime.handle();
//!
//! handle.set_search_term("empire state building")?;
//! let url = handle.select(0).await?;
//! ```

pub mod config;
pub mod gallery;
pub mod http;
pub mod loader;
pub mod logging;
pub mod report;
pub mod runtime;
pub mod search;
pub mod source;
pub mod stamp;
pub mod tile;

/// Version of the imagesearch library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
