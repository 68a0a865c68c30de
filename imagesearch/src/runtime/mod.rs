//! Runtime: the engine loop, its handle, and the observable bindings.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          EngineRuntime                            │
//! │                                                                   │
//! │  ┌──────────────┐  EngineEvent   ┌─────────────────────────────┐  │
//! │  │ EngineHandle │ ─────────────► │      ImageSearchEngine      │  │
//! │  │ (host side)  │   (mpsc)       │                             │  │
//! │  └──────┬───────┘                │  SearchCoordinator          │  │
//! │         │                        │  GalleryModel               │  │
//! │         │ HostBindings           │  BindingPublisher           │  │
//! │         ▼ (watch, broadcast)     └───────┬──────────────▲──────┘  │
//! │    search_term, pulses,                  │ spawn        │ events  │
//! │    result_urls, gallery,                 ▼              │         │
//! │    chosen_image_url              ┌──────────────────────┴──────┐  │
//! │                                  │ search / tile-load workers  │  │
//! │                                  └─────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Ordering
//!
//! Every piece of gallery state is touched only by the engine loop. Workers
//! never mutate it; they send their results back as events. Each result
//! carries the [`Generation`](crate::stamp::Generation) or
//! [`LoadToken`](crate::stamp::LoadToken) it was issued under, and the loop
//! discards any result whose stamp has been superseded. Cancelling a worker
//! only saves work; the stamp check is what keeps stale results out.

mod bindings;
mod engine;
mod event;
mod handle;
mod orchestrator;

pub use bindings::{HostBindings, SearchPulse};
pub use engine::ImageSearchEngine;
pub use event::{EngineEvent, SelectReply};
pub use handle::{EngineError, EngineHandle};
pub use orchestrator::EngineRuntime;
