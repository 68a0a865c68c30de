//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`interactive`] - Search as you type from stdin
//! - [`search`] - Run one search and print the gallery

pub mod common;
pub mod config;
pub mod interactive;
pub mod search;
