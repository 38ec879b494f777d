//! Core domain logic (transport-agnostic)
//!
//! This module contains the query pipeline, independent of how it is
//! driven (library calls or the CLI).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Search request model and limits
//! - **xdg**: XDG directory handling
//! - **query**: Strategy-driven query construction
//! - **backend**: Elasticsearch and embedded Tantivy backends
//! - **search**: Query execution and record mapping

pub mod backend;
pub mod config;
pub mod error;
pub mod query;
pub mod search;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, SearchKitError, ValidationError};
pub use search::SearchExecutor;
