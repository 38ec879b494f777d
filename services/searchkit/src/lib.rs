//! searchkit - Strategy-based full-text query construction
//!
//! Turns a small declarative search request into one of several
//! full-text strategies, runs it against a search backend and maps
//! the hits onto typed records.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - query (builder, clause tree, record types)
//!   - backend (Elasticsearch over HTTP, embedded Tantivy)
//!   - search (executor)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Example
//!
//! ```no_run
//! use searchkit::core::backend::ElasticsearchBackend;
//! use searchkit::core::config::BackendConfig;
//! use searchkit::core::query::Strategy;
//! use searchkit::{SearchExecutor, SearchRequest};
//! use std::sync::Arc;
//!
//! searchkit::search_record! {
//!     pub struct Vehicle {
//!         pub id: String,
//!         pub name: String,
//!     }
//! }
//!
//! # async fn run() -> searchkit::Result<()> {
//! let backend = ElasticsearchBackend::new(&BackendConfig::default())?;
//! let executor = SearchExecutor::new(Arc::new(backend));
//!
//! let request = SearchRequest::new("jeep").with_fields(["name", "description"]);
//! let vehicles: Vec<Vehicle> = executor
//!     .search("vehicles", &request, &Strategy::MultiField)
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, SearchKitError, ValidationError};
pub use core::query::{QueryBuilder, SearchRecord, Strategy, StructuredQuery};
pub use core::search::SearchExecutor;
pub use core::types::*;
