//! Search backends.
//!
//! A backend takes a [`StructuredQuery`] and returns raw hits. It knows
//! nothing about result record types; mapping hits onto records is the
//! executor's job.
//!
//! # Backends
//!
//! - [`ElasticsearchBackend`]: HTTP client for Elasticsearch-compatible clusters
//! - [`TantivyBackend`]: embedded in-memory index evaluating the clause tree locally

mod elasticsearch;
mod embedded;

pub use self::elasticsearch::ElasticsearchBackend;
pub use self::embedded::TantivyBackend;

use crate::core::error::Result;
use crate::core::query::StructuredQuery;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One matching document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Index the document was found in
    pub index: String,

    /// Backend document id, when the backend has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Relevance score; absent when the backend sorted by field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,

    /// Stored field values (after source filtering)
    pub source: Value,
}

/// A batch of hits in backend order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    pub hits: Vec<Hit>,

    /// Total matching documents, when the backend reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl SearchHits {
    /// Create empty results
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Executes structured queries against a document store
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a query and return hits in backend order
    async fn search(&self, query: &StructuredQuery) -> Result<SearchHits>;

    /// Backend name for diagnostics
    fn name(&self) -> &str;
}
