// Test helper functions

use super::fixtures::{vehicle_documents, VEHICLE_INDEX};
use async_trait::async_trait;
use searchkit::core::backend::{SearchBackend, SearchHits, TantivyBackend};
use searchkit::core::query::StructuredQuery;
use searchkit::{SearchExecutor, SearchKitError};
use std::sync::Arc;

/// Embedded backend holding the vehicle fixture index
#[allow(dead_code)] // Used in integration tests
pub fn vehicle_backend() -> TantivyBackend {
    let mut backend = TantivyBackend::new();
    backend
        .add_index(
            VEHICLE_INDEX,
            &["name", "description", "status", "created"],
            vehicle_documents(),
        )
        .expect("Failed to build vehicle index");
    backend
}

/// Executor over the vehicle fixture index
#[allow(dead_code)] // Used in integration tests
pub fn vehicle_executor() -> SearchExecutor {
    SearchExecutor::new(Arc::new(vehicle_backend()))
}

/// Backend whose every call fails, standing in for an unreachable cluster
#[allow(dead_code)] // Used in integration tests
pub struct FailingBackend;

#[async_trait]
impl SearchBackend for FailingBackend {
    async fn search(&self, _query: &StructuredQuery) -> searchkit::Result<SearchHits> {
        Err(SearchKitError::Backend(
            "connection refused (simulated)".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Executor whose backend always fails
#[allow(dead_code)] // Used in integration tests
pub fn failing_executor() -> SearchExecutor {
    SearchExecutor::new(Arc::new(FailingBackend))
}
