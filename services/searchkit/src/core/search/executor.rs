//! Runs structured queries and maps hits onto result records.

use crate::core::backend::{SearchBackend, SearchHits};
use crate::core::error::{Result, SearchKitError};
use crate::core::query::{BoolQuery, QueryBuilder, SearchRecord, Strategy, StructuredQuery};
use crate::core::types::SearchRequest;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Search executor
///
/// Holds the backend handle it was constructed with and nothing else;
/// calls are independent and may run concurrently.
#[derive(Clone)]
pub struct SearchExecutor {
    backend: Arc<dyn SearchBackend>,
}

impl std::fmt::Debug for SearchExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchExecutor")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl SearchExecutor {
    /// Create an executor over the given backend
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Name of the underlying backend
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Run a query and return the raw hits
    pub async fn hits(&self, query: &StructuredQuery) -> Result<SearchHits> {
        let hits = self.backend.search(query).await?;
        tracing::debug!(
            index = query.index(),
            offset = query.offset(),
            limit = query.limit(),
            backend = self.backend.name(),
            hits = hits.len(),
            "executed search"
        );
        Ok(hits)
    }

    /// Run a query and deserialize every hit into `T`
    ///
    /// A single hit that fails to deserialize fails the whole batch.
    /// Payload keys `T` does not declare are ignored. Declared fields
    /// missing from a payload only fall back to their default when `T`
    /// is deserialized with `#[serde(default)]`, as `search_record!`
    /// types are; other types fail the batch.
    pub async fn try_execute<T: DeserializeOwned>(
        &self,
        query: &StructuredQuery,
    ) -> Result<Vec<T>> {
        let hits = self.hits(query).await?;
        hits.hits
            .into_iter()
            .enumerate()
            .map(|(position, hit)| {
                serde_json::from_value(hit.source).map_err(|e| {
                    SearchKitError::Execution(format!(
                        "Failed to map hit {} from index '{}': {}",
                        position, hit.index, e
                    ))
                })
            })
            .collect()
    }

    /// Legacy entry point: never fails, an empty list stands for any problem
    ///
    /// Mapping follows [`try_execute`](Self::try_execute), including its
    /// `#[serde(default)]` requirement for missing fields.
    pub async fn execute<T: DeserializeOwned>(&self, query: Option<StructuredQuery>) -> Vec<T> {
        let Some(query) = query else {
            tracing::error!("failed to build search request");
            return Vec::new();
        };

        match self.try_execute(&query).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(index = query.index(), "search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Build and run a query for record type `T`
    ///
    /// Only `T`'s fields are requested from the backend. A strategy that
    /// produces no query yields an empty list.
    pub async fn search<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
        strategy: &Strategy,
    ) -> Result<Vec<T>> {
        let query = QueryBuilder::new(index, request)
            .for_record::<T>()
            .build(strategy)?;

        match query {
            Some(query) => self.try_execute(&query).await,
            None => Ok(Vec::new()),
        }
    }

    async fn legacy<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
        strategy: &Strategy,
    ) -> Vec<T> {
        let query = QueryBuilder::new(index, request)
            .for_record::<T>()
            .build_lenient(strategy);
        self.execute(query).await
    }

    /// Caller-supplied filter tree
    pub async fn handle_search<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
        filter: BoolQuery,
    ) -> Vec<T> {
        self.legacy(index, request, &Strategy::Filtered(filter)).await
    }

    pub async fn multi_search<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Vec<T> {
        self.legacy(index, request, &Strategy::MultiField).await
    }

    pub async fn regexp_search<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Vec<T> {
        self.legacy(index, request, &Strategy::Regexp).await
    }

    pub async fn fuzzy_search<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Vec<T> {
        self.legacy(index, request, &Strategy::Fuzzy).await
    }

    pub async fn wild_card_search<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Vec<T> {
        self.legacy(index, request, &Strategy::Wildcard).await
    }

    pub async fn match_phrase_search<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Vec<T> {
        self.legacy(index, request, &Strategy::MatchPhrase).await
    }

    /// Only the first listed field is searched
    pub async fn match_phrase_prefix_search<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Vec<T> {
        self.legacy(index, request, &Strategy::MatchPhrasePrefix).await
    }

    pub async fn boosting_search<T: SearchRecord>(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Vec<T> {
        self.legacy(index, request, &Strategy::Boosting).await
    }
}
