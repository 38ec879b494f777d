//! HTTP backend for Elasticsearch-compatible clusters.

use crate::core::backend::{Hit, SearchBackend, SearchHits};
use crate::core::config::BackendConfig;
use crate::core::error::{Result, SearchKitError};
use crate::core::query::StructuredQuery;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// Longest slice of an error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// 7.x+ reports `{"value": n, "relation": ..}`, older clusters a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(rename = "_score", default)]
    score: Option<f32>,
    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

impl From<RawHit> for Hit {
    fn from(raw: RawHit) -> Self {
        Hit {
            index: raw.index,
            id: raw.id,
            score: raw.score,
            source: raw.source.unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}

/// Parse a `_search` response body
fn parse_search_response(body: &[u8]) -> Result<SearchHits> {
    let response: SearchResponse = serde_json::from_slice(body)
        .map_err(|e| SearchKitError::Backend(format!("Unexpected search response: {e}")))?;
    let total = response.hits.total.map(|t| match t {
        TotalHits::Object { value } => value,
        TotalHits::Count(count) => count,
    });

    Ok(SearchHits {
        hits: response.hits.hits.into_iter().map(Hit::from).collect(),
        total,
    })
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push_str("...");
    truncated
}

/// Elasticsearch `_search` client
#[derive(Clone)]
pub struct ElasticsearchBackend {
    client: Client,
    base_url: String,
    media_type: String,
    username: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for ElasticsearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchBackend")
            .field("base_url", &self.base_url)
            .field("media_type", &self.media_type)
            .field("username", &self.username)
            .finish()
    }
}

impl ElasticsearchBackend {
    /// Create a client from connection settings
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_sec))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            media_type: config.media_type(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{index}/_search` with the index as one encoded path segment
    fn search_url(&self, index: &str) -> Result<Url> {
        let invalid = || SearchKitError::Backend(format!("Invalid base URL '{}'", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(index)
            .push("_search");
        Ok(url)
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchBackend {
    async fn search(&self, query: &StructuredQuery) -> Result<SearchHits> {
        let url = self.search_url(query.index())?;
        let body = serde_json::to_vec(&query.to_json())?;

        let mut request = self
            .client
            .post(url.clone())
            .header(ACCEPT, &self.media_type)
            .header(CONTENT_TYPE, &self.media_type)
            .body(body);

        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            return Err(SearchKitError::Backend(format!(
                "{} returned {}: {}",
                url,
                status,
                truncate_body(&text)
            )));
        }

        let hits = parse_search_response(&bytes)?;
        tracing::debug!(
            "Elasticsearch returned {} hits for index '{}'",
            hits.len(),
            query.index()
        );
        Ok(hits)
    }

    fn name(&self) -> &str {
        "elasticsearch"
    }
}
