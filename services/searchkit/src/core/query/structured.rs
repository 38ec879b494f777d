//! The query builder's output.
//!
//! A `StructuredQuery` is built once, handed to a backend once and
//! then dropped. It has no setters.

use crate::core::query::dsl::Clause;
use crate::core::types::SortDirection;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Explicit sort on a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub field: String,
    pub direction: SortDirection,
}

/// Backend-neutral search request ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredQuery {
    index: String,
    offset: usize,
    limit: usize,
    clause: Clause,
    sort: Option<SortClause>,
    source: Option<Vec<String>>,
}

impl StructuredQuery {
    pub(crate) fn new(
        index: String,
        offset: usize,
        limit: usize,
        clause: Clause,
        sort: Option<SortClause>,
        source: Option<Vec<String>>,
    ) -> Self {
        Self {
            index,
            offset,
            limit,
            clause,
            sort,
            source,
        }
    }

    /// Target index name
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Number of hits to skip
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Maximum number of hits to return
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Root of the clause tree
    pub fn clause(&self) -> &Clause {
        &self.clause
    }

    /// Explicit sort, if any
    pub fn sort(&self) -> Option<&SortClause> {
        self.sort.as_ref()
    }

    /// Stored fields to return; `None` means the whole document
    pub fn source(&self) -> Option<&[String]> {
        self.source.as_deref()
    }

    /// Render the full `_search` request body
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("from".to_string(), json!(self.offset));
        body.insert("size".to_string(), json!(self.limit));
        body.insert("query".to_string(), self.clause.to_json());
        if let Some(sort) = &self.sort {
            body.insert(
                "sort".to_string(),
                json!([{ sort.field.as_str(): { "order": sort.direction.as_str() } }]),
            );
        }
        if let Some(source) = &self.source {
            body.insert("_source".to_string(), json!(source));
        }
        Value::Object(body)
    }
}

impl Serialize for StructuredQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
