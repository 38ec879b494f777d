//! Core data types for searchkit.
//!
//! `SearchRequest` is the declarative description callers hand to the
//! query builder. It is a plain data holder: nothing is checked until a
//! query is built from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hard ceiling on `page_size`
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Default number of hits per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Default positional slop for phrase strategies
pub const DEFAULT_SLOP: u32 = 10;

/// Default term-expansion cap for prefix strategies
pub const DEFAULT_MAX_EXPANSIONS: u32 = 10;

/// Sort direction for an explicit sort field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

impl SortDirection {
    /// Wire name used by the query DSL
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// Paginated search request
///
/// Field names on the wire follow the camelCase convention of existing
/// clients (`textSearch`, `fieldWeights`, ...). The older names `size`,
/// `sortBy`, `orderBy` and `fieldsAndWeights` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    /// Logical page index (0-based)
    pub page: u32,

    /// Hits per page, at most `MAX_PAGE_SIZE`
    #[serde(alias = "size")]
    pub page_size: u32,

    /// The query text
    pub text_search: String,

    /// Target fields; empty means "all fields" where the strategy allows it
    pub fields: Vec<String>,

    /// Per-field weights for the boosting strategy
    #[serde(alias = "fieldsAndWeights")]
    pub field_weights: BTreeMap<String, f32>,

    /// Explicit sort field; relevance ordering when absent
    #[serde(alias = "sortBy", skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,

    /// Sort direction; ascending when `sort_field` is set without one
    #[serde(alias = "orderBy", skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,

    /// Positional slop for phrase strategies
    pub slop: u32,

    /// Term-expansion cap for prefix strategies
    pub max_expansions: u32,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            text_search: String::new(),
            fields: Vec::new(),
            field_weights: BTreeMap::new(),
            sort_field: None,
            sort_direction: None,
            slop: DEFAULT_SLOP,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

impl SearchRequest {
    /// Create a request for the given text with default paging
    pub fn new(text_search: impl Into<String>) -> Self {
        Self {
            text_search: text_search.into(),
            ..Default::default()
        }
    }

    /// Set the target fields
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add a field weight for the boosting strategy
    pub fn with_weight(mut self, field: impl Into<String>, weight: f32) -> Self {
        self.field_weights.insert(field.into(), weight);
        self
    }

    /// Set page index and page size
    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Sort on a field
    pub fn with_sort(mut self, field: impl Into<String>, direction: Option<SortDirection>) -> Self {
        self.sort_field = Some(field.into());
        self.sort_direction = direction;
        self
    }
}
