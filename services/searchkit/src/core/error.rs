//! Error types and error handling for searchkit.
//!
//! Failures fall into three families. Validation errors mean the
//! request broke a builder precondition. Assembly errors mean the
//! clause tree could not be built from otherwise valid input.
//! Execution errors come from the backend round trip or from mapping
//! hits onto the caller's record type.

use thiserror::Error;

/// Result type alias for searchkit operations
pub type Result<T> = std::result::Result<T, SearchKitError>;

/// A search request violated a query builder precondition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Page size must be less than or equal to {max}, got {size}")]
    PageSizeExceeded { size: u32, max: u32 },

    #[error("Text search must not be empty or contain only whitespace")]
    EmptyQueryText,
}

/// Main error type for searchkit
#[derive(Error, Debug)]
pub enum SearchKitError {
    #[error("Invalid search request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Query assembly failed: {0}")]
    QueryAssembly(String),

    #[error("Search execution failed: {0}")]
    Execution(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl SearchKitError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if the request itself was rejected
    pub fn is_validation(&self) -> bool {
        matches!(self, SearchKitError::Validation(_))
    }

    /// Check if the clause tree could not be assembled
    pub fn is_assembly(&self) -> bool {
        matches!(self, SearchKitError::QueryAssembly(_))
    }

    /// Check if the failure happened while running the query
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            SearchKitError::Execution(_)
                | SearchKitError::Backend(_)
                | SearchKitError::IndexNotFound(_)
        )
    }

    /// The validation failure, if this is one
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            SearchKitError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<tantivy::TantivyError> for SearchKitError {
    fn from(e: tantivy::TantivyError) -> Self {
        SearchKitError::Backend(e.to_string())
    }
}

impl From<reqwest::Error> for SearchKitError {
    fn from(e: reqwest::Error) -> Self {
        SearchKitError::Backend(e.to_string())
    }
}
