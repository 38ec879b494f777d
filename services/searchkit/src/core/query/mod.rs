//! Query construction.
//!
//! Turns a [`SearchRequest`](crate::core::types::SearchRequest) and a
//! [`Strategy`] into a [`StructuredQuery`] without touching any backend.

mod builder;
mod dsl;
mod record;
mod structured;

pub use builder::{page_window, validate_request, QueryBuilder, Strategy};
pub use dsl::{BoolQuery, Clause, FieldSpec, Fuzziness, MultiMatch, MultiMatchType, Operator};
pub use record::SearchRecord;
pub use structured::{SortClause, StructuredQuery};
