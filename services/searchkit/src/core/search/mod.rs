//! Search execution.
//!
//! Sends structured queries to a backend and maps the returned
//! hits onto caller-chosen record types.

mod executor;

pub use executor::SearchExecutor;
