//! Tests for the query CLI command

use crate::cli::test_helpers::request_args;
use searchkit::cli::commands::query::{execute, QueryArgs};
use searchkit::cli::commands::StrategyArg;
use searchkit::cli::OutputFormat;
use searchkit::core::config::Config;

/// Test printing a multi-field query
#[test]
fn test_query_multi_field_json() {
    let args = QueryArgs {
        request: request_args(StrategyArg::MultiField, "jeep", &["name", "description"]),
    };
    let result = execute(args, &Config::default(), OutputFormat::Json);
    assert!(result.is_ok(), "Query should succeed: {:?}", result.err());
}

/// Test human output for a boosting query
#[test]
fn test_query_boosting_human() {
    let mut request = request_args(StrategyArg::Boosting, "compact", &[]);
    request.weights = vec![("name".to_string(), 2.0), ("description".to_string(), 1.0)];

    let result = execute(QueryArgs { request }, &Config::default(), OutputFormat::Human);
    assert!(result.is_ok());
}

/// A strategy with nothing to search is a warning, not an error
#[test]
fn test_query_wildcard_without_fields() {
    let args = QueryArgs {
        request: request_args(StrategyArg::Wildcard, "je*", &[]),
    };
    assert!(execute(args, &Config::default(), OutputFormat::Json).is_ok());
}

/// Test validation failures reach the caller
#[test]
fn test_query_oversized_page_fails() {
    let mut request = request_args(StrategyArg::Fuzzy, "jeap", &["name"]);
    request.size = Some(5000);

    let err = execute(QueryArgs { request }, &Config::default(), OutputFormat::Json).unwrap_err();
    assert!(err.to_string().contains("Page size"));
}

/// Test blank text is rejected
#[test]
fn test_query_blank_text_fails() {
    let args = QueryArgs {
        request: request_args(StrategyArg::MatchPhrase, "   ", &["name"]),
    };
    assert!(execute(args, &Config::default(), OutputFormat::Human).is_err());
}
