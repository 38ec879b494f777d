//! Tests for the search CLI command
//!
//! All searches run against the embedded backend through `--documents`.

use crate::cli::test_helpers::{request_args, vehicle_documents_file};
use searchkit::cli::commands::search::{execute, load_documents, SearchArgs};
use searchkit::cli::commands::StrategyArg;
use searchkit::cli::OutputFormat;
use searchkit::core::config::Config;
use std::path::PathBuf;

/// Test search with results in human format
#[tokio::test]
async fn test_search_documents_human() {
    let file = vehicle_documents_file();
    let args = SearchArgs {
        request: request_args(StrategyArg::MultiField, "jeep", &["name", "description"]),
        documents: Some(file.path().to_path_buf()),
    };

    let result = execute(args, &Config::default(), OutputFormat::Human).await;
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

/// Test fuzzy search in JSON format
#[tokio::test]
async fn test_search_documents_json() {
    let file = vehicle_documents_file();
    let args = SearchArgs {
        request: request_args(StrategyArg::Fuzzy, "jeap", &["name"]),
        documents: Some(file.path().to_path_buf()),
    };

    let result = execute(args, &Config::default(), OutputFormat::Json).await;
    assert!(result.is_ok());
}

/// Test search with no matches
#[tokio::test]
async fn test_search_no_results() {
    let file = vehicle_documents_file();
    let args = SearchArgs {
        request: request_args(StrategyArg::MultiField, "tractor", &["name"]),
        documents: Some(file.path().to_path_buf()),
    };

    assert!(execute(args, &Config::default(), OutputFormat::Human).await.is_ok());
}

/// Test sorting and source selection flags
#[tokio::test]
async fn test_search_sorted_with_source() {
    let file = vehicle_documents_file();
    let mut request = request_args(StrategyArg::MultiField, "compact", &["description"]);
    request.sort = Some("number".to_string());
    request.source = vec!["id".to_string(), "name".to_string()];

    let args = SearchArgs {
        request,
        documents: Some(file.path().to_path_buf()),
    };
    assert!(execute(args, &Config::default(), OutputFormat::Json).await.is_ok());
}

/// Test missing documents file
#[tokio::test]
async fn test_search_missing_documents_file() {
    let args = SearchArgs {
        request: request_args(StrategyArg::MultiField, "jeep", &["name"]),
        documents: Some(PathBuf::from("/nonexistent/vehicles.jsonl")),
    };

    let result = execute(args, &Config::default(), OutputFormat::Human).await;
    assert!(result.is_err());
}

/// Test that the fixture file round-trips through the loader
#[test]
fn test_load_fixture_documents() {
    let file = vehicle_documents_file();
    let docs = load_documents(file.path()).unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0]["name"], "Jeep Wrangler");
}
