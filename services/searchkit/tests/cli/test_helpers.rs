//! CLI test helpers
//!
//! Provides utilities for testing CLI commands including:
//! - Request argument construction with sensible defaults
//! - Fixture documents written to a temporary JSON-lines file

use crate::common::{vehicle_documents, VEHICLE_INDEX};
use searchkit::cli::commands::{RequestArgs, StrategyArg};
use std::io::Write;
use tempfile::NamedTempFile;

/// Request arguments for the vehicle index with nothing else set
pub fn request_args(strategy: StrategyArg, text: &str, fields: &[&str]) -> RequestArgs {
    RequestArgs {
        strategy,
        text: text.to_string(),
        index: VEHICLE_INDEX.to_string(),
        fields: fields.iter().map(|f| f.to_string()).collect(),
        weights: Vec::new(),
        page: 0,
        size: None,
        sort: None,
        order: None,
        slop: None,
        max_expansions: None,
        source: Vec::new(),
    }
}

/// Write the vehicle fixture as JSON lines (keep the file alive during the test)
pub fn vehicle_documents_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for doc in vehicle_documents() {
        writeln!(file, "{doc}").expect("Failed to write document");
    }
    file
}
