//! searchkit CLI - build and run strategy-based search queries
//!
//! # Examples
//!
//! ```bash
//! # Show the query a strategy builds
//! searchkit query multi-field jeep --index vehicles --field name --field description
//!
//! # Run a fuzzy search against the configured cluster
//! searchkit search fuzzy jeap --index vehicles --field name
//!
//! # Search a local JSON-lines file instead
//! searchkit search wildcard 'civ*' --index vehicles --field name --documents vehicles.jsonl
//!
//! # Show configuration
//! searchkit show-config
//! ```

use clap::Parser;
use searchkit::cli::{output, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
