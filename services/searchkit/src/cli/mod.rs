//! CLI adapter for searchkit
//!
//! Builds and runs search requests from the command line. Depends on
//! `core/` only.
//!
//! ```text
//!   +------------------+
//!   |     core/        |
//!   |  (query, search) |
//!   +--------+---------+
//!            |
//!            v
//!   +------------------+
//!   |      cli/        |
//!   | (clap adapter)   |
//!   +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// searchkit - Strategy-based full-text search
///
/// Build Elasticsearch queries from a simple request description and run
/// them against a cluster or a local JSON document file.
#[derive(Parser, Debug)]
#[command(name = "searchkit")]
#[command(author = "RHOBIMD HEALTH")]
#[command(version)]
#[command(about = "Strategy-based full-text search", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the query a strategy builds, without running it
    Query(commands::QueryArgs),

    /// Build a query and run it
    Search(commands::SearchArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  searchkit completions bash > ~/.local/share/bash-completion/completions/searchkit
    ///   zsh:   searchkit completions zsh > ~/.zfunc/_searchkit
    ///   fish:  searchkit completions fish > ~/.config/fish/completions/searchkit.fish
    Completions(commands::CompletionsArgs),
}

/// Install the stderr log subscriber
///
/// Defaults to `searchkit=warn` (`searchkit=debug` with `verbose`)
/// unless `RUST_LOG` is set.
pub fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "searchkit=debug"
    } else {
        "searchkit=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    // A subscriber may already be installed (tests, embedding hosts)
    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(e) = result {
        output::print_warning(&format!("Logging not initialized: {e}"));
    }
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;

    // Handle completions command early (doesn't need config)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    init_tracing(cli.verbose, cli.log_json);

    // Load configuration
    let config = Config::load()?;
    if cli.verbose {
        config.log_config();
    }

    // Execute command
    match cli.command {
        Commands::Query(args) => commands::query::execute(args, &config, cli.format),
        Commands::Search(args) => commands::search::execute(args, &config, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
