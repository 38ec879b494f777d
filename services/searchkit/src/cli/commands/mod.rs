//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a
//! specific CLI command. `query` and `search` share [`RequestArgs`].

pub mod completions;
pub mod config;
pub mod query;
pub mod search;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use query::{QueryArgs, RequestArgs, StrategyArg};
pub use search::SearchArgs;
