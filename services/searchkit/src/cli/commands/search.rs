//! Search command - build a query and run it

use crate::cli::commands::query::RequestArgs;
use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::backend::{ElasticsearchBackend, SearchBackend, SearchHits, TantivyBackend};
use crate::core::config::Config;
use crate::core::error::Result as CoreResult;
use crate::core::search::SearchExecutor;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Longest source preview printed per hit
const PREVIEW_CHARS: usize = 100;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Search a local JSON file (array or one object per line) instead
    /// of the configured cluster
    #[arg(long)]
    pub documents: Option<PathBuf>,
}

/// Search result item
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub source: Value,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponseOutput {
    pub index: String,
    pub strategy: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub results: Vec<SearchResultItem>,
}

/// Read documents from a JSON array file or a JSON-lines file
pub fn load_documents(path: &Path) -> CoreResult<Vec<Value>> {
    let contents = fs::read_to_string(path)?;
    if contents.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(&contents)?);
    }

    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}

fn embedded_backend(index: &str, path: &Path) -> CoreResult<TantivyBackend> {
    let documents = load_documents(path)?;
    let fields = TantivyBackend::infer_fields(&documents);
    let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();

    let mut backend = TantivyBackend::new();
    backend.add_index(index, &field_refs, documents)?;
    Ok(backend)
}

fn preview(source: &Value) -> String {
    let rendered = source.to_string();
    if rendered.chars().count() > PREVIEW_CHARS {
        let cut: String = rendered.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        rendered
    }
}

fn to_output(args: &SearchArgs, backend: &str, hits: SearchHits) -> SearchResponseOutput {
    SearchResponseOutput {
        index: args.request.index.clone(),
        strategy: crate::core::query::Strategy::from(args.request.strategy)
            .name()
            .to_string(),
        backend: backend.to_string(),
        total: hits.total,
        results: hits
            .hits
            .into_iter()
            .enumerate()
            .map(|(i, hit)| SearchResultItem {
                rank: i + 1,
                id: hit.id,
                score: hit.score,
                source: hit.source,
            })
            .collect(),
    }
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.request.to_request(&config.search);
    let query = args.request.build(&request)?;

    let backend: Arc<dyn SearchBackend> = match &args.documents {
        Some(path) => Arc::new(embedded_backend(&args.request.index, path)?),
        None => Arc::new(ElasticsearchBackend::new(&config.backend)?),
    };
    let executor = SearchExecutor::new(backend);

    let hits = match &query {
        Some(query) => executor.hits(query).await?,
        None => {
            output::print_warning("Strategy produced no query; nothing to search");
            SearchHits::empty()
        }
    };
    let output = to_output(&args, executor.backend_name(), hits);

    match format {
        OutputFormat::Human => {
            if output.results.is_empty() {
                println!(
                    "No results found for '{}' in index '{}'",
                    colors::label(&args.request.text),
                    colors::index(&output.index)
                );
            } else {
                let total = output
                    .total
                    .map(|t| format!(" of {}", colors::number(&t.to_string())))
                    .unwrap_or_default();
                println!(
                    "Showing {}{} result(s) in '{}' ({}):\n",
                    colors::number(&output.results.len().to_string()),
                    total,
                    colors::index(&output.index),
                    colors::dim(&output.strategy)
                );

                for result in &output.results {
                    let score = result
                        .score
                        .map(|s| format!("(score: {s:.2})"))
                        .unwrap_or_default();
                    println!(
                        "[{}] {} {}",
                        colors::rank(&result.rank.to_string()),
                        colors::id(result.id.as_deref().unwrap_or("-")),
                        colors::score(&score)
                    );
                    println!("    {}", colors::dim(&preview(&result.source)));
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
