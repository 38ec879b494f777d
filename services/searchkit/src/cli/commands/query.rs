//! Query command - print the structured query a strategy builds

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::config::{Config, SearchConfig};
use crate::core::query::{QueryBuilder, Strategy, StructuredQuery};
use crate::core::types::{SearchRequest, SortDirection};
use clap::{Args, ValueEnum};

/// Strategies selectable from the command line
///
/// The filtered strategy takes a caller-built clause tree and is only
/// available through the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    MultiField,
    MatchPhrase,
    MatchPhrasePrefix,
    Regexp,
    Fuzzy,
    Wildcard,
    Boosting,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::MultiField => Strategy::MultiField,
            StrategyArg::MatchPhrase => Strategy::MatchPhrase,
            StrategyArg::MatchPhrasePrefix => Strategy::MatchPhrasePrefix,
            StrategyArg::Regexp => Strategy::Regexp,
            StrategyArg::Fuzzy => Strategy::Fuzzy,
            StrategyArg::Wildcard => Strategy::Wildcard,
            StrategyArg::Boosting => Strategy::Boosting,
        }
    }
}

/// Request description shared by `query` and `search`
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Query strategy
    #[arg(value_enum)]
    pub strategy: StrategyArg,

    /// Search text (wildcard and regexp strategies take a pattern)
    pub text: String,

    /// Index to search
    #[arg(long, short = 'i')]
    pub index: String,

    /// Field to search; repeatable, `name^2` boosts
    #[arg(long = "field", short = 'f')]
    pub fields: Vec<String>,

    /// FIELD=WEIGHT for the boosting strategy; repeatable
    #[arg(long = "weight", short = 'w', value_parser = parse_weight)]
    pub weights: Vec<(String, f32)>,

    /// Page number (0-based)
    #[arg(long, default_value = "0")]
    pub page: u32,

    /// Hits per page (defaults to the configured page size)
    #[arg(long)]
    pub size: Option<u32>,

    /// Sort by this field instead of relevance
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction (asc or desc)
    #[arg(long, requires = "sort")]
    pub order: Option<SortDirection>,

    /// Phrase slop (defaults to the configured slop)
    #[arg(long)]
    pub slop: Option<u32>,

    /// Prefix expansions (defaults to the configured value)
    #[arg(long)]
    pub max_expansions: Option<u32>,

    /// Stored field to return; repeatable, all fields when omitted
    #[arg(long = "source")]
    pub source: Vec<String>,
}

/// Parse `FIELD=WEIGHT`
fn parse_weight(raw: &str) -> Result<(String, f32), String> {
    let (field, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=WEIGHT, got '{raw}'"))?;
    let weight = weight
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid weight '{weight}': {e}"))?;
    Ok((field.trim().to_string(), weight))
}

impl RequestArgs {
    /// Turn the arguments into a request, filling gaps from `defaults`
    pub fn to_request(&self, defaults: &SearchConfig) -> SearchRequest {
        let mut request = defaults.request(self.text.clone());
        request.page = self.page;
        if let Some(size) = self.size {
            request.page_size = size;
        }
        request.fields = self.fields.clone();
        request.field_weights = self.weights.iter().cloned().collect();
        request.sort_field = self.sort.clone();
        request.sort_direction = self.order;
        if let Some(slop) = self.slop {
            request.slop = slop;
        }
        if let Some(max) = self.max_expansions {
            request.max_expansions = max;
        }
        request
    }

    /// Build the structured query; `Ok(None)` when the strategy has
    /// nothing to search with
    pub fn build(
        &self,
        request: &SearchRequest,
    ) -> crate::core::error::Result<Option<StructuredQuery>> {
        let strategy = Strategy::from(self.strategy);
        let mut builder = QueryBuilder::new(&self.index, request);
        if !self.source.is_empty() {
            builder = builder.with_source_fields(self.source.iter().cloned());
        }
        builder.build(&strategy)
    }
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

/// Execute the query command
pub fn execute(
    args: QueryArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.request.to_request(&config.search);
    let Some(query) = args.request.build(&request)? else {
        output::print_warning(&format!(
            "Strategy '{}' produced no query (does it need --field?)",
            Strategy::from(args.request.strategy).name()
        ));
        return Ok(());
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {}",
                colors::label("POST"),
                colors::index(&format!("/{}/_search", query.index()))
            );
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
    }

    Ok(())
}
