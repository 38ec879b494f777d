//! Strategy-driven query builder.
//!
//! Every strategy goes through the same three steps:
//!
//! 1. Validate the request (page size ceiling, then non-blank text).
//! 2. Check the index name and assemble the strategy's clause tree.
//! 3. Attach pagination, optional sort and optional source filtering.
//!
//! Building is pure: no I/O, no shared state. Backend-level problems
//! only show up once the query is executed.
//!
//! # Strategies
//!
//! | Strategy | Clause |
//! |----------|--------|
//! | `Filtered` | caller's bool tree in filter context |
//! | `MultiField` | `*` best_fields / single match / best_fields over fields |
//! | `MatchPhrase` | phrase multi_match with slop |
//! | `MatchPhrasePrefix` | phrase_prefix on the first field only |
//! | `Regexp` | case-insensitive regexp per field, OR-ed, filter context |
//! | `Fuzzy` | most_fields multi_match with AUTO fuzziness |
//! | `Wildcard` | case-insensitive wildcard per field, OR-ed, filter context |
//! | `Boosting` | most_fields multi_match over weighted fields |

use crate::core::error::{Result, SearchKitError, ValidationError};
use crate::core::query::dsl::{
    BoolQuery, Clause, FieldSpec, Fuzziness, MultiMatch, MultiMatchType, Operator,
};
use crate::core::query::record::SearchRecord;
use crate::core::query::structured::{SortClause, StructuredQuery};
use crate::core::types::{SearchRequest, MAX_PAGE_SIZE};

/// Query construction strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Caller-built boolean filter, non-scoring
    Filtered(BoolQuery),
    MultiField,
    MatchPhrase,
    MatchPhrasePrefix,
    Regexp,
    Fuzzy,
    Wildcard,
    Boosting,
}

impl Strategy {
    /// Short name used in logs and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Filtered(_) => "handle",
            Strategy::MultiField => "multi-field",
            Strategy::MatchPhrase => "match-phrase",
            Strategy::MatchPhrasePrefix => "match-phrase-prefix",
            Strategy::Regexp => "regexp",
            Strategy::Fuzzy => "fuzzy",
            Strategy::Wildcard => "wildcard",
            Strategy::Boosting => "boosting",
        }
    }
}

/// Reject requests that break a builder precondition
///
/// Page size is checked before the text, so a request failing both
/// reports `PageSizeExceeded`.
pub fn validate_request(request: &SearchRequest) -> std::result::Result<(), ValidationError> {
    if request.page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::PageSizeExceeded {
            size: request.page_size,
            max: MAX_PAGE_SIZE,
        });
    }

    if request.text_search.trim().is_empty() {
        return Err(ValidationError::EmptyQueryText);
    }

    Ok(())
}

/// Compute `(offset, limit)` for a request
pub fn page_window(request: &SearchRequest) -> Result<(usize, usize)> {
    let limit = request.page_size as usize;
    if request.page == 0 {
        return Ok((0, limit));
    }

    let offset = (request.page as usize).checked_mul(limit).ok_or_else(|| {
        SearchKitError::QueryAssembly(format!(
            "offset overflows for page {} with page size {}",
            request.page, request.page_size
        ))
    })?;
    Ok((offset, limit))
}

/// Builds a [`StructuredQuery`] for one index and request
///
/// ```
/// use searchkit::core::query::{QueryBuilder, Strategy};
/// use searchkit::core::types::SearchRequest;
///
/// let request = SearchRequest::new("jeep").with_fields(["name", "description"]);
/// let query = QueryBuilder::new("vehicles", &request)
///     .build(&Strategy::MultiField)
///     .unwrap()
///     .unwrap();
/// assert_eq!(query.offset(), 0);
/// assert_eq!(query.limit(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    index: &'a str,
    request: &'a SearchRequest,
    source: Option<Vec<String>>,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(index: &'a str, request: &'a SearchRequest) -> Self {
        Self {
            index,
            request,
            source: None,
        }
    }

    /// Request only the fields declared by `T`
    pub fn for_record<T: SearchRecord>(self) -> Self {
        self.with_source_fields(T::FIELDS.iter().copied())
    }

    /// Request only the given stored fields
    pub fn with_source_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Build a query, reporting every failure
    ///
    /// `Ok(None)` means the strategy has nothing to search with (for
    /// example a wildcard search without fields). It is not an error,
    /// and callers should treat it as "no results".
    pub fn build(&self, strategy: &Strategy) -> Result<Option<StructuredQuery>> {
        validate_request(self.request)?;

        if self.index.trim().is_empty() {
            return Err(SearchKitError::QueryAssembly(
                "index name is blank".to_string(),
            ));
        }

        let (offset, limit) = page_window(self.request)?;
        let Some(clause) = self.assemble(strategy)? else {
            tracing::debug!(
                strategy = strategy.name(),
                index = self.index,
                "strategy produced no clause"
            );
            return Ok(None);
        };

        let sort = self.request.sort_field.as_ref().map(|field| SortClause {
            field: field.clone(),
            direction: self.request.sort_direction.unwrap_or_default(),
        });

        tracing::debug!(
            strategy = strategy.name(),
            index = self.index,
            offset,
            limit,
            sorted = sort.is_some(),
            "built structured query"
        );

        Ok(Some(StructuredQuery::new(
            self.index.to_string(),
            offset,
            limit,
            clause,
            sort,
            self.source.clone(),
        )))
    }

    /// Build a query, collapsing every failure to `None`
    ///
    /// Errors are logged. Use [`build`](Self::build) when the caller
    /// needs to tell a rejected request apart from an empty one.
    pub fn build_lenient(&self, strategy: &Strategy) -> Option<StructuredQuery> {
        match self.build(strategy) {
            Ok(query) => query,
            Err(e) => {
                tracing::error!(
                    strategy = strategy.name(),
                    index = self.index,
                    error = %e,
                    "failed to build search request"
                );
                None
            }
        }
    }

    fn assemble(&self, strategy: &Strategy) -> Result<Option<Clause>> {
        let text = self.request.text_search.trim();
        let fields = parse_fields(&self.request.fields)?;

        let clause = match strategy {
            Strategy::Filtered(filter) => Some(filtered(filter)?),
            Strategy::MultiField => Some(multi_field(text, fields)),
            Strategy::MatchPhrase => Some(match_phrase(text, fields, self.request.slop)),
            Strategy::MatchPhrasePrefix => match_phrase_prefix(
                text,
                fields,
                self.request.slop,
                self.request.max_expansions,
            ),
            Strategy::Regexp => per_field_filter(&fields, |f| Clause::regexp(f, text)),
            Strategy::Fuzzy => Some(fuzzy(text, fields)),
            Strategy::Wildcard => per_field_filter(&fields, |f| Clause::wildcard(f, text)),
            Strategy::Boosting => Some(boosting(text, self.request)?),
        };
        Ok(clause)
    }
}

fn parse_fields(raw: &[String]) -> Result<Vec<FieldSpec>> {
    raw.iter()
        .enumerate()
        .map(|(i, field)| {
            if field.trim().is_empty() {
                return Err(SearchKitError::QueryAssembly(format!(
                    "field name at position {i} is blank"
                )));
            }
            Ok(FieldSpec::parse(field))
        })
        .collect()
}

fn filtered(filter: &BoolQuery) -> Result<Clause> {
    if filter.is_empty() {
        return Err(SearchKitError::QueryAssembly(
            "filter tree has no clauses".to_string(),
        ));
    }
    Ok(BoolQuery::new().filter(filter.clone().into()).into())
}

fn multi_field(text: &str, mut fields: Vec<FieldSpec>) -> Clause {
    match fields.len() {
        0 => MultiMatch::new(text, MultiMatchType::BestFields)
            .field(FieldSpec::new("*"))
            .operator(Operator::Or)
            .into(),
        // A plain `match` has nowhere to carry an inline boost
        1 if fields[0].boost.is_none() => {
            let field = fields.remove(0);
            Clause::matches(field.name, text, Operator::Or)
        }
        _ => with_fields(
            MultiMatch::new(text, MultiMatchType::BestFields).operator(Operator::Or),
            fields,
        )
        .into(),
    }
}

fn match_phrase(text: &str, fields: Vec<FieldSpec>, slop: u32) -> Clause {
    with_fields(
        MultiMatch::new(text, MultiMatchType::Phrase)
            .operator(Operator::Or)
            .slop(slop),
        fields,
    )
    .into()
}

// Only the first listed field takes part; later fields are ignored.
fn match_phrase_prefix(
    text: &str,
    fields: Vec<FieldSpec>,
    slop: u32,
    max_expansions: u32,
) -> Option<Clause> {
    if fields.len() > 1 {
        tracing::debug!(
            ignored = fields.len() - 1,
            "phrase prefix only searches the first listed field"
        );
    }
    let first = fields.into_iter().next()?;
    Some(
        MultiMatch::new(text, MultiMatchType::PhrasePrefix)
            .field(first)
            .slop(slop)
            .max_expansions(max_expansions)
            .into(),
    )
}

fn per_field_filter<F>(fields: &[FieldSpec], leaf: F) -> Option<Clause>
where
    F: Fn(&str) -> Clause,
{
    if fields.is_empty() {
        return None;
    }

    let any_field = fields
        .iter()
        .fold(BoolQuery::new(), |b, f| b.should(leaf(&f.name)));
    Some(BoolQuery::new().filter(any_field.into()).into())
}

fn fuzzy(text: &str, fields: Vec<FieldSpec>) -> Clause {
    with_fields(
        MultiMatch::new(text, MultiMatchType::MostFields)
            .operator(Operator::Or)
            .fuzziness(Fuzziness::Auto),
        fields,
    )
    .into()
}

fn boosting(text: &str, request: &SearchRequest) -> Result<Clause> {
    let mut query = MultiMatch::new(text, MultiMatchType::MostFields).operator(Operator::Or);
    for (field, weight) in &request.field_weights {
        if field.trim().is_empty() {
            return Err(SearchKitError::QueryAssembly(
                "weighted field name is blank".to_string(),
            ));
        }
        if !weight.is_finite() || *weight <= 0.0 {
            return Err(SearchKitError::QueryAssembly(format!(
                "weight for field '{field}' must be positive, got {weight}"
            )));
        }
        query = query.field(FieldSpec::boosted(field.as_str(), *weight));
    }
    Ok(query.into())
}

fn with_fields(query: MultiMatch, fields: Vec<FieldSpec>) -> MultiMatch {
    fields.into_iter().fold(query, MultiMatch::field)
}
