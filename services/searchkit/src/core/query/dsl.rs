//! Backend-neutral clause tree.
//!
//! Clauses mirror the Elasticsearch query DSL closely enough that
//! rendering them is a direct mapping, while staying plain Rust data
//! that other backends (the embedded Tantivy backend) can walk.
//!
//! Callers of the filtered strategy build a [`BoolQuery`] themselves:
//!
//! ```
//! use searchkit::core::query::{BoolQuery, Clause};
//!
//! let filter = BoolQuery::new()
//!     .must(Clause::term("status", "active"))
//!     .must_not(Clause::term("name", "civic"));
//! assert_eq!(filter.referenced_fields(), vec!["status", "name"]);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

// `name^2.5` inline boost syntax
static BOOSTED_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)\^([0-9]*\.?[0-9]+)$").expect("valid boost pattern"));

/// How analyzed tokens of a match combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Operator {
    #[default]
    Or,
    And,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Or => "or",
            Operator::And => "and",
        }
    }
}

/// Scoring/matching mode of a multi-field match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiMatchType {
    /// Score is taken from the best matching field
    BestFields,
    /// Scores of all matching fields are summed
    MostFields,
    /// Token order is preserved, within `slop`
    Phrase,
    /// Phrase whose final token is a prefix
    PhrasePrefix,
}

impl MultiMatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MultiMatchType::BestFields => "best_fields",
            MultiMatchType::MostFields => "most_fields",
            MultiMatchType::Phrase => "phrase",
            MultiMatchType::PhrasePrefix => "phrase_prefix",
        }
    }
}

/// Edit-distance tolerance for fuzzy matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    /// Distance derived from token length
    Auto,
    /// Fixed maximum edit distance
    Distance(u8),
}

impl Fuzziness {
    /// Maximum edit distance allowed for a token of the given length
    ///
    /// `Auto` allows 0 edits below 3 characters, 1 edit up to 5
    /// characters and 2 beyond that.
    pub fn distance_for(&self, token: &str) -> u8 {
        match self {
            Fuzziness::Distance(d) => *d,
            Fuzziness::Auto => match token.chars().count() {
                0..=2 => 0,
                3..=5 => 1,
                _ => 2,
            },
        }
    }

    fn to_json(self) -> Value {
        match self {
            Fuzziness::Auto => json!("AUTO"),
            Fuzziness::Distance(d) => json!(d.to_string()),
        }
    }
}

/// A target field with an optional relevance boost
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub boost: Option<f32>,
}

impl FieldSpec {
    /// A field without boost
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boost: None,
        }
    }

    /// A field with an explicit boost
    pub fn boosted(name: impl Into<String>, boost: f32) -> Self {
        Self {
            name: name.into(),
            boost: Some(boost),
        }
    }

    /// Parse `name` or `name^boost`
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(caps) = BOOSTED_FIELD.captures(raw) {
            if let Ok(boost) = caps[2].parse::<f32>() {
                return Self::boosted(&caps[1], boost);
            }
        }
        Self::new(raw)
    }

    /// Render as `name` or `name^boost`
    pub fn render(&self) -> String {
        match self.boost {
            Some(boost) => format!("{}^{}", self.name, boost),
            None => self.name.clone(),
        }
    }

    /// True when this targets every field (`*`)
    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

/// Match text against several fields at once
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatch {
    pub query: String,
    /// Empty means the backend's default field set
    pub fields: Vec<FieldSpec>,
    pub kind: MultiMatchType,
    pub operator: Option<Operator>,
    pub slop: Option<u32>,
    pub max_expansions: Option<u32>,
    pub fuzziness: Option<Fuzziness>,
}

impl MultiMatch {
    pub fn new(query: impl Into<String>, kind: MultiMatchType) -> Self {
        Self {
            query: query.into(),
            fields: Vec::new(),
            kind,
            operator: None,
            slop: None,
            max_expansions: None,
            fuzziness: None,
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn slop(mut self, slop: u32) -> Self {
        self.slop = Some(slop);
        self
    }

    pub fn max_expansions(mut self, max_expansions: u32) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = Some(fuzziness);
        self
    }

    fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), json!(self.query));
        if !self.fields.is_empty() {
            let fields: Vec<String> = self.fields.iter().map(FieldSpec::render).collect();
            body.insert("fields".to_string(), json!(fields));
        }
        body.insert("type".to_string(), json!(self.kind.as_str()));
        if let Some(operator) = self.operator {
            body.insert("operator".to_string(), json!(operator.as_str()));
        }
        if let Some(slop) = self.slop {
            body.insert("slop".to_string(), json!(slop));
        }
        if let Some(max_expansions) = self.max_expansions {
            body.insert("max_expansions".to_string(), json!(max_expansions));
        }
        if let Some(fuzziness) = self.fuzziness {
            body.insert("fuzziness".to_string(), fuzziness.to_json());
        }
        json!({ "multi_match": body })
    }
}

/// Boolean combination of clauses
///
/// `filter` clauses select documents without contributing to the score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<Clause>,
    pub should: Vec<Clause>,
    pub must_not: Vec<Clause>,
    pub filter: Vec<Clause>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, clause: Clause) -> Self {
        self.must.push(clause);
        self
    }

    pub fn should(mut self, clause: Clause) -> Self {
        self.should.push(clause);
        self
    }

    pub fn must_not(mut self, clause: Clause) -> Self {
        self.must_not.push(clause);
        self
    }

    pub fn filter(mut self, clause: Clause) -> Self {
        self.filter.push(clause);
        self
    }

    /// True when no clause of any kind is present
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.should.is_empty()
            && self.must_not.is_empty()
            && self.filter.is_empty()
    }

    /// Field names referenced anywhere below this node, in order
    pub fn referenced_fields(&self) -> Vec<&str> {
        self.must
            .iter()
            .chain(&self.should)
            .chain(&self.must_not)
            .chain(&self.filter)
            .flat_map(Clause::referenced_fields)
            .collect()
    }

    fn to_json(&self) -> Value {
        let mut body = Map::new();
        for (key, clauses) in [
            ("must", &self.must),
            ("should", &self.should),
            ("must_not", &self.must_not),
            ("filter", &self.filter),
        ] {
            if !clauses.is_empty() {
                let rendered: Vec<Value> = clauses.iter().map(Clause::to_json).collect();
                body.insert(key.to_string(), Value::Array(rendered));
            }
        }
        json!({ "bool": body })
    }
}

/// One node of the clause tree
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    MatchAll,
    Match {
        field: String,
        query: String,
        operator: Operator,
    },
    MultiMatch(MultiMatch),
    Term {
        field: String,
        value: String,
    },
    Regexp {
        field: String,
        value: String,
        case_insensitive: bool,
    },
    Wildcard {
        field: String,
        value: String,
        case_insensitive: bool,
    },
    Bool(BoolQuery),
}

impl Clause {
    /// Single-field match with the given operator
    pub fn matches(field: impl Into<String>, query: impl Into<String>, operator: Operator) -> Self {
        Clause::Match {
            field: field.into(),
            query: query.into(),
            operator,
        }
    }

    /// Exact term predicate
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive regular expression over indexed terms
    pub fn regexp(field: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::Regexp {
            field: field.into(),
            value: value.into(),
            case_insensitive: true,
        }
    }

    /// Case-insensitive wildcard (`*`, `?`) over indexed terms
    pub fn wildcard(field: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::Wildcard {
            field: field.into(),
            value: value.into(),
            case_insensitive: true,
        }
    }

    /// Field names referenced by this clause, in order
    pub fn referenced_fields(&self) -> Vec<&str> {
        match self {
            Clause::MatchAll => Vec::new(),
            Clause::Match { field, .. }
            | Clause::Term { field, .. }
            | Clause::Regexp { field, .. }
            | Clause::Wildcard { field, .. } => vec![field.as_str()],
            Clause::MultiMatch(mm) => mm.fields.iter().map(|f| f.name.as_str()).collect(),
            Clause::Bool(b) => b.referenced_fields(),
        }
    }

    /// Render as Elasticsearch query DSL
    pub fn to_json(&self) -> Value {
        match self {
            Clause::MatchAll => json!({ "match_all": {} }),
            Clause::Match {
                field,
                query,
                operator,
            } => json!({
                "match": { field.as_str(): { "query": query, "operator": operator.as_str() } }
            }),
            Clause::MultiMatch(mm) => mm.to_json(),
            Clause::Term { field, value } => json!({
                "term": { field.as_str(): { "value": value } }
            }),
            Clause::Regexp {
                field,
                value,
                case_insensitive,
            } => json!({
                "regexp": { field.as_str(): { "value": value, "case_insensitive": case_insensitive } }
            }),
            Clause::Wildcard {
                field,
                value,
                case_insensitive,
            } => json!({
                "wildcard": { field.as_str(): { "value": value, "case_insensitive": case_insensitive } }
            }),
            Clause::Bool(b) => b.to_json(),
        }
    }
}

impl From<BoolQuery> for Clause {
    fn from(b: BoolQuery) -> Self {
        Clause::Bool(b)
    }
}

impl From<MultiMatch> for Clause {
    fn from(mm: MultiMatch) -> Self {
        Clause::MultiMatch(mm)
    }
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
