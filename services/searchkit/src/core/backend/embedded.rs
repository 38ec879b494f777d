//! Embedded search backend built on Tantivy.
//!
//! Documents are JSON objects. Each declared field is indexed as
//! analyzed text (default tokenizer, lower-cased) and the whole
//! document is stored alongside so hits can return their source.
//! Clause trees are evaluated locally with the closest Tantivy
//! equivalent of each Elasticsearch clause.
//!
//! Phrase prefix is narrower than Elasticsearch: Tantivy's prefix
//! phrase has no slop, so `slop` is ignored, and a single-token prefix
//! runs as an unbounded prefix regex, so `max_expansions` only applies
//! to prefixes of two or more tokens.

use crate::core::backend::{Hit, SearchBackend, SearchHits};
use crate::core::error::{Result, SearchKitError};
use crate::core::query::{
    BoolQuery, Clause, FieldSpec, MultiMatch, MultiMatchType, Operator, SortClause,
    StructuredQuery,
};
use crate::core::types::SortDirection;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{
    AllQuery, BooleanQuery, BoostQuery, ConstScoreQuery, DisjunctionMaxQuery, EmptyQuery,
    FuzzyTermQuery, Occur, PhrasePrefixQuery, PhraseQuery, Query, RegexQuery, TermQuery,
};
use tantivy::schema::{Field, IndexRecordOption, Schema, Value, STORED, TEXT};
use tantivy::tokenizer::TokenStream;
use tantivy::{DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

const ID_FIELD: &str = "_id";
const SOURCE_FIELD: &str = "_source";

/// Writer heap budget; Tantivy refuses anything below 15MB per thread
const WRITER_MEMORY_BUDGET: usize = 20_000_000;

/// Largest edit distance the Levenshtein automaton supports
const MAX_FUZZY_DISTANCE: u8 = 2;

/// One named in-memory index
struct LocalIndex {
    index: Index,
    reader: IndexReader,
    fields: BTreeMap<String, Field>,
    id_field: Field,
    source_field: Field,
    num_docs: u64,
}

impl LocalIndex {
    fn build(fields: &[&str], documents: impl IntoIterator<Item = JsonValue>) -> Result<Self> {
        let mut builder = Schema::builder();
        let mut declared = BTreeMap::new();
        for name in fields {
            let name = name.trim();
            if name.is_empty() || name == ID_FIELD || name == SOURCE_FIELD {
                return Err(SearchKitError::Backend(format!(
                    "Invalid index field name '{name}'"
                )));
            }
            if declared.contains_key(name) {
                continue;
            }
            let field = builder.add_text_field(name, TEXT | STORED);
            declared.insert(name.to_string(), field);
        }
        let id_field = builder.add_text_field(ID_FIELD, STORED);
        let source_field = builder.add_text_field(SOURCE_FIELD, STORED);

        let index = Index::create_in_ram(builder.build());
        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BUDGET)?;

        let mut num_docs = 0u64;
        for (ordinal, document) in documents.into_iter().enumerate() {
            let JsonValue::Object(object) = &document else {
                return Err(SearchKitError::Backend(format!(
                    "Document {ordinal} is not a JSON object"
                )));
            };

            let mut doc = TantivyDocument::default();
            for (name, field) in &declared {
                if let Some(value) = object.get(name) {
                    add_json_value(&mut doc, *field, value);
                }
            }

            let id = object
                .get("id")
                .and_then(scalar_text)
                .unwrap_or_else(|| ordinal.to_string());
            doc.add_text(id_field, &id);
            doc.add_text(source_field, serde_json::to_string(&document)?);

            writer.add_document(doc)?;
            num_docs += 1;
        }
        writer.commit()?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            fields: declared,
            id_field,
            source_field,
            num_docs,
        })
    }

    /// Run `text` through the field's analyzer
    fn tokens(&self, field: Field, text: &str) -> Result<Vec<String>> {
        let mut analyzer = self.index.tokenizer_for_field(field)?;
        let mut stream = analyzer.token_stream(text);
        let mut tokens = Vec::new();
        while stream.advance() {
            tokens.push(stream.token().text.clone());
        }
        Ok(tokens)
    }

    fn translate(&self, clause: &Clause) -> Result<Box<dyn Query>> {
        match clause {
            Clause::MatchAll => Ok(Box::new(AllQuery)),
            Clause::Match {
                field,
                query,
                operator,
            } => match self.fields.get(field) {
                Some(&field) => {
                    let terms = self.term_queries(field, query)?;
                    Ok(combine(terms, *operator))
                }
                None => Ok(Box::new(EmptyQuery)),
            },
            Clause::MultiMatch(mm) => self.translate_multi_match(mm),
            Clause::Term { field, value } => match self.fields.get(field) {
                Some(&field) => Ok(Box::new(TermQuery::new(
                    Term::from_field_text(field, &value.to_lowercase()),
                    IndexRecordOption::Basic,
                ))),
                None => Ok(Box::new(EmptyQuery)),
            },
            Clause::Regexp {
                field,
                value,
                case_insensitive,
            } => match self.fields.get(field) {
                Some(&field) => {
                    let pattern = if *case_insensitive {
                        lowercase_literals(value)
                    } else {
                        value.clone()
                    };
                    Ok(Box::new(RegexQuery::from_pattern(&pattern, field)?))
                }
                None => Ok(Box::new(EmptyQuery)),
            },
            Clause::Wildcard {
                field,
                value,
                case_insensitive,
            } => match self.fields.get(field) {
                Some(&field) => {
                    let pattern = wildcard_to_regex(value);
                    let pattern = if *case_insensitive {
                        lowercase_literals(&pattern)
                    } else {
                        pattern
                    };
                    Ok(Box::new(RegexQuery::from_pattern(&pattern, field)?))
                }
                None => Ok(Box::new(EmptyQuery)),
            },
            Clause::Bool(b) => self.translate_bool(b),
        }
    }

    fn translate_bool(&self, b: &BoolQuery) -> Result<Box<dyn Query>> {
        if b.is_empty() {
            return Ok(Box::new(AllQuery));
        }

        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for clause in &b.must {
            subqueries.push((Occur::Must, self.translate(clause)?));
        }
        for clause in &b.should {
            subqueries.push((Occur::Should, self.translate(clause)?));
        }
        for clause in &b.must_not {
            subqueries.push((Occur::MustNot, self.translate(clause)?));
        }
        for clause in &b.filter {
            let inner = self.translate(clause)?;
            subqueries.push((Occur::Must, Box::new(ConstScoreQuery::new(inner, 0.0))));
        }

        // A purely negative boolean matches nothing in Tantivy
        if b.must.is_empty() && b.should.is_empty() && b.filter.is_empty() {
            subqueries.push((Occur::Must, Box::new(AllQuery)));
        }

        Ok(Box::new(BooleanQuery::new(subqueries)))
    }

    fn translate_multi_match(&self, mm: &MultiMatch) -> Result<Box<dyn Query>> {
        let targets = self.resolve_fields(&mm.fields);
        let mut per_field: Vec<Box<dyn Query>> = Vec::with_capacity(targets.len());

        for (field, boost) in targets {
            let query = match mm.kind {
                MultiMatchType::BestFields | MultiMatchType::MostFields => {
                    let operator = mm.operator.unwrap_or_default();
                    match mm.fuzziness {
                        Some(fuzziness) => {
                            let queries = self
                                .tokens(field, &mm.query)?
                                .into_iter()
                                .map(|token| {
                                    let distance =
                                        fuzziness.distance_for(&token).min(MAX_FUZZY_DISTANCE);
                                    fuzzy_query(field, &token, distance)
                                })
                                .collect();
                            combine(queries, operator)
                        }
                        None => combine(self.term_queries(field, &mm.query)?, operator),
                    }
                }
                MultiMatchType::Phrase => self.phrase_query(field, &mm.query, mm.slop)?,
                MultiMatchType::PhrasePrefix => {
                    self.phrase_prefix_query(field, &mm.query, mm.max_expansions)?
                }
            };
            per_field.push(match boost {
                Some(boost) => Box::new(BoostQuery::new(query, boost)),
                None => query,
            });
        }

        if per_field.is_empty() {
            return Ok(Box::new(EmptyQuery));
        }
        if per_field.len() == 1 {
            return Ok(per_field.remove(0));
        }

        match mm.kind {
            MultiMatchType::MostFields => Ok(Box::new(BooleanQuery::new(
                per_field.into_iter().map(|q| (Occur::Should, q)).collect(),
            ))),
            _ => Ok(Box::new(DisjunctionMaxQuery::new(per_field))),
        }
    }

    /// Map field specs onto indexed fields; empty or `*` means every field
    fn resolve_fields(&self, specs: &[FieldSpec]) -> Vec<(Field, Option<f32>)> {
        if specs.is_empty() || specs.iter().any(FieldSpec::is_wildcard) {
            return self.fields.values().map(|f| (*f, None)).collect();
        }
        specs
            .iter()
            .filter_map(|spec| self.fields.get(&spec.name).map(|f| (*f, spec.boost)))
            .collect()
    }

    fn term_queries(&self, field: Field, text: &str) -> Result<Vec<Box<dyn Query>>> {
        Ok(self
            .tokens(field, text)?
            .iter()
            .map(|token| term_query(field, token))
            .collect())
    }

    fn phrase_query(&self, field: Field, text: &str, slop: Option<u32>) -> Result<Box<dyn Query>> {
        let tokens = self.tokens(field, text)?;
        Ok(match tokens.as_slice() {
            [] => Box::new(EmptyQuery),
            [single] => term_query(field, single),
            _ => {
                let terms = tokens
                    .iter()
                    .map(|t| Term::from_field_text(field, t))
                    .collect();
                let mut phrase = PhraseQuery::new(terms);
                phrase.set_slop(slop.unwrap_or(0));
                Box::new(phrase)
            }
        })
    }

    fn phrase_prefix_query(
        &self,
        field: Field,
        text: &str,
        max_expansions: Option<u32>,
    ) -> Result<Box<dyn Query>> {
        let tokens = self.tokens(field, text)?;
        Ok(match tokens.as_slice() {
            [] => Box::new(EmptyQuery),
            [single] => {
                let pattern = format!("{}.*", regex::escape(single));
                Box::new(RegexQuery::from_pattern(&pattern, field)?)
            }
            _ => {
                let terms = tokens
                    .iter()
                    .map(|t| Term::from_field_text(field, t))
                    .collect();
                let mut phrase = PhrasePrefixQuery::new(terms);
                if let Some(max) = max_expansions {
                    phrase.set_max_expansions(max);
                }
                Box::new(phrase)
            }
        })
    }

    fn load_hit(&self, index_name: &str, address: DocAddress, score: Option<f32>) -> Result<Hit> {
        let searcher = self.reader.searcher();
        let doc: TantivyDocument = searcher.doc(address)?;

        let source = match doc.get_first(self.source_field).and_then(|v| v.as_str()) {
            Some(raw) => serde_json::from_str(raw)?,
            None => JsonValue::Object(Map::new()),
        };
        let id = doc
            .get_first(self.id_field)
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(Hit {
            index: index_name.to_string(),
            id,
            score,
            source,
        })
    }

    fn search(&self, index_name: &str, query: &StructuredQuery) -> Result<SearchHits> {
        let tantivy_query = self.translate(query.clause())?;
        let searcher = self.reader.searcher();
        let total = searcher.search(tantivy_query.as_ref(), &Count)? as u64;

        if query.limit() == 0 || total == 0 {
            return Ok(SearchHits {
                hits: Vec::new(),
                total: Some(total),
            });
        }

        let mut hits = match query.sort() {
            None => {
                let collector = TopDocs::with_limit(query.limit()).and_offset(query.offset());
                searcher
                    .search(tantivy_query.as_ref(), &collector)?
                    .into_iter()
                    .map(|(score, address)| self.load_hit(index_name, address, Some(score)))
                    .collect::<Result<Vec<_>>>()?
            }
            Some(sort) => {
                // Field sorts need every match before the page can be cut
                let collector = TopDocs::with_limit(total as usize);
                let mut all = searcher
                    .search(tantivy_query.as_ref(), &collector)?
                    .into_iter()
                    .map(|(_, address)| self.load_hit(index_name, address, None))
                    .collect::<Result<Vec<_>>>()?;
                sort_hits(&mut all, sort);
                all.into_iter()
                    .skip(query.offset())
                    .take(query.limit())
                    .collect()
            }
        };

        if let Some(fields) = query.source() {
            for hit in &mut hits {
                filter_source(&mut hit.source, fields);
            }
        }

        Ok(SearchHits {
            hits,
            total: Some(total),
        })
    }
}

fn add_json_value(doc: &mut TantivyDocument, field: Field, value: &JsonValue) {
    match value {
        JsonValue::Array(items) => {
            for item in items {
                add_json_value(doc, field, item);
            }
        }
        other => {
            if let Some(text) = scalar_text(other) {
                doc.add_text(field, &text);
            }
        }
    }
}

/// Text form of a string, number or boolean
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn term_query(field: Field, token: &str) -> Box<dyn Query> {
    Box::new(TermQuery::new(
        Term::from_field_text(field, token),
        IndexRecordOption::WithFreqs,
    ))
}

fn fuzzy_query(field: Field, token: &str, distance: u8) -> Box<dyn Query> {
    if distance == 0 {
        return term_query(field, token);
    }
    Box::new(FuzzyTermQuery::new(
        Term::from_field_text(field, token),
        distance,
        true,
    ))
}

/// Join token queries per operator; no tokens matches nothing
fn combine(mut queries: Vec<Box<dyn Query>>, operator: Operator) -> Box<dyn Query> {
    match queries.len() {
        0 => Box::new(EmptyQuery),
        1 => queries.remove(0),
        _ => {
            let occur = match operator {
                Operator::Or => Occur::Should,
                Operator::And => Occur::Must,
            };
            Box::new(BooleanQuery::new(
                queries.into_iter().map(|q| (occur, q)).collect(),
            ))
        }
    }
}

/// `*` and `?` become `.*` and `.`; everything else is literal
fn wildcard_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() * 2);
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex
}

/// Lower-case the literal characters of a regex
///
/// Indexed terms are lower-cased, so case-insensitive matching folds the
/// pattern instead. Escapes (`\D`, `\p{Lu}`, `\x{41}`), group flags and
/// group names are copied unchanged since their case carries meaning.
fn lowercase_literals(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                let Some(escaped) = chars.next() else {
                    break;
                };
                out.push(escaped);
                if matches!(escaped, 'p' | 'P' | 'x' | 'u' | 'U') {
                    if chars.peek() == Some(&'{') {
                        for braced in chars.by_ref() {
                            out.push(braced);
                            if braced == '}' {
                                break;
                            }
                        }
                    } else if matches!(escaped, 'p' | 'P') {
                        out.extend(chars.next());
                    }
                }
            }
            '(' if chars.peek() == Some(&'?') => {
                out.push(c);
                out.extend(chars.next());
                if matches!(chars.peek(), Some('P') | Some('<')) {
                    for named in chars.by_ref() {
                        out.push(named);
                        if named == '>' {
                            break;
                        }
                    }
                } else {
                    while let Some(&flag) = chars.peek() {
                        if !(flag.is_ascii_alphabetic() || flag == '-') {
                            break;
                        }
                        out.push(flag);
                        chars.next();
                    }
                }
            }
            other => out.extend(other.to_lowercase()),
        }
    }
    out
}

fn sort_hits(hits: &mut [Hit], sort: &SortClause) {
    hits.sort_by(|a, b| {
        let left = a.source.get(&sort.field).filter(|v| !v.is_null());
        let right = b.source.get(&sort.field).filter(|v| !v.is_null());
        match (left, right) {
            (Some(l), Some(r)) => {
                let ord = compare_json(l, r);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            // Missing values sort last in either direction
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Numbers compare numerically, everything else by text
fn compare_json(left: &JsonValue, right: &JsonValue) -> Ordering {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => {
            let l = scalar_text(left).unwrap_or_else(|| left.to_string());
            let r = scalar_text(right).unwrap_or_else(|| right.to_string());
            l.cmp(&r)
        }
    }
}

fn filter_source(source: &mut JsonValue, fields: &[String]) {
    if let JsonValue::Object(object) = source {
        object.retain(|key, _| fields.iter().any(|f| f == key));
    }
}

/// In-memory search backend
///
/// Indexes are registered up front with [`TantivyBackend::add_index`]
/// and are read-only afterwards, so the backend can be shared freely.
#[derive(Default)]
pub struct TantivyBackend {
    indexes: HashMap<String, LocalIndex>,
}

impl std::fmt::Debug for TantivyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyBackend")
            .field("indexes", &self.index_names())
            .finish()
    }
}

impl TantivyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build (or replace) index `name` from JSON documents
    ///
    /// Only `fields` are searchable; every document is stored whole. A
    /// top-level `id` value, when present, becomes the hit id.
    pub fn add_index<I>(&mut self, name: &str, fields: &[&str], documents: I) -> Result<()>
    where
        I: IntoIterator<Item = JsonValue>,
    {
        let local = LocalIndex::build(fields, documents)?;
        tracing::debug!(
            "Indexed {} documents into '{}' ({} searchable fields)",
            local.num_docs,
            name,
            local.fields.len()
        );
        self.indexes.insert(name.to_string(), local);
        Ok(())
    }

    /// Top-level keys holding searchable values across `documents`
    pub fn infer_fields(documents: &[JsonValue]) -> Vec<String> {
        let mut fields = BTreeSet::new();
        for document in documents {
            if let JsonValue::Object(object) = document {
                for (key, value) in object {
                    if !value.is_null() && !value.is_object() {
                        fields.insert(key.clone());
                    }
                }
            }
        }
        fields.into_iter().collect()
    }

    /// Registered index names, sorted
    pub fn index_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.indexes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of documents in an index
    pub fn document_count(&self, name: &str) -> Option<u64> {
        self.indexes.get(name).map(|local| local.num_docs)
    }
}

#[async_trait]
impl SearchBackend for TantivyBackend {
    async fn search(&self, query: &StructuredQuery) -> Result<SearchHits> {
        let local = self
            .indexes
            .get(query.index())
            .ok_or_else(|| SearchKitError::IndexNotFound(query.index().to_string()))?;
        local.search(query.index(), query)
    }

    fn name(&self) -> &str {
        "tantivy"
    }
}
