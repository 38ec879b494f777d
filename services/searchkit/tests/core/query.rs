// Integration tests for query construction

use crate::common::{Vehicle, VEHICLE_INDEX};
use searchkit::core::query::{page_window, BoolQuery, Clause, QueryBuilder, Strategy};
use searchkit::{SearchKitError, SearchRecord, SearchRequest, ValidationError};
use serde_json::json;

fn all_strategies() -> Vec<Strategy> {
    vec![
        Strategy::Filtered(BoolQuery::new().must(Clause::term("status", "true"))),
        Strategy::MultiField,
        Strategy::MatchPhrase,
        Strategy::MatchPhrasePrefix,
        Strategy::Regexp,
        Strategy::Fuzzy,
        Strategy::Wildcard,
        Strategy::Boosting,
    ]
}

fn request(text: &str, fields: &[&str]) -> SearchRequest {
    SearchRequest::new(text).with_fields(fields.iter().copied())
}

#[test]
fn test_page_size_over_limit_fails_every_strategy() {
    let oversized = request("jeep", &["name"])
        .with_weight("name", 2.0)
        .with_page(0, 1001);

    for strategy in all_strategies() {
        let builder = QueryBuilder::new(VEHICLE_INDEX, &oversized);
        let err = builder.build(&strategy).unwrap_err();
        assert_eq!(
            err.validation(),
            Some(&ValidationError::PageSizeExceeded {
                size: 1001,
                max: 1000
            }),
            "strategy {}",
            strategy.name()
        );
        assert!(builder.build_lenient(&strategy).is_none());
    }
}

#[test]
fn test_blank_text_fails_every_strategy() {
    for text in ["", "   ", "\t\n"] {
        let blank = request(text, &["name"]).with_weight("name", 2.0);
        for strategy in all_strategies() {
            let err = QueryBuilder::new(VEHICLE_INDEX, &blank)
                .build(&strategy)
                .unwrap_err();
            assert_eq!(err.validation(), Some(&ValidationError::EmptyQueryText));
        }
    }
}

#[test]
fn test_offset_is_page_times_size() {
    for (page, size, offset) in [(0, 10, 0), (1, 10, 10), (3, 25, 75), (2, 1000, 2000)] {
        let req = request("jeep", &[]).with_page(page, size);
        assert_eq!(page_window(&req).unwrap(), (offset, size as usize));

        let query = QueryBuilder::new(VEHICLE_INDEX, &req)
            .build(&Strategy::MultiField)
            .unwrap()
            .unwrap();
        assert_eq!(query.offset(), offset);
        assert_eq!(query.limit(), size as usize);
    }
}

#[test]
fn test_wildcard_without_fields_is_no_query() {
    let req = request("je*", &[]);
    let query = QueryBuilder::new(VEHICLE_INDEX, &req)
        .build(&Strategy::Wildcard)
        .unwrap();
    assert!(query.is_none());
}

#[test]
fn test_phrase_prefix_uses_first_field_only() {
    let single = request("jee", &["name"]);
    let query = QueryBuilder::new(VEHICLE_INDEX, &single)
        .build(&Strategy::MatchPhrasePrefix)
        .unwrap()
        .unwrap();
    assert_eq!(query.clause().referenced_fields(), vec!["name"]);

    let both = request("jee", &["name", "description"]);
    let query = QueryBuilder::new(VEHICLE_INDEX, &both)
        .build(&Strategy::MatchPhrasePrefix)
        .unwrap()
        .unwrap();
    assert_eq!(query.clause().referenced_fields(), vec!["name"]);
}

#[test]
fn test_multi_field_request_body() {
    let req = request("jeep", &["name", "description"]).with_page(0, 10);
    let query = QueryBuilder::new(VEHICLE_INDEX, &req)
        .for_record::<Vehicle>()
        .build(&Strategy::MultiField)
        .unwrap()
        .unwrap();

    assert_eq!(
        query.to_json(),
        json!({
            "from": 0,
            "size": 10,
            "query": {
                "multi_match": {
                    "query": "jeep",
                    "fields": ["name", "description"],
                    "type": "best_fields",
                    "operator": "or"
                }
            },
            "_source": ["id", "number", "name", "created", "status", "description"]
        })
    );
}

#[test]
fn test_record_fields_drive_source_filtering() {
    assert_eq!(
        Vehicle::FIELDS,
        &["id", "number", "name", "created", "status", "description"]
    );
}

#[test]
fn test_request_from_camel_case_json() {
    let req: SearchRequest = serde_json::from_value(json!({
        "textSearch": "jeep",
        "fields": ["name"],
        "page": 2,
        "size": 5,
        "sortBy": "created",
        "orderBy": "DESC"
    }))
    .unwrap();

    let query = QueryBuilder::new(VEHICLE_INDEX, &req)
        .build(&Strategy::MultiField)
        .unwrap()
        .unwrap();
    let body = query.to_json();
    assert_eq!(body["from"], 10);
    assert_eq!(body["size"], 5);
    assert_eq!(body["sort"], json!([{"created": {"order": "desc"}}]));
}

#[test]
fn test_assembly_errors_are_distinct_from_validation() {
    let req = request("jeep", &["name", "  "]);
    let err = QueryBuilder::new(VEHICLE_INDEX, &req)
        .build(&Strategy::MultiField)
        .unwrap_err();
    assert!(err.is_assembly());
    assert!(matches!(err, SearchKitError::QueryAssembly(_)));
}
