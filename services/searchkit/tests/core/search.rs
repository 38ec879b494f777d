// Integration tests for search execution against the embedded backend

use crate::common::{failing_executor, vehicle_executor, Vehicle, VEHICLE_INDEX};
use searchkit::core::query::{BoolQuery, Clause, Operator, QueryBuilder, Strategy};
use searchkit::{SearchKitError, SearchRequest, SortDirection};
use serde::Deserialize;

fn names(vehicles: &[Vehicle]) -> Vec<&str> {
    vehicles.iter().map(|v| v.name.as_str()).collect()
}

#[tokio::test]
async fn test_multi_field_finds_single_vehicle() {
    let executor = vehicle_executor();
    let request = SearchRequest::new("jeep")
        .with_fields(["name", "description"])
        .with_page(0, 10);

    let query = QueryBuilder::new(VEHICLE_INDEX, &request)
        .for_record::<Vehicle>()
        .build(&Strategy::MultiField)
        .expect("Build failed")
        .expect("Expected a query");
    assert_eq!(query.offset(), 0);
    assert_eq!(query.limit(), 10);

    let vehicles: Vec<Vehicle> = executor.try_execute(&query).await.expect("Search failed");
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].id, "1");
    assert_eq!(vehicles[0].name, "Jeep Wrangler");
    assert_eq!(vehicles[0].description, "Rugged off-road SUV");
    assert!(vehicles[0].status);
}

#[tokio::test]
async fn test_fuzzy_tolerates_misspelling() {
    let executor = vehicle_executor();
    let request = SearchRequest::new("jeap").with_fields(["name", "description"]);

    let vehicles: Vec<Vehicle> = executor.fuzzy_search(VEHICLE_INDEX, &request).await;
    assert_eq!(names(&vehicles), vec!["Jeep Wrangler"]);
}

#[tokio::test]
async fn test_failing_backend_yields_empty_list() {
    let executor = failing_executor();
    let request = SearchRequest::new("jeep").with_fields(["name"]);

    let vehicles: Vec<Vehicle> = executor.multi_search(VEHICLE_INDEX, &request).await;
    assert!(vehicles.is_empty());

    let vehicles: Vec<Vehicle> = executor.boosting_search(VEHICLE_INDEX, &request).await;
    assert!(vehicles.is_empty());
}

#[tokio::test]
async fn test_failing_backend_surfaces_on_typed_path() {
    let executor = failing_executor();
    let request = SearchRequest::new("jeep").with_fields(["name"]);

    let err = executor
        .search::<Vehicle>(VEHICLE_INDEX, &request, &Strategy::MultiField)
        .await
        .unwrap_err();
    assert!(err.is_execution());
    assert!(matches!(err, SearchKitError::Backend(_)));
}

#[tokio::test]
async fn test_extra_payload_fields_are_ignored() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct IdAndName {
        id: String,
        name: String,
    }

    let executor = vehicle_executor();
    let request = SearchRequest::new("civic").with_fields(["name"]);
    let query = QueryBuilder::new(VEHICLE_INDEX, &request)
        .build(&Strategy::MultiField)
        .unwrap()
        .unwrap();

    // No source filtering: the whole document comes back
    let records: Vec<IdAndName> = executor.try_execute(&query).await.unwrap();
    assert_eq!(
        records,
        vec![IdAndName {
            id: "3".to_string(),
            name: "Honda Civic".to_string()
        }]
    );
}

#[tokio::test]
async fn test_phrase_prefix_ignores_later_fields() {
    let executor = vehicle_executor();

    // "sport" only appears in descriptions, which are listed second
    let request = SearchRequest::new("sport").with_fields(["name", "description"]);
    let vehicles: Vec<Vehicle> = executor
        .match_phrase_prefix_search(VEHICLE_INDEX, &request)
        .await;
    assert!(vehicles.is_empty());

    let request = SearchRequest::new("sport").with_fields(["description", "name"]);
    let vehicles: Vec<Vehicle> = executor
        .match_phrase_prefix_search(VEHICLE_INDEX, &request)
        .await;
    assert_eq!(names(&vehicles), vec!["Honda Civic"]);
}

#[tokio::test]
async fn test_match_phrase_respects_word_order_within_slop() {
    let executor = vehicle_executor();

    let mut request = SearchRequest::new("compact sedan").with_fields(["description"]);
    request.slop = 0;
    let vehicles: Vec<Vehicle> = executor.match_phrase_search(VEHICLE_INDEX, &request).await;
    assert_eq!(names(&vehicles), vec!["Toyota Corolla"]);

    let mut request = SearchRequest::new("reliable sedan").with_fields(["description"]);
    request.slop = 0;
    let vehicles: Vec<Vehicle> = executor.match_phrase_search(VEHICLE_INDEX, &request).await;
    assert!(vehicles.is_empty());
}

#[tokio::test]
async fn test_wildcard_and_regexp() {
    let executor = vehicle_executor();

    let request = SearchRequest::new("cor*").with_fields(["name", "description"]);
    let vehicles: Vec<Vehicle> = executor.wild_card_search(VEHICLE_INDEX, &request).await;
    assert_eq!(names(&vehicles), vec!["Toyota Corolla"]);

    let request = SearchRequest::new("h.nda").with_fields(["name"]);
    let vehicles: Vec<Vehicle> = executor.regexp_search(VEHICLE_INDEX, &request).await;
    assert_eq!(names(&vehicles), vec!["Honda Civic"]);

    let request = SearchRequest::new("cor*");
    let vehicles: Vec<Vehicle> = executor.wild_card_search(VEHICLE_INDEX, &request).await;
    assert!(vehicles.is_empty(), "wildcard without fields searches nothing");
}

#[tokio::test]
async fn test_handle_search_with_caller_filter() {
    let executor = vehicle_executor();
    let filter = BoolQuery::new()
        .must(Clause::matches("description", "compact", Operator::Or))
        .filter(Clause::term("status", "true"));

    let request = SearchRequest::new("compact");
    let vehicles: Vec<Vehicle> = executor
        .handle_search(VEHICLE_INDEX, &request, filter)
        .await;
    assert_eq!(names(&vehicles), vec!["Toyota Corolla"]);
}

#[tokio::test]
async fn test_sorted_pages() {
    let executor = vehicle_executor();
    let request = SearchRequest::new("compact")
        .with_fields(["description"])
        .with_sort("created", Some(SortDirection::Asc))
        .with_page(0, 1);

    let first: Vec<Vehicle> = executor
        .search(VEHICLE_INDEX, &request, &Strategy::MultiField)
        .await
        .unwrap();
    assert_eq!(names(&first), vec!["Honda Civic"]);

    let request = request.with_page(1, 1);
    let second: Vec<Vehicle> = executor
        .search(VEHICLE_INDEX, &request, &Strategy::MultiField)
        .await
        .unwrap();
    assert_eq!(names(&second), vec!["Toyota Corolla"]);
}

#[tokio::test]
async fn test_unknown_index_collapses_on_legacy_path() {
    let executor = vehicle_executor();
    let request = SearchRequest::new("jeep").with_fields(["name"]);

    let vehicles: Vec<Vehicle> = executor.multi_search("trucks", &request).await;
    assert!(vehicles.is_empty());

    let err = executor
        .search::<Vehicle>("trucks", &request, &Strategy::MultiField)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchKitError::IndexNotFound(_)));
}
