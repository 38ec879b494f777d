// Test fixtures: a three-document vehicle index

use serde_json::{json, Value};

/// Index name used by every fixture
#[allow(dead_code)] // Used in integration tests
pub const VEHICLE_INDEX: &str = "vehicles";

searchkit::search_record! {
    /// Record type mirroring the stored vehicle documents
    #[allow(dead_code)] // Used in integration tests
    pub struct Vehicle {
        pub id: String,
        pub number: i64,
        pub name: String,
        pub created: String,
        pub status: bool,
        pub description: String,
    }
}

/// The three vehicle documents
#[allow(dead_code)] // Used in integration tests
pub fn vehicle_documents() -> Vec<Value> {
    vec![
        json!({
            "id": "1",
            "number": 1001,
            "name": "Jeep Wrangler",
            "created": "2021-03-14",
            "status": true,
            "description": "Rugged off-road SUV",
        }),
        json!({
            "id": "2",
            "number": 1002,
            "name": "Toyota Corolla",
            "created": "2022-07-01",
            "status": true,
            "description": "Reliable compact sedan",
        }),
        json!({
            "id": "3",
            "number": 1003,
            "name": "Honda Civic",
            "created": "2020-11-30",
            "status": false,
            "description": "Sporty compact car",
        }),
    ]
}
