// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{vehicle_documents, Vehicle, VEHICLE_INDEX};
#[allow(unused_imports)]
pub use helpers::{failing_executor, vehicle_backend, vehicle_executor, FailingBackend};
