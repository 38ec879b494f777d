//! Result record types and their source field lists.
//!
//! The fields a record type declares decide which parts of each stored
//! document the backend sends back. The list is a constant on the type,
//! so nothing is inspected at runtime.

use serde::de::DeserializeOwned;

/// A typed view of one stored document
///
/// Deserialization is structural. Payload keys the type does not
/// declare are ignored. Declared fields missing from the payload must
/// fall back to their default, which for derived types means
/// `#[serde(default)]` on the struct; [`search_record!`](crate::search_record)
/// adds it automatically.
pub trait SearchRecord: DeserializeOwned {
    /// Stored field names requested from the backend
    const FIELDS: &'static [&'static str];
}

/// Define a result record type together with its [`SearchRecord`] impl.
///
/// The struct derives `Debug`, `Clone`, `Default`, `PartialEq`,
/// `Serialize` and `Deserialize` with `#[serde(default)]`, and its
/// field names become `SearchRecord::FIELDS`. The calling crate needs
/// `serde` as a dependency.
///
/// ```
/// use searchkit::core::query::SearchRecord;
///
/// searchkit::search_record! {
///     pub struct Vehicle {
///         pub id: String,
///         pub name: String,
///     }
/// }
///
/// assert_eq!(Vehicle::FIELDS, &["id", "name"]);
/// ```
#[macro_export]
macro_rules! search_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::core::query::SearchRecord for $name {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
        }
    };
}
