//! The shape every CRUD-exposed entity describes about itself.

use serde::{Serialize, de::DeserializeOwned};

use crate::validation::Rule;

/// A flat record stored in one table and exposed over HTTP.
///
/// Implementors are the typed row (`Self`) and carry the static metadata the
/// generic store and controllers need: the table name, the writable columns
/// in statement order, and the body rule table.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Singular name used in logs (e.g. `"movie"`).
    const NAME: &'static str;

    /// Backing table.
    const TABLE: &'static str;

    /// Client-writable columns, i.e. every column except `id`.
    const COLUMNS: &'static [&'static str];

    /// Rules a create/update body must satisfy before reaching the database.
    fn rules() -> &'static [Rule];
}
