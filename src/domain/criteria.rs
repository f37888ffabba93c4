//! Client-supplied search criteria.
//!
//! A criteria map lives for a single request: transport hands it to the read
//! service, the read service validates the keys, and the query translator
//! folds it into a predicate. Nothing here is persisted.

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Car attributes that may appear as criteria keys.
///
/// `construction` matches against the construction model as a substring;
/// every other name is an exact-equality match on the car column of the same
/// name. The tag set and the store-managed timestamps are deliberately not
/// searchable.
pub const SEARCHABLE_ATTRIBUTES: &[&str] = &[
    "id",
    "version",
    "vin",
    "rating",
    "engine",
    "price",
    "discount",
    "available",
    "release_date",
    "homepage",
    "construction",
];

/// Pseudo-keys that widen the search over the tag set, together with the
/// fixed keyword each one looks for.
pub const BRAND_FLAGS: &[(&str, &str)] = &[("mercedes", "MERCEDES"), ("audi", "AUDI")];

/// A request-scoped map from recognized field names to scalar match values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria(BTreeMap<String, JsonValue>);

impl Criteria {
    /// An empty criteria set. Searching with it returns every car.
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria selecting exactly the car with the given VIN.
    pub fn vin(vin: &str) -> Self {
        Self::new().with("vin", vin)
    }

    /// Adds one criterion, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether `key` is a declared attribute name or a brand flag.
    pub fn is_recognized(key: &str) -> bool {
        SEARCHABLE_ATTRIBUTES.contains(&key) || BRAND_FLAGS.iter().any(|(flag, _)| *flag == key)
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
