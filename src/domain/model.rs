//! The managed records: cars and their owned construction details.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Store-assigned identifier of a car row.
pub type CarId = i64;

/// Store-assigned identifier of a construction row.
pub type ConstructionId = i64;

/// Engine category of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineKind {
    Combustion,
    Electric,
}

impl EngineKind {
    /// The column value this kind is stored as.
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Combustion => "COMBUSTION",
            EngineKind::Electric => "ELECTRIC",
        }
    }
}

impl FromStr for EngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMBUSTION" => Ok(EngineKind::Combustion),
            "ELECTRIC" => Ok(EngineKind::Electric),
            other => Err(anyhow::anyhow!("unknown engine kind: {other}")),
        }
    }
}

/// Construction details of a car, owned one-to-one by its car.
///
/// The row is created and deleted together with its owner and is never
/// addressable on its own. Ownership is one-directional: the car row holds
/// the construction id and the construction knows nothing about its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Construction {
    pub id: ConstructionId,
    /// Model name, unique across all construction rows.
    pub model: String,
    pub variant: String,
}

/// Construction details for a car that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConstruction {
    pub model: String,
    pub variant: String,
}

/// The scalar attributes of a car, as supplied by callers.
///
/// Updates replace all of these at once and nothing else, so taking this
/// type (rather than a full [`Car`]) keeps the construction details out of
/// reach of the update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarAttrs {
    /// Vehicle identification number, the unique natural key.
    pub vin: String,
    /// Safety rating, 0 to 5.
    pub rating: i16,
    pub engine: EngineKind,
    pub price: f64,
    /// Discount as a fraction in [0, 1].
    pub discount: f64,
    pub available: bool,
    pub release_date: NaiveDate,
    pub homepage: String,
    pub tags: BTreeSet<String>,
}

/// A car that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCar {
    pub attrs: CarAttrs,
    pub construction: NewConstruction,
}

/// A fully hydrated car row, construction details included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    /// Concurrency counter, starts at 0 and grows by exactly 1 per update.
    pub version: i64,
    pub vin: String,
    pub rating: i16,
    pub engine: EngineKind,
    pub price: f64,
    pub discount: f64,
    pub available: bool,
    pub release_date: NaiveDate,
    pub homepage: String,
    pub tags: BTreeSet<String>,
    pub construction: Construction,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    /// Replaces every scalar attribute with the supplied values.
    ///
    /// Identity, version, construction details and timestamps are left to
    /// the store.
    pub fn apply(&mut self, attrs: CarAttrs) {
        self.vin = attrs.vin;
        self.rating = attrs.rating;
        self.engine = attrs.engine;
        self.price = attrs.price;
        self.discount = attrs.discount;
        self.available = attrs.available;
        self.release_date = attrs.release_date;
        self.homepage = attrs.homepage;
        self.tags = attrs.tags;
    }
}
