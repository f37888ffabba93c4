//! The intermediate predicate form shared by all store adapters.

use crate::domain::model::CarId;
use anyhow::anyhow;
use chrono::NaiveDate;
use serde_json::Value as JsonValue;

/// A comparison value, already coerced to the column's native type.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
}

/// A car column usable in an equality clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Version,
    Vin,
    Rating,
    Engine,
    Price,
    Discount,
    Available,
    ReleaseDate,
    Homepage,
}

impl Field {
    /// Maps a criteria key to its column, if one exists.
    pub fn parse(key: &str) -> Option<Field> {
        match key {
            "id" => Some(Field::Id),
            "version" => Some(Field::Version),
            "vin" => Some(Field::Vin),
            "rating" => Some(Field::Rating),
            "engine" => Some(Field::Engine),
            "price" => Some(Field::Price),
            "discount" => Some(Field::Discount),
            "available" => Some(Field::Available),
            "release_date" => Some(Field::ReleaseDate),
            "homepage" => Some(Field::Homepage),
            _ => None,
        }
    }

    /// The column name in the car table.
    pub fn column(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Version => "version",
            Field::Vin => "vin",
            Field::Rating => "rating",
            Field::Engine => "engine",
            Field::Price => "price",
            Field::Discount => "discount",
            Field::Available => "available",
            Field::ReleaseDate => "release_date",
            Field::Homepage => "homepage",
        }
    }

    /// Coerces a raw criteria value to this column's native type.
    ///
    /// Criteria frequently arrive with every value as a string (query
    /// parameters), so numeric and boolean columns also accept their string
    /// spellings. A value that fits neither form is reported as an ordinary
    /// store-level failure, the same way the engine would reject it.
    pub fn coerce(self, value: &JsonValue) -> anyhow::Result<Scalar> {
        let mismatch = || anyhow!("criteria value {value} does not fit column {}", self.column());
        match self {
            Field::Id | Field::Version | Field::Rating => value
                .as_i64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .map(Scalar::Int)
                .ok_or_else(mismatch),
            Field::Price | Field::Discount => value
                .as_f64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .map(Scalar::Float)
                .ok_or_else(mismatch),
            Field::Available => match value {
                JsonValue::Bool(b) => Ok(Scalar::Bool(*b)),
                JsonValue::String(s) if s == "true" => Ok(Scalar::Bool(true)),
                JsonValue::String(s) if s == "false" => Ok(Scalar::Bool(false)),
                _ => Err(mismatch()),
            },
            Field::Vin | Field::Engine | Field::Homepage => value
                .as_str()
                .map(|s| Scalar::Text(s.to_string()))
                .ok_or_else(mismatch),
            Field::ReleaseDate => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .map(Scalar::Date)
                .ok_or_else(mismatch),
        }
    }
}

/// One conjunct of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Selects exactly the car with this id.
    IdIs(CarId),
    /// Case-insensitive substring match on the construction model.
    ModelContains(String),
    /// The car's tag set contains the given keyword.
    HasTag(String),
    /// Exact equality on a car column.
    Eq(Field, Scalar),
}

/// A conjunction of clauses. An empty predicate selects every car.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// The predicate with no clauses.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Conjoins one more clause.
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }
}
