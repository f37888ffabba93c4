//! In-process store adapter.
//!
//! Implements the same contract as the PostgreSQL adapter against a plain
//! map behind an async lock, with the unique indexes of the real schema
//! mirrored as explicit checks. Predicates are lowered by direct evaluation
//! instead of SQL. The test suite runs entirely against this adapter.

use crate::domain::model::{Car, CarId, Construction, ConstructionId, NewCar};
use crate::query::predicate::{Clause, Field, Predicate, Scalar};
use crate::storage::store::CarStore;
use anyhow::bail;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Rows {
    cars: BTreeMap<CarId, Car>,
    next_car_id: CarId,
    next_construction_id: ConstructionId,
}

/// A car store holding everything in memory.
#[derive(Default)]
pub struct MemoryCarStore {
    rows: RwLock<Rows>,
}

impl MemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarStore for MemoryCarStore {
    async fn fetch_one(&self, predicate: &Predicate) -> anyhow::Result<Option<Car>> {
        let rows = self.rows.read().await;
        Ok(rows
            .cars
            .values()
            .find(|car| matches(predicate, car))
            .cloned())
    }

    async fn fetch_all(&self, predicate: &Predicate) -> anyhow::Result<Vec<Car>> {
        let rows = self.rows.read().await;
        Ok(rows
            .cars
            .values()
            .filter(|car| matches(predicate, car))
            .cloned()
            .collect())
    }

    async fn insert(&self, car: NewCar) -> anyhow::Result<Car> {
        let mut rows = self.rows.write().await;

        // The unique indexes of the relational schema.
        if rows.cars.values().any(|stored| stored.vin == car.attrs.vin) {
            bail!("unique index violation on car.vin: {}", car.attrs.vin);
        }
        if rows
            .cars
            .values()
            .any(|stored| stored.construction.model == car.construction.model)
        {
            bail!(
                "unique index violation on construction.model: {}",
                car.construction.model
            );
        }

        // Sequences only ever grow, so ids are never reused after a delete.
        rows.next_car_id += 1;
        rows.next_construction_id += 1;
        let now = Utc::now();
        let NewCar {
            attrs,
            construction,
        } = car;
        let stored = Car {
            id: rows.next_car_id,
            version: 0,
            vin: attrs.vin,
            rating: attrs.rating,
            engine: attrs.engine,
            price: attrs.price,
            discount: attrs.discount,
            available: attrs.available,
            release_date: attrs.release_date,
            homepage: attrs.homepage,
            tags: attrs.tags,
            construction: Construction {
                id: rows.next_construction_id,
                model: construction.model,
                variant: construction.variant,
            },
            created_at: now,
            updated_at: now,
        };
        rows.cars.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, car: &Car) -> anyhow::Result<Option<Car>> {
        let mut rows = self.rows.write().await;
        let Some(entry) = rows.cars.get_mut(&car.id) else {
            return Ok(None);
        };
        // Same guard the SQL adapter puts into its UPDATE predicate.
        if entry.version != car.version {
            return Ok(None);
        }
        let mut updated = car.clone();
        updated.version = entry.version + 1;
        updated.updated_at = Utc::now();
        *entry = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: CarId, _construction_id: ConstructionId) -> anyhow::Result<u64> {
        // The owned construction lives inside the car entry, so one removal
        // covers both rows of the cascade.
        let mut rows = self.rows.write().await;
        Ok(u64::from(rows.cars.remove(&id).is_some()))
    }
}

fn matches(predicate: &Predicate, car: &Car) -> bool {
    predicate.clauses().iter().all(|clause| match clause {
        Clause::IdIs(id) => car.id == *id,
        Clause::ModelContains(needle) => car
            .construction
            .model
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        Clause::HasTag(keyword) => car.tags.iter().any(|tag| tag.eq_ignore_ascii_case(keyword)),
        Clause::Eq(field, scalar) => eq_matches(*field, scalar, car),
    })
}

fn eq_matches(field: Field, scalar: &Scalar, car: &Car) -> bool {
    match (field, scalar) {
        (Field::Id, Scalar::Int(v)) => car.id == *v,
        (Field::Version, Scalar::Int(v)) => car.version == *v,
        (Field::Rating, Scalar::Int(v)) => i64::from(car.rating) == *v,
        (Field::Price, Scalar::Float(v)) => car.price == *v,
        (Field::Discount, Scalar::Float(v)) => car.discount == *v,
        (Field::Available, Scalar::Bool(v)) => car.available == *v,
        (Field::Vin, Scalar::Text(v)) => car.vin == *v,
        (Field::Engine, Scalar::Text(v)) => car.engine.as_str() == v,
        (Field::Homepage, Scalar::Text(v)) => car.homepage == *v,
        (Field::ReleaseDate, Scalar::Date(v)) => car.release_date == *v,
        // Coercion is field-driven, so a kind mismatch cannot select anything.
        _ => false,
    }
}
