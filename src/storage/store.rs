//! The contract the services require from a relational store.

use crate::domain::model::{Car, CarId, ConstructionId, NewCar};
use crate::query::predicate::Predicate;
use async_trait::async_trait;

/// Store operations the read and write services are built on.
///
/// Implementations own identity assignment, the version column and the
/// create/update timestamps. Errors are opaque infrastructure failures; the
/// services never translate them into domain outcomes.
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Executes a predicate expected to select at most one car, construction
    /// details hydrated.
    async fn fetch_one(&self, predicate: &Predicate) -> anyhow::Result<Option<Car>>;

    /// Executes a predicate and returns every match in store order,
    /// construction details hydrated. The order is not guaranteed stable.
    async fn fetch_all(&self, predicate: &Predicate) -> anyhow::Result<Vec<Car>>;

    /// Persists a new car together with its construction details in one
    /// transaction. Ids are assigned by the store, the version starts at 0
    /// and both timestamps are set.
    async fn insert(&self, car: NewCar) -> anyhow::Result<Car>;

    /// Persists updated attributes for `car`, guarded by its version: the
    /// write only applies if the stored version still equals `car.version`,
    /// and the guard check and the increment happen atomically. Returns the
    /// stored car with the incremented version, or `None` when a concurrent
    /// update won the race.
    async fn update(&self, car: &Car) -> anyhow::Result<Option<Car>>;

    /// Deletes the construction row and then the car row inside one
    /// transaction. Returns the number of car rows affected.
    async fn delete(&self, id: CarId, construction_id: ConstructionId) -> anyhow::Result<u64>;
}
