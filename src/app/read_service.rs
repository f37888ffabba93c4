//! Read side of the car inventory: single-car lookup and criteria search.

use crate::domain::criteria::Criteria;
use crate::domain::model::{Car, CarId};
use crate::error::{DataError, DataResult};
use crate::query::predicate::Predicate;
use crate::query::translator::{translate_lookup, translate_search};
use crate::storage::store::CarStore;
use std::sync::Arc;
use tracing::debug;

/// Resolves lookups and searches against the store.
///
/// Holds no state of its own beyond the store handle; every call is
/// request-scoped.
#[derive(Clone)]
pub struct ReadService {
    store: Arc<dyn CarStore>,
}

impl ReadService {
    pub fn new(store: Arc<dyn CarStore>) -> Self {
        Self { store }
    }

    /// Finds the car with the given id, construction details included.
    ///
    /// Fails with [`DataError::NotFound`] when no such car exists.
    pub async fn find_by_id(&self, id: CarId) -> DataResult<Car> {
        debug!(id, "find_by_id");
        let car = self.store.fetch_one(&translate_lookup(id)).await?;
        car.ok_or_else(|| DataError::NotFound(format!("no car with id {id}")))
    }

    /// Finds every car matching the criteria.
    ///
    /// Empty criteria return all cars and never fail. Non-empty criteria
    /// must consist of declared attribute names or brand flags; any other
    /// key fails the whole request with [`DataError::NotFound`] (kept as
    /// not-found rather than a separate bad-request kind, a behavior callers
    /// rely on). A search matching nothing also fails with
    /// [`DataError::NotFound`].
    pub async fn find(&self, criteria: &Criteria) -> DataResult<Vec<Car>> {
        debug!(%criteria, "find");

        if criteria.is_empty() {
            return Ok(self.store.fetch_all(&Predicate::unconstrained()).await?);
        }

        if let Some(key) = criteria.keys().find(|key| !Criteria::is_recognized(key)) {
            debug!(%key, "unrecognized criteria key");
            return Err(DataError::NotFound("invalid search criteria".to_string()));
        }

        let predicate = translate_search(criteria)?;
        let cars = self.store.fetch_all(&predicate).await?;
        if cars.is_empty() {
            return Err(DataError::NotFound(format!("no cars match {criteria}")));
        }
        Ok(cars)
    }
}
