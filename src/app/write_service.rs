//! Write side of the car inventory: create, optimistic update, cascading
//! delete.

use crate::app::read_service::ReadService;
use crate::domain::criteria::Criteria;
use crate::domain::model::{CarAttrs, CarId, NewCar};
use crate::error::{DataError, DataResult};
use crate::notify::Notifier;
use crate::storage::store::CarStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Coordinates mutations: VIN uniqueness on create, the version protocol on
/// update, and the transactional cascade on delete.
///
/// Depends on the read service for existence and version checks before any
/// mutation.
pub struct WriteService {
    store: Arc<dyn CarStore>,
    reader: ReadService,
    mailer: Arc<dyn Notifier>,
}

impl WriteService {
    pub fn new(store: Arc<dyn CarStore>, reader: ReadService, mailer: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            reader,
            mailer,
        }
    }

    /// Persists a new car and its construction details, returning the
    /// assigned id.
    ///
    /// Fails with [`DataError::DuplicateVin`] when a car with the same VIN
    /// already exists. Notification delivery happens after the commit and
    /// never affects the outcome.
    pub async fn create(&self, car: NewCar) -> DataResult<CarId> {
        debug!(vin = %car.attrs.vin, "create");

        match self.reader.find(&Criteria::vin(&car.attrs.vin)).await {
            Err(DataError::NotFound(_)) => {}
            Ok(_) => return Err(DataError::DuplicateVin(car.attrs.vin.clone())),
            Err(err) => return Err(err),
        }

        let stored = self.store.insert(car).await?;
        debug!(id = stored.id, "created");

        let subject = format!("New car {}", stored.id);
        let body = format!(
            "The car with construction <strong>{}</strong> was created.",
            stored.construction.model
        );
        if let Err(err) = self.mailer.notify(&subject, &body).await {
            warn!(error = %err, id = stored.id, "notification delivery failed");
        }

        Ok(stored.id)
    }

    /// Replaces the scalar attributes of the car with the given id and
    /// returns the new version.
    ///
    /// `version` is the quoted-integer token callers received with the car,
    /// e.g. `"3"`. A malformed token fails with
    /// [`DataError::VersionInvalid`]; a token below the stored version fails
    /// with [`DataError::VersionOutdated`]. A token above the stored version
    /// passes the check, a long-standing behavior that is kept as is. The
    /// construction details are never touched by an update.
    pub async fn update(&self, id: CarId, attrs: CarAttrs, version: &str) -> DataResult<i64> {
        debug!(id, version, "update");

        let supplied = parse_version_token(version)?;
        let mut stored = self.reader.find_by_id(id).await?;
        if supplied < stored.version {
            debug!(supplied, stored = stored.version, "version outdated");
            return Err(DataError::VersionOutdated(supplied));
        }

        stored.apply(attrs);
        match self.store.update(&stored).await? {
            Some(updated) => Ok(updated.version),
            // A concurrent update committed between our read and our write.
            None => Err(DataError::VersionOutdated(supplied)),
        }
    }

    /// Deletes the car with the given id together with its construction
    /// details.
    ///
    /// Returns true when a car row was removed and false when nothing
    /// existed under the id; a missing car is not an error.
    pub async fn delete(&self, id: CarId) -> DataResult<bool> {
        debug!(id, "delete");

        let car = match self.reader.find_by_id(id).await {
            Ok(car) => car,
            Err(DataError::NotFound(_)) => return Ok(false),
            Err(err) => return Err(err),
        };

        let affected = self.store.delete(car.id, car.construction.id).await?;
        Ok(affected > 0)
    }
}

/// Parses a version token of the form `"<non-negative integer>"`.
///
/// Anything else, including unquoted integers and quoted negative integers,
/// fails with [`DataError::VersionInvalid`].
fn parse_version_token(token: &str) -> DataResult<i64> {
    let invalid = || DataError::VersionInvalid(token.to_string());
    let digits = token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    digits.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_integers_parse() {
        assert_eq!(parse_version_token("\"0\"").unwrap(), 0);
        assert_eq!(parse_version_token("\"42\"").unwrap(), 42);
    }

    #[test]
    fn malformed_tokens_are_invalid() {
        for token in ["", "0", "notanumber", "\"\"", "\"-1\"", "\"1.5\"", "\"1", "1\""] {
            let err = parse_version_token(token).unwrap_err();
            assert!(
                matches!(err, DataError::VersionInvalid(_)),
                "token {token:?} should be invalid"
            );
        }
    }
}
