//! Failure kinds surfaced by the read and write services.

use thiserror::Error;

/// Result alias for service operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors returned by the data-access services.
///
/// The first four variants are recoverable, request-scoped outcomes that the
/// transport layer maps to user-visible responses. `Store` wraps any failure
/// of the underlying store and stays opaque to callers; it is fatal to the
/// current request only. The core never retries on its own.
#[derive(Debug, Error)]
pub enum DataError {
    /// No car matched the given id or criteria. Also raised for search
    /// requests carrying an unrecognized criteria key (a long-standing
    /// behavior callers depend on, rather than a distinct bad-request kind).
    #[error("{0}")]
    NotFound(String),

    /// A car with the same VIN already exists.
    #[error("vin already in use: {0}")]
    DuplicateVin(String),

    /// The supplied version token is not a quoted non-negative integer.
    #[error("invalid version token: {0}")]
    VersionInvalid(String),

    /// The supplied version is older than the stored one.
    #[error("version outdated: {0}")]
    VersionOutdated(i64),

    /// Failure inside the store or another collaborator.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
