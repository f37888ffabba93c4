//! Data-access core for a car inventory backend.
//!
//! Transport layers call the read and write services; the services translate
//! client-supplied criteria into predicates and run them against a store
//! adapter. Every piece is wired together with explicit constructor
//! parameters, there are no process-wide singletons.

pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod notify;
pub mod query;
pub mod storage;

// Convenience re-exports (keeps call-sites clean)
pub use app::read_service::ReadService;
pub use app::write_service::WriteService;
pub use domain::criteria::Criteria;
pub use domain::model::{
    Car, CarAttrs, CarId, Construction, EngineKind, NewCar, NewConstruction,
};
pub use error::{DataError, DataResult};
pub use notify::{HttpMailer, Notifier, NullMailer};
pub use storage::memory::MemoryCarStore;
pub use storage::postgres::PostgresCarStore;
pub use storage::store::CarStore;
