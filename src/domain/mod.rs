//! Domain types of the car inventory: the managed records and the
//! client-supplied search criteria.

pub mod criteria;
pub mod model;

pub use criteria::Criteria;
pub use model::{
    Car, CarAttrs, CarId, Construction, ConstructionId, EngineKind, NewCar, NewConstruction,
};
