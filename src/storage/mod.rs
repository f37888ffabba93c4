//! Store adapters and the contract the services require from them.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryCarStore;
pub use postgres::PostgresCarStore;
pub use store::CarStore;
