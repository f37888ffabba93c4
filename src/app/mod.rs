//! Application services: the operations exposed to the transport layer.

pub mod read_service;
pub mod write_service;

pub use read_service::ReadService;
pub use write_service::WriteService;
