//! Criteria-to-predicate translation.
//!
//! The translator turns a validated criteria map into a [`Predicate`], a
//! small store-agnostic conjunction of typed clauses. Each store adapter
//! lowers the predicate to its native query form.

pub mod predicate;
pub mod translator;

pub use predicate::{Clause, Field, Predicate, Scalar};
pub use translator::{translate_lookup, translate_search};
