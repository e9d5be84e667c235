//! Repository implementations for data persistence.
//!
//! SQLite-backed implementations of the repository ports defined in the
//! application layer.

mod analysis_repository;

pub use analysis_repository::*;
