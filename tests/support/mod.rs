//! Shared test utilities.

pub mod docs_repo;
pub mod runtime;
