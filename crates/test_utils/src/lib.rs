//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims tracker test suite.
//!
//! # Modules
//!
//! - `fixtures`: the alice/bob users and a mock-backed service harness
//! - `generators`: `fake` users and proptest strategies
//! - `database`: PostgreSQL testcontainer with the schema applied

pub mod fixtures;
pub mod generators;
pub mod database;

pub use fixtures::*;
pub use generators::*;
pub use database::*;
