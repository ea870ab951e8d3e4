//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the claims tracker using SQLx.
//!
//! # Architecture
//!
//! - `repositories`: SQL and row types, one repository per table
//! - `adapters`: `UserDirectory` and `ClaimStore` implementations over the
//!   repositories
//! - `migrations`: the embedded schema
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresClaimStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod migrations;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use migrations::run_migrations;
pub use adapters::{PostgresUserDirectory, PostgresClaimStore};
