//! User Directory Domain
//!
//! Stores user identity and role. Regular users submit claims; admins review
//! them. Users are provisioned once and are immutable afterwards.
//!
//! # Modules
//!
//! - `user`: the `User` entity, `UserRole`, and validated `NewUser` input
//! - `ports`: the `UserDirectory` persistence port (plus an in-memory mock
//!   behind the `mock` feature)
//! - `service`: `UserService`, which enforces username uniqueness
//! - `seed`: idempotent sample-data bootstrap

pub mod user;
pub mod ports;
pub mod service;
pub mod seed;
pub mod error;

pub use user::{User, UserRole, NewUser};
pub use ports::UserDirectory;
pub use service::UserService;
pub use seed::{seed_sample_users, sample_users};
pub use error::UserError;

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockUserDirectory;
