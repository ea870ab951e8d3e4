//! Repository implementations
//!
//! Repositories own the SQL. They speak in row types and `DatabaseError`;
//! the adapters in `crate::adapters` translate to the domain.

pub mod users;
pub mod claims;

pub use users::UsersRepository;
pub use claims::ClaimsRepository;
