//! Request and response bodies
//!
//! All JSON is camelCase.

pub mod claims;
pub mod users;
pub mod notifications;
