//! Request handlers

pub mod claims;
pub mod users;
pub mod notifications;
pub mod health;

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ApiError;

/// Parses an identifier taken from the URL path
///
/// Accepts a bare UUID or the prefixed display form (`USR-...`).
pub(crate) fn parse_path_id<T>(raw: &str, kind: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid {} id '{}': {}", kind, raw, e)))
}
