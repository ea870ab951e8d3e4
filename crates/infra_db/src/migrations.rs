//! Schema migrations
//!
//! SQL files live in `crates/infra_db/migrations/` and are embedded into the
//! binary at compile time.

use sqlx::migrate::Migrator;
use tracing::{info, warn};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

/// Embedded migrator for the users and claims schema
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Runs all pending migrations
///
/// # Errors
///
/// `DatabaseError::MigrationFailed` if a migration cannot be applied
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!(available = MIGRATOR.iter().count(), "Running database migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("Database migrations completed");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e.into())
        }
    }
}
