//! Claims repository implementation
//!
//! Row-level access to the `claims` table. Every listing is ordered
//! newest first with the claim id as tie-breaker.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::DatabaseError;

const CLAIM_COLUMNS: &str = "claim_id, claim_number, description, claim_amount, status, \
    user_id, reviewed_by, review_comments, created_at, reviewed_at";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, claim_id DESC";

/// Repository for the `claims` table
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a claim or replaces every mutable column of an existing one
    ///
    /// Runs as a single statement.
    ///
    /// # Errors
    ///
    /// * `DatabaseError::DuplicateEntry` if the claim number is taken
    /// * `DatabaseError::ForeignKeyViolation` if the owner or reviewer is unknown
    #[instrument(skip(self, claim), fields(claim_id = %claim.claim_id, status = ?claim.status))]
    pub async fn upsert(&self, claim: &ClaimRow) -> Result<ClaimRow, DatabaseError> {
        debug!("Saving claim");

        let sql = format!(
            r#"
            INSERT INTO claims ({CLAIM_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (claim_id) DO UPDATE SET
                description = EXCLUDED.description,
                claim_amount = EXCLUDED.claim_amount,
                status = EXCLUDED.status,
                reviewed_by = EXCLUDED.reviewed_by,
                review_comments = EXCLUDED.review_comments,
                reviewed_at = EXCLUDED.reviewed_at
            RETURNING {CLAIM_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim.claim_id)
            .bind(&claim.claim_number)
            .bind(&claim.description)
            .bind(claim.claim_amount)
            .bind(claim.status)
            .bind(claim.user_id)
            .bind(claim.reviewed_by)
            .bind(&claim.review_comments)
            .bind(claim.created_at)
            .bind(claim.reviewed_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    /// Retrieves a claim by its identifier
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, claim_id: Uuid) -> Result<Option<ClaimRow>, DatabaseError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1");
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Retrieves a claim by its claim number
    #[instrument(skip(self))]
    pub async fn find_by_claim_number(
        &self,
        claim_number: &str,
    ) -> Result<Option<ClaimRow>, DatabaseError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_number = $1");
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Claims owned by a user, newest first
    #[instrument(skip(self))]
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE user_id = $1 {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Claims in a status, newest first
    #[instrument(skip(self))]
    pub async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE status = $1 {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// All claims, newest first
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, ClaimRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub claim_number: String,
    pub description: String,
    pub claim_amount: Decimal,
    pub status: ClaimStatus,
    pub user_id: Uuid,
    pub reviewed_by: Option<Uuid>,
    pub review_comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Claim status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    InProgress,
    Approved,
    Rejected,
}
