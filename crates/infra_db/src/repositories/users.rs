//! Users repository implementation
//!
//! Row-level access to the `users` table. Mapping onto domain types happens
//! in `adapters::users`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::DatabaseError;

const USER_COLUMNS: &str = "user_id, username, email, full_name, role, created_at";

/// Repository for the `users` table
#[derive(Debug, Clone)]
pub struct UsersRepository {
    pool: PgPool,
}

impl UsersRepository {
    /// Creates a new UsersRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a user and returns the stored row
    ///
    /// # Errors
    ///
    /// `DatabaseError::DuplicateEntry` if the username is taken
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn insert(&self, user: &UserRow) -> Result<UserRow, DatabaseError> {
        debug!("Inserting user");

        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.user_id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(user.role)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    /// Retrieves a user by its identifier
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Retrieves every user whose identifier is in `ids`
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserRow>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ANY($1)");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Retrieves a user by username
    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Checks whether a username is taken
    #[instrument(skip(self))]
    pub async fn exists_by_username(&self, username: &str) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Lists all users in provisioning order
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<UserRow>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, user_id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Lists users with a role in provisioning order
    #[instrument(skip(self))]
    pub async fn list_by_role(&self, role: UserRole) -> Result<Vec<UserRow>, DatabaseError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at, user_id"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(role)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Database row for a user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// User role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Regular,
    Admin,
}
