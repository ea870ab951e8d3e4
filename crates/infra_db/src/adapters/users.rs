//! PostgreSQL User Directory Adapter
//!
//! Implements `UserDirectory` on top of `UsersRepository`. A unique
//! violation on insert surfaces as `PortError::Conflict`, which the user
//! service reports as a duplicate username.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_users::{NewUser, User, UserDirectory, UserRole};

use crate::repositories::users::{UserRole as DbUserRole, UserRow, UsersRepository};

/// PostgreSQL-backed implementation of the UserDirectory port
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    repository: UsersRepository,
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a new PostgreSQL user directory
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UsersRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresUserDirectory {}

#[async_trait]
impl HealthCheckable for PostgresUserDirectory {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-user-directory").await
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: NewUser) -> Result<User, PortError> {
        debug!("Provisioning user");
        let row = self.repository.insert(&user_to_row(user.into_user())).await?;
        Ok(row_to_user(row))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PortError> {
        let row = self.repository.find_by_id(id.into()).await?;
        Ok(row.map(row_to_user))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, PortError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| Uuid::from(*id)).collect();
        let rows = self.repository.find_by_ids(&ids).await?;
        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PortError> {
        let row = self.repository.find_by_username(username).await?;
        Ok(row.map(row_to_user))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, PortError> {
        Ok(self.repository.exists_by_username(username).await?)
    }

    async fn list_all(&self) -> Result<Vec<User>, PortError> {
        let rows = self.repository.list_all().await?;
        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, PortError> {
        let rows = self.repository.list_by_role(role_to_db(role)).await?;
        Ok(rows.into_iter().map(row_to_user).collect())
    }
}

fn role_to_db(role: UserRole) -> DbUserRole {
    match role {
        UserRole::Regular => DbUserRole::Regular,
        UserRole::Admin => DbUserRole::Admin,
    }
}

fn role_from_db(role: DbUserRole) -> UserRole {
    match role {
        DbUserRole::Regular => UserRole::Regular,
        DbUserRole::Admin => UserRole::Admin,
    }
}

fn user_to_row(user: User) -> UserRow {
    UserRow {
        user_id: user.id.into(),
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        role: role_to_db(user.role),
        created_at: user.created_at,
    }
}

fn row_to_user(row: UserRow) -> User {
    User {
        id: UserId::from(row.user_id),
        username: row.username,
        email: row.email,
        full_name: row.full_name,
        role: role_from_db(row.role),
        created_at: row.created_at,
    }
}
