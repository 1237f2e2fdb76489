use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::{
    domain::entities::user::Principal,
    errors::AppError,
    repositories::sqlx_repo::SqlxSessionRepo,
};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(
        &self,
        user_id: i64,
        token: &str,
        ttl_hours: i64,
    ) -> Result<(), AppError>;
    /// Resolves a token to its principal. Expired sessions and sessions of
    /// deactivated users resolve to `None`.
    async fn resolve_principal(&self, token: &str) -> Result<Option<Principal>, AppError>;
    async fn delete_session(&self, token: &str) -> Result<(), AppError>;
    async fn purge_expired(&self) -> Result<u64, AppError>;
}

impl SqlxSessionRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSessionRepo { pool }
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepo {
    async fn create_session(
        &self,
        user_id: i64,
        token: &str,
        ttl_hours: i64,
    ) -> Result<(), AppError> {
        let expires_at = Utc::now() + Duration::hours(ttl_hours);

        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn resolve_principal(&self, token: &str) -> Result<Option<Principal>, AppError> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            r#"
            SELECT u.id, u.username, u.role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1
              AND s.expires_at > NOW()
              AND u.is_active = TRUE
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, role)| Principal { id, username, role }))
    }

    async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
