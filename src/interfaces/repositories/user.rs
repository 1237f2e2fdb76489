use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    domain::entities::user::{NewUser, User, UserChanges},
    errors::{is_unique_violation, AppError},
    repositories::sqlx_repo::SqlxUserRepo,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<User, AppError>;
    async fn username_or_email_exists(&self, username: &str, email: &str)
        -> Result<bool, AppError>;
    async fn email_exists(&self, email: &str, exclude_id: i64) -> Result<bool, AppError>;
    async fn create_user(&self, user: &NewUser) -> Result<i64, AppError>;
    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<u64, AppError>;
    async fn replace_password_hash(&self, id: i64, password_hash: &str) -> Result<(), AppError>;
}

impl SqlxUserRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, full_name, role, is_active, created_at
            FROM users
            WHERE username = $1 AND is_active = TRUE
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, full_name, role, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(user)
    }

    async fn username_or_email_exists(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE username = $1 OR email = $2
            )
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn email_exists(&self, email: &str, exclude_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE email = $1 AND id <> $2
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_user(&self, user: &NewUser) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "users_username_key")
                || is_unique_violation(&e, "users_email_key")
            {
                return AppError::validation("Username or email already exists");
            }
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<u64, AppError> {
        let mut builder = sqlx::QueryBuilder::new("UPDATE users SET ");
        let mut fields = builder.separated(", ");

        if let Some(email) = &changes.email {
            fields.push("email = ").push_bind_unseparated(email);
        }
        if let Some(full_name) = &changes.full_name {
            fields.push("full_name = ").push_bind_unseparated(full_name);
        }
        if let Some(hash) = &changes.password_hash {
            fields.push("password_hash = ").push_bind_unseparated(hash);
        }

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            if is_unique_violation(&e, "users_email_key") {
                return AppError::validation("Email already exists");
            }
            AppError::from(e)
        })?;

        Ok(result.rows_affected())
    }

    async fn replace_password_hash(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
