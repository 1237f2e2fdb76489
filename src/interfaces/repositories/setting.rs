use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    domain::entities::setting::Setting,
    errors::AppError,
    repositories::sqlx_repo::SqlxSettingRepo,
};

#[async_trait]
pub trait SettingRepository: Send + Sync {
    async fn all_settings(&self) -> Result<Vec<Setting>, AppError>;
    async fn get_setting(&self, key: &str) -> Result<Option<Setting>, AppError>;
    /// Inserts the key or replaces its value when it already exists.
    async fn upsert_setting(&self, key: &str, value: &str) -> Result<(), AppError>;
}

impl SqlxSettingRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSettingRepo { pool }
    }
}

#[async_trait]
impl SettingRepository for SqlxSettingRepo {
    async fn all_settings(&self) -> Result<Vec<Setting>, AppError> {
        let settings = sqlx::query_as::<_, Setting>(
            r#"
            SELECT setting_key, setting_value, setting_type, description
            FROM settings
            ORDER BY setting_key
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn get_setting(&self, key: &str) -> Result<Option<Setting>, AppError> {
        let setting = sqlx::query_as::<_, Setting>(
            r#"
            SELECT setting_key, setting_value, setting_type, description
            FROM settings
            WHERE setting_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO settings (setting_key, setting_value)
            VALUES ($1, $2)
            ON CONFLICT (setting_key)
            DO UPDATE SET setting_value = EXCLUDED.setting_value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
