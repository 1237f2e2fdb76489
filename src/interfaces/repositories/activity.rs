use sqlx::PgPool;
use tracing::warn;

use crate::repositories::sqlx_repo::SqlxActivityRepo;

impl SqlxActivityRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxActivityRepo { pool }
    }
}

/// Audit trail writer. Inserts happen on a spawned task and failures are
/// logged and swallowed, so a broken audit table can never fail a request.
#[derive(Clone)]
pub struct ActivityLogger {
    repo: SqlxActivityRepo,
}

impl ActivityLogger {
    pub fn new(pool: PgPool) -> Self {
        ActivityLogger {
            repo: SqlxActivityRepo::new(pool),
        }
    }

    pub fn log(
        &self,
        user_id: Option<i64>,
        action: &str,
        details: String,
        ip_address: Option<String>,
    ) {
        let pool = self.repo.pool.clone();
        let action = action.to_string();
        let ip_address = ip_address.unwrap_or_else(|| "unknown".to_string());

        tokio::spawn(async move {
            let result = sqlx::query(
                r#"
                INSERT INTO activity_log (user_id, action, details, ip_address)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(user_id)
            .bind(&action)
            .bind(&details)
            .bind(&ip_address)
            .execute(&pool)
            .await;

            if let Err(e) = result {
                warn!("Activity log write failed for action {}: {}", action, e);
            }
        });
    }
}
