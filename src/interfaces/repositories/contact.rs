use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::{
    domain::entities::{
        contact::{ContactFilter, ContactMessage, ContactStats, NewContactMessage},
        pagination::page_offset,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

const SELECT_MESSAGE: &str = r#"
    SELECT id, name, email, phone, subject, message, status, ip_address, created_at
    FROM contact_messages
"#;

fn push_filter(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ContactFilter) {
    builder.push(" WHERE 1=1");
    if let Some(status) = &filter.status {
        builder.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        builder.push(" AND (name ILIKE ").push_bind(pattern.clone());
        builder.push(" OR email ILIKE ").push_bind(pattern.clone());
        builder.push(" OR subject ILIKE ").push_bind(pattern.clone());
        builder.push(" OR message ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_message(&self, message: &NewContactMessage) -> Result<i64, AppError>;
    async fn list_messages(
        &self,
        filter: &ContactFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ContactMessage>, AppError>;
    async fn count_messages(&self, filter: &ContactFilter) -> Result<i64, AppError>;
    async fn get_message_by_id(&self, id: i64) -> Result<ContactMessage, AppError>;
    async fn set_status(&self, id: i64, status: &str) -> Result<u64, AppError>;
    /// Moves a message from `new` to `read`; any other status is left alone.
    async fn mark_read_if_new(&self, id: i64) -> Result<(), AppError>;
    async fn delete_message(&self, id: i64) -> Result<u64, AppError>;
    async fn message_stats(&self) -> Result<ContactStats, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_message(&self, message: &NewContactMessage) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO contact_messages (name, email, phone, subject, message, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(&message.ip_address)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_messages(
        &self,
        filter: &ContactFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ContactMessage>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_MESSAGE);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let messages = builder
            .build_query_as::<ContactMessage>()
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    async fn count_messages(&self, filter: &ContactFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM contact_messages");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_message_by_id(&self, id: i64) -> Result<ContactMessage, AppError> {
        let mut builder = QueryBuilder::new(SELECT_MESSAGE);
        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build_query_as::<ContactMessage>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Message not found"))
    }

    async fn set_status(&self, id: i64, status: &str) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE contact_messages SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn mark_read_if_new(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE contact_messages SET status = 'read' WHERE id = $1 AND status = 'new'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_message(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn message_stats(&self) -> Result<ContactStats, AppError> {
        let stats = sqlx::query_as::<_, ContactStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'new') AS "new",
                COUNT(*) FILTER (WHERE status = 'read') AS "read",
                COUNT(*) FILTER (WHERE status = 'replied') AS replied,
                COUNT(*) FILTER (WHERE status = 'archived') AS archived,
                COUNT(*) FILTER (WHERE created_at::date = CURRENT_DATE) AS today,
                COUNT(*) FILTER (
                    WHERE created_at >= NOW() - INTERVAL '1 week'
                ) AS this_week,
                COUNT(*) FILTER (
                    WHERE created_at >= NOW() - INTERVAL '1 month'
                ) AS this_month
            FROM contact_messages
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
