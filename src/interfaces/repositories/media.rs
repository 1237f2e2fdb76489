use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::{
    domain::entities::{
        media::{MediaChanges, MediaFilter, MediaItem, NewMediaItem},
        pagination::page_offset,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxMediaRepo,
};

const SELECT_MEDIA: &str = r#"
    SELECT m.id, m.filename, m.original_name, m.file_path, m.file_type,
           m.file_size, m.alt_text, m.caption, m.uploaded_by,
           u.username AS uploaded_by_name, m.created_at
    FROM media m
    LEFT JOIN users u ON u.id = m.uploaded_by
"#;

fn push_filter(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &MediaFilter) {
    builder.push(" WHERE 1=1");
    if let Some(file_type) = &filter.file_type {
        // MIME prefix match, "image" covers image/png, image/jpeg, ...
        builder
            .push(" AND m.file_type LIKE ")
            .push_bind(format!("{}%", file_type));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (m.original_name ILIKE ")
            .push_bind(pattern.clone());
        builder.push(" OR m.alt_text ILIKE ").push_bind(pattern.clone());
        builder.push(" OR m.caption ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn list_media(
        &self,
        filter: &MediaFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<MediaItem>, AppError>;
    async fn count_media(&self, filter: &MediaFilter) -> Result<i64, AppError>;
    async fn get_media_by_id(&self, id: i64) -> Result<MediaItem, AppError>;
    /// Items whose MIME type starts with `file_type`; `limit` of zero means
    /// unbounded.
    async fn media_by_type(&self, file_type: &str, limit: u32)
        -> Result<Vec<MediaItem>, AppError>;
    async fn create_media(&self, item: &NewMediaItem) -> Result<i64, AppError>;
    async fn update_media(&self, id: i64, changes: &MediaChanges) -> Result<u64, AppError>;
    /// Deletes the row and returns its stored file path for filesystem
    /// cleanup.
    async fn delete_media(&self, id: i64) -> Result<String, AppError>;
}

impl SqlxMediaRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxMediaRepo { pool }
    }
}

#[async_trait]
impl MediaRepository for SqlxMediaRepo {
    async fn list_media(
        &self,
        filter: &MediaFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<MediaItem>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_MEDIA);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY m.created_at DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let items = builder
            .build_query_as::<MediaItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn count_media(&self, filter: &MediaFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM media m");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_media_by_id(&self, id: i64) -> Result<MediaItem, AppError> {
        let mut builder = QueryBuilder::new(SELECT_MEDIA);
        builder.push(" WHERE m.id = ").push_bind(id);

        builder
            .build_query_as::<MediaItem>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Media not found"))
    }

    async fn media_by_type(
        &self,
        file_type: &str,
        limit: u32,
    ) -> Result<Vec<MediaItem>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_MEDIA);
        builder
            .push(" WHERE m.file_type LIKE ")
            .push_bind(format!("{}%", file_type));
        builder.push(" ORDER BY m.created_at DESC");
        if limit > 0 {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }

        let items = builder
            .build_query_as::<MediaItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn create_media(&self, item: &NewMediaItem) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO media (
                filename, original_name, file_path, file_type, file_size,
                alt_text, caption, uploaded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&item.filename)
        .bind(&item.original_name)
        .bind(&item.file_path)
        .bind(&item.file_type)
        .bind(item.file_size)
        .bind(&item.alt_text)
        .bind(&item.caption)
        .bind(item.uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_media(&self, id: i64, changes: &MediaChanges) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::new("UPDATE media SET ");
        let mut fields = builder.separated(", ");

        if let Some(v) = &changes.alt_text {
            fields.push("alt_text = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.caption {
            fields.push("caption = ").push_bind_unseparated(v);
        }

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_media(&self, id: i64) -> Result<String, AppError> {
        let file_path: String =
            sqlx::query_scalar("DELETE FROM media WHERE id = $1 RETURNING file_path")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::not_found("Media not found"))?;

        Ok(file_path)
    }
}
