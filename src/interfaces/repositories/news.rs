use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::{
    domain::entities::{
        news::{NewNewsItem, NewsChanges, NewsFilter, NewsItem},
        pagination::page_offset,
    },
    errors::{is_unique_violation, AppError},
    repositories::sqlx_repo::SqlxNewsRepo,
};

const SELECT_NEWS: &str = r#"
    SELECT n.id, n.title, n.slug, n.excerpt, n.content, n.featured_image,
           n.status, n.is_featured, n.published_at, n.created_by,
           u.username AS created_by_name, n.created_at, n.updated_at
    FROM news n
    LEFT JOIN users u ON u.id = n.created_by
"#;

fn push_filter(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &NewsFilter) {
    builder.push(" WHERE 1=1");
    if let Some(status) = &filter.status {
        builder.push(" AND n.status = ").push_bind(status.clone());
    }
    if let Some(featured) = filter.is_featured {
        builder.push(" AND n.is_featured = ").push_bind(featured);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        builder.push(" AND (n.title ILIKE ").push_bind(pattern.clone());
        builder.push(" OR n.content ILIKE ").push_bind(pattern.clone());
        builder.push(" OR n.excerpt ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn list_news(
        &self,
        filter: &NewsFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<NewsItem>, AppError>;
    async fn count_news(&self, filter: &NewsFilter) -> Result<i64, AppError>;
    async fn get_news_by_id(&self, id: i64) -> Result<NewsItem, AppError>;
    async fn get_news_by_slug(&self, slug: &str) -> Result<NewsItem, AppError>;
    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError>;
    /// Published, featured items for the landing page.
    async fn featured_news(&self, limit: u32) -> Result<Vec<NewsItem>, AppError>;
    /// Most recently published items.
    async fn recent_news(&self, limit: u32) -> Result<Vec<NewsItem>, AppError>;
    async fn create_news(&self, item: &NewNewsItem) -> Result<i64, AppError>;
    async fn update_news(&self, id: i64, changes: &NewsChanges) -> Result<u64, AppError>;
    async fn delete_news(&self, id: i64) -> Result<u64, AppError>;
}

impl SqlxNewsRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxNewsRepo { pool }
    }
}

#[async_trait]
impl NewsRepository for SqlxNewsRepo {
    async fn list_news(
        &self,
        filter: &NewsFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<NewsItem>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_NEWS);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY n.published_at DESC NULLS LAST, n.created_at DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let items = builder
            .build_query_as::<NewsItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn count_news(&self, filter: &NewsFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM news n");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_news_by_id(&self, id: i64) -> Result<NewsItem, AppError> {
        let mut builder = QueryBuilder::new(SELECT_NEWS);
        builder.push(" WHERE n.id = ").push_bind(id);

        builder
            .build_query_as::<NewsItem>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("News not found"))
    }

    async fn get_news_by_slug(&self, slug: &str) -> Result<NewsItem, AppError> {
        let mut builder = QueryBuilder::new(SELECT_NEWS);
        builder.push(" WHERE n.slug = ").push_bind(slug.to_string());

        builder
            .build_query_as::<NewsItem>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("News not found"))
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM news
                WHERE slug = $1 AND ($2::bigint IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn featured_news(&self, limit: u32) -> Result<Vec<NewsItem>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_NEWS);
        builder.push(" WHERE n.status = 'published' AND n.is_featured = TRUE");
        builder.push(" ORDER BY n.published_at DESC NULLS LAST");
        builder.push(" LIMIT ").push_bind(limit as i64);

        let items = builder
            .build_query_as::<NewsItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn recent_news(&self, limit: u32) -> Result<Vec<NewsItem>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_NEWS);
        builder.push(" WHERE n.status = 'published'");
        builder.push(" ORDER BY n.published_at DESC NULLS LAST");
        builder.push(" LIMIT ").push_bind(limit as i64);

        let items = builder
            .build_query_as::<NewsItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn create_news(&self, item: &NewNewsItem) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO news (
                title, slug, excerpt, content, featured_image,
                status, is_featured, published_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&item.title)
        .bind(&item.slug)
        .bind(&item.excerpt)
        .bind(&item.content)
        .bind(&item.featured_image)
        .bind(&item.status)
        .bind(item.is_featured)
        .bind(item.published_at)
        .bind(item.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "news_slug_key") {
                return AppError::validation("Slug already exists");
            }
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn update_news(&self, id: i64, changes: &NewsChanges) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::new("UPDATE news SET ");
        let mut fields = builder.separated(", ");

        if let Some(v) = &changes.title {
            fields.push("title = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.slug {
            fields.push("slug = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.excerpt {
            fields.push("excerpt = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.content {
            fields.push("content = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.featured_image {
            fields.push("featured_image = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.status {
            fields.push("status = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.is_featured {
            fields.push("is_featured = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.published_at {
            fields.push("published_at = ").push_bind_unseparated(v);
        }
        fields.push("updated_at = NOW()");

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            if is_unique_violation(&e, "news_slug_key") {
                return AppError::validation("Slug already exists");
            }
            AppError::from(e)
        })?;

        Ok(result.rows_affected())
    }

    async fn delete_news(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
