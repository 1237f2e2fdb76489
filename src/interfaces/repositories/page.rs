use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::{
    domain::entities::{
        page::{NewPage, Page, PageChanges, PageFilter},
        pagination::page_offset,
    },
    errors::{is_unique_violation, AppError},
    repositories::sqlx_repo::SqlxPageRepo,
};

const SELECT_PAGE: &str = r#"
    SELECT p.id, p.title, p.slug, p.content, p.meta_description, p.meta_keywords,
           p.status, p.template, p.sort_order, p.created_by,
           u.username AS created_by_name, p.created_at, p.updated_at
    FROM pages p
    LEFT JOIN users u ON u.id = p.created_by
"#;

fn push_filter(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &PageFilter) {
    builder.push(" WHERE 1=1");
    if let Some(status) = &filter.status {
        builder.push(" AND p.status = ").push_bind(status.clone());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        builder.push(" AND (p.title ILIKE ").push_bind(pattern.clone());
        builder.push(" OR p.content ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn list_pages(
        &self,
        filter: &PageFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Page>, AppError>;
    async fn count_pages(&self, filter: &PageFilter) -> Result<i64, AppError>;
    async fn get_page_by_id(&self, id: i64) -> Result<Page, AppError>;
    async fn get_page_by_slug(&self, slug: &str) -> Result<Page, AppError>;
    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError>;
    async fn create_page(&self, page: &NewPage) -> Result<i64, AppError>;
    async fn update_page(&self, id: i64, changes: &PageChanges) -> Result<u64, AppError>;
    /// Status transition used by the publish action; any valid status may be
    /// supplied, not only `published`.
    async fn set_page_status(&self, id: i64, status: &str) -> Result<u64, AppError>;
    async fn delete_page(&self, id: i64) -> Result<u64, AppError>;
}

impl SqlxPageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxPageRepo { pool }
    }
}

#[async_trait]
impl PageRepository for SqlxPageRepo {
    async fn list_pages(
        &self,
        filter: &PageFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Page>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_PAGE);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY p.created_at DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let pages = builder.build_query_as::<Page>().fetch_all(&self.pool).await?;
        Ok(pages)
    }

    async fn count_pages(&self, filter: &PageFilter) -> Result<i64, AppError> {
        // Same predicate as listing so the totals cannot drift.
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM pages p");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_page_by_id(&self, id: i64) -> Result<Page, AppError> {
        let mut builder = QueryBuilder::new(SELECT_PAGE);
        builder.push(" WHERE p.id = ").push_bind(id);

        builder
            .build_query_as::<Page>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Page not found"))
    }

    async fn get_page_by_slug(&self, slug: &str) -> Result<Page, AppError> {
        let mut builder = QueryBuilder::new(SELECT_PAGE);
        builder.push(" WHERE p.slug = ").push_bind(slug.to_string());

        builder
            .build_query_as::<Page>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Page not found"))
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM pages
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

    async fn create_page(&self, page: &NewPage) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO pages (
                title, slug, content, meta_description, meta_keywords,
                status, template, sort_order, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&page.title)
        .bind(&page.slug)
        .bind(&page.content)
        .bind(&page.meta_description)
        .bind(&page.meta_keywords)
        .bind(&page.status)
        .bind(&page.template)
        .bind(page.sort_order)
        .bind(page.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "pages_slug_key") {
                return AppError::validation("Slug already exists");
            }
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn update_page(&self, id: i64, changes: &PageChanges) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::new("UPDATE pages SET ");
        let mut fields = builder.separated(", ");

        if let Some(v) = &changes.title {
            fields.push("title = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.slug {
            fields.push("slug = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.content {
            fields.push("content = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.meta_description {
            fields.push("meta_description = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.meta_keywords {
            fields.push("meta_keywords = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.status {
            fields.push("status = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.template {
            fields.push("template = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.sort_order {
            fields.push("sort_order = ").push_bind_unseparated(v);
        }
        fields.push("updated_at = NOW()");

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            if is_unique_violation(&e, "pages_slug_key") {
                return AppError::validation("Slug already exists");
            }
            AppError::from(e)
        })?;

        Ok(result.rows_affected())
    }

    async fn set_page_status(&self, id: i64, status: &str) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE pages SET status = $1, updated_at = NOW() WHERE id = $2")
                .bind(status)
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    async fn delete_page(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
