use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::{
    domain::entities::{
        pagination::page_offset,
        program::{NewProgram, Program, ProgramChanges, ProgramFilter},
    },
    errors::{is_unique_violation, AppError},
    repositories::sqlx_repo::SqlxProgramRepo,
};

const SELECT_PROGRAM: &str = r#"
    SELECT p.id, p.title, p.slug, p.description, p.content, p.duration,
           p.level, p.requirements, p.fees, p.featured_image, p.status,
           p.sort_order, p.created_by, u.username AS created_by_name,
           p.created_at, p.updated_at
    FROM programs p
    LEFT JOIN users u ON u.id = p.created_by
"#;

fn push_filter(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ProgramFilter) {
    builder.push(" WHERE 1=1");
    if let Some(status) = &filter.status {
        builder.push(" AND p.status = ").push_bind(status.clone());
    }
    if let Some(level) = &filter.level {
        builder.push(" AND p.level = ").push_bind(level.clone());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        builder.push(" AND (p.title ILIKE ").push_bind(pattern.clone());
        builder.push(" OR p.description ILIKE ").push_bind(pattern.clone());
        builder.push(" OR p.content ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn list_programs(
        &self,
        filter: &ProgramFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Program>, AppError>;
    async fn count_programs(&self, filter: &ProgramFilter) -> Result<i64, AppError>;
    async fn get_program_by_id(&self, id: i64) -> Result<Program, AppError>;
    async fn get_program_by_slug(&self, slug: &str) -> Result<Program, AppError>;
    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError>;
    /// Programs of one level; `limit` of zero means unbounded.
    async fn programs_by_level(
        &self,
        level: &str,
        status: &str,
        limit: u32,
    ) -> Result<Vec<Program>, AppError>;
    async fn create_program(&self, program: &NewProgram) -> Result<i64, AppError>;
    async fn update_program(&self, id: i64, changes: &ProgramChanges) -> Result<u64, AppError>;
    async fn delete_program(&self, id: i64) -> Result<u64, AppError>;
}

impl SqlxProgramRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProgramRepo { pool }
    }
}

#[async_trait]
impl ProgramRepository for SqlxProgramRepo {
    async fn list_programs(
        &self,
        filter: &ProgramFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Program>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_PROGRAM);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY p.sort_order ASC, p.created_at DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let programs = builder
            .build_query_as::<Program>()
            .fetch_all(&self.pool)
            .await?;
        Ok(programs)
    }

    async fn count_programs(&self, filter: &ProgramFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM programs p");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_program_by_id(&self, id: i64) -> Result<Program, AppError> {
        let mut builder = QueryBuilder::new(SELECT_PROGRAM);
        builder.push(" WHERE p.id = ").push_bind(id);

        builder
            .build_query_as::<Program>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Program not found"))
    }

    async fn get_program_by_slug(&self, slug: &str) -> Result<Program, AppError> {
        let mut builder = QueryBuilder::new(SELECT_PROGRAM);
        builder.push(" WHERE p.slug = ").push_bind(slug.to_string());

        builder
            .build_query_as::<Program>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Program not found"))
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM programs
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

    async fn programs_by_level(
        &self,
        level: &str,
        status: &str,
        limit: u32,
    ) -> Result<Vec<Program>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_PROGRAM);
        builder.push(" WHERE p.level = ").push_bind(level.to_string());
        builder.push(" AND p.status = ").push_bind(status.to_string());
        builder.push(" ORDER BY p.sort_order ASC, p.created_at DESC");
        if limit > 0 {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }

        let programs = builder
            .build_query_as::<Program>()
            .fetch_all(&self.pool)
            .await?;
        Ok(programs)
    }

    async fn create_program(&self, program: &NewProgram) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO programs (
                title, slug, description, content, duration, level,
                requirements, fees, featured_image, status, sort_order,
                created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&program.title)
        .bind(&program.slug)
        .bind(&program.description)
        .bind(&program.content)
        .bind(&program.duration)
        .bind(&program.level)
        .bind(&program.requirements)
        .bind(program.fees)
        .bind(&program.featured_image)
        .bind(&program.status)
        .bind(program.sort_order)
        .bind(program.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "programs_slug_key") {
                return AppError::validation("Slug already exists");
            }
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn update_program(&self, id: i64, changes: &ProgramChanges) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::new("UPDATE programs SET ");
        let mut fields = builder.separated(", ");

        if let Some(v) = &changes.title {
            fields.push("title = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.slug {
            fields.push("slug = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.description {
            fields.push("description = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.content {
            fields.push("content = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.duration {
            fields.push("duration = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.level {
            fields.push("level = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.requirements {
            fields.push("requirements = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.fees {
            fields.push("fees = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.featured_image {
            fields.push("featured_image = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.status {
            fields.push("status = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.sort_order {
            fields.push("sort_order = ").push_bind_unseparated(v);
        }
        fields.push("updated_at = NOW()");

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            if is_unique_violation(&e, "programs_slug_key") {
                return AppError::validation("Slug already exists");
            }
            AppError::from(e)
        })?;

        Ok(result.rows_affected())
    }

    async fn delete_program(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
