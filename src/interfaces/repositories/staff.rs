use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::{
    domain::entities::{
        pagination::page_offset,
        staff::{NewStaffMember, StaffChanges, StaffFilter, StaffMember},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxStaffRepo,
};

const SELECT_STAFF: &str = r#"
    SELECT id, full_name, position, department, email, phone, bio,
           qualifications, profile_image, is_active, sort_order,
           created_at, updated_at
    FROM staff
"#;

fn push_filter(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &StaffFilter) {
    builder.push(" WHERE 1=1");
    if filter.active_only {
        builder.push(" AND is_active = TRUE");
    }
    if let Some(department) = &filter.department {
        builder.push(" AND department = ").push_bind(department.clone());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        builder.push(" AND (full_name ILIKE ").push_bind(pattern.clone());
        builder.push(" OR position ILIKE ").push_bind(pattern.clone());
        builder.push(" OR department ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn list_staff(
        &self,
        filter: &StaffFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StaffMember>, AppError>;
    async fn count_staff(&self, filter: &StaffFilter) -> Result<i64, AppError>;
    async fn get_staff_by_id(&self, id: i64) -> Result<StaffMember, AppError>;
    async fn staff_by_department(
        &self,
        department: &str,
        active_only: bool,
    ) -> Result<Vec<StaffMember>, AppError>;
    async fn create_staff(&self, member: &NewStaffMember) -> Result<i64, AppError>;
    async fn update_staff(&self, id: i64, changes: &StaffChanges) -> Result<u64, AppError>;
    async fn delete_staff(&self, id: i64) -> Result<u64, AppError>;
}

impl SqlxStaffRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxStaffRepo { pool }
    }
}

#[async_trait]
impl StaffRepository for SqlxStaffRepo {
    async fn list_staff(
        &self,
        filter: &StaffFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StaffMember>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_STAFF);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY sort_order ASC, full_name ASC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let members = builder
            .build_query_as::<StaffMember>()
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn count_staff(&self, filter: &StaffFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM staff");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_staff_by_id(&self, id: i64) -> Result<StaffMember, AppError> {
        let mut builder = QueryBuilder::new(SELECT_STAFF);
        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build_query_as::<StaffMember>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Staff member not found"))
    }

    async fn staff_by_department(
        &self,
        department: &str,
        active_only: bool,
    ) -> Result<Vec<StaffMember>, AppError> {
        let mut builder = QueryBuilder::new(SELECT_STAFF);
        builder
            .push(" WHERE department = ")
            .push_bind(department.to_string());
        if active_only {
            builder.push(" AND is_active = TRUE");
        }
        builder.push(" ORDER BY sort_order ASC, full_name ASC");

        let members = builder
            .build_query_as::<StaffMember>()
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn create_staff(&self, member: &NewStaffMember) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO staff (
                full_name, position, department, email, phone, bio,
                qualifications, profile_image, is_active, sort_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&member.full_name)
        .bind(&member.position)
        .bind(&member.department)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(&member.bio)
        .bind(&member.qualifications)
        .bind(&member.profile_image)
        .bind(member.is_active)
        .bind(member.sort_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_staff(&self, id: i64, changes: &StaffChanges) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::new("UPDATE staff SET ");
        let mut fields = builder.separated(", ");

        if let Some(v) = &changes.full_name {
            fields.push("full_name = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.position {
            fields.push("position = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.department {
            fields.push("department = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.email {
            fields.push("email = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.phone {
            fields.push("phone = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.bio {
            fields.push("bio = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.qualifications {
            fields.push("qualifications = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.profile_image {
            fields.push("profile_image = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.is_active {
            fields.push("is_active = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.sort_order {
            fields.push("sort_order = ").push_bind_unseparated(v);
        }
        fields.push("updated_at = NOW()");

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_staff(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
