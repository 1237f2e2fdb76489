use crate::repositories::sqlx_repo::{
    SqlxContactRepo, SqlxMediaRepo, SqlxNewsRepo, SqlxPageRepo, SqlxProgramRepo,
    SqlxSessionRepo, SqlxSettingRepo, SqlxStaffRepo, SqlxUserRepo,
};

#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: SqlxUserRepo,
    pub session_repo: SqlxSessionRepo,
    pub page_repo: SqlxPageRepo,
    pub news_repo: SqlxNewsRepo,
    pub program_repo: SqlxProgramRepo,
    pub staff_repo: SqlxStaffRepo,
    pub media_repo: SqlxMediaRepo,
    pub setting_repo: SqlxSettingRepo,
    pub contact_repo: SqlxContactRepo,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            user_repo: SqlxUserRepo::new(pool.clone()),
            session_repo: SqlxSessionRepo::new(pool.clone()),
            page_repo: SqlxPageRepo::new(pool.clone()),
            news_repo: SqlxNewsRepo::new(pool.clone()),
            program_repo: SqlxProgramRepo::new(pool.clone()),
            staff_repo: SqlxStaffRepo::new(pool.clone()),
            media_repo: SqlxMediaRepo::new(pool.clone()),
            setting_repo: SqlxSettingRepo::new(pool.clone()),
            contact_repo: SqlxContactRepo::new(pool),
        }
    }
}
