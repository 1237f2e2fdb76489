use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSessionRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxPageRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxNewsRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProgramRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxStaffRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxMediaRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSettingRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxActivityRepo {
    pub pool: PgPool,
}
