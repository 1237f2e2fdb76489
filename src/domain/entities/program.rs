use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Program {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub duration: String,
    pub level: String,
    pub requirements: String,
    pub fees: Option<Decimal>,
    pub featured_image: String,
    pub status: String,
    pub sort_order: i32,
    pub created_by: Option<i64>,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProgramRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub fees: Option<Decimal>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgramRequest {
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub fees: Option<Decimal>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug)]
pub struct NewProgram {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub duration: String,
    pub level: String,
    pub requirements: String,
    pub fees: Option<Decimal>,
    pub featured_image: String,
    pub status: String,
    pub sort_order: i32,
    pub created_by: i64,
}

#[derive(Debug, Default)]
pub struct ProgramChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub duration: Option<String>,
    pub level: Option<String>,
    pub requirements: Option<String>,
    pub fees: Option<Decimal>,
    pub featured_image: Option<String>,
    pub status: Option<String>,
    pub sort_order: Option<i32>,
}

impl ProgramChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.duration.is_none()
            && self.level.is_none()
            && self.requirements.is_none()
            && self.fees.is_none()
            && self.featured_image.is_none()
            && self.status.is_none()
            && self.sort_order.is_none()
    }
}

#[derive(Debug, Default)]
pub struct ProgramFilter {
    pub status: Option<String>,
    pub level: Option<String>,
    pub search: Option<String>,
}
