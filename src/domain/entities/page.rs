use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A page row joined with the author's username.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Page {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub status: String,
    pub template: String,
    pub sort_order: i32,
    pub created_by: Option<i64>,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePageRequest {
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// Validated values for a page insert.
#[derive(Debug)]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub status: String,
    pub template: String,
    pub sort_order: i32,
    pub created_by: i64,
}

/// Fields applied by a partial page update; only supplied values change.
#[derive(Debug, Default)]
pub struct PageChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub status: Option<String>,
    pub template: Option<String>,
    pub sort_order: Option<i32>,
}

impl PageChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.content.is_none()
            && self.meta_description.is_none()
            && self.meta_keywords.is_none()
            && self.status.is_none()
            && self.template.is_none()
            && self.sort_order.is_none()
    }
}

/// Conjunctive list filters; `None` means no constraint.
#[derive(Debug, Default)]
pub struct PageFilter {
    pub status: Option<String>,
    pub search: Option<String>,
}
