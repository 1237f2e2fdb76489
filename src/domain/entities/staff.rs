use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StaffMember {
    pub id: i64,
    pub full_name: String,
    pub position: String,
    pub department: String,
    pub email: String,
    pub phone: String,
    pub bio: String,
    pub qualifications: String,
    pub profile_image: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub qualifications: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub qualifications: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug)]
pub struct NewStaffMember {
    pub full_name: String,
    pub position: String,
    pub department: String,
    pub email: String,
    pub phone: String,
    pub bio: String,
    pub qualifications: String,
    pub profile_image: String,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Default)]
pub struct StaffChanges {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub qualifications: Option<String>,
    pub profile_image: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

impl StaffChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.position.is_none()
            && self.department.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.bio.is_none()
            && self.qualifications.is_none()
            && self.profile_image.is_none()
            && self.is_active.is_none()
            && self.sort_order.is_none()
    }
}

#[derive(Debug, Default)]
pub struct StaffFilter {
    pub department: Option<String>,
    pub active_only: bool,
    pub search: Option<String>,
}
