use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// 5 MiB upload ceiling.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
pub const ALLOWED_DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

pub const ADMIN_ITEMS_PER_PAGE: u32 = 20;

pub const SESSION_COOKIE: &str = "cms_session";
