use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MediaItem {
    pub id: i64,
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub alt_text: String,
    pub caption: String,
    pub uploaded_by: Option<i64>,
    pub uploaded_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MediaItem {
    /// Absolute URL for the stored file, built from the public site base.
    pub fn url(&self, site_url: &str) -> String {
        format!("{}/{}", site_url.trim_end_matches('/'), self.file_path)
    }
}

#[derive(Debug)]
pub struct NewMediaItem {
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub alt_text: String,
    pub caption: String,
    pub uploaded_by: i64,
}

#[derive(Debug, Default)]
pub struct MediaChanges {
    pub alt_text: Option<String>,
    pub caption: Option<String>,
}

impl MediaChanges {
    pub fn is_empty(&self) -> bool {
        self.alt_text.is_none() && self.caption.is_none()
    }
}

/// `file_type` filters by MIME prefix, e.g. "image" matches "image/png".
#[derive(Debug, Default)]
pub struct MediaFilter {
    pub file_type: Option<String>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn url_joins_base_and_path_without_double_slash() {
        let item = MediaItem {
            id: 1,
            filename: "abc_1700000000.png".into(),
            original_name: "logo.png".into(),
            file_path: "uploads/abc_1700000000.png".into(),
            file_type: "image/png".into(),
            file_size: 1234,
            alt_text: String::new(),
            caption: String::new(),
            uploaded_by: Some(1),
            uploaded_by_name: Some("root".into()),
            created_at: Utc::now(),
        };
        assert_eq!(
            item.url("http://localhost:8080/"),
            "http://localhost:8080/uploads/abc_1700000000.png"
        );
        assert_eq!(
            item.url("https://cms.example.org"),
            "https://cms.example.org/uploads/abc_1700000000.png"
        );
    }
}
