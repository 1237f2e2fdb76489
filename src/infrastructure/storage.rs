use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use crate::constants::{ALLOWED_DOCUMENT_EXTENSIONS, ALLOWED_IMAGE_EXTENSIONS, MAX_FILE_SIZE};
use crate::errors::AppError;

/// A file persisted under the upload root.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    /// Path relative to the site root, e.g. `uploads/media/<name>`. This is
    /// what gets stored in the database and joined with the site URL.
    pub relative_path: String,
}

/// Rejects oversized payloads and extensions outside the image/document
/// whitelist. Returns the lowercased extension.
pub fn validate_upload(original_name: &str, size: usize) -> Result<String, AppError> {
    if size > MAX_FILE_SIZE {
        return Err(AppError::validation("File too large"));
    }

    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let allowed = ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str())
        || ALLOWED_DOCUMENT_EXTENSIONS.contains(&ext.as_str());
    if !allowed {
        return Err(AppError::validation("Invalid file type"));
    }

    Ok(ext)
}

/// Generated server-side name; never derived from client input.
pub fn generate_filename(ext: &str) -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}_{}.{}", Uuid::new_v4().simple(), ts, ext)
}

fn valid_subdirectory(directory: &str) -> bool {
    !directory.is_empty()
        && directory
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Writes the bytes under `<upload_root>[/<directory>]/<generated name>`,
/// creating directories as needed.
pub async fn store_file(
    upload_root: &str,
    directory: &str,
    original_name: &str,
    bytes: &[u8],
) -> Result<StoredFile, AppError> {
    let ext = validate_upload(original_name, bytes.len())?;

    if !directory.is_empty() && !valid_subdirectory(directory) {
        return Err(AppError::validation("Invalid directory"));
    }

    let filename = generate_filename(&ext);
    let mut dir = PathBuf::from(upload_root);
    if !directory.is_empty() {
        dir.push(directory);
    }
    fs::create_dir_all(&dir).await?;

    let target = dir.join(&filename);
    fs::write(&target, bytes).await?;

    let relative_path = if directory.is_empty() {
        format!("{}/{}", upload_root.trim_end_matches('/'), filename)
    } else {
        format!(
            "{}/{}/{}",
            upload_root.trim_end_matches('/'),
            directory,
            filename
        )
    };

    Ok(StoredFile {
        filename,
        relative_path,
    })
}

/// Best-effort removal; a missing file only gets a warning.
pub async fn delete_file(relative_path: &str) {
    if let Err(e) = fs::remove_file(relative_path).await {
        warn!("Could not remove uploaded file {}: {}", relative_path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_and_unlisted_extensions() {
        assert!(validate_upload("a.jpg", MAX_FILE_SIZE + 1).is_err());
        assert!(validate_upload("a.exe", 10).is_err());
        assert!(validate_upload("noext", 10).is_err());
        assert_eq!(validate_upload("photo.JPG", 10).unwrap(), "jpg");
        assert_eq!(validate_upload("notes.pdf", 10).unwrap(), "pdf");
    }

    #[test]
    fn generated_names_carry_extension_and_do_not_collide() {
        let a = generate_filename("png");
        let b = generate_filename("png");
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn subdirectories_cannot_traverse() {
        assert!(valid_subdirectory("media"));
        assert!(valid_subdirectory("staff_photos"));
        assert!(!valid_subdirectory("../etc"));
        assert!(!valid_subdirectory("a/b"));
        assert!(!valid_subdirectory(""));
    }

    #[tokio::test]
    async fn store_and_delete_round_trip() {
        let root = std::env::temp_dir().join(format!("cms-test-{}", Uuid::new_v4().simple()));
        let root = root.to_string_lossy().to_string();

        let stored = store_file(&root, "media", "pic.png", b"png-bytes")
            .await
            .unwrap();
        assert!(stored.relative_path.ends_with(&stored.filename));
        assert!(fs::metadata(&stored.relative_path).await.is_ok());

        delete_file(&stored.relative_path).await;
        assert!(fs::metadata(&stored.relative_path).await.is_err());

        let _ = fs::remove_dir_all(&root).await;
    }
}
