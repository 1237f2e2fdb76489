use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use serde_json::{json, Value};

use crate::{
    constants::{ADMIN_ITEMS_PER_PAGE, MAX_FILE_SIZE},
    domain::entities::{
        media::{MediaChanges, MediaFilter, MediaItem, NewMediaItem},
        pagination::Pagination,
    },
    errors::AppError,
    handlers::respond::{limit_param, page_params, parse_body, query_param, success, success_with},
    infrastructure::{
        storage,
        utils::{
            get_client_ip::get_client_ip,
            sanitize::{sanitize_input, sanitize_opt},
        },
    },
    repositories::media::MediaRepository,
    use_cases::guards::require_auth,
    AppState,
};

pub async fn dispatch(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let action = query.get("action").map(String::as_str).unwrap_or("");

    match (action, req.method().as_str()) {
        ("upload", "POST") => upload_media(&req, &state, payload).await,
        ("list", "GET") => list_media(&state, &query).await,
        ("get", "GET") => get_media(&state, &query).await,
        ("by_type", "GET") => media_by_type(&state, &query).await,
        ("update", "PUT") => {
            let body = read_body(payload).await?;
            update_media(&req, &state, &body).await
        }
        ("delete", "DELETE") => delete_media(&req, &state, &query).await,
        ("upload" | "list" | "get" | "by_type" | "update" | "delete", _) => {
            Err(AppError::MethodNotAllowed)
        }
        _ => Err(AppError::validation("Invalid action")),
    }
}

async fn read_body(mut payload: web::Payload) -> Result<web::Bytes, AppError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|_| AppError::validation("Invalid request body"))?;
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

/// Serialized item with the absolute download URL attached.
fn media_json(item: &MediaItem, site_url: &str) -> Result<Value, AppError> {
    let mut value = serde_json::to_value(item)
        .map_err(|e| AppError::Internal(format!("Media serialization failed: {}", e)))?;
    if let Some(map) = value.as_object_mut() {
        map.insert("url".into(), Value::String(item.url(site_url)));
    }
    Ok(value)
}

struct UploadedPart {
    original_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn upload_media(
    req: &HttpRequest,
    state: &AppState,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;

    let mut multipart = Multipart::new(req.headers(), payload);

    let mut file: Option<UploadedPart> = None;
    let mut directory = "general".to_string();
    let mut alt_text = String::new();
    let mut caption = String::new();

    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(|_| AppError::validation("Invalid multipart payload"))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or("")
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|_| AppError::validation("Invalid multipart payload"))?;
            data.extend_from_slice(&chunk);
            if name == "file" && data.len() > MAX_FILE_SIZE {
                return Err(AppError::validation("File too large"));
            }
        }

        match name.as_str() {
            "file" => {
                let original_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("")
                    .to_string();
                let content_type = field
                    .content_type()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                file = Some(UploadedPart {
                    original_name,
                    content_type,
                    bytes: data,
                });
            }
            "directory" => directory = sanitize_input(&String::from_utf8_lossy(&data)),
            "alt_text" => alt_text = sanitize_input(&String::from_utf8_lossy(&data)),
            "caption" => caption = sanitize_input(&String::from_utf8_lossy(&data)),
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::validation("No file uploaded"))?;
    if directory.is_empty() {
        directory = "general".to_string();
    }

    let stored = storage::store_file(
        &state.config.upload_path,
        &directory,
        &file.original_name,
        &file.bytes,
    )
    .await?;

    let new_item = NewMediaItem {
        filename: stored.filename,
        original_name: file.original_name,
        file_path: stored.relative_path,
        file_type: file.content_type,
        file_size: file.bytes.len() as i64,
        alt_text,
        caption,
        uploaded_by: principal.id,
    };

    let media_id = state.repos.media_repo.create_media(&new_item).await?;

    state.activity.log(
        Some(principal.id),
        "media_upload",
        format!("File uploaded: {}", new_item.original_name),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    let site_url = state.config.site_url.trim_end_matches('/');
    Ok(success_with(
        "File uploaded successfully",
        json!({
            "media_id": media_id,
            "file": {
                "id": media_id,
                "filename": new_item.filename,
                "original_name": new_item.original_name,
                "file_path": new_item.file_path,
                "file_type": new_item.file_type,
                "file_size": new_item.file_size,
                "alt_text": new_item.alt_text,
                "caption": new_item.caption,
                "url": format!("{}/{}", site_url, new_item.file_path),
            }
        }),
    ))
}

async fn list_media(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = page_params(query, ADMIN_ITEMS_PER_PAGE);

    let filter = MediaFilter {
        file_type: query_param(query, "type").map(str::to_string),
        search: query_param(query, "search").map(str::to_string),
    };

    let repo = &state.repos.media_repo;
    let total = repo.count_media(&filter).await?;
    let media = repo.list_media(&filter, page, limit).await?;

    let media = media
        .iter()
        .map(|item| media_json(item, &state.config.site_url))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(success_with(
        "Media retrieved",
        json!({
            "media": media,
            "pagination": Pagination::new(page, limit, total),
        }),
    ))
}

async fn get_media(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let id: i64 = query_param(query, "id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation("Media ID is required"))?;

    let item = state.repos.media_repo.get_media_by_id(id).await?;

    Ok(success_with(
        "Media retrieved",
        json!({ "media": media_json(&item, &state.config.site_url)? }),
    ))
}

async fn media_by_type(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let file_type =
        query_param(query, "type").ok_or_else(|| AppError::validation("Type is required"))?;
    let limit = limit_param(query, 0);

    let media = state.repos.media_repo.media_by_type(file_type, limit).await?;
    let media = media
        .iter()
        .map(|item| media_json(item, &state.config.site_url))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(success_with("Media retrieved", json!({ "media": media })))
}

async fn update_media(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;

    #[derive(serde::Deserialize)]
    struct UpdateMediaRequest {
        id: Option<i64>,
        #[serde(default)]
        alt_text: Option<String>,
        #[serde(default)]
        caption: Option<String>,
    }
    let input: UpdateMediaRequest = parse_body(body)?;

    let id = input
        .id
        .ok_or_else(|| AppError::validation("Media ID is required"))?;

    let repo = &state.repos.media_repo;
    let existing = repo.get_media_by_id(id).await?;

    let changes = MediaChanges {
        alt_text: sanitize_opt(input.alt_text.as_deref()),
        caption: sanitize_opt(input.caption.as_deref()),
    };
    if changes.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    // Matched-row count from Postgres; zero means the row vanished after
    // the fetch above.
    let affected = repo.update_media(id, &changes).await?;
    if affected == 0 {
        return Err(AppError::validation("No changes made"));
    }

    state.activity.log(
        Some(principal.id),
        "media_update",
        format!("Media updated: {}", existing.original_name),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Media updated successfully"))
}

async fn delete_media(
    req: &HttpRequest,
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;

    let id: i64 = query_param(query, "id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation("Media ID is required"))?;

    let repo = &state.repos.media_repo;
    let existing = repo.get_media_by_id(id).await?;

    let file_path = repo.delete_media(id).await?;
    storage::delete_file(&file_path).await;

    state.activity.log(
        Some(principal.id),
        "media_delete",
        format!("Media deleted: {}", existing.original_name),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Media deleted successfully"))
}
