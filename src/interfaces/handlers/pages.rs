use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::{
    constants::ADMIN_ITEMS_PER_PAGE,
    domain::entities::{
        page::{CreatePageRequest, NewPage, PageChanges, PageFilter, UpdatePageRequest},
        pagination::Pagination,
        status::ContentStatus,
    },
    errors::AppError,
    handlers::respond::{page_params, parse_body, query_param, success, success_with},
    infrastructure::utils::{get_client_ip::get_client_ip, sanitize::sanitize_input},
    repositories::page::PageRepository,
    use_cases::guards::{require_admin, require_auth},
    AppState,
};

pub async fn dispatch(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let action = query.get("action").map(String::as_str).unwrap_or("");

    match (action, req.method().as_str()) {
        ("list", "GET") => list_pages(&state, &query).await,
        ("get", "GET") => get_page(&state, &query).await,
        ("create", "POST") => create_page(&req, &state, &body).await,
        ("update", "PUT") => update_page(&req, &state, &body).await,
        ("publish", "POST") => publish_page(&req, &state, &body).await,
        ("delete", "DELETE") => delete_page(&req, &state, &query).await,
        ("list" | "get" | "create" | "update" | "publish" | "delete", _) => {
            Err(AppError::MethodNotAllowed)
        }
        _ => Err(AppError::validation("Invalid action")),
    }
}

async fn list_pages(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = page_params(query, ADMIN_ITEMS_PER_PAGE);

    let filter = PageFilter {
        status: query_param(query, "status").map(str::to_string),
        search: query_param(query, "search").map(str::to_string),
    };

    let repo = &state.repos.page_repo;
    let total = repo.count_pages(&filter).await?;
    let pages = repo.list_pages(&filter, page, limit).await?;

    Ok(success_with(
        "Pages retrieved",
        json!({
            "pages": pages,
            "pagination": Pagination::new(page, limit, total),
        }),
    ))
}

async fn get_page(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let repo = &state.repos.page_repo;

    let page = if let Some(id) = query_param(query, "id") {
        let id: i64 = id
            .parse()
            .map_err(|_| AppError::validation("Page ID or slug is required"))?;
        repo.get_page_by_id(id).await?
    } else if let Some(slug) = query_param(query, "slug") {
        repo.get_page_by_slug(slug).await?
    } else {
        return Err(AppError::validation("Page ID or slug is required"));
    };

    Ok(success_with("Page retrieved", json!({ "page": page })))
}

async fn create_page(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: CreatePageRequest = parse_body(body)?;

    let (title, slug) = match (input.title.as_deref(), input.slug.as_deref()) {
        (Some(title), Some(slug)) => (sanitize_input(title), sanitize_input(slug)),
        _ => return Err(AppError::validation("Title and slug are required")),
    };

    let repo = &state.repos.page_repo;
    if repo.slug_exists(&slug, None).await? {
        return Err(AppError::validation("Slug already exists"));
    }

    let status = match input.status.as_deref() {
        Some(s) => ContentStatus::parse(&sanitize_input(s))?,
        None => ContentStatus::Draft,
    };

    let new_page = NewPage {
        title,
        slug,
        // The HTML body is stored as sent; everything else is plain text.
        content: input.content.unwrap_or_default(),
        meta_description: sanitize_input(&input.meta_description.unwrap_or_default()),
        meta_keywords: sanitize_input(&input.meta_keywords.unwrap_or_default()),
        status: status.as_str().to_string(),
        template: sanitize_input(&input.template.unwrap_or_else(|| "default".into())),
        sort_order: input.sort_order.unwrap_or(0),
        created_by: principal.id,
    };

    let page_id = repo.create_page(&new_page).await?;

    state.activity.log(
        Some(principal.id),
        "page_create",
        format!("Page created: {}", new_page.title),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success_with(
        "Page created successfully",
        json!({ "page_id": page_id }),
    ))
}

async fn update_page(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: UpdatePageRequest = parse_body(body)?;

    let id = input
        .id
        .ok_or_else(|| AppError::validation("Page ID is required"))?;

    let repo = &state.repos.page_repo;
    let existing = repo.get_page_by_id(id).await?;

    let mut changes = PageChanges::default();
    if let Some(title) = input.title.as_deref() {
        changes.title = Some(sanitize_input(title));
    }
    if let Some(slug) = input.slug.as_deref() {
        let slug = sanitize_input(slug);
        if repo.slug_exists(&slug, Some(id)).await? {
            return Err(AppError::validation("Slug already exists"));
        }
        changes.slug = Some(slug);
    }
    changes.content = input.content;
    if let Some(v) = input.meta_description.as_deref() {
        changes.meta_description = Some(sanitize_input(v));
    }
    if let Some(v) = input.meta_keywords.as_deref() {
        changes.meta_keywords = Some(sanitize_input(v));
    }
    if let Some(status) = input.status.as_deref() {
        changes.status = Some(
            ContentStatus::parse(&sanitize_input(status))?
                .as_str()
                .to_string(),
        );
    }
    if let Some(template) = input.template.as_deref() {
        changes.template = Some(sanitize_input(template));
    }
    changes.sort_order = input.sort_order;

    if changes.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    // Postgres reports matched rows, not changed ones, so zero here means
    // the row vanished after the fetch above.
    let affected = repo.update_page(id, &changes).await?;
    if affected == 0 {
        return Err(AppError::validation("No changes made"));
    }

    state.activity.log(
        Some(principal.id),
        "page_update",
        format!("Page updated: {}", existing.title),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Page updated successfully"))
}

async fn publish_page(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;

    #[derive(serde::Deserialize)]
    struct PublishRequest {
        id: Option<i64>,
        status: Option<String>,
    }
    let input: PublishRequest = parse_body(body)?;
    let (id, status) = match (input.id, input.status.as_deref()) {
        (Some(id), Some(status)) => (id, sanitize_input(status)),
        _ => return Err(AppError::validation("Page ID and status are required")),
    };

    let status = ContentStatus::parse(&status)?;

    let repo = &state.repos.page_repo;
    let existing = repo.get_page_by_id(id).await?;

    let affected = repo.set_page_status(id, status.as_str()).await?;
    if affected == 0 {
        return Err(AppError::validation("Failed to update page status"));
    }

    state.activity.log(
        Some(principal.id),
        "page_publish",
        format!(
            "Page status changed to {}: {}",
            status.as_str(),
            existing.title
        ),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Page status updated successfully"))
}

async fn delete_page(
    req: &HttpRequest,
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let principal = require_admin(req)?;

    let id: i64 = query_param(query, "id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation("Page ID is required"))?;

    let repo = &state.repos.page_repo;
    let existing = repo.get_page_by_id(id).await?;

    let affected = repo.delete_page(id).await?;
    if affected == 0 {
        return Err(AppError::validation("Failed to delete page"));
    }

    state.activity.log(
        Some(principal.id),
        "page_delete",
        format!("Page deleted: {}", existing.title),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Page deleted successfully"))
}
