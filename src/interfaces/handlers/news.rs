use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::{
    constants::ADMIN_ITEMS_PER_PAGE,
    domain::entities::{
        news::{CreateNewsRequest, NewNewsItem, NewsChanges, NewsFilter, UpdateNewsRequest},
        pagination::Pagination,
        status::ContentStatus,
    },
    errors::AppError,
    handlers::respond::{limit_param, page_params, parse_body, query_param, success, success_with},
    infrastructure::utils::{get_client_ip::get_client_ip, sanitize::sanitize_input},
    repositories::news::NewsRepository,
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
        ("list", "GET") => list_news(&state, &query).await,
        ("get", "GET") => get_news(&state, &query).await,
        ("featured", "GET") => featured_news(&state, &query).await,
        ("recent", "GET") => recent_news(&state, &query).await,
        ("create", "POST") => create_news(&req, &state, &body).await,
        ("update", "PUT") => update_news(&req, &state, &body).await,
        ("delete", "DELETE") => delete_news(&req, &state, &query).await,
        ("list" | "get" | "featured" | "recent" | "create" | "update" | "delete", _) => {
            Err(AppError::MethodNotAllowed)
        }
        _ => Err(AppError::validation("Invalid action")),
    }
}

async fn list_news(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = page_params(query, ADMIN_ITEMS_PER_PAGE);

    let filter = NewsFilter {
        status: query_param(query, "status").map(str::to_string),
        is_featured: query_param(query, "featured").map(|v| v == "true"),
        search: query_param(query, "search").map(str::to_string),
    };

    let repo = &state.repos.news_repo;
    let total = repo.count_news(&filter).await?;
    let news = repo.list_news(&filter, page, limit).await?;

    Ok(success_with(
        "News retrieved",
        json!({
            "news": news,
            "pagination": Pagination::new(page, limit, total),
        }),
    ))
}

async fn get_news(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let repo = &state.repos.news_repo;

    let item = if let Some(id) = query_param(query, "id") {
        let id: i64 = id
            .parse()
            .map_err(|_| AppError::validation("News ID or slug is required"))?;
        repo.get_news_by_id(id).await?
    } else if let Some(slug) = query_param(query, "slug") {
        repo.get_news_by_slug(slug).await?
    } else {
        return Err(AppError::validation("News ID or slug is required"));
    };

    Ok(success_with("News retrieved", json!({ "news": item })))
}

async fn featured_news(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let limit = limit_param(query, 3);
    let news = state.repos.news_repo.featured_news(limit).await?;

    Ok(success_with("Featured news retrieved", json!({ "news": news })))
}

async fn recent_news(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let limit = limit_param(query, 6);
    let news = state.repos.news_repo.recent_news(limit).await?;

    Ok(success_with("Recent news retrieved", json!({ "news": news })))
}

async fn create_news(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: CreateNewsRequest = parse_body(body)?;

    let (title, slug) = match (input.title.as_deref(), input.slug.as_deref()) {
        (Some(title), Some(slug)) => (sanitize_input(title), sanitize_input(slug)),
        _ => return Err(AppError::validation("Title and slug are required")),
    };

    let repo = &state.repos.news_repo;
    if repo.slug_exists(&slug, None).await? {
        return Err(AppError::validation("Slug already exists"));
    }

    let status = match input.status.as_deref() {
        Some(s) => ContentStatus::parse(&sanitize_input(s))?,
        None => ContentStatus::Draft,
    };

    // Publishing without an explicit date stamps the item now.
    let published_at = match (status, input.published_at) {
        (ContentStatus::Published, None) => Some(Utc::now()),
        (_, explicit) => explicit,
    };

    let new_item = NewNewsItem {
        title,
        slug,
        excerpt: sanitize_input(&input.excerpt.unwrap_or_default()),
        content: input.content.unwrap_or_default(),
        featured_image: sanitize_input(&input.featured_image.unwrap_or_default()),
        status: status.as_str().to_string(),
        is_featured: input.is_featured.unwrap_or(false),
        published_at,
        created_by: principal.id,
    };

    let news_id = repo.create_news(&new_item).await?;

    state.activity.log(
        Some(principal.id),
        "news_create",
        format!("News created: {}", new_item.title),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success_with(
        "News created successfully",
        json!({ "news_id": news_id }),
    ))
}

async fn update_news(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: UpdateNewsRequest = parse_body(body)?;

    let id = input
        .id
        .ok_or_else(|| AppError::validation("News ID is required"))?;

    let repo = &state.repos.news_repo;
    let existing = repo.get_news_by_id(id).await?;

    let mut changes = NewsChanges::default();
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
    if let Some(v) = input.excerpt.as_deref() {
        changes.excerpt = Some(sanitize_input(v));
    }
    if let Some(v) = input.featured_image.as_deref() {
        changes.featured_image = Some(sanitize_input(v));
    }
    if let Some(status) = input.status.as_deref() {
        let status = ContentStatus::parse(&sanitize_input(status))?;
        changes.status = Some(status.as_str().to_string());
        if status == ContentStatus::Published && input.published_at.is_none() {
            changes.published_at = Some(Utc::now());
        }
    }
    changes.is_featured = input.is_featured;
    if input.published_at.is_some() {
        changes.published_at = input.published_at;
    }

    if changes.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    // Matched-row count from Postgres; zero means the row vanished after
    // the fetch above.
    let affected = repo.update_news(id, &changes).await?;
    if affected == 0 {
        return Err(AppError::validation("No changes made"));
    }

    state.activity.log(
        Some(principal.id),
        "news_update",
        format!("News updated: {}", existing.title),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("News updated successfully"))
}

async fn delete_news(
    req: &HttpRequest,
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let principal = require_admin(req)?;

    let id: i64 = query_param(query, "id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation("News ID is required"))?;

    let repo = &state.repos.news_repo;
    let existing = repo.get_news_by_id(id).await?;

    let affected = repo.delete_news(id).await?;
    if affected == 0 {
        return Err(AppError::validation("Failed to delete news"));
    }

    state.activity.log(
        Some(principal.id),
        "news_delete",
        format!("News deleted: {}", existing.title),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("News deleted successfully"))
}
