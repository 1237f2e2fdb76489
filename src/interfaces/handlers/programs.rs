use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::{
    constants::ADMIN_ITEMS_PER_PAGE,
    domain::entities::{
        pagination::Pagination,
        program::{
            CreateProgramRequest, NewProgram, ProgramChanges, ProgramFilter, UpdateProgramRequest,
        },
        status::{ProgramLevel, ProgramStatus},
    },
    errors::AppError,
    handlers::respond::{limit_param, page_params, parse_body, query_param, success, success_with},
    infrastructure::utils::{get_client_ip::get_client_ip, sanitize::sanitize_input},
    repositories::program::ProgramRepository,
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
        ("list", "GET") => list_programs(&state, &query).await,
        ("get", "GET") => get_program(&state, &query).await,
        ("by_level", "GET") => programs_by_level(&state, &query).await,
        ("create", "POST") => create_program(&req, &state, &body).await,
        ("update", "PUT") => update_program(&req, &state, &body).await,
        ("delete", "DELETE") => delete_program(&req, &state, &query).await,
        ("list" | "get" | "by_level" | "create" | "update" | "delete", _) => {
            Err(AppError::MethodNotAllowed)
        }
        _ => Err(AppError::validation("Invalid action")),
    }
}

async fn list_programs(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = page_params(query, ADMIN_ITEMS_PER_PAGE);

    let filter = ProgramFilter {
        status: query_param(query, "status").map(str::to_string),
        level: query_param(query, "level").map(str::to_string),
        search: query_param(query, "search").map(str::to_string),
    };

    let repo = &state.repos.program_repo;
    let total = repo.count_programs(&filter).await?;
    let programs = repo.list_programs(&filter, page, limit).await?;

    Ok(success_with(
        "Programs retrieved",
        json!({
            "programs": programs,
            "pagination": Pagination::new(page, limit, total),
        }),
    ))
}

async fn get_program(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let repo = &state.repos.program_repo;

    let program = if let Some(id) = query_param(query, "id") {
        let id: i64 = id
            .parse()
            .map_err(|_| AppError::validation("Program ID or slug is required"))?;
        repo.get_program_by_id(id).await?
    } else if let Some(slug) = query_param(query, "slug") {
        repo.get_program_by_slug(slug).await?
    } else {
        return Err(AppError::validation("Program ID or slug is required"));
    };

    Ok(success_with(
        "Program retrieved",
        json!({ "program": program }),
    ))
}

async fn programs_by_level(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let level = query_param(query, "level")
        .ok_or_else(|| AppError::validation("Level is required"))?;
    let level = ProgramLevel::parse(level)?;

    let status = query_param(query, "status").unwrap_or("active");
    let limit = limit_param(query, 0);

    let programs = state
        .repos
        .program_repo
        .programs_by_level(level.as_str(), status, limit)
        .await?;

    Ok(success_with(
        "Programs retrieved",
        json!({ "programs": programs }),
    ))
}

async fn create_program(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: CreateProgramRequest = parse_body(body)?;

    let (title, slug, level) = match (
        input.title.as_deref(),
        input.slug.as_deref(),
        input.level.as_deref(),
    ) {
        (Some(title), Some(slug), Some(level)) => (
            sanitize_input(title),
            sanitize_input(slug),
            sanitize_input(level),
        ),
        _ => return Err(AppError::validation("Title, slug, and level are required")),
    };

    let repo = &state.repos.program_repo;
    if repo.slug_exists(&slug, None).await? {
        return Err(AppError::validation("Slug already exists"));
    }

    let level = ProgramLevel::parse(&level)?;
    let status = match input.status.as_deref() {
        Some(s) => ProgramStatus::parse(&sanitize_input(s))?,
        None => ProgramStatus::Active,
    };

    let new_program = NewProgram {
        title,
        slug,
        description: sanitize_input(&input.description.unwrap_or_default()),
        content: input.content.unwrap_or_default(),
        duration: sanitize_input(&input.duration.unwrap_or_default()),
        level: level.as_str().to_string(),
        requirements: sanitize_input(&input.requirements.unwrap_or_default()),
        fees: input.fees,
        featured_image: sanitize_input(&input.featured_image.unwrap_or_default()),
        status: status.as_str().to_string(),
        sort_order: input.sort_order.unwrap_or(0),
        created_by: principal.id,
    };

    let program_id = repo.create_program(&new_program).await?;

    state.activity.log(
        Some(principal.id),
        "program_create",
        format!("Program created: {}", new_program.title),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success_with(
        "Program created successfully",
        json!({ "program_id": program_id }),
    ))
}

async fn update_program(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: UpdateProgramRequest = parse_body(body)?;

    let id = input
        .id
        .ok_or_else(|| AppError::validation("Program ID is required"))?;

    let repo = &state.repos.program_repo;
    let existing = repo.get_program_by_id(id).await?;

    let mut changes = ProgramChanges::default();
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
    if let Some(v) = input.description.as_deref() {
        changes.description = Some(sanitize_input(v));
    }
    changes.content = input.content;
    if let Some(v) = input.duration.as_deref() {
        changes.duration = Some(sanitize_input(v));
    }
    if let Some(level) = input.level.as_deref() {
        changes.level = Some(
            ProgramLevel::parse(&sanitize_input(level))?
                .as_str()
                .to_string(),
        );
    }
    if let Some(v) = input.requirements.as_deref() {
        changes.requirements = Some(sanitize_input(v));
    }
    changes.fees = input.fees;
    if let Some(v) = input.featured_image.as_deref() {
        changes.featured_image = Some(sanitize_input(v));
    }
    if let Some(status) = input.status.as_deref() {
        changes.status = Some(
            ProgramStatus::parse(&sanitize_input(status))?
                .as_str()
                .to_string(),
        );
    }
    changes.sort_order = input.sort_order;

    if changes.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    // Matched-row count from Postgres; zero means the row vanished after
    // the fetch above.
    let affected = repo.update_program(id, &changes).await?;
    if affected == 0 {
        return Err(AppError::validation("No changes made"));
    }

    state.activity.log(
        Some(principal.id),
        "program_update",
        format!("Program updated: {}", existing.title),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Program updated successfully"))
}

async fn delete_program(
    req: &HttpRequest,
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let principal = require_admin(req)?;

    let id: i64 = query_param(query, "id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation("Program ID is required"))?;

    let repo = &state.repos.program_repo;
    let existing = repo.get_program_by_id(id).await?;

    let affected = repo.delete_program(id).await?;
    if affected == 0 {
        return Err(AppError::validation("Failed to delete program"));
    }

    state.activity.log(
        Some(principal.id),
        "program_delete",
        format!("Program deleted: {}", existing.title),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Program deleted successfully"))
}
