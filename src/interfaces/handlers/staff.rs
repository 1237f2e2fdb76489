use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::ValidateEmail;

use crate::{
    constants::ADMIN_ITEMS_PER_PAGE,
    domain::entities::{
        pagination::Pagination,
        staff::{CreateStaffRequest, NewStaffMember, StaffChanges, StaffFilter, UpdateStaffRequest},
    },
    errors::AppError,
    handlers::respond::{page_params, parse_body, query_param, success, success_with},
    infrastructure::utils::{get_client_ip::get_client_ip, sanitize::sanitize_input},
    repositories::staff::StaffRepository,
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
        ("list", "GET") => list_staff(&state, &query).await,
        ("get", "GET") => get_staff(&state, &query).await,
        ("by_department", "GET") => staff_by_department(&state, &query).await,
        ("create", "POST") => create_staff(&req, &state, &body).await,
        ("update", "PUT") => update_staff(&req, &state, &body).await,
        ("delete", "DELETE") => delete_staff(&req, &state, &query).await,
        ("list" | "get" | "by_department" | "create" | "update" | "delete", _) => {
            Err(AppError::MethodNotAllowed)
        }
        _ => Err(AppError::validation("Invalid action")),
    }
}

async fn list_staff(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = page_params(query, ADMIN_ITEMS_PER_PAGE);

    let filter = StaffFilter {
        department: query_param(query, "department").map(str::to_string),
        // Inactive members only appear when explicitly requested.
        active_only: query.get("active_only").map(String::as_str).unwrap_or("true") == "true",
        search: query_param(query, "search").map(str::to_string),
    };

    let repo = &state.repos.staff_repo;
    let total = repo.count_staff(&filter).await?;
    let staff = repo.list_staff(&filter, page, limit).await?;

    Ok(success_with(
        "Staff retrieved",
        json!({
            "staff": staff,
            "pagination": Pagination::new(page, limit, total),
        }),
    ))
}

async fn get_staff(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let id: i64 = query_param(query, "id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation("Staff ID is required"))?;

    let member = state.repos.staff_repo.get_staff_by_id(id).await?;

    Ok(success_with("Staff member retrieved", json!({ "staff": member })))
}

async fn staff_by_department(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let department = query_param(query, "department")
        .ok_or_else(|| AppError::validation("Department is required"))?;
    let active_only = query.get("active_only").map(String::as_str).unwrap_or("true") == "true";

    let staff = state
        .repos
        .staff_repo
        .staff_by_department(department, active_only)
        .await?;

    Ok(success_with("Staff retrieved", json!({ "staff": staff })))
}

async fn create_staff(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: CreateStaffRequest = parse_body(body)?;

    let (full_name, position) = match (input.full_name.as_deref(), input.position.as_deref()) {
        (Some(name), Some(position)) => (sanitize_input(name), sanitize_input(position)),
        _ => return Err(AppError::validation("Full name and position are required")),
    };

    let email = sanitize_input(&input.email.unwrap_or_default());
    if !email.is_empty() && !email.validate_email() {
        return Err(AppError::validation("Invalid email address"));
    }

    let new_member = NewStaffMember {
        full_name,
        position,
        department: sanitize_input(&input.department.unwrap_or_default()),
        email,
        phone: sanitize_input(&input.phone.unwrap_or_default()),
        bio: sanitize_input(&input.bio.unwrap_or_default()),
        qualifications: sanitize_input(&input.qualifications.unwrap_or_default()),
        profile_image: sanitize_input(&input.profile_image.unwrap_or_default()),
        is_active: input.is_active.unwrap_or(true),
        sort_order: input.sort_order.unwrap_or(0),
    };

    let staff_id = state.repos.staff_repo.create_staff(&new_member).await?;

    state.activity.log(
        Some(principal.id),
        "staff_create",
        format!("Staff member created: {}", new_member.full_name),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success_with(
        "Staff member created successfully",
        json!({ "staff_id": staff_id }),
    ))
}

async fn update_staff(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: UpdateStaffRequest = parse_body(body)?;

    let id = input
        .id
        .ok_or_else(|| AppError::validation("Staff ID is required"))?;

    let repo = &state.repos.staff_repo;
    let existing = repo.get_staff_by_id(id).await?;

    let mut changes = StaffChanges::default();
    if let Some(v) = input.full_name.as_deref() {
        changes.full_name = Some(sanitize_input(v));
    }
    if let Some(v) = input.position.as_deref() {
        changes.position = Some(sanitize_input(v));
    }
    if let Some(v) = input.department.as_deref() {
        changes.department = Some(sanitize_input(v));
    }
    if let Some(v) = input.email.as_deref() {
        let email = sanitize_input(v);
        if !email.is_empty() && !email.validate_email() {
            return Err(AppError::validation("Invalid email address"));
        }
        changes.email = Some(email);
    }
    if let Some(v) = input.phone.as_deref() {
        changes.phone = Some(sanitize_input(v));
    }
    if let Some(v) = input.bio.as_deref() {
        changes.bio = Some(sanitize_input(v));
    }
    if let Some(v) = input.qualifications.as_deref() {
        changes.qualifications = Some(sanitize_input(v));
    }
    if let Some(v) = input.profile_image.as_deref() {
        changes.profile_image = Some(sanitize_input(v));
    }
    changes.is_active = input.is_active;
    changes.sort_order = input.sort_order;

    if changes.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    // Matched-row count from Postgres; zero means the row vanished after
    // the fetch above.
    let affected = repo.update_staff(id, &changes).await?;
    if affected == 0 {
        return Err(AppError::validation("No changes made"));
    }

    state.activity.log(
        Some(principal.id),
        "staff_update",
        format!("Staff member updated: {}", existing.full_name),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Staff member updated successfully"))
}

async fn delete_staff(
    req: &HttpRequest,
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let principal = require_admin(req)?;

    let id: i64 = query_param(query, "id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation("Staff ID is required"))?;

    let repo = &state.repos.staff_repo;
    let existing = repo.get_staff_by_id(id).await?;

    let affected = repo.delete_staff(id).await?;
    if affected == 0 {
        return Err(AppError::validation("Failed to delete staff member"));
    }

    state.activity.log(
        Some(principal.id),
        "staff_delete",
        format!("Staff member deleted: {}", existing.full_name),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Staff member deleted successfully"))
}
