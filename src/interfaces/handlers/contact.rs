use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::ValidateEmail;

use crate::{
    constants::ADMIN_ITEMS_PER_PAGE,
    domain::entities::{
        contact::{ContactFilter, NewContactMessage, SubmitContactRequest},
        pagination::Pagination,
        status::ContactStatus,
    },
    errors::AppError,
    handlers::respond::{page_params, parse_body, query_param, success, success_with},
    infrastructure::utils::{get_client_ip::get_client_ip, sanitize::sanitize_input},
    repositories::contact::ContactRepository,
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
        ("submit", "POST") => submit_message(&req, &state, &body).await,
        ("list", "GET") => list_messages(&req, &state, &query).await,
        ("get", "GET") => get_message(&req, &state, &query).await,
        ("update_status", "PUT") => update_status(&req, &state, &body).await,
        ("delete", "DELETE") => delete_message(&req, &state, &query).await,
        ("stats", "GET") => message_stats(&req, &state).await,
        ("submit" | "list" | "get" | "update_status" | "delete" | "stats", _) => {
            Err(AppError::MethodNotAllowed)
        }
        _ => Err(AppError::validation("Invalid action")),
    }
}

async fn submit_message(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let input: SubmitContactRequest =
        serde_json::from_slice(body).map_err(|_| AppError::validation("Invalid input data"))?;

    let name = sanitize_input(&input.name.unwrap_or_default());
    let email = sanitize_input(&input.email.unwrap_or_default());
    let message = sanitize_input(&input.message.unwrap_or_default());
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(AppError::validation("Name, email, and message are required"));
    }
    if !email.validate_email() {
        return Err(AppError::validation("Invalid email address"));
    }

    let new_message = NewContactMessage {
        name,
        email,
        phone: sanitize_input(&input.phone.unwrap_or_default()),
        subject: sanitize_input(&input.subject.unwrap_or_default()),
        message,
        ip_address: get_client_ip(req, state.config.trust_proxy_headers)
            .unwrap_or_else(|| "unknown".to_string()),
    };

    let repo = &state.repos.contact_repo;
    let message_id = repo.create_message(&new_message).await?;

    // Admin notification is best-effort and never blocks the response.
    if let Ok(stored) = repo.get_message_by_id(message_id).await {
        state.notifier.notify(&stored);
    }

    Ok(success_with(
        "Message sent successfully. We will get back to you soon!",
        json!({ "message_id": message_id }),
    ))
}

async fn list_messages(
    req: &HttpRequest,
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    require_auth(req)?;

    let (page, limit) = page_params(query, ADMIN_ITEMS_PER_PAGE);

    let filter = ContactFilter {
        status: query_param(query, "status").map(str::to_string),
        search: query_param(query, "search").map(str::to_string),
    };

    let repo = &state.repos.contact_repo;
    let total = repo.count_messages(&filter).await?;
    let messages = repo.list_messages(&filter, page, limit).await?;

    Ok(success_with(
        "Messages retrieved",
        json!({
            "messages": messages,
            "pagination": Pagination::new(page, limit, total),
        }),
    ))
}

async fn get_message(
    req: &HttpRequest,
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    require_auth(req)?;

    let id: i64 = query_param(query, "id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation("Message ID is required"))?;

    let repo = &state.repos.contact_repo;
    let message = repo.get_message_by_id(id).await?;

    // Opening a new message moves it to read; this response still carries
    // the status the message had when it was opened.
    if message.status == "new" {
        repo.mark_read_if_new(id).await?;
    }

    Ok(success_with("Message retrieved", json!({ "message": message })))
}

async fn update_status(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;

    #[derive(serde::Deserialize)]
    struct UpdateStatusRequest {
        id: Option<i64>,
        status: Option<String>,
    }
    let input: UpdateStatusRequest = parse_body(body)?;
    let (id, status) = match (input.id, input.status.as_deref()) {
        (Some(id), Some(status)) => (id, sanitize_input(status)),
        _ => return Err(AppError::validation("Message ID and status are required")),
    };

    let status = ContactStatus::parse(&status)?;

    let repo = &state.repos.contact_repo;
    let existing = repo.get_message_by_id(id).await?;

    let affected = repo.set_status(id, status.as_str()).await?;
    if affected == 0 {
        return Err(AppError::validation("Failed to update message status"));
    }

    state.activity.log(
        Some(principal.id),
        "contact_status_update",
        format!(
            "Message status updated to {}: {}",
            status.as_str(),
            existing.name
        ),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Message status updated successfully"))
}

async fn delete_message(
    req: &HttpRequest,
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let principal = require_admin(req)?;

    let id: i64 = query_param(query, "id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation("Message ID is required"))?;

    let repo = &state.repos.contact_repo;
    let existing = repo.get_message_by_id(id).await?;

    let affected = repo.delete_message(id).await?;
    if affected == 0 {
        return Err(AppError::validation("Failed to delete message"));
    }

    state.activity.log(
        Some(principal.id),
        "contact_delete",
        format!("Message deleted: {}", existing.name),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Message deleted successfully"))
}

async fn message_stats(req: &HttpRequest, state: &AppState) -> Result<HttpResponse, AppError> {
    require_auth(req)?;

    let stats = state.repos.contact_repo.message_stats().await?;

    Ok(success_with("Statistics retrieved", json!({ "stats": stats })))
}
