use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::{
    domain::entities::setting::{
        value_to_string, BulkUpdateSettingsRequest, SettingView, UpdateSettingRequest,
    },
    errors::AppError,
    handlers::respond::{parse_body, query_param, success, success_with},
    infrastructure::utils::{get_client_ip::get_client_ip, sanitize::sanitize_input},
    repositories::setting::SettingRepository,
    use_cases::guards::require_auth,
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
        ("get", "GET") => get_settings(&state).await,
        ("update", "PUT") => update_settings(&req, &state, &body).await,
        ("get_by_key", "GET") => get_setting_by_key(&state, &query).await,
        ("update_by_key", "PUT") => update_setting_by_key(&req, &state, &body).await,
        ("get" | "update" | "get_by_key" | "update_by_key", _) => Err(AppError::MethodNotAllowed),
        _ => Err(AppError::validation("Invalid action")),
    }
}

async fn get_settings(state: &AppState) -> Result<HttpResponse, AppError> {
    let settings = state.repos.setting_repo.all_settings().await?;

    let keyed: HashMap<String, SettingView> = settings
        .into_iter()
        .map(|s| (s.setting_key.clone(), SettingView::from(s)))
        .collect();

    Ok(success_with("Settings retrieved", json!({ "settings": keyed })))
}

async fn update_settings(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: BulkUpdateSettingsRequest = parse_body(body)?;

    let settings = input
        .settings
        .ok_or_else(|| AppError::validation("Settings data is required"))?;

    let repo = &state.repos.setting_repo;
    let mut updated: u32 = 0;
    let mut errors: Vec<String> = Vec::new();

    for (key, value) in &settings {
        match repo.upsert_setting(key, &value_to_string(value)).await {
            Ok(()) => updated += 1,
            Err(e) => errors.push(format!("Error updating {}: {}", key, e)),
        }
    }

    if updated == 0 {
        return Err(AppError::validation("No settings were updated"));
    }

    state.activity.log(
        Some(principal.id),
        "settings_update",
        format!("Updated {} settings", updated),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    if errors.is_empty() {
        Ok(success_with(
            "All settings updated successfully",
            json!({ "updated": updated }),
        ))
    } else {
        Ok(success_with(
            "Settings updated with some errors",
            json!({ "updated": updated, "errors": errors }),
        ))
    }
}

async fn get_setting_by_key(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, AppError> {
    let key =
        query_param(query, "key").ok_or_else(|| AppError::validation("Setting key is required"))?;

    let setting = state
        .repos
        .setting_repo
        .get_setting(key)
        .await?
        .ok_or_else(|| AppError::not_found("Setting not found"))?;

    Ok(success_with("Setting retrieved", json!({ "setting": setting })))
}

async fn update_setting_by_key(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: UpdateSettingRequest = parse_body(body)?;

    let (key, value) = match (input.key.as_deref(), input.value.as_ref()) {
        (Some(key), Some(value)) => (sanitize_input(key), value_to_string(value)),
        _ => return Err(AppError::validation("Setting key and value are required")),
    };

    state.repos.setting_repo.upsert_setting(&key, &value).await?;

    state.activity.log(
        Some(principal.id),
        "setting_update",
        format!("Setting updated: {}", key),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Setting updated successfully"))
}
