use std::collections::HashMap;

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    web, HttpRequest, HttpResponse,
};
use serde_json::json;
use validator::ValidateEmail;

use crate::{
    constants::SESSION_COOKIE,
    domain::entities::user::{
        LoginRequest, NewUser, Principal, RegisterRequest, UpdateProfileRequest, UserChanges,
        UserRole, UserView,
    },
    errors::AppError,
    handlers::respond::{parse_body, success, success_with},
    infrastructure::{
        auth::{password::Verification, token::generate_session_token},
        utils::{get_client_ip::get_client_ip, sanitize::sanitize_input},
    },
    repositories::{session::SessionRepository, user::UserRepository},
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
        ("login", "POST") => login(&req, &state, &body).await,
        ("logout", "POST") => logout(&req, &state).await,
        ("check", "GET") => check_auth(&req, &state).await,
        ("register", "POST") => register(&req, &state, &body).await,
        ("profile", "GET") => get_profile(&req, &state).await,
        ("profile", "PUT") => update_profile(&req, &state, &body).await,
        ("login" | "logout" | "check" | "register" | "profile", _) => {
            Err(AppError::MethodNotAllowed)
        }
        _ => Err(AppError::validation("Invalid action")),
    }
}

fn session_cookie(token: String, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(ttl_hours))
        .finish()
}

fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .finish()
}

async fn login(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let input: LoginRequest = parse_body(body)?;

    let (username, password) = match (input.username.as_deref(), input.password) {
        (Some(username), Some(password)) => (sanitize_input(username), password),
        _ => return Err(AppError::validation("Username and password are required")),
    };

    let user = state
        .repos
        .user_repo
        .find_active_by_username(&username)
        .await?
        .ok_or_else(|| AppError::validation("Invalid credentials"))?;

    match state.hasher.verify(&password, &user.password_hash)? {
        Verification::Mismatch => {
            return Err(AppError::validation("Invalid credentials"));
        }
        Verification::ValidNeedsRehash => {
            // Transparent upgrade of legacy digests on successful login.
            let upgraded = state.hasher.hash(&password)?;
            state
                .repos
                .user_repo
                .replace_password_hash(user.id, &upgraded)
                .await?;
        }
        Verification::Valid => {}
    }

    let token = generate_session_token();
    state
        .repos
        .session_repo
        .create_session(user.id, &token, state.config.session_ttl_hours)
        .await?;

    state.activity.log(
        Some(user.id),
        "login",
        "User logged in".to_string(),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    let mut response = success_with(
        "Login successful",
        json!({
            "user": {
                "id": user.id,
                "username": user.username,
                "email": user.email,
                "full_name": user.full_name,
                "role": user.role,
            }
        }),
    );
    response
        .add_cookie(&session_cookie(token, state.config.session_ttl_hours))
        .map_err(|e| AppError::Internal(format!("Could not set session cookie: {}", e)))?;

    Ok(response)
}

async fn logout(req: &HttpRequest, state: &AppState) -> Result<HttpResponse, AppError> {
    if let Ok(principal) = require_auth(req) {
        state.activity.log(
            Some(principal.id),
            "logout",
            "User logged out".to_string(),
            get_client_ip(req, state.config.trust_proxy_headers),
        );
    }

    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state
            .repos
            .session_repo
            .delete_session(cookie.value())
            .await?;
    }

    let mut response = success("Logout successful");
    response
        .add_cookie(&expired_session_cookie())
        .map_err(|e| AppError::Internal(format!("Could not clear session cookie: {}", e)))?;

    Ok(response)
}

async fn check_auth(req: &HttpRequest, state: &AppState) -> Result<HttpResponse, AppError> {
    let principal: Principal = require_auth(req)?;
    let user = state.repos.user_repo.find_by_id(principal.id).await?;

    Ok(success_with(
        "User authenticated",
        json!({
            "user": {
                "id": user.id,
                "username": user.username,
                "email": user.email,
                "full_name": user.full_name,
                "role": user.role,
            },
            "is_admin": principal.is_admin(),
        }),
    ))
}

async fn register(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_admin(req)?;
    let input: RegisterRequest = parse_body(body)?;

    let (username, email, password, full_name) = match (
        input.username.as_deref(),
        input.email.as_deref(),
        input.password,
        input.full_name.as_deref(),
    ) {
        (Some(username), Some(email), Some(password), Some(full_name)) => (
            sanitize_input(username),
            sanitize_input(email),
            password,
            sanitize_input(full_name),
        ),
        _ => return Err(AppError::validation("All fields are required")),
    };

    if !email.validate_email() {
        return Err(AppError::validation("Invalid email address"));
    }

    let role = match input.role.as_deref() {
        Some(role) => UserRole::parse(&sanitize_input(role))?,
        None => UserRole::Editor,
    };

    let repo = &state.repos.user_repo;
    if repo.username_or_email_exists(&username, &email).await? {
        return Err(AppError::validation("Username or email already exists"));
    }

    let new_user = NewUser {
        username,
        email,
        password_hash: state.hasher.hash(&password)?,
        full_name,
        role: role.as_str().to_string(),
    };

    let user_id = repo.create_user(&new_user).await?;

    state.activity.log(
        Some(principal.id),
        "register",
        format!("New user registered: {}", new_user.username),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success_with(
        "User registered successfully",
        json!({ "user_id": user_id }),
    ))
}

async fn get_profile(req: &HttpRequest, state: &AppState) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let user = state.repos.user_repo.find_by_id(principal.id).await?;

    Ok(success_with(
        "Profile retrieved",
        json!({ "user": UserView::from(&user) }),
    ))
}

async fn update_profile(
    req: &HttpRequest,
    state: &AppState,
    body: &web::Bytes,
) -> Result<HttpResponse, AppError> {
    let principal = require_auth(req)?;
    let input: UpdateProfileRequest =
        serde_json::from_slice(body).map_err(|_| AppError::validation("Invalid input data"))?;

    let repo = &state.repos.user_repo;
    let mut changes = UserChanges::default();

    if let Some(email) = input.email.as_deref() {
        let email = sanitize_input(email);
        if !email.is_empty() {
            if !email.validate_email() {
                return Err(AppError::validation("Invalid email address"));
            }
            if repo.email_exists(&email, principal.id).await? {
                return Err(AppError::validation("Email already exists"));
            }
            changes.email = Some(email);
        }
    }
    if let Some(full_name) = input.full_name.as_deref() {
        let full_name = sanitize_input(full_name);
        if !full_name.is_empty() {
            changes.full_name = Some(full_name);
        }
    }
    if let Some(password) = input.password.as_deref() {
        if !password.is_empty() {
            changes.password_hash = Some(state.hasher.hash(password)?);
        }
    }

    if changes.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    let affected = repo.update_user(principal.id, &changes).await?;
    if affected == 0 {
        return Err(AppError::validation("No changes made"));
    }

    state.activity.log(
        Some(principal.id),
        "profile_update",
        "Profile updated".to_string(),
        get_client_ip(req, state.config.trust_proxy_headers),
    );

    Ok(success("Profile updated successfully"))
}
