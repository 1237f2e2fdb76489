mod test_utils;

use reqwest::StatusCode;
use serde_json::json;
use test_utils::*;

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn login_rejects_missing_credentials() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/auth?action=login"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Username and password are required");
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn login_does_not_reveal_whether_the_user_exists() {
    let app = TestApp::spawn().await;
    app.insert_user("editor", "editor-pass-123", "editor").await;

    for payload in [
        json!({ "username": "nobody", "password": "whatever" }),
        json!({ "username": "editor", "password": "wrong-pass" }),
    ] {
        let response = app
            .client
            .post(app.url("/api/auth?action=login"))
            .json(&payload)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn login_sets_session_cookie_and_returns_the_user() {
    let app = TestApp::spawn().await;
    app.insert_user("editor", "editor-pass-123", "editor").await;

    let response = app
        .client
        .post(app.url("/api/auth?action=login"))
        .json(&json!({ "username": "editor", "password": "editor-pass-123" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("cms_session="));
    assert!(cookie.is_some());

    let body = body_json(response).await;
    assert_eq!(body["success"], "Login successful");
    assert_eq!(body["data"]["user"]["username"], "editor");
    assert_eq!(body["data"]["user"]["role"], "editor");
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn check_reports_authentication_state() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .get(app.url("/api/auth?action=check"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Not authenticated");

    let response = app
        .client
        .get(app.url("/api/auth?action=check"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], "User authenticated");
    assert_eq!(body["data"]["is_admin"], true);
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn logout_invalidates_the_session() {
    let (app, cookie) = TestApp::spawn_with_editor().await;

    let response = app
        .client
        .post(app.url("/api/auth?action=logout"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], "Logout successful");

    let response = app
        .client
        .get(app.url("/api/auth?action=check"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn register_is_admin_only() {
    let (app, editor_cookie) = TestApp::spawn_with_editor().await;

    let response = app
        .client
        .post(app.url("/api/auth?action=register"))
        .header(reqwest::header::COOKIE, &editor_cookie)
        .json(&json!({
            "username": "newbie",
            "email": "newbie@example.com",
            "password": "newbie-pass-123",
            "full_name": "New User"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Admin access required");
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn admin_registers_a_user_who_can_then_log_in() {
    let (app, admin_cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .post(app.url("/api/auth?action=register"))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({
            "username": "newbie",
            "email": "newbie@example.com",
            "password": "newbie-pass-123",
            "full_name": "New User"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], "User registered successfully");
    assert!(body["data"]["user_id"].is_i64());

    // Defaults to the editor role when none is supplied.
    let cookie = app.login("newbie", "newbie-pass-123").await;
    let response = app
        .client
        .get(app.url("/api/auth?action=check"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["is_admin"], false);
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn register_rejects_incomplete_input_and_duplicates() {
    let (app, admin_cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .post(app.url("/api/auth?action=register"))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({ "username": "half" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "All fields are required");

    let response = app
        .client
        .post(app.url("/api/auth?action=register"))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({
            "username": "admin",
            "email": "other@example.com",
            "password": "some-pass-123",
            "full_name": "Clone"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Username or email already exists"
    );
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn profile_can_be_read_and_updated() {
    let (app, cookie) = TestApp::spawn_with_editor().await;

    let response = app
        .client
        .get(app.url("/api/auth?action=profile"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], "Profile retrieved");
    assert_eq!(body["data"]["user"]["username"], "editor");

    let response = app
        .client
        .put(app.url("/api/auth?action=profile"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({ "full_name": "Renamed Editor" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["success"],
        "Profile updated successfully"
    );

    let response = app
        .client
        .get(app.url("/api/auth?action=profile"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await["data"]["user"]["full_name"],
        "Renamed Editor"
    );
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn profile_update_with_no_fields_is_rejected() {
    let (app, cookie) = TestApp::spawn_with_editor().await;

    let response = app
        .client
        .put(app.url("/api/auth?action=profile"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No fields to update");
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn unknown_actions_and_wrong_methods_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/auth?action=frobnicate"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid action");

    let response = app
        .client
        .get(app.url("/api/auth?action=login"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["error"], "Method not allowed");
}
