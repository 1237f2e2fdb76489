mod test_utils;

use reqwest::StatusCode;
use serde_json::json;
use test_utils::*;

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn contact_submit_validates_input() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/contact?action=submit"))
        .json(&json!({ "name": "Ada" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Name, email, and message are required"
    );

    let response = app
        .client
        .post(app.url("/api/contact?action=submit"))
        .json(&json!({ "name": "Ada", "email": "not-an-email", "message": "Hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid email address");
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn contact_submission_is_public_and_reading_marks_it_read() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .post(app.url("/api/contact?action=submit"))
        .json(&json!({
            "name": "Ada Obi",
            "email": "ada@example.com",
            "subject": "Admission enquiry",
            "message": "When does registration open?"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["success"],
        "Message sent successfully. We will get back to you soon!"
    );
    let message_id = body["data"]["message_id"].as_i64().unwrap();

    // Listing is for staff only.
    let response = app
        .client
        .get(app.url("/api/contact?action=list"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The first open still reports the message as it was found.
    let response = app
        .client
        .get(app.url(&format!("/api/contact?action=get&id={}", message_id)))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["message"]["status"], "new");

    // Opening it moved it to read, which the next fetch observes.
    let response = app
        .client
        .get(app.url(&format!("/api/contact?action=get&id={}", message_id)))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["message"]["status"], "read");

    let response = app
        .client
        .get(app.url("/api/contact?action=stats"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], "Statistics retrieved");
    assert_eq!(body["data"]["stats"]["total"], 1);
    assert_eq!(body["data"]["stats"]["read"], 1);
    assert_eq!(body["data"]["stats"]["new"], 0);
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn contact_status_updates_are_validated() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .post(app.url("/api/contact?action=submit"))
        .json(&json!({
            "name": "Ben Eze",
            "email": "ben@example.com",
            "message": "Hello"
        }))
        .send()
        .await
        .unwrap();
    let message_id = body_json(response).await["data"]["message_id"].as_i64().unwrap();

    let response = app
        .client
        .put(app.url("/api/contact?action=update_status"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({ "id": message_id, "status": "spam" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid status");

    let response = app
        .client
        .put(app.url("/api/contact?action=update_status"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({ "id": message_id, "status": "replied" }))
        .send()
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await["success"],
        "Message status updated successfully"
    );
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn settings_read_is_public_and_write_needs_a_session() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .put(app.url("/api/settings?action=update_by_key"))
        .json(&json!({ "key": "site_name", "value": "Hillcrest Academy" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .client
        .put(app.url("/api/settings?action=update_by_key"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({ "key": "site_name", "value": "Hillcrest Academy" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["success"],
        "Setting updated successfully"
    );

    let response = app
        .client
        .get(app.url("/api/settings?action=get_by_key&key=site_name"))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["setting"]["setting_value"], "Hillcrest Academy");

    let response = app
        .client
        .get(app.url("/api/settings?action=get"))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(
        body["data"]["settings"]["site_name"]["value"],
        "Hillcrest Academy"
    );
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn bulk_settings_update_reports_the_applied_count() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .put(app.url("/api/settings?action=update"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({
            "settings": {
                "site_name": "Hillcrest Academy",
                "contact_email": "info@hillcrest.example",
                "items_per_page": 12
            }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], "All settings updated successfully");
    assert_eq!(body["data"]["updated"], 3);
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn missing_setting_key_is_a_404() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/settings?action=get_by_key&key=nope"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Setting not found");
}
