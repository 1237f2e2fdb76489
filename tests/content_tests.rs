mod test_utils;

use reqwest::StatusCode;
use serde_json::json;
use test_utils::*;

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn page_create_requires_a_session() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/pages?action=create"))
        .json(&json!({ "title": "About", "slug": "about" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Not authenticated");
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn page_lifecycle_create_get_update_publish_delete() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .post(app.url("/api/pages?action=create"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({
            "title": "About Us",
            "slug": "about-us",
            "content": "<p>Welcome to our school.</p>",
            "meta_description": "About the school"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], "Page created successfully");
    let page_id = body["data"]["page_id"].as_i64().unwrap();

    // Lookup works by slug as well as by id; new pages start as drafts.
    let response = app
        .client
        .get(app.url("/api/pages?action=get&slug=about-us"))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["page"]["id"].as_i64().unwrap(), page_id);
    assert_eq!(body["data"]["page"]["status"], "draft");
    assert_eq!(body["data"]["page"]["template"], "default");

    let response = app
        .client
        .put(app.url("/api/pages?action=update"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({ "id": page_id, "title": "About Our School" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], "Page updated successfully");
    assert!(
        !body.as_object().unwrap().contains_key("data"),
        "payload-less success should omit the data key"
    );

    let response = app
        .client
        .post(app.url("/api/pages?action=publish"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({ "id": page_id, "status": "published" }))
        .send()
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await["success"],
        "Page status updated successfully"
    );

    let response = app
        .client
        .get(app.url(&format!("/api/pages?action=get&id={}", page_id)))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["page"]["title"], "About Our School");
    assert_eq!(body["data"]["page"]["status"], "published");

    let response = app
        .client
        .delete(app.url(&format!("/api/pages?action=delete&id={}", page_id)))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await["success"],
        "Page deleted successfully"
    );

    let response = app
        .client
        .get(app.url(&format!("/api/pages?action=get&id={}", page_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Page not found");
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn page_slugs_are_unique() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    for _ in 0..2 {
        let response = app
            .client
            .post(app.url("/api/pages?action=create"))
            .header(reqwest::header::COOKIE, &cookie)
            .json(&json!({ "title": "Admissions", "slug": "admissions" }))
            .send()
            .await
            .unwrap();

        if response.status() == StatusCode::BAD_REQUEST {
            assert_eq!(body_json(response).await["error"], "Slug already exists");
            return;
        }
    }

    panic!("Duplicate slug was accepted");
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn page_delete_is_admin_only() {
    let (app, admin_cookie) = TestApp::spawn_with_admin().await;
    app.insert_user("editor", "editor-pass-123", "editor").await;
    let editor_cookie = app.login("editor", "editor-pass-123").await;

    let response = app
        .client
        .post(app.url("/api/pages?action=create"))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({ "title": "History", "slug": "history" }))
        .send()
        .await
        .unwrap();
    let page_id = body_json(response).await["data"]["page_id"].as_i64().unwrap();

    let response = app
        .client
        .delete(app.url(&format!("/api/pages?action=delete&id={}", page_id)))
        .header(reqwest::header::COOKIE, &editor_cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Admin access required");
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn news_created_as_published_gets_a_publication_timestamp() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .post(app.url("/api/news?action=create"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({
            "title": "Term Dates Announced",
            "slug": "term-dates",
            "status": "published",
            "is_featured": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let news_id = body_json(response).await["data"]["news_id"].as_i64().unwrap();

    let response = app
        .client
        .get(app.url(&format!("/api/news?action=get&id={}", news_id)))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["news"]["status"], "published");
    assert!(!body["data"]["news"]["published_at"].is_null());

    // Featured and recent feeds only carry published items.
    let response = app
        .client
        .get(app.url("/api/news?action=featured"))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], "Featured news retrieved");
    assert_eq!(body["data"]["news"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn draft_news_stays_out_of_public_feeds() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    app.client
        .post(app.url("/api/news?action=create"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({ "title": "Draft Item", "slug": "draft-item", "is_featured": true }))
        .send()
        .await
        .unwrap();

    for action in ["featured", "recent"] {
        let response = app
            .client
            .get(app.url(&format!("/api/news?action={}", action)))
            .send()
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["news"].as_array().unwrap().len(), 0);
    }
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn programs_require_a_valid_level() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .post(app.url("/api/programs?action=create"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({ "title": "Carpentry", "slug": "carpentry", "level": "apprentice" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid level");

    let response = app
        .client
        .post(app.url("/api/programs?action=create"))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({
            "title": "Carpentry",
            "slug": "carpentry",
            "level": "certificate",
            "fees": "1250.50"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .client
        .get(app.url("/api/programs?action=by_level&level=certificate"))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], "Programs retrieved");
    assert_eq!(body["data"]["programs"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn staff_department_listing_honours_active_only() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    for (name, active) in [("Ada Obi", true), ("Ben Eze", false)] {
        let response = app
            .client
            .post(app.url("/api/staff?action=create"))
            .header(reqwest::header::COOKIE, &cookie)
            .json(&json!({
                "full_name": name,
                "position": "Teacher",
                "department": "Science",
                "is_active": active
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .client
        .get(app.url("/api/staff?action=by_department&department=Science"))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["staff"].as_array().unwrap().len(), 1);

    let response = app
        .client
        .get(app.url(
            "/api/staff?action=by_department&department=Science&active_only=false",
        ))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["staff"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn listing_reports_pagination_totals() {
    let (app, cookie) = TestApp::spawn_with_admin().await;

    for i in 0..3 {
        app.client
            .post(app.url("/api/pages?action=create"))
            .header(reqwest::header::COOKIE, &cookie)
            .json(&json!({ "title": format!("Page {}", i), "slug": format!("page-{}", i) }))
            .send()
            .await
            .unwrap();
    }

    let response = app
        .client
        .get(app.url("/api/pages?action=list&page=1&limit=2"))
        .send()
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["pages"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["pagination"]["total_items"], 3);
    assert_eq!(body["data"]["pagination"]["total_pages"], 2);
}
