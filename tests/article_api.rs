//! Integration tests for the HTTP surface.
//!
//! Each test builds the router over its own in-memory SQLite database and
//! dispatches requests with `tower::ServiceExt::oneshot`, so no port is bound.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use scribe::api::{router, AppState};
use scribe::storage::Database;

async fn test_app() -> Router {
    let db = Database::open(":memory:").await.unwrap();
    router(AppState::new(db))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, title: &str, tags: &[&str]) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/articles",
        Some(json!({
            "title": title,
            "content": "This is the body text.",
            "tags": tags,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_article_scenario() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/articles",
        Some(json!({
            "title": "Hello World Post",
            "content": "This is the body text.",
            "tags": ["intro", "demo"],
            "author": "Alice"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["tags"], "intro, demo");
    assert_eq!(body["data"]["author"], "Alice");
    assert_eq!(body["data"]["title"], "Hello World Post");
    assert!(body["data"]["id"].as_i64().unwrap() > 0);
    assert!(body["data"]["created_at"].is_string());
}

#[tokio::test]
async fn test_create_assigns_new_ids() {
    let app = test_app().await;
    let first = create(&app, "First article", &[]).await;
    let second = create(&app, "Second article", &[]).await;

    assert_ne!(first["id"], second["id"]);
    assert_eq!(first["author"], "Anonymous");
    assert_eq!(first["tags"], Value::Null);
}

#[tokio::test]
async fn test_create_rejects_short_title() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/articles",
        Some(json!({"title": "  abc  ", "content": "This is the body text."})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "validation_error");
    assert_eq!(body["details"][0]["field"], "title");
}

#[tokio::test]
async fn test_create_rejects_long_title_and_short_content() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/articles",
        Some(json!({"title": "x".repeat(101), "content": "too short"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["title", "content"]);
}

#[tokio::test]
async fn test_create_malformed_json() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/articles")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "bad_request");
}

// ============================================================================
// Get
// ============================================================================

#[tokio::test]
async fn test_get_article() {
    let app = test_app().await;
    let created = create(&app, "Readable article", &["rust"]).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/articles/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_get_missing_article() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/articles/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"success": false, "error": "Article 12345 not found", "code": "not_found"})
    );
}

#[tokio::test]
async fn test_get_non_numeric_id() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/articles/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_empty_payload() {
    let app = test_app().await;
    let created = create(&app, "Stable article", &[]).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::PUT, &format!("/articles/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "empty_update");
}

#[tokio::test]
async fn test_update_author_only_leaves_other_fields() {
    let app = test_app().await;
    let created = create(&app, "Stable article", &["keep", "these"]).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/articles/{id}"),
        Some(json!({"author": "Dana"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated = &body["data"];
    assert_eq!(updated["author"], "Dana");
    assert_eq!(updated["title"], created["title"]);
    assert_eq!(updated["content"], created["content"]);
    assert_eq!(updated["tags"], created["tags"]);
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn test_update_explicit_null_tags_clears() {
    let app = test_app().await;
    let created = create(&app, "Tagged article", &["a"]).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/articles/{id}"),
        Some(json!({"tags": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tags"], Value::Null);
    assert_eq!(body["data"]["title"], "Tagged article");
}

#[tokio::test]
async fn test_update_validates_supplied_fields() {
    let app = test_app().await;
    let created = create(&app, "Valid article", &[]).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/articles/{id}"),
        Some(json!({"content": "   short   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "content");
}

#[tokio::test]
async fn test_update_missing_article() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        Method::PUT,
        "/articles/77",
        Some(json!({"title": "Valid title"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_article_checked_before_payload() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::PUT, "/articles/999", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/articles/999",
        Some(json!({"title": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Article 999 not found");
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let app = test_app().await;
    let created = create(&app, "Short-lived article", &[]).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/articles/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["message"],
        format!("Article {id} deleted successfully")
    );

    let (status, _) = send(&app, Method::GET, &format!("/articles/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_article() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::DELETE, "/articles/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

// ============================================================================
// List
// ============================================================================

#[tokio::test]
async fn test_list_second_page() {
    let app = test_app().await;
    for i in 0..12 {
        create(&app, &format!("Matching article {i}"), &["news"]).await;
    }

    let (status, body) = send(&app, Method::GET, "/articles?page=2&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["items"][0]["title"], "Matching article 5");
    assert_eq!(
        body["data"]["meta"],
        json!({"page": 2, "limit": 5, "total": 12, "total_pages": 3})
    );
}

#[tokio::test]
async fn test_list_page_past_last() {
    let app = test_app().await;
    for i in 0..12 {
        create(&app, &format!("Matching article {i}"), &[]).await;
    }

    let (status, body) = send(&app, Method::GET, "/articles?page=4&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["meta"]["total"], 12);
    assert_eq!(body["data"]["meta"]["total_pages"], 3);
}

#[tokio::test]
async fn test_list_defaults() {
    let app = test_app().await;
    create(&app, "Lonely article", &[]).await;

    let (status, body) = send(&app, Method::GET, "/articles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["meta"],
        json!({"page": 1, "limit": 10, "total": 1, "total_pages": 1})
    );
}

#[tokio::test]
async fn test_list_tag_filter_case_insensitive() {
    let app = test_app().await;
    create(&app, "Python article", &["Python", "FastAPI"]).await;
    create(&app, "Rust article", &["Rust"]).await;

    let (status, body) = send(&app, Method::GET, "/articles?tag=python", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["tags"], "Python, FastAPI");
    assert_eq!(body["data"]["meta"]["total"], 1);
}

#[tokio::test]
async fn test_list_rejects_out_of_range_limit() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/articles?limit=101", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "limit");

    let (status, body) = send(&app, Method::GET, "/articles?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "page");
}

#[tokio::test]
async fn test_list_rejects_non_numeric_page() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/articles?page=two", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_versioned_prefix_shares_store() {
    let app = test_app().await;
    let created = create(&app, "Versioned article", &[]).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/articles/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Versioned article");
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Resource not found");
}

#[tokio::test]
async fn test_unsupported_method_uses_envelope() {
    let app = test_app().await;
    let created = create(&app, "Method check article", &[]).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::PATCH, &format!("/articles/{id}"), None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "method_not_allowed");

    let (status, body) = send(&app, Method::DELETE, "/api/v1/articles", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["code"], "method_not_allowed");
}
