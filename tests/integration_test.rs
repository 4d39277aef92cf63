//! Integration tests for `labeled_todos`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use labeled_todos::api::{self, AppState};
use labeled_todos::config::LabelerConfig;
use labeled_todos::labels::LabelClient;
use labeled_todos::tasks::{SqliteTaskStore, TaskService, TaskStore};
use labeled_todos::testing::MockCompletionProvider;
use labeled_todos::VERSION;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    store: SqliteTaskStore,
    router: Router,
}

fn create_app(mock: Option<&Arc<MockCompletionProvider>>) -> TestApp {
    let dir = TempDir::new().unwrap();
    let store = SqliteTaskStore::new(dir.path().join("tasks.db")).unwrap();
    let labels = mock.map_or_else(LabelClient::disabled, |mock| {
        LabelClient::new(mock.clone(), &LabelerConfig::default())
    });
    let router = api::router(AppState::new(TaskService::new(store.clone(), labels)));
    TestApp { _dir: dir, store, router }
}

async fn send(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value =
        if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

#[test]
fn test_version_exists() {
    assert!(!VERSION.is_empty());
}

#[tokio::test]
async fn test_root_status_message() {
    let app = create_app(None);
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Todo App Backend is running!");
}

#[tokio::test]
async fn test_create_returns_labelled_task() {
    let mock = Arc::new(MockCompletionProvider::new());
    mock.expect_reply("Work, URGENT, ");
    let app = create_app(Some(&mock));

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "Fix critical bug", "description": "Login fails for users"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["title"], "Fix critical bug");
    assert_eq!(body["description"], "Login fails for users");
    assert_eq!(body["completed"], false);
    assert_eq!(body["labels"], "work, urgent");
    mock.verify();
}

#[tokio::test]
async fn test_unconfigured_service_makes_no_labels() {
    let app = create_app(None);

    let (status, body) =
        send(&app, "POST", "/api/tasks", Some(json!({"title": "Groceries"}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["labels"], Value::Null);
    assert_eq!(body["description"], Value::Null);
}

#[tokio::test]
async fn test_create_rejects_blank_title() {
    let app = create_app(None);

    let (status, body) = send(&app, "POST", "/api/tasks", Some(json!({"title": "   "}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(app.store.count_tasks().unwrap(), 0);
}

#[tokio::test]
async fn test_list_and_get() {
    let app = create_app(None);
    let groceries = json!({"title": "Groceries", "description": "Bananas, Bread"});
    send(&app, "POST", "/api/tasks", Some(groceries)).await;
    send(&app, "POST", "/api/tasks", Some(json!({"title": "Laundry", "completed": true}))).await;

    let (status, body) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1]["completed"], true);

    let id = tasks[0]["id"].as_i64().unwrap();
    let (status, first) = send(&app, "GET", &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, tasks[0]);

    let (_, again) = send(&app, "GET", &format!("/api/tasks/{id}"), None).await;
    assert_eq!(first, again);
}

#[tokio::test]
async fn test_update_toggle_completed_keeps_labels() {
    let mock = Arc::new(MockCompletionProvider::new());
    mock.expect_reply("work");
    let app = create_app(Some(&mock));
    let (_, created) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "Write report", "description": "Q3"})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(json!({"title": "Write report", "description": "Q3", "completed": true})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], true);
    assert_eq!(body["labels"], "work");
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_update_text_change_failed_suggestion() {
    let mock = Arc::new(MockCompletionProvider::new());
    mock.expect_reply("work");
    let app = create_app(Some(&mock));
    let (_, created) =
        send(&app, "POST", "/api/tasks", Some(json!({"title": "Write report"}))).await;
    let id = created["id"].as_i64().unwrap();

    mock.expect_error("provider down");
    let (status, kept) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(json!({"title": "Write summary"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kept["labels"], "work");

    mock.expect_error("provider down");
    let (status, cleared) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(json!({"title": "Write the summary", "labels": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["labels"], Value::Null);
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_update_manual_override() {
    let mock = Arc::new(MockCompletionProvider::new());
    mock.expect_reply("work");
    let app = create_app(Some(&mock));
    let (_, created) =
        send(&app, "POST", "/api/tasks", Some(json!({"title": "Write report"}))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(json!({"title": "Write report", "labels": "personal, urgent"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"], "personal, urgent");
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_update_text_change_failed_suggestion_uses_caller_labels() {
    let mock = Arc::new(MockCompletionProvider::new());
    mock.expect_reply("work");
    let app = create_app(Some(&mock));
    let (_, created) =
        send(&app, "POST", "/api/tasks", Some(json!({"title": "Write report"}))).await;
    let id = created["id"].as_i64().unwrap();

    mock.expect_error("provider down");
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(json!({"title": "Write summary", "labels": "Personal"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"], "personal");
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_update_unknown_task_is_404() {
    let app = create_app(None);

    let (status, body) =
        send(&app, "PUT", "/api/tasks/41", Some(json!({"title": "Nothing here"}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete() {
    let app = create_app(None);
    let (_, created) = send(&app, "POST", "/api/tasks", Some(json!({"title": "Temporary"}))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_task_leaves_rows() {
    let app = create_app(None);
    send(&app, "POST", "/api/tasks", Some(json!({"title": "Keep"}))).await;

    let (status, _) = send(&app, "DELETE", "/api/tasks/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.count_tasks().unwrap(), 1);
}

#[tokio::test]
async fn test_cors_layer_allows_configured_origin() {
    let app = create_app(None);
    let router = app
        .router
        .clone()
        .layer(api::cors_layer(&["http://localhost:5173".to_string(), "bad\norigin".to_string()]));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/tasks")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
}
