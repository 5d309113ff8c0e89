// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the HTTP API: setup, login, credential CRUD with
//! encryption, categories, and the activity timeline. Each test drives
//! the router in-process against an isolated temp database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use lockbox_config::model::VaultConfig;
use lockbox_gateway::{build_router, AppState};
use lockbox_storage::Database;
use serde_json::{json, Value};
use tower::ServiceExt;

const MASTER: &str = "CorrectHorse1";

/// Low-cost crypto parameters keep these tests fast; production floors
/// are enforced by config validation, which these bypass on purpose.
fn test_vault_config() -> VaultConfig {
    VaultConfig {
        hash_memory_cost: 32768,
        hash_iterations: 2,
        hash_parallelism: 1,
        kdf_iterations: 1000,
        kdf_salt: "test-server-salt".to_string(),
    }
}

async fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
    let state = AppState::new(db, &test_vault_config());
    (build_router(state), dir)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    master_password: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(password) = master_password {
        builder = builder.header("x-master-password", password);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn setup_vault(app: &Router) {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/auth/setup",
        None,
        Some(json!({ "master_password": MASTER })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "setup failed: {body}");
}

async fn create_credential(app: &Router, title: &str, secret: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/credentials",
        Some(MASTER),
        Some(json!({ "title": title, "password": secret })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body["id"].as_i64().unwrap()
}

// ---- Scenario A: setup and login ----

#[tokio::test]
async fn setup_then_login_succeeds_and_wrong_password_is_401() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "master_password": MASTER })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 1);
    assert!(body["token"].as_str().unwrap().len() >= 43);

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "master_password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid master password");
}

#[tokio::test]
async fn second_setup_is_rejected() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/auth/setup",
        None,
        Some(json!({ "master_password": "AnotherPass99" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "master password already set");
}

#[tokio::test]
async fn short_setup_password_is_rejected() {
    let (app, _dir) = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/auth/setup",
        None,
        Some(json!({ "master_password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least 8"));
}

#[tokio::test]
async fn check_reports_setup_state() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/v1/auth/check", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["setup_complete"], false);

    setup_vault(&app).await;

    let (_, body) = send(&app, Method::GET, "/v1/auth/check", None, None).await;
    assert_eq!(body["setup_complete"], true);
    assert_eq!(body["biometric_enabled"], false);
}

#[tokio::test]
async fn login_before_setup_is_404() {
    let (app, _dir) = test_app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "master_password": MASTER })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn verify_biometric_requires_the_flag() {
    let (app, _dir) = test_app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/auth/setup",
        None,
        Some(json!({ "master_password": MASTER, "biometric_enabled": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/v1/auth/verify-biometric", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn verify_biometric_rejected_when_disabled() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;

    let (status, _) = send(&app, Method::POST, "/v1/auth/verify-biometric", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---- Scenario B: encrypted credential round trip ----

#[tokio::test]
async fn stored_secret_round_trips_and_wrong_password_fails_generically() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;

    let id = create_credential(&app, "GitHub", "s3cr3t!").await;

    // Metadata never exposes the ciphertext or the secret.
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/v1/credentials/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "GitHub");
    assert!(body.get("encrypted_secret").is_none());
    assert!(!body.to_string().contains("s3cr3t!"));

    // Correct master password reveals the secret.
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/v1/credentials/{id}/decrypt"),
        Some(MASTER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["password"], "s3cr3t!");

    // Wrong password gets the generic message -- indistinguishable from
    // corruption, and no plaintext.
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/v1/credentials/{id}/decrypt"),
        Some("wrong"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid master password");
}

#[tokio::test]
async fn mutations_without_password_header_are_401() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/credentials",
        None,
        Some(json!({ "title": "X", "password": "y" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let id = create_credential(&app, "GitHub", "s3cr3t!").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/credentials/{id}"),
        None,
        Some(json!({ "title": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/v1/credentials/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The record survived all three attempts.
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/v1/credentials/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_reencrypts_the_secret() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;
    let id = create_credential(&app, "GitHub", "old-secret").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/credentials/{id}"),
        Some(MASTER),
        Some(json!({ "password": "new-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        Method::POST,
        &format!("/v1/credentials/{id}/decrypt"),
        Some(MASTER),
        None,
    )
    .await;
    assert_eq!(body["password"], "new-secret");
}

#[tokio::test]
async fn list_supports_search_and_is_newest_first() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;
    create_credential(&app, "GitHub", "a").await;
    create_credential(&app, "Bank of Test", "b").await;

    let (status, body) = send(&app, Method::GET, "/v1/credentials", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Bank of Test", "GitHub"]);

    let (_, body) = send(&app, Method::GET, "/v1/credentials?search=git", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "GitHub");
}

#[tokio::test]
async fn reads_before_setup_are_404() {
    let (app, _dir) = test_app().await;
    let (status, _) = send(&app, Method::GET, "/v1/credentials", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/v1/history", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---- Scenario C: deletion and the activity timeline ----

#[tokio::test]
async fn delete_cascades_activity_and_records_the_event() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;
    let id = create_credential(&app, "Doomed", "secret").await;

    // Generate a dependent activity entry via decrypt.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/v1/credentials/{id}/decrypt"),
        Some(MASTER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/v1/credentials/{id}"),
        Some(MASTER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "delete failed: {body}");

    // The timeline still reads cleanly: entries referencing the deleted
    // record are gone, the deletion event remains with a null reference.
    let (status, body) = send(&app, Method::GET, "/v1/history", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "deleted");
    assert!(entries[0]["credential_id"].is_null());

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/v1/credentials/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn timeline_records_create_copy_update_in_order() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;
    let id = create_credential(&app, "GitHub", "s3cr3t!").await;

    send(
        &app,
        Method::POST,
        &format!("/v1/credentials/{id}/decrypt"),
        Some(MASTER),
        None,
    )
    .await;
    send(
        &app,
        Method::PUT,
        &format!("/v1/credentials/{id}"),
        Some(MASTER),
        Some(json!({ "notes": "rotated" })),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/v1/history", None, None).await;
    let actions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["updated", "copied", "created"]);
}

#[tokio::test]
async fn history_limit_caps_entries() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;
    for i in 0..4 {
        create_credential(&app, &format!("Entry {i}"), "x").await;
    }

    let (_, body) = send(&app, Method::GET, "/v1/history?limit=2", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

// ---- Categories ----

#[tokio::test]
async fn setup_seeds_default_categories() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;

    let (status, body) = send(&app, Method::GET, "/v1/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Banking", "Personal", "Social", "Work"]);
}

#[tokio::test]
async fn default_categories_are_protected() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;

    let (_, body) = send(&app, Method::GET, "/v1/categories", None, None).await;
    let default_id = body[0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/categories/{default_id}"),
        None,
        Some(json!({ "name": "Hacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("rename"));

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/v1/categories/{default_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Recoloring a default is fine.
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/categories/{default_id}"),
        None,
        Some(json!({ "color": "#101010" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn custom_category_lifecycle() {
    let (app, _dir) = test_app().await;
    setup_vault(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/categories",
        None,
        Some(json!({ "name": "Archive", "color": "#CCCCCC" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["is_default"], false);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/categories/{id}"),
        None,
        Some(json!({ "name": "Old stuff" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Old stuff");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/v1/categories/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// ---- Meta ----

#[tokio::test]
async fn health_is_unauthenticated() {
    let (app, _dir) = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
