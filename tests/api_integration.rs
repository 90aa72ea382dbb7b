//! Rotas HTTP: autenticação, perfis e fluxo básico de aparelhos.
//!
//! Run with: TEST_DATABASE_URL=postgres://... cargo test --test api_integration -- --ignored

mod common;

use assetflow::{models::auth::UserRole, routes::create_router};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::{create_test_pool, seed_model, seed_user, test_state, unique};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn login(app: &Router, login: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        json_request(Method::POST, "/api/auth/login", None, json!({ "login": login, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_protected_routes_require_token() {
    let state = test_state(create_test_pool().await);
    let app = create_router(state);

    let (status, _) = send(&app, Request::builder().uri("/api/devices").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get_request("/api/devices", "not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_wrong_password_is_rejected() {
    let state = test_state(create_test_pool().await);
    let (user, _) = seed_user(&state, UserRole::Reader).await;
    let app = create_router(state);

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/auth/login", None, json!({ "login": user, "password": "errada123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_reader_can_list_but_not_write() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let (user, password) = seed_user(&state, UserRole::Reader).await;
    let app = create_router(state);
    let token = login(&app, &user, &password).await;

    let (status, me) = send(&app, get_request("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["login"], json!(user));

    let (status, _) = send(&app, get_request("/api/devices", &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/devices",
            Some(&token),
            json!({ "serialNumber": unique("SN"), "modelId": model.id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_editor_registers_device_and_reads_state() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let (user, password) = seed_user(&state, UserRole::Editor).await;
    let app = create_router(state);
    let token = login(&app, &user, &password).await;

    let serial = unique("SN");
    let (status, device) = send(
        &app,
        json_request(
            Method::POST,
            "/api/devices",
            Some(&token),
            json!({ "serialNumber": serial, "modelId": model.id, "value": 1999.90 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{device}");
    let id = device["id"].as_i64().unwrap();

    let (status, current) = send(&app, get_request(&format!("/api/devices/{}/state", id), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["status"], json!("Em estoque"));
    assert_eq!(current["holderId"], Value::Null);

    // Número de série repetido
    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/devices", Some(&token), json!({ "serialNumber": serial, "modelId": model.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Aparelho sempre tem a entrada inicial no histórico
    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/devices/{}", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["details"]["references"].as_i64().unwrap() >= 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_backup_is_admin_only() {
    let state = test_state(create_test_pool().await);
    let (editor, editor_password) = seed_user(&state, UserRole::Editor).await;
    let (admin, admin_password) = seed_user(&state, UserRole::Admin).await;
    let app = create_router(state);

    let token = login(&app, &editor, &editor_password).await;
    let (status, _) = send(&app, get_request("/api/backup", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = login(&app, &admin, &admin_password).await;
    let response = app.clone().oneshot(get_request("/api/backup", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let script = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(script.contains("CREATE TABLE movement_history"));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_restore_rejects_broken_script_and_keeps_data() {
    let state = test_state(create_test_pool().await);
    let (editor, editor_password) = seed_user(&state, UserRole::Editor).await;
    let (admin, admin_password) = seed_user(&state, UserRole::Admin).await;
    let app = create_router(state);

    let restore = |token: &str, script: &str| {
        Request::builder()
            .method(Method::POST)
            .uri("/api/backup/restore")
            .header(header::CONTENT_TYPE, "application/sql")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(script.to_string()))
            .unwrap()
    };

    let token = login(&app, &editor, &editor_password).await;
    let (status, _) = send(&app, restore(&token, "SELECT 1;")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = login(&app, &admin, &admin_password).await;
    let (status, _) = send(&app, restore(&token, "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, restore(&token, "SELECT * FROM tabela_inexistente;")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    // As tabelas apagadas voltam com o rollback
    let (status, body) = send(&app, get_request("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (status, _) = send(&app, get_request("/api/devices", &token)).await;
    assert_eq!(status, StatusCode::OK);
}
