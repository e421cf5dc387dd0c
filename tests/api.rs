#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tea_ledger::{
    api::{AppState, app_router},
    config::{
        auth::{AdminCredentials, AuthSettings},
        database,
        server::ServerConfig,
    },
    core::auth::{AuthManager, hash_password},
};
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@factory.test";
const ADMIN_PASSWORD: &str = "factory-admin";

async fn build_test_router() -> Router {
    let db = database::create_connection("sqlite::memory:").await.unwrap();
    database::create_tables(&db).await.unwrap();

    let settings = AuthSettings {
        jwt_secret: b"integration-test-secret".to_vec(),
        token_ttl: Duration::from_secs(3600),
        admin: Some(AdminCredentials {
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
        }),
    };
    let state = Arc::new(AppState {
        database: db,
        auth: AuthManager::new(&settings),
    });
    app_router(state, &ServerConfig::default())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, email: &str) -> (String, i64) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/user/register",
        None,
        Some(json!({ "name": "Worker", "email": email, "password": "plucking-season" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn health_and_root_respond() {
    let app = build_test_router().await;
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_login_and_profile() {
    let app = build_test_router().await;
    let (token, user_id) = register(&app, "Worker@Estate.test").await;

    let (status, profile) = send(&app, Method::GET, "/api/user/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["id"], user_id);
    assert_eq!(profile["email"], "worker@estate.test");
    assert!(profile.get("passwordHash").is_none());

    let (status, login) = send(
        &app,
        Method::POST,
        "/api/user/login",
        None,
        Some(json!({ "email": "worker@estate.test", "password": "plucking-season" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["tokenType"], "Bearer");

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/user/login",
        None,
        Some(json!({ "email": "worker@estate.test", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["code"], 401);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = build_test_router().await;

    let (status, body) = send(&app, Method::GET, "/api/user/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);

    let (status, _) = send(&app, Method::GET, "/api/tickets/mine", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the bare `token` header is accepted too
    let (token, _) = register(&app, "bare@estate.test").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/user/profile")
                .header("token", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn users_cannot_touch_each_other() {
    let app = build_test_router().await;
    let (alice, _) = register(&app, "alice@estate.test").await;
    let (_, bob_id) = register(&app, "bob@estate.test").await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/user/{bob_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn budget_status_reflects_expenses() {
    let app = build_test_router().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/budgets",
        None,
        Some(json!({ "category": "Transport", "amount": 1000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    for amount in [400, 700] {
        let (status, created) = send(
            &app,
            Method::POST,
            "/api/expenses",
            None,
            Some(json!({ "category": "Transport", "amount": amount, "date": "2026-03-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "Pending");
    }

    let (status, statuses) = send(&app, Method::GET, "/api/budgets/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let transport = &statuses[0];
    assert_eq!(transport["category"], "Transport");
    assert_eq!(transport["spent"].as_f64(), Some(1100.0));
    assert_eq!(transport["remaining"].as_f64(), Some(-100.0));
    assert_eq!(transport["percentUsed"].as_f64(), Some(110.0));
    assert_eq!(transport["exceeded"], true);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/budgets",
        None,
        Some(json!({ "category": "Transport", "amount": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_payloads_are_bad_requests() {
    let app = build_test_router().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/incomes",
        None,
        Some(json!({ "category": "Tea Sales", "amount": -5, "date": "2026-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/incomes",
        None,
        Some(json!({ "category": "   ", "amount": 5, "date": "2026-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/incomes/42", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_path_and_query_are_json_bad_requests() {
    let app = build_test_router().await;

    let (status, body) = send(&app, Method::GET, "/api/incomes/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/incomes?from=notadate", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, body) = send(&app, Method::GET, "/api/reports/overview?year=soon", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn huge_amounts_are_rejected_and_status_stays_up() {
    let app = build_test_router().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/budgets",
        None,
        Some(json!({ "category": "Fuel", "amount": 0.0001 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/expenses",
        None,
        Some(json!({ "category": "Fuel", "amount": 1e25, "date": "2026-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/expenses",
        None,
        Some(json!({ "category": "Fuel", "amount": 1000000, "date": "2026-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, statuses) = send(&app, Method::GET, "/api/budgets/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(statuses[0]["exceeded"], true);

    let (status, _) = send(&app, Method::GET, "/api/budgets/summary", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn tickets_flow_through_admin_reply() {
    let app = build_test_router().await;
    let (user_token, _) = register(&app, "buyer@estate.test").await;

    let (status, ticket) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&user_token),
        Some(json!({
            "productCategory": "Black Tea",
            "product": "BOPF",
            "subject": "Bulk order",
            "inquiry": "Can you ship 200kg?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let ticket_id = ticket["id"].as_i64().unwrap();

    // a fresh ticket cannot be edited yet
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/tickets/{ticket_id}"),
        Some(&user_token),
        Some(json!({ "subject": "Bigger order" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/api/tickets", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, admin) = send(
        &app,
        Method::POST,
        "/api/user/admin",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let admin_token = admin["token"].as_str().unwrap().to_string();

    let (status, replied) = send(
        &app,
        Method::POST,
        &format!("/api/tickets/{ticket_id}/replies"),
        Some(&admin_token),
        Some(json!({ "message": "Yes, next month" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(replied["replies"][0]["message"], "Yes, next month");

    let (status, all) = send(&app, Method::GET, "/api/tickets", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all[0]["owner"]["email"], "buyer@estate.test");

    let (status, mine) = send(&app, Method::GET, "/api/tickets/mine", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["replies"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn expense_export_is_csv() {
    let app = build_test_router().await;
    send(
        &app,
        Method::POST,
        "/api/expenses",
        None,
        Some(json!({ "category": "Fuel", "amount": 12.5, "date": "2026-02-01", "description": "Generator" })),
    )
    .await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/expenses/export.csv?category=Fuel")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(
        text,
        "id,category,amount,date,description,status\n1,Fuel,12.5,2026-02-01,Generator,Pending\n"
    );
}
