//! End-to-end API flow against an in-memory database.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use takeout_admin::auth::{JwtConfig, JwtService};
use takeout_admin::core::{Config, ServerState, build_app};
use takeout_admin::db::repository::employee;

async fn test_app() -> Router {
    // Single connection: each sqlite::memory: connection is its own database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    employee::ensure_admin(&pool).await.unwrap();

    let jwt = JwtConfig {
        secret: "integration-test-secret-32-bytes!!".to_string(),
        expiration_minutes: 60,
        issuer: "takeout-admin".to_string(),
    };
    let mut config = Config::from_env();
    config.jwt = jwt.clone();

    let state = ServerState {
        config,
        pool,
        jwt_service: Arc::new(JwtService::new(jwt)),
    };
    build_app(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "123456"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "wrong"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_requests_require_token() {
    let app = test_app().await;
    let (status, _) = send(&app, request("GET", "/api/categories/list", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request("GET", "/api/categories/list", Some("garbage"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_category_dish_lifecycle() {
    let app = test_app().await;
    let token = login(&app).await;
    let t = Some(token.as_str());

    // Create a category — starts disabled
    let (status, category) = send(
        &app,
        request(
            "POST",
            "/api/categories",
            t,
            Some(json!({"name": "Sichuan", "category_type": 1, "sort_order": 1})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category["is_enabled"], json!(false));
    let category_id = category["id"].as_i64().unwrap();

    // Enable it
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/categories/{category_id}/status/true"),
            t,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Create a dish with flavors in that category
    let (status, dish) = send(
        &app,
        request(
            "POST",
            "/api/dishes",
            t,
            Some(json!({
                "name": "Mapo tofu",
                "category_id": category_id,
                "price": 1850,
                "flavors": [{"name": "spice", "value": ["mild", "hot"]}]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let dish_id = dish["id"].as_i64().unwrap();
    assert_eq!(dish["flavors"].as_array().unwrap().len(), 1);

    // Category now has a dish: deletion refused, row intact
    let (status, body) = send(
        &app,
        request("DELETE", &format!("/api/categories/{category_id}"), t, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], json!("E0005"));

    // Dish page view carries the category name
    let (status, page) = send(
        &app,
        request("GET", "/api/dishes/page?name=tofu", t, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], json!(1));
    assert_eq!(page["records"][0]["category_name"], json!("Sichuan"));

    // On-sale dish blocks batch deletion
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/dishes/{dish_id}/status/true"),
            t,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        request("DELETE", "/api/dishes", t, Some(json!({"ids": [dish_id]}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Take it off sale, delete the batch, then the category
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/dishes/{dish_id}/status/false"),
            t,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        request("DELETE", "/api/dishes", t, Some(json!({"ids": [dish_id]}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        request("GET", &format!("/api/dishes/{dish_id}"), t, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request("DELETE", &format!("/api/categories/{category_id}"), t, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_employee_management() {
    let app = test_app().await;
    let token = login(&app).await;
    let t = Some(token.as_str());

    let (status, emp) = send(
        &app,
        request(
            "POST",
            "/api/employees",
            t,
            Some(json!({"username": "alice", "name": "Alice", "password": "s3cret"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Password hash never leaves the server
    assert!(emp.get("password").is_none());
    let id = emp["id"].as_i64().unwrap();

    // Duplicate username refused
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/employees",
            t,
            Some(json!({"username": "alice", "name": "Other"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // New account can log in, then gets disabled and cannot
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "alice", "password": "s3cret"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request("POST", &format!("/api/employees/{id}/status/false"), t, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "alice", "password": "s3cret"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
