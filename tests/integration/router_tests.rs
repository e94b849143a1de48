//! Router tests that stop before the database: session and role checks.
//!
//! The pool connects lazily, so no database server is needed.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use library_server::{
    api::create_router,
    config::AppConfig,
    models::user::{Role, UserClaims},
    repository::Repository,
    services::Services,
    AppState,
};

fn app() -> (Router, AppConfig) {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("valid database url");
    let services = Services::new(Repository::new(pool), &config);
    (create_router(AppState::new(config.clone(), services)), config)
}

fn token(config: &AppConfig, user_id: i32, role: Role) -> String {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: format!("user{}", user_id),
        user_id,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&config.auth.jwt_secret)
    .expect("token")
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_check_needs_no_session() {
    let (app, _) = app();
    let (status, body) = send(app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn add_book_without_session_is_unauthorized() {
    let (app, _) = app();
    let body = json!({ "title": "Dune", "author": "Frank Herbert" });
    let (status, body) = send(app, request(Method::POST, "/add_book", None, Some(body))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
async fn add_book_as_user_is_forbidden() {
    let (app, config) = app();
    let token = token(&config, 2, Role::User);
    let body = json!({ "title": "Dune", "author": "Frank Herbert" });
    let (status, body) =
        send(app, request(Method::POST, "/add_book", Some(&token), Some(body))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied.");
}

#[tokio::test]
async fn admin_dashboard_as_user_is_forbidden() {
    let (app, config) = app();
    let token = token(&config, 2, Role::User);
    let (status, _) = send(app, request(Method::GET, "/admin_dashboard", Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_dashboard_as_admin_is_forbidden() {
    let (app, config) = app();
    let token = token(&config, 1, Role::Admin);
    let (status, _) = send(app, request(Method::GET, "/user_dashboard", Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn outstanding_fines_as_user_is_forbidden() {
    let (app, config) = app();
    let token = token(&config, 2, Role::User);
    let (status, _) = send(app, request(Method::GET, "/fines/outstanding", Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn self_registration_as_admin_is_forbidden() {
    let (app, _) = app();
    let body = json!({ "username": "mallory", "password": "pw", "role": "admin" });
    let (status, _) = send(app, request(Method::POST, "/register", None, Some(body))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn registration_with_unknown_role_is_rejected() {
    let (app, _) = app();
    let body = json!({ "username": "mallory", "password": "pw", "role": "superuser" });
    let response = app
        .oneshot(request(Method::POST, "/register", None, Some(body)))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn user_cannot_issue_to_somebody_else() {
    let (app, config) = app();
    let token = token(&config, 2, Role::User);
    let body = json!({ "book_id": 1, "user_id": 3 });
    let (status, _) = send(app, request(Method::POST, "/issue_book", Some(&token), Some(body))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_cannot_read_other_memberships() {
    let (app, config) = app();
    let token = token(&config, 2, Role::User);
    let (status, _) = send(app, request(Method::GET, "/users/3/memberships", Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn forged_token_is_unauthorized() {
    let (app, _) = app();
    let mut other = AppConfig::default();
    other.auth.jwt_secret = "not-the-server-secret".to_string();
    let token = token(&other, 1, Role::Admin);
    let (status, _) = send(app, request(Method::GET, "/admin_dashboard", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let (app, config) = app();
    let token = token(&config, 5, Role::User);
    let request = Request::builder()
        .uri("/me")
        .header(header::COOKIE, format!("library_session={}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 5);
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let (app, config) = app();
    let token = token(&config, 5, Role::User);
    let request = Request::builder()
        .uri("/logout")
        .header(header::COOKIE, format!("library_session={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("library_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn membership_period_running_backwards_is_rejected() {
    let (app, config) = app();
    let token = token(&config, 1, Role::Admin);
    let body = json!({
        "user_id": 2,
        "membership_type": "annual",
        "start_date": "2024-06-01",
        "end_date": "2024-01-01"
    });
    let (status, body) =
        send(app, request(Method::POST, "/memberships", Some(&token), Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn membership_creation_as_user_is_forbidden() {
    let (app, config) = app();
    let token = token(&config, 2, Role::User);
    let body = json!({
        "user_id": 2,
        "membership_type": "annual",
        "start_date": "2024-01-01",
        "end_date": "2024-12-31"
    });
    let (status, _) =
        send(app, request(Method::POST, "/memberships", Some(&token), Some(body))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn paying_a_fine_as_user_is_forbidden() {
    let (app, config) = app();
    let token = token(&config, 2, Role::User);
    let (status, _) = send(app, request(Method::POST, "/fines/1/pay", Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
