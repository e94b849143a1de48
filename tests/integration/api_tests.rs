//! End-to-end API tests against a running server backed by a fresh database.
//!
//! Start the server with a bootstrap admin `admin`/`admin`:
//! `LIBRARY_AUTH__BOOTSTRAP_ADMIN__USERNAME=admin LIBRARY_AUTH__BOOTSTRAP_ADMIN__PASSWORD=admin cargo run`

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn login(client: &Client, username: &str, password: &str) -> Value {
    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse login response")
}

async fn token(client: &Client, username: &str, password: &str) -> String {
    login(client, username, password).await["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

async fn register(client: &Client, username: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({ "username": username, "password": password, "role": "user" }))
        .send()
        .await
        .expect("Failed to send request")
}

async fn add_book(client: &Client, admin_token: &str, title: &str) -> i64 {
    let response = client
        .post(format!("{}/add_book", BASE_URL))
        .bearer_auth(admin_token)
        .json(&json!({ "title": title, "author": "Test Author" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["book"]["available"], true);
    body["book"]["id"].as_i64().expect("No book ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_ready() {
    let response = Client::new()
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_register_twice_conflicts() {
    let client = Client::new();
    let username = unique("dup");

    let first = register(&client, &username, "pw1").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = register(&client, &username, "pw1").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_login_role_and_wrong_password() {
    let client = Client::new();
    let username = unique("alice");
    register(&client, &username, "pw1").await;

    let body = login(&client, &username, "pw1").await;
    assert_eq!(body["role"], "user");
    assert_eq!(body["redirect"], "/user_dashboard");

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "username": username, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_cookie_session_reaches_user_dashboard() {
    let client = Client::builder().cookie_store(true).build().unwrap();
    let username = unique("cookie");
    register(&client, &username, "pw1").await;
    login(&client, &username, "pw1").await;

    let response = client
        .get(format!("{}/user_dashboard", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    client
        .get(format!("{}/logout", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .get(format!("{}/user_dashboard", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_issue_and_return_on_time() {
    let client = Client::new();
    let admin = token(&client, "admin", "admin").await;

    let username = unique("reader");
    let registered: Value = register(&client, &username, "pw1").await.json().await.unwrap();
    let user_id = registered["user"]["id"].as_i64().unwrap();
    let reader = token(&client, &username, "pw1").await;

    let book_id = add_book(&client, &admin, &unique("book")).await;

    // Admin issues the book to the reader
    let response = client
        .post(format!("{}/issue_book", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "book_id": book_id, "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let issue_date = chrono::NaiveDate::parse_from_str(body["issue"]["issue_date"].as_str().unwrap(), "%Y-%m-%d").unwrap();
    let due_date = chrono::NaiveDate::parse_from_str(body["issue"]["due_date"].as_str().unwrap(), "%Y-%m-%d").unwrap();
    assert_eq!((due_date - issue_date).num_days(), 15);

    // A second issue of the same book is refused
    let response = client
        .post(format!("{}/issue_book", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "book_id": book_id, "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Returned the same day: no fine
    let response = client
        .post(format!("{}/return_book", BASE_URL))
        .bearer_auth(&reader)
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["receipt"]["fine_amount"], "0.00");
    assert_eq!(body["message"], "Book returned successfully!");

    // Nothing left to return
    let response = client
        .post(format!("{}/return_book", BASE_URL))
        .bearer_auth(&reader)
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&reader)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .unwrap();
    assert_eq!(book["available"], true);
}

#[tokio::test]
#[ignore]
async fn test_user_cannot_add_books() {
    let client = Client::new();
    let username = unique("nonadmin");
    register(&client, &username, "pw1").await;
    let reader = token(&client, &username, "pw1").await;

    let response = client
        .post(format!("{}/add_book", BASE_URL))
        .bearer_auth(&reader)
        .json(&json!({ "title": "Nope", "author": "Nobody" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_user_lists_own_memberships() {
    let client = Client::new();
    let username = unique("member");
    let registered: Value = register(&client, &username, "pw1").await.json().await.unwrap();
    let user_id = registered["user"]["id"].as_i64().unwrap();
    let reader = token(&client, &username, "pw1").await;

    let response = client
        .get(format!("{}/users/{}/memberships", BASE_URL, user_id))
        .bearer_auth(&reader)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!([]));
}

/// Issue on 2024-01-01, return on 2024-01-20: due 2024-01-16, 4 days late, fine 8.00.
/// Runs the services directly against `DATABASE_URL`.
#[tokio::test]
#[ignore]
async fn test_late_return_scenario_against_database() {
    use chrono::NaiveDate;
    use library_server::{
        config::AppConfig,
        error::AppError,
        models::{book::CreateBook, membership::CreateMembership, user::RegisterUser},
        repository::Repository,
        services::Services,
    };
    use rust_decimal::Decimal;

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::PgPool::connect(&url).await.expect("Failed to connect");
    sqlx::migrate!("./migrations").run(&pool).await.expect("Failed to migrate");

    let mut config = AppConfig::default();
    config.auth.bootstrap_admin = None;
    let services = Services::new(Repository::new(pool), &config);

    let alice = services
        .users
        .register(
            RegisterUser {
                username: unique("alice"),
                password: "pw1".to_string(),
                role: None,
            },
            None,
        )
        .await
        .expect("register");

    let (_, user) = services
        .users
        .authenticate(&alice.username, "pw1")
        .await
        .expect("login");
    assert_eq!(user.role.as_str(), "user");

    let book = services
        .catalog
        .add_book(CreateBook {
            title: unique("scenario"),
            author: "Test Author".to_string(),
        })
        .await
        .expect("add book");

    let now = chrono::Utc::now().timestamp();
    let admin = library_server::models::user::UserClaims {
        sub: "admin".to_string(),
        user_id: 0,
        role: library_server::models::user::Role::Admin,
        exp: now + 3600,
        iat: now,
    };
    let session = library_server::models::user::UserClaims {
        sub: alice.username.clone(),
        user_id: alice.id,
        role: alice.role,
        exp: now + 3600,
        iat: now,
    };

    let issued = services
        .circulation
        .issue_book_on(&admin, book.id, Some(alice.id), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .await
        .expect("issue");
    assert_eq!(issued.due_date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());

    let receipt = services
        .circulation
        .return_book_on(&session, book.id, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap())
        .await
        .expect("return");
    assert_eq!(receipt.overdue_days, 4);
    assert_eq!(receipt.fine_amount, Decimal::new(800, 2));
    assert!(receipt.fine_id.is_some());

    let fines = services.fines.fines_for_user(alice.id).await.expect("fines");
    assert_eq!(fines.len(), 1);
    assert!(!fines[0].paid);

    let book = services.catalog.get_book(book.id).await.expect("book");
    assert!(book.available);

    // Settling the fine works once
    let fine_id = receipt.fine_id.unwrap();
    let paid = services.fines.pay(fine_id).await.expect("pay");
    assert!(paid.paid);
    assert_eq!(paid.fine_amount, Decimal::new(800, 2));
    assert!(matches!(
        services.fines.pay(fine_id).await,
        Err(AppError::BusinessRule(_))
    ));
    assert!(matches!(
        services.fines.pay(i32::MAX).await,
        Err(AppError::NotFound(_))
    ));
    assert!(services.fines.fines_for_user(alice.id).await.unwrap()[0].paid);

    // Issuing to an unknown borrower or an unknown book
    let issue_date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    assert!(matches!(
        services
            .circulation
            .issue_book_on(&admin, book.id, Some(i32::MAX), issue_date)
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        services
            .circulation
            .issue_book_on(&admin, i32::MAX, Some(alice.id), issue_date)
            .await,
        Err(AppError::NotFound(_))
    ));

    // Memberships
    let membership = |user_id: i32| CreateMembership {
        user_id,
        membership_type: "annual".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    };
    assert!(matches!(
        services.memberships.create(membership(i32::MAX)).await,
        Err(AppError::NotFound(_))
    ));
    let created = services
        .memberships
        .create(membership(alice.id))
        .await
        .expect("membership");
    let listed = services
        .memberships
        .list_for_user(alice.id)
        .await
        .expect("memberships");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
}
