//! HTTP handlers, session extraction and routing

pub mod auth;
pub mod books;
pub mod circulation;
pub mod dashboard;
pub mod fines;
pub mod health;
pub mod memberships;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Cookie holding the session token after login
pub const SESSION_COOKIE: &str = "library_session";

/// Identity of the caller, taken from a bearer token or the session cookie.
/// Handlers pass it on to the operations that need it.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)?;

        let claims = UserClaims::from_token(&token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// An explicit Authorization header wins over the cookie
fn session_token(headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;

        return value
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()));
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AppError::Authentication("Please log in first.".to_string()))
}

/// Plain notice returned by endpoints without a payload
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/me", get(auth::me))
        // Dashboards
        .route("/admin_dashboard", get(dashboard::admin_dashboard))
        .route("/user_dashboard", get(dashboard::user_dashboard))
        // Catalog
        .route("/add_book", post(books::add_book))
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        // Circulation
        .route("/issue_book", post(circulation::issue_book))
        .route("/return_book", post(circulation::return_book))
        // Fines
        .route("/fines", get(fines::my_fines))
        .route("/fines/outstanding", get(fines::outstanding_fines))
        .route("/fines/:id/pay", post(fines::pay_fine))
        // Memberships
        .route("/memberships", post(memberships::create_membership))
        .route("/users/:id/memberships", get(memberships::list_memberships))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
