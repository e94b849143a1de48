//! Registration, login and logout endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{RegisterUser, Role, User},
    AppState,
};

use super::{AuthenticatedUser, MessageResponse, SESSION_COOKIE};

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT, also set as the session cookie
    pub token: String,
    pub token_type: String,
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    /// Dashboard matching the role
    pub redirect: String,
    pub message: String,
}

/// Registration response
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
    pub message: String,
}

/// Session identity
#[derive(Serialize, ToSchema)]
pub struct SessionInfo {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Only admins may create admin accounts"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    caller: Option<AuthenticatedUser>,
    Json(request): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    request.validate()?;

    let caller = caller.map(|AuthenticatedUser(claims)| claims);
    let user = state.services.users.register(request, caller.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            message: "Registration successful! Please log in.".to_string(),
        }),
    ))
}

/// Authenticate and start a session
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    tracing::info!(user_id = user.id, role = %user.role, "Login successful");

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            user_id: user.id,
            username: user.username,
            role: user.role,
            redirect: user.role.dashboard_path().to_string(),
            message: "Login successful!".to_string(),
        }),
    ))
}

/// End the session
#[utoipa::path(
    get,
    path = "/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Json(MessageResponse::new("You have been logged out.")),
    )
}

/// Current session identity
#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = SessionInfo),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<SessionInfo> {
    Json(SessionInfo {
        user_id: claims.user_id,
        username: claims.sub,
        role: claims.role,
    })
}
