//! Dashboard endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::user::Role,
    services::dashboard::{AdminDashboard, UserDashboard},
    AppState,
};

use super::AuthenticatedUser;

/// Admin dashboard
#[utoipa::path(
    get,
    path = "/admin_dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inventory and circulation summary", body = AdminDashboard),
        (status = 403, description = "Access denied")
    )
)]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AdminDashboard>> {
    claims.require_admin()?;
    Ok(Json(state.services.dashboard.admin(&claims).await?))
}

/// User dashboard
#[utoipa::path(
    get,
    path = "/user_dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books issued to the caller and unpaid fines", body = UserDashboard),
        (status = 403, description = "Access denied")
    )
)]
pub async fn user_dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserDashboard>> {
    claims.require_role(Role::User)?;
    Ok(Json(state.services.dashboard.user(&claims).await?))
}
