//! Membership endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::membership::{CreateMembership, Membership},
    AppState,
};

use super::AuthenticatedUser;

/// Record a membership for a user (admin only)
#[utoipa::path(
    post,
    path = "/memberships",
    tag = "memberships",
    security(("bearer_auth" = [])),
    request_body = CreateMembership,
    responses(
        (status = 201, description = "Membership created", body = Membership),
        (status = 400, description = "Invalid period"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_membership(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateMembership>,
) -> AppResult<(StatusCode, Json<Membership>)> {
    claims.require_admin()?;
    request.validate()?;

    let membership = state.services.memberships.create(request).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

/// Memberships of a user (admin, or the user themself)
#[utoipa::path(
    get,
    path = "/users/{id}/memberships",
    tag = "memberships",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Memberships", body = Vec<Membership>),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_memberships(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Membership>>> {
    claims.require_self_or_admin(user_id)?;
    Ok(Json(state.services.memberships.list_for_user(user_id).await?))
}
