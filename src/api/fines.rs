//! Fine endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::fine::{Fine, FineDetails},
    AppState,
};

use super::AuthenticatedUser;

/// Fines of the caller
#[utoipa::path(
    get,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's fines", body = Vec<FineDetails>)
    )
)]
pub async fn my_fines(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<FineDetails>>> {
    Ok(Json(state.services.fines.fines_for_user(claims.user_id).await?))
}

/// Unpaid fines of all users (admin only)
#[utoipa::path(
    get,
    path = "/fines/outstanding",
    tag = "fines",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unpaid fines", body = Vec<FineDetails>),
        (status = 403, description = "Access denied")
    )
)]
pub async fn outstanding_fines(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<FineDetails>>> {
    claims.require_admin()?;
    Ok(Json(state.services.fines.outstanding().await?))
}

/// Mark a fine as paid (admin only)
#[utoipa::path(
    post,
    path = "/fines/{id}/pay",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Fine ID")
    ),
    responses(
        (status = 200, description = "Fine paid", body = Fine),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Fine not found"),
        (status = 422, description = "Fine is already paid")
    )
)]
pub async fn pay_fine(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Fine>> {
    claims.require_admin()?;
    Ok(Json(state.services.fines.pay(id).await?))
}
