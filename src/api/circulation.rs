//! Issue and return endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::issue::{IssueBook, IssuedBook, ReturnBook, ReturnReceipt},
    services::circulation::return_message,
    AppState,
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct IssueResponse {
    pub issue: IssuedBook,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub status: String,
    pub message: String,
    pub receipt: ReturnReceipt,
}

/// Issue a book
#[utoipa::path(
    post,
    path = "/issue_book",
    tag = "circulation",
    security(("bearer_auth" = [])),
    request_body = IssueBook,
    responses(
        (status = 201, description = "Book issued", body = IssueResponse),
        (status = 403, description = "Issuing to another user requires admin"),
        (status = 404, description = "Book or user not found"),
        (status = 422, description = "Book is already issued")
    )
)]
pub async fn issue_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<IssueBook>,
) -> AppResult<(StatusCode, Json<IssueResponse>)> {
    let issue = state
        .services
        .circulation
        .issue_book(&claims, request.book_id, request.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(IssueResponse {
            issue,
            message: "Book issued successfully!".to_string(),
        }),
    ))
}

/// Return a book issued to the caller
#[utoipa::path(
    post,
    path = "/return_book",
    tag = "circulation",
    security(("bearer_auth" = [])),
    request_body = ReturnBook,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "No matching issued book found"),
        (status = 422, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ReturnBook>,
) -> AppResult<Json<ReturnResponse>> {
    let receipt = state
        .services
        .circulation
        .return_book(&claims, request.book_id)
        .await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        message: return_message(&receipt),
        receipt,
    }))
}
