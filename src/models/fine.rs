//! Overdue fines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Fine row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fine {
    pub id: i32,
    pub issue_id: i32,
    pub fine_amount: Decimal,
    pub paid: bool,
}

/// Fine joined with its issue and book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FineDetails {
    pub id: i32,
    pub issue_id: i32,
    pub user_id: i32,
    pub username: String,
    pub book_id: i32,
    pub title: String,
    pub fine_amount: Decimal,
    pub paid: bool,
}
