//! Issue (loan) and return records, with due-date and fine arithmetic

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Issue record from `issued_books`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct IssuedBook {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub issue_date: NaiveDate,
    /// Due date. The column keeps its historical name `return_date`.
    #[sqlx(rename = "return_date")]
    pub due_date: NaiveDate,
}

/// Open issue joined with its book, for dashboards
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OpenIssue {
    pub id: i32,
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub is_overdue: bool,
}

/// Issue book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueBook {
    pub book_id: i32,
    /// Borrower. Defaults to the caller.
    pub user_id: Option<i32>,
}

/// Return book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnBook {
    pub book_id: i32,
}

/// Outcome of a return
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnReceipt {
    pub return_id: i32,
    pub issue_id: i32,
    pub book_id: i32,
    pub due_date: NaiveDate,
    pub returned_on: NaiveDate,
    pub overdue_days: i64,
    pub fine_amount: Decimal,
    /// Set when a fine was recorded
    pub fine_id: Option<i32>,
}

/// Due date for a book issued on `issue_date`. `None` when the period is
/// negative or the date would fall outside the calendar.
pub fn due_date(issue_date: NaiveDate, loan_period_days: i64) -> Option<NaiveDate> {
    let days = u64::try_from(loan_period_days).ok()?;
    issue_date.checked_add_days(Days::new(days))
}

/// Whole days past the due date, never negative
pub fn overdue_days(due_date: NaiveDate, returned_on: NaiveDate) -> i64 {
    (returned_on - due_date).num_days().max(0)
}

/// Fine for a return, rounded to cents
pub fn overdue_fine(due_date: NaiveDate, returned_on: NaiveDate, fine_per_day: Decimal) -> Decimal {
    (Decimal::from(overdue_days(due_date, returned_on)) * fine_per_day).round_dp(2)
}
