//! Issuing and returning books

use chrono::{NaiveDate, Utc};

use crate::{
    config::CirculationConfig,
    error::{AppError, AppResult},
    models::{
        issue::{self, IssuedBook, ReturnReceipt},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
    config: CirculationConfig,
}

impl CirculationService {
    pub fn new(repository: Repository, config: CirculationConfig) -> Self {
        Self { repository, config }
    }

    /// Issue a book today. Borrower defaults to the caller; only admins may
    /// issue to somebody else.
    pub async fn issue_book(
        &self,
        caller: &UserClaims,
        book_id: i32,
        user_id: Option<i32>,
    ) -> AppResult<IssuedBook> {
        self.issue_book_on(caller, book_id, user_id, today()).await
    }

    pub async fn issue_book_on(
        &self,
        caller: &UserClaims,
        book_id: i32,
        user_id: Option<i32>,
        issue_date: NaiveDate,
    ) -> AppResult<IssuedBook> {
        let user_id = user_id.unwrap_or(caller.user_id);
        caller.require_self_or_admin(user_id)?;

        // Borrower must exist
        self.repository.users.get_by_id(user_id).await?;

        let due_date = issue::due_date(issue_date, self.config.loan_period_days).ok_or_else(|| {
            AppError::Internal(format!(
                "Loan period of {} days is out of range",
                self.config.loan_period_days
            ))
        })?;
        let issued = self
            .repository
            .issues
            .issue(book_id, user_id, issue_date, due_date)
            .await?;

        tracing::info!(
            issue_id = issued.id,
            book_id,
            user_id,
            issued_by = caller.user_id,
            %due_date,
            "Book issued"
        );
        Ok(issued)
    }

    /// Return the caller's copy of a book today
    pub async fn return_book(&self, caller: &UserClaims, book_id: i32) -> AppResult<ReturnReceipt> {
        self.return_book_on(caller, book_id, today()).await
    }

    pub async fn return_book_on(
        &self,
        caller: &UserClaims,
        book_id: i32,
        returned_on: NaiveDate,
    ) -> AppResult<ReturnReceipt> {
        let result = self
            .repository
            .issues
            .return_book(book_id, caller.user_id, returned_on, self.config.fine_per_day)
            .await;

        match &result {
            Ok(receipt) => tracing::info!(
                issue_id = receipt.issue_id,
                book_id,
                user_id = caller.user_id,
                fine = %receipt.fine_amount,
                "Book returned"
            ),
            Err(e) => tracing::warn!(book_id, user_id = caller.user_id, "Return rolled back: {}", e),
        }

        result
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// User-facing summary of a return
pub fn return_message(receipt: &ReturnReceipt) -> String {
    if receipt.fine_amount > rust_decimal::Decimal::ZERO {
        format!(
            "Book returned successfully! Fine incurred: ${:.2}",
            receipt.fine_amount
        )
    } else {
        "Book returned successfully!".to_string()
    }
}
