//! Dashboard summaries

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{issue::OpenIssue, user::UserClaims},
    repository::Repository,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub username: String,
    pub total_books: i64,
    pub available_books: i64,
    pub open_issues: i64,
    pub overdue_issues: i64,
    pub outstanding_fines: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDashboard {
    pub username: String,
    pub issued_books: Vec<OpenIssue>,
    pub outstanding_fines: Decimal,
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn admin(&self, caller: &UserClaims) -> AppResult<AdminDashboard> {
        let today = Utc::now().date_naive();
        let (total_books, available_books) = self.repository.books.count().await?;
        let (open_issues, overdue_issues) = self.repository.issues.count_open(today).await?;
        let outstanding_fines = self.repository.fines.outstanding_total(None).await?;

        Ok(AdminDashboard {
            username: caller.username().to_string(),
            total_books,
            available_books,
            open_issues,
            overdue_issues,
            outstanding_fines,
        })
    }

    pub async fn user(&self, caller: &UserClaims) -> AppResult<UserDashboard> {
        let today = Utc::now().date_naive();
        let issued_books = self.repository.issues.open_for_user(caller.user_id, today).await?;
        let outstanding_fines = self
            .repository
            .fines
            .outstanding_total(Some(caller.user_id))
            .await?;

        Ok(UserDashboard {
            username: caller.username().to_string(),
            issued_books,
            outstanding_fines,
        })
    }
}
