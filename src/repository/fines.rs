//! Fines repository for database operations

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::fine::{Fine, FineDetails},
};

const FINE_DETAILS: &str = r#"
    SELECT f.id, f.issue_id, ib.user_id, u.username, ib.book_id, b.title,
           f.fine_amount, f.paid
    FROM fines f
    JOIN issued_books ib ON ib.id = f.issue_id
    JOIN users u ON u.id = ib.user_id
    JOIN books b ON b.id = ib.book_id
"#;

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Fines on a user's issue records, unpaid first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<FineDetails>> {
        let fines = sqlx::query_as::<_, FineDetails>(&format!(
            "{} WHERE ib.user_id = $1 ORDER BY f.paid, f.id",
            FINE_DETAILS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(fines)
    }

    /// All unpaid fines
    pub async fn list_unpaid(&self) -> AppResult<Vec<FineDetails>> {
        let fines = sqlx::query_as::<_, FineDetails>(&format!(
            "{} WHERE NOT f.paid ORDER BY u.username, f.id",
            FINE_DETAILS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(fines)
    }

    /// Mark a fine as paid
    pub async fn mark_paid(&self, id: i32) -> AppResult<Fine> {
        let updated = sqlx::query_as::<_, Fine>(
            "UPDATE fines SET paid = TRUE WHERE id = $1 AND NOT paid RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(fine) = updated {
            return Ok(fine);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM fines WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Err(if exists {
            AppError::BusinessRule("Fine is already paid".to_string())
        } else {
            AppError::NotFound(format!("Fine with id {} not found", id))
        })
    }

    /// Sum of unpaid fines, for one user or for everybody
    pub async fn outstanding_total(&self, user_id: Option<i32>) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(f.fine_amount), 0)
            FROM fines f
            JOIN issued_books ib ON ib.id = f.issue_id
            WHERE NOT f.paid AND ($1::integer IS NULL OR ib.user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
