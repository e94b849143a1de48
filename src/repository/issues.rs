//! Issue and return repository for database operations

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::issue::{self, IssuedBook, OpenIssue, ReturnReceipt},
};

#[derive(Clone)]
pub struct IssuesRepository {
    pool: Pool<Postgres>,
}

impl IssuesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Issue a book. The book is claimed with a conditional update so that
    /// at most one open issue record can exist per book.
    pub async fn issue(
        &self,
        book_id: i32,
        user_id: i32,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> AppResult<IssuedBook> {
        let mut tx = self.pool.begin().await?;

        let claimed: Option<i32> = sqlx::query_scalar(
            "UPDATE books SET available = FALSE WHERE id = $1 AND available RETURNING id",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                    .bind(book_id)
                    .fetch_one(&mut *tx)
                    .await?;

            return Err(if exists {
                AppError::BusinessRule("Book is already issued".to_string())
            } else {
                AppError::NotFound(format!("Book with id {} not found", book_id))
            });
        }

        let issued = sqlx::query_as::<_, IssuedBook>(
            r#"
            INSERT INTO issued_books (book_id, user_id, issue_date, return_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(issue_date)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(issued)
    }

    /// Close the user's open issue record for a book: record the return,
    /// record a fine when overdue, and make the book available again.
    /// Everything happens in one transaction; any error rolls it back.
    pub async fn return_book(
        &self,
        book_id: i32,
        user_id: i32,
        returned_on: NaiveDate,
        fine_per_day: Decimal,
    ) -> AppResult<ReturnReceipt> {
        let mut tx = self.pool.begin().await?;

        let issued = sqlx::query_as::<_, IssuedBook>(
            r#"
            SELECT ib.*
            FROM issued_books ib
            WHERE ib.book_id = $1 AND ib.user_id = $2
              AND NOT EXISTS (SELECT 1 FROM return_books rb WHERE rb.issue_id = ib.id)
            ORDER BY ib.issue_date DESC, ib.id DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("No matching issued book found.".to_string()))?;

        let overdue_days = issue::overdue_days(issued.due_date, returned_on);
        let fine_amount = issue::overdue_fine(issued.due_date, returned_on, fine_per_day);

        let return_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO return_books (issue_id, return_date, fine_amount)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(issued.id)
        .bind(returned_on)
        .bind(fine_amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BusinessRule("Book has already been returned".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        let fine_id = if fine_amount > Decimal::ZERO {
            let id: i32 = sqlx::query_scalar(
                "INSERT INTO fines (issue_id, fine_amount, paid) VALUES ($1, $2, FALSE) RETURNING id",
            )
            .bind(issued.id)
            .bind(fine_amount)
            .fetch_one(&mut *tx)
            .await?;
            Some(id)
        } else {
            None
        };

        sqlx::query("UPDATE books SET available = TRUE WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ReturnReceipt {
            return_id,
            issue_id: issued.id,
            book_id,
            due_date: issued.due_date,
            returned_on,
            overdue_days,
            fine_amount,
            fine_id,
        })
    }

    /// Open issue records of a user, earliest due first
    pub async fn open_for_user(&self, user_id: i32, today: NaiveDate) -> AppResult<Vec<OpenIssue>> {
        let issues = sqlx::query_as::<_, OpenIssue>(
            r#"
            SELECT ib.id, ib.book_id, b.title, b.author, ib.issue_date,
                   ib.return_date AS due_date,
                   ib.return_date < $2 AS is_overdue
            FROM issued_books ib
            JOIN books b ON b.id = ib.book_id
            WHERE ib.user_id = $1
              AND NOT EXISTS (SELECT 1 FROM return_books rb WHERE rb.issue_id = ib.id)
            ORDER BY ib.return_date, ib.id
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(issues)
    }

    /// Count open issue records, and those past their due date
    pub async fn count_open(&self, today: NaiveDate) -> AppResult<(i64, i64)> {
        let counts: (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE ib.return_date < $1)
            FROM issued_books ib
            WHERE NOT EXISTS (SELECT 1 FROM return_books rb WHERE rb.issue_id = ib.id)
            "#,
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}
