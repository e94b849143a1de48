//! Memberships repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::membership::{CreateMembership, Membership},
};

#[derive(Clone)]
pub struct MembershipsRepository {
    pool: Pool<Postgres>,
}

impl MembershipsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, membership: &CreateMembership) -> AppResult<Membership> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (user_id, start_date, end_date, membership_type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(membership.user_id)
        .bind(membership.start_date)
        .bind(membership.end_date)
        .bind(&membership.membership_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(membership)
    }

    /// Memberships of a user, most recent first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Membership>> {
        let memberships = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE user_id = $1 ORDER BY start_date DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(memberships)
    }
}
