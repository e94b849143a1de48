//! Repository layer for database operations

pub mod books;
pub mod fines;
pub mod issues;
pub mod memberships;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub issues: issues::IssuesRepository,
    pub fines: fines::FinesRepository,
    pub memberships: memberships::MembershipsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            issues: issues::IssuesRepository::new(pool.clone()),
            fines: fines::FinesRepository::new(pool.clone()),
            memberships: memberships::MembershipsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round trip to the database, used by the readiness probe
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
