//! Fine listing and settlement

use crate::{
    error::AppResult,
    models::fine::{Fine, FineDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct FinesService {
    repository: Repository,
}

impl FinesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn fines_for_user(&self, user_id: i32) -> AppResult<Vec<FineDetails>> {
        self.repository.fines.list_for_user(user_id).await
    }

    pub async fn outstanding(&self) -> AppResult<Vec<FineDetails>> {
        self.repository.fines.list_unpaid().await
    }

    pub async fn pay(&self, fine_id: i32) -> AppResult<Fine> {
        let fine = self.repository.fines.mark_paid(fine_id).await?;
        tracing::info!(fine_id, amount = %fine.fine_amount, "Fine paid");
        Ok(fine)
    }
}
