//! Membership management service

use crate::{
    error::AppResult,
    models::membership::{CreateMembership, Membership},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembershipsService {
    repository: Repository,
}

impl MembershipsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, membership: CreateMembership) -> AppResult<Membership> {
        self.repository.users.get_by_id(membership.user_id).await?;
        let membership = self.repository.memberships.create(&membership).await?;
        tracing::info!(
            membership_id = membership.id,
            user_id = membership.user_id,
            "Membership recorded"
        );
        Ok(membership)
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Membership>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.memberships.list_for_user(user_id).await
    }
}
