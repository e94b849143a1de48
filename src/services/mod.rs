//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod dashboard;
pub mod fines;
pub mod memberships;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub fines: fines::FinesService,
    pub memberships: memberships::MembershipsService,
    pub dashboard: dashboard::DashboardService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(
                repository.clone(),
                config.circulation.clone(),
            ),
            fines: fines::FinesService::new(repository.clone()),
            memberships: memberships::MembershipsService::new(repository.clone()),
            dashboard: dashboard::DashboardService::new(repository.clone()),
            repository,
        }
    }
}
