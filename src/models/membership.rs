//! Library memberships

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Membership row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Membership {
    pub id: i32,
    pub user_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub membership_type: String,
}

/// Create membership request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_period"))]
pub struct CreateMembership {
    pub user_id: i32,
    #[validate(length(min = 1, max = 50, message = "Membership type must be 1 to 50 characters"))]
    pub membership_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn validate_period(membership: &CreateMembership) -> Result<(), ValidationError> {
    if membership.end_date < membership.start_date {
        let mut error = ValidationError::new("period");
        error.message = Some("End date must not be before start date".into());
        return Err(error);
    }
    Ok(())
}
