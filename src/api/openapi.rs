//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, circulation, dashboard, fines, health, memberships};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "0.1.0",
        description = "Library circulation REST API"
    ),
    paths(
        // Health
        health::index,
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        // Dashboards
        dashboard::admin_dashboard,
        dashboard::user_dashboard,
        // Books
        books::add_book,
        books::list_books,
        books::get_book,
        // Circulation
        circulation::issue_book,
        circulation::return_book,
        // Fines
        fines::my_fines,
        fines::outstanding_fines,
        fines::pay_fine,
        // Memberships
        memberships::create_membership,
        memberships::list_memberships,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterResponse,
            auth::SessionInfo,
            crate::models::user::RegisterUser,
            crate::models::user::User,
            crate::models::user::Role,
            // Books
            books::AddBookResponse,
            crate::models::book::Book,
            crate::models::book::CreateBook,
            // Circulation
            circulation::IssueResponse,
            circulation::ReturnResponse,
            crate::models::issue::IssueBook,
            crate::models::issue::IssuedBook,
            crate::models::issue::ReturnBook,
            crate::models::issue::ReturnReceipt,
            crate::models::issue::OpenIssue,
            // Dashboards
            crate::services::dashboard::AdminDashboard,
            crate::services::dashboard::UserDashboard,
            // Fines
            crate::models::fine::Fine,
            crate::models::fine::FineDetails,
            // Memberships
            crate::models::membership::Membership,
            crate::models::membership::CreateMembership,
            // Common
            health::HealthResponse,
            super::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and sessions"),
        (name = "dashboard", description = "Role dashboards"),
        (name = "books", description = "Book inventory"),
        (name = "circulation", description = "Issuing and returning books"),
        (name = "fines", description = "Overdue fines"),
        (name = "memberships", description = "Library memberships")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
