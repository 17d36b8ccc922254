//! OpenAPI documentation for the JSON surface.
//!
//! The public landing pages are HTML and deliberately left out; the
//! document covers the console endpoints, auth, and health probes. Swagger
//! UI is mounted in debug builds only.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::admin::{
    AffectedDto, PageViewDto, PageViewPageDto, ReviewUpdateRequest, SelectionRequest, SignUpDto,
    SignUpPageDto,
};
use crate::api::auth::{LoginRequest, OperatorResponse};
use crate::api::error::ApiError;
use crate::domain::{City, ErrorCode, FitnessGoal, Role, UtmTags};

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the console API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pre-launch landing backend API",
        description = "Operator console over landing-page sign-ups and page views."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::admin::list_sign_ups,
        crate::api::admin::update_sign_up_review,
        crate::api::admin::mark_contacted,
        crate::api::admin::export_sign_ups,
        crate::api::admin::delete_sign_ups,
        crate::api::admin::list_page_views,
        crate::api::health::ready,
        crate::api::health::live,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        LoginRequest,
        OperatorResponse,
        SignUpDto,
        SignUpPageDto,
        PageViewDto,
        PageViewPageDto,
        ReviewUpdateRequest,
        SelectionRequest,
        AffectedDto,
        City,
        FitnessGoal,
        Role,
        UtmTags,
    )),
    tags(
        (name = "auth", description = "Operator session management"),
        (name = "admin", description = "Staff console over stored records"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
