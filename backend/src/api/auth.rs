//! Operator login, logout, and the session guard for console routes.

use actix_session::Session;
use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AuthService, DomainError, LoginCredentials, Operator};

use super::error::{ApiError, ApiResult};

/// Session key holding the authenticated operator.
const OPERATOR_SESSION_KEY: &str = "operator";

/// Login request payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Operator login name.
    pub username: String,
    /// Operator password.
    pub password: String,
}

/// Authenticated operator identity echoed to the console.
#[derive(Debug, Serialize, ToSchema)]
pub struct OperatorResponse {
    /// Operator id.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Whether deletion controls should be shown.
    pub is_superuser: bool,
}

impl From<Operator> for OperatorResponse {
    fn from(operator: Operator) -> Self {
        Self {
            id: operator.id,
            username: operator.username,
            is_superuser: operator.is_superuser,
        }
    }
}

fn session_failure(context: &str, err: impl std::fmt::Display) -> ApiError {
    ApiError::from(DomainError::internal(format!("{context}: {err}")))
}

/// Read the authenticated operator from the session, or reject.
pub fn require_operator(session: &Session) -> Result<Operator, ApiError> {
    session
        .get::<Operator>(OPERATOR_SESSION_KEY)
        .map_err(|err| session_failure("session read failed", err))?
        .ok_or_else(|| ApiError::from(DomainError::unauthorized("authentication required")))
}

/// `POST /api/v1/login` — verify credentials and open a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = OperatorResponse),
        (status = 400, description = "Malformed credentials"),
        (status = 401, description = "Unknown operator or wrong password")
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    session: Session,
    payload: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> ApiResult<web::Json<OperatorResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.username, &payload.password)
        .map_err(|err| ApiError::from(DomainError::invalid_request(err.to_string())))?;

    let operator = auth.authenticate(&credentials).await?;

    session.renew();
    session
        .insert(OPERATOR_SESSION_KEY, &operator)
        .map_err(|err| session_failure("session store failed", err))?;

    Ok(web::Json(OperatorResponse::from(operator)))
}

/// `POST /api/v1/logout` — drop the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
