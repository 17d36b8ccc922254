//! Administrative console endpoints.
//!
//! Session-authenticated JSON surface plus the CSV export. Page views are
//! list-only here, mirroring their append-only lifecycle.

use actix_session::Session;
use actix_web::http::header;
use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::export::CSV_FILENAME;
use crate::domain::{
    AdminService, City, DomainError, FitnessGoal, Page, PageView, PageViewListQuery, ReviewUpdate,
    Role, SignUp, SignUpListQuery, UtmTags,
};

use super::auth::require_operator;
use super::error::{ApiError, ApiResult};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Sign-up list filters; all optional and conjunctive.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SignUpListParams {
    /// City code filter.
    pub city: Option<String>,
    /// Role code filter.
    pub role: Option<String>,
    /// Fitness goal code filter.
    pub goal: Option<String>,
    /// Validity flag filter.
    pub is_valid: Option<bool>,
    /// Contacted flag filter.
    pub is_contacted: Option<bool>,
    /// Inclusive lower creation-time bound (RFC 3339).
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper creation-time bound (RFC 3339).
    pub created_to: Option<DateTime<Utc>>,
    /// Free-text search across name, phone, and email.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped to 200.
    pub per_page: Option<u32>,
}

/// Page-view list filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageViewListParams {
    /// Inclusive lower visit-time bound (RFC 3339).
    pub visited_from: Option<DateTime<Utc>>,
    /// Exclusive upper visit-time bound (RFC 3339).
    pub visited_to: Option<DateTime<Utc>>,
    /// Exact `utm_source` match.
    pub utm_source: Option<String>,
    /// Exact `utm_medium` match.
    pub utm_medium: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped to 200.
    pub per_page: Option<u32>,
}

/// One sign-up as shown in the console list.
#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpDto {
    /// Record id.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Normalised phone number.
    pub phone_number: String,
    /// Optional email.
    pub email: Option<String>,
    /// City code.
    pub city: City,
    /// City display label.
    pub city_label: String,
    /// Fitness goal code.
    pub fitness_goal: FitnessGoal,
    /// Fitness goal display label.
    pub fitness_goal_label: String,
    /// Role code.
    pub role: Role,
    /// Role display label.
    pub role_label: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Campaign tags captured at creation.
    pub utm: UtmTags,
    /// Validity flag.
    pub is_valid: bool,
    /// Contacted flag.
    pub is_contacted: bool,
    /// Operator notes.
    pub notes: String,
}

impl From<SignUp> for SignUpDto {
    fn from(record: SignUp) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
            phone_number: record.phone_number.as_str().to_owned(),
            email: record.email,
            city: record.city,
            city_label: record.city.label().to_owned(),
            fitness_goal: record.fitness_goal,
            fitness_goal_label: record.fitness_goal.label().to_owned(),
            role: record.role,
            role_label: record.role.label().to_owned(),
            created_at: record.created_at,
            utm: record.utm,
            is_valid: record.is_valid,
            is_contacted: record.is_contacted,
            notes: record.notes,
        }
    }
}

/// One page of sign-ups plus the filtered total.
#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpPageDto {
    /// Records on this page, newest first.
    pub items: Vec<SignUpDto>,
    /// Total matching records across all pages.
    pub total: i64,
    /// Echoed page number.
    pub page: u32,
    /// Echoed page size.
    pub per_page: u32,
}

/// One page view as shown in the console list.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageViewDto {
    /// Record id.
    pub id: Uuid,
    /// Visit instant.
    pub visited_at: DateTime<Utc>,
    /// Client address.
    pub ip_address: Option<String>,
    /// User agent.
    pub user_agent: String,
    /// Referrer header.
    pub referrer: String,
    /// Campaign tags.
    pub utm: UtmTags,
}

impl From<PageView> for PageViewDto {
    fn from(record: PageView) -> Self {
        Self {
            id: record.id,
            visited_at: record.visited_at,
            ip_address: record.ip_address,
            user_agent: record.user_agent,
            referrer: record.referrer,
            utm: record.utm,
        }
    }
}

/// One page of page views plus the filtered total.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageViewPageDto {
    /// Records on this page, newest first.
    pub items: Vec<PageViewDto>,
    /// Total matching records across all pages.
    pub total: i64,
    /// Echoed page number.
    pub page: u32,
    /// Echoed page size.
    pub per_page: u32,
}

/// Inline edit payload; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReviewUpdateRequest {
    /// New validity flag.
    pub is_valid: Option<bool>,
    /// New contacted flag.
    pub is_contacted: Option<bool>,
    /// Replacement notes text.
    pub notes: Option<String>,
}

/// Record selection for bulk actions.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectionRequest {
    /// Selected record ids, in the order the console sent them.
    pub ids: Vec<Uuid>,
}

/// Bulk action result.
#[derive(Debug, Serialize, ToSchema)]
pub struct AffectedDto {
    /// Number of records the action touched.
    pub affected: u64,
}

// ---------------------------------------------------------------------------
// Parameter parsing
// ---------------------------------------------------------------------------

fn parse_filter<T>(value: Option<&str>, field: &str) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr,
{
    match value {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            ApiError::from(DomainError::invalid_request(format!(
                "invalid {field} filter: {raw}"
            )))
        }),
    }
}

fn page_from(page: Option<u32>, per_page: Option<u32>) -> Page {
    let default = Page::default();
    Page::new(
        page.unwrap_or(default.number()),
        per_page.unwrap_or(default.per_page()),
    )
}

impl SignUpListParams {
    fn into_query(self) -> Result<SignUpListQuery, ApiError> {
        Ok(SignUpListQuery {
            city: parse_filter::<City>(self.city.as_deref(), "city")?,
            role: parse_filter::<Role>(self.role.as_deref(), "role")?,
            fitness_goal: parse_filter::<FitnessGoal>(self.goal.as_deref(), "goal")?,
            is_valid: self.is_valid,
            is_contacted: self.is_contacted,
            created_from: self.created_from,
            created_to: self.created_to,
            search: self.search.filter(|needle| !needle.trim().is_empty()),
            page: page_from(self.page, self.per_page),
        })
    }
}

impl PageViewListParams {
    fn into_query(self) -> PageViewListQuery {
        PageViewListQuery {
            visited_from: self.visited_from,
            visited_to: self.visited_to,
            utm_source: self.utm_source,
            utm_medium: self.utm_medium,
            page: page_from(self.page, self.per_page),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/v1/admin/signups` — filtered, paginated listing.
#[utoipa::path(
    get,
    path = "/api/v1/admin/signups",
    params(SignUpListParams),
    responses(
        (status = 200, description = "Sign-up page", body = SignUpPageDto),
        (status = 400, description = "Invalid filter value"),
        (status = 401, description = "Not authenticated")
    ),
    tags = ["admin"],
    operation_id = "listSignUps"
)]
#[get("/admin/signups")]
pub async fn list_sign_ups(
    session: Session,
    params: web::Query<SignUpListParams>,
    admin: web::Data<AdminService>,
) -> ApiResult<web::Json<SignUpPageDto>> {
    require_operator(&session)?;
    let query = params.into_inner().into_query()?;
    let page = admin.list_sign_ups(&query).await?;
    Ok(web::Json(SignUpPageDto {
        items: page.items.into_iter().map(SignUpDto::from).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    }))
}

/// `PATCH /api/v1/admin/signups/{id}` — inline edit of the review fields.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/signups/{id}",
    request_body = ReviewUpdateRequest,
    responses(
        (status = 200, description = "Updated record", body = SignUpDto),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown record")
    ),
    tags = ["admin"],
    operation_id = "updateSignUpReview"
)]
#[patch("/admin/signups/{id}")]
pub async fn update_sign_up_review(
    session: Session,
    path: web::Path<Uuid>,
    payload: web::Json<ReviewUpdateRequest>,
    admin: web::Data<AdminService>,
) -> ApiResult<web::Json<SignUpDto>> {
    require_operator(&session)?;
    let payload = payload.into_inner();
    let changes = ReviewUpdate {
        is_valid: payload.is_valid,
        is_contacted: payload.is_contacted,
        notes: payload.notes,
    };
    let updated = admin.update_review(path.into_inner(), &changes).await?;
    Ok(web::Json(SignUpDto::from(updated)))
}

/// `POST /api/v1/admin/signups/contacted` — bulk mark-as-contacted.
#[utoipa::path(
    post,
    path = "/api/v1/admin/signups/contacted",
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Count affected", body = AffectedDto),
        (status = 401, description = "Not authenticated")
    ),
    tags = ["admin"],
    operation_id = "markSignUpsContacted"
)]
#[post("/admin/signups/contacted")]
pub async fn mark_contacted(
    session: Session,
    payload: web::Json<SelectionRequest>,
    admin: web::Data<AdminService>,
) -> ApiResult<web::Json<AffectedDto>> {
    require_operator(&session)?;
    let affected = admin.mark_contacted(&payload.ids).await?;
    Ok(web::Json(AffectedDto { affected }))
}

/// `POST /api/v1/admin/signups/export` — CSV export of the selection.
#[utoipa::path(
    post,
    path = "/api/v1/admin/signups/export",
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "CSV attachment", body = String, content_type = "text/csv"),
        (status = 401, description = "Not authenticated")
    ),
    tags = ["admin"],
    operation_id = "exportSignUps"
)]
#[post("/admin/signups/export")]
pub async fn export_sign_ups(
    session: Session,
    payload: web::Json<SelectionRequest>,
    admin: web::Data<AdminService>,
) -> ApiResult<HttpResponse> {
    require_operator(&session)?;
    let bytes = admin.export_csv(&payload.ids).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{CSV_FILENAME}\""),
        ))
        .body(bytes))
}

/// `DELETE /api/v1/admin/signups` — bulk delete, superuser only.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/signups",
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Count removed", body = AffectedDto),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Operator is not a superuser")
    ),
    tags = ["admin"],
    operation_id = "deleteSignUps"
)]
#[delete("/admin/signups")]
pub async fn delete_sign_ups(
    session: Session,
    payload: web::Json<SelectionRequest>,
    admin: web::Data<AdminService>,
) -> ApiResult<web::Json<AffectedDto>> {
    let operator = require_operator(&session)?;
    let affected = admin.delete_sign_ups(&operator, &payload.ids).await?;
    Ok(web::Json(AffectedDto { affected }))
}

/// `GET /api/v1/admin/page-views` — read-only page-view listing.
#[utoipa::path(
    get,
    path = "/api/v1/admin/page-views",
    params(PageViewListParams),
    responses(
        (status = 200, description = "Page-view page", body = PageViewPageDto),
        (status = 401, description = "Not authenticated")
    ),
    tags = ["admin"],
    operation_id = "listPageViews"
)]
#[get("/admin/page-views")]
pub async fn list_page_views(
    session: Session,
    params: web::Query<PageViewListParams>,
    admin: web::Data<AdminService>,
) -> ApiResult<web::Json<PageViewPageDto>> {
    require_operator(&session)?;
    let query = params.into_inner().into_query();
    let page = admin.list_page_views(&query).await?;
    Ok(web::Json(PageViewPageDto {
        items: page.items.into_iter().map(PageViewDto::from).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn filters_parse_enumeration_codes() {
        let params = SignUpListParams {
            city: Some("TEHRAN".to_owned()),
            role: Some("COACH".to_owned()),
            goal: Some("ENDURANCE".to_owned()),
            ..SignUpListParams::default()
        };
        let query = params.into_query().expect("codes are valid");
        assert_eq!(query.city, Some(City::Tehran));
        assert_eq!(query.role, Some(Role::Coach));
        assert_eq!(query.fitness_goal, Some(FitnessGoal::Endurance));
    }

    #[rstest]
    fn unknown_codes_become_invalid_request() {
        let params = SignUpListParams {
            city: Some("GOTHAM".to_owned()),
            ..SignUpListParams::default()
        };
        let err = params.into_query().expect_err("unknown city code");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn blank_search_is_dropped() {
        let params = SignUpListParams {
            search: Some("   ".to_owned()),
            ..SignUpListParams::default()
        };
        let query = params.into_query().expect("valid params");
        assert_eq!(query.search, None);
    }

    #[rstest]
    fn pagination_defaults_apply() {
        let query = SignUpListParams::default()
            .into_query()
            .expect("valid params");
        assert_eq!(query.page.number(), 1);
        assert_eq!(query.page.per_page(), 50);
    }

    #[rstest]
    fn dto_carries_display_labels() {
        let record = crate::test_support::seeded_sign_up("Ali Rezaei", "09123456789");
        let dto = SignUpDto::from(record);
        assert_eq!(dto.city_label, "تهران");
        assert_eq!(dto.role_label, "کاربر (دانشجو)");
    }
}
