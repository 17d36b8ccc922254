//! Public landing flow handlers.

use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::domain::{
    FieldErrors, LandingService, RequestMeta, SignUpForm, SubmissionOutcome, UtmTags,
};

use super::error::ApiResult;
use super::views;

/// Campaign tags accepted on both GET and POST; absent parameters default
/// to the empty string.
#[derive(Debug, Default, Deserialize)]
pub struct UtmQuery {
    #[serde(default)]
    utm_source: String,
    #[serde(default)]
    utm_medium: String,
    #[serde(default)]
    utm_campaign: String,
}

/// Raw urlencoded form body. Every field is optional at the transport
/// level so missing inputs become validation messages instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub struct SignUpFormData {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    fitness_goal: String,
    #[serde(default)]
    role: String,
    consent: Option<String>,
}

/// HTML checkbox semantics: present-and-truthy means affirmed.
fn checkbox_affirmed(value: Option<&str>) -> bool {
    value.is_some_and(|raw| {
        matches!(raw.to_ascii_lowercase().as_str(), "on" | "true" | "1")
    })
}

impl SignUpFormData {
    fn into_form(self) -> SignUpForm {
        let consent = checkbox_affirmed(self.consent.as_deref());
        SignUpForm {
            full_name: self.full_name,
            phone_number: self.phone_number,
            email: self.email,
            city: self.city,
            fitness_goal: self.fitness_goal,
            role: self.role,
            consent,
        }
    }
}

/// Resolve the client address: first `X-Forwarded-For` entry when a proxy
/// set one, otherwise the peer address.
fn client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let candidate = first.trim();
            if !candidate.is_empty() {
                return Some(candidate.to_owned());
            }
        }
    }
    req.peer_addr().map(|addr| addr.ip().to_string())
}

fn header_string(req: &HttpRequest, name: header::HeaderName) -> String {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

fn request_meta(req: &HttpRequest, utm: &UtmQuery) -> RequestMeta {
    RequestMeta {
        ip_address: client_ip(req),
        user_agent: header_string(req, header::USER_AGENT),
        referrer: header_string(req, header::REFERER),
        utm: UtmTags {
            source: utm.utm_source.clone(),
            medium: utm.utm_medium.clone(),
            campaign: utm.utm_campaign.clone(),
        },
    }
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// `GET /` — record a page view and render the empty form.
#[get("/")]
pub async fn landing(
    req: HttpRequest,
    utm: web::Query<UtmQuery>,
    service: web::Data<LandingService>,
) -> ApiResult<HttpResponse> {
    let meta = request_meta(&req, &utm);
    service.record_page_view(&meta).await?;
    let total = service.total_sign_ups().await?;
    Ok(html(views::landing_page(
        &SignUpForm::default(),
        &FieldErrors::default(),
        total,
    )))
}

/// `POST /` — record a page view, then validate and persist the submission.
///
/// Success redirects to the confirmation page; any rejection re-renders
/// the form with messages and the submitted values preserved.
#[post("/")]
pub async fn submit(
    req: HttpRequest,
    utm: web::Query<UtmQuery>,
    payload: web::Form<SignUpFormData>,
    service: web::Data<LandingService>,
) -> ApiResult<HttpResponse> {
    let meta = request_meta(&req, &utm);
    service.record_page_view(&meta).await?;

    let form = payload.into_inner().into_form();
    match service.submit(&form, &meta).await? {
        SubmissionOutcome::Accepted(_) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, "/success/"))
            .finish()),
        SubmissionOutcome::Rejected(errors) => {
            let total = service.total_sign_ups().await?;
            Ok(html(views::landing_page(&form, &errors, total)))
        }
    }
}

/// `GET /success/` — static confirmation page.
#[get("/success/")]
pub async fn success() -> HttpResponse {
    html(views::success_page())
}
