//! Application assembly: state construction and route registration.

pub mod config;

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Key, SameSite};
use actix_web::web;

use crate::api;
use crate::domain::ports::{OperatorRepository, PageViewRepository, SignUpRepository};
use crate::domain::{AdminService, AuthService, LandingService};
use crate::outbound::persistence::{
    DbPool, DieselOperatorRepository, DieselPageViewRepository, DieselSignUpRepository,
};

pub use config::AppConfig;

/// Domain services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    /// Public landing flow.
    pub landing: LandingService,
    /// Staff console operations.
    pub admin: AdminService,
    /// Operator authentication.
    pub auth: AuthService,
}

impl AppState {
    /// Wire the services onto the PostgreSQL adapters.
    pub fn from_pool(pool: &DbPool) -> Self {
        let sign_ups: Arc<dyn SignUpRepository> =
            Arc::new(DieselSignUpRepository::new(pool.clone()));
        let page_views: Arc<dyn PageViewRepository> =
            Arc::new(DieselPageViewRepository::new(pool.clone()));
        let operators: Arc<dyn OperatorRepository> =
            Arc::new(DieselOperatorRepository::new(pool.clone()));
        Self::from_repositories(sign_ups, page_views, operators)
    }

    /// Wire the services onto arbitrary port implementations.
    ///
    /// Integration tests use this with the in-memory repositories.
    pub fn from_repositories(
        sign_ups: Arc<dyn SignUpRepository>,
        page_views: Arc<dyn PageViewRepository>,
        operators: Arc<dyn OperatorRepository>,
    ) -> Self {
        Self {
            landing: LandingService::new(sign_ups.clone(), page_views.clone()),
            admin: AdminService::new(sign_ups, page_views),
            auth: AuthService::new(operators),
        }
    }
}

fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Route registration shared by the binary and the tests.
///
/// Returns a closure for `App::configure`; the session middleware is
/// scoped to `/api/v1` so the public pages stay cookie-free.
pub fn app_config(
    state: AppState,
    key: Key,
    cookie_secure: bool,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let session = session_middleware(key, cookie_secure);
        cfg.app_data(web::Data::new(state.landing))
            .app_data(web::Data::new(state.admin))
            .app_data(web::Data::new(state.auth))
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(api::auth::login)
                    .service(api::auth::logout)
                    .service(api::admin::list_sign_ups)
                    .service(api::admin::update_sign_up_review)
                    .service(api::admin::mark_contacted)
                    .service(api::admin::export_sign_ups)
                    .service(api::admin::delete_sign_ups)
                    .service(api::admin::list_page_views),
            )
            .service(api::landing::landing)
            .service(api::landing::submit)
            .service(api::landing::success);
    }
}
