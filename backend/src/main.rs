//! Service entry-point: tracing, configuration, migrations, HTTP server.

use actix_web::{web, App, HttpServer};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use landing_backend::api::health::{live, ready, HealthState};
#[cfg(debug_assertions)]
use landing_backend::ApiDoc;
use landing_backend::outbound::persistence::{DbPool, PoolConfig};
use landing_backend::server::{app_config, AppConfig, AppState};
use landing_backend::Trace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Bring the schema up to date before the pool starts serving requests.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = diesel::PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}

#[cfg(feature = "metrics")]
fn make_metrics() -> actix_web_prom::PrometheusMetrics {
    PrometheusMetricsBuilder::new("landing")
        .endpoint("/metrics")
        .build()
        .expect("configure Prometheus metrics")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::load();
    let key = config.session_key()?;

    run_migrations(&config.database_url)?;

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let state = AppState::from_pool(&pool);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the probes stay reachable.
    let server_health_state = health_state.clone();
    let cookie_secure = config.cookie_secure;
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .configure(app_config(state.clone(), key.clone(), cookie_secure))
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        #[cfg(feature = "metrics")]
        let app = app.wrap(make_metrics());

        app
    })
    .bind(bind_addr)?;

    info!(%bind_addr, "landing backend listening");
    health_state.mark_ready();
    server.run().await
}
