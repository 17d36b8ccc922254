//! Backend for a fitness application's pre-launch landing page.
//!
//! Public sign-up flow, append-only page-view analytics, and a staff
//! console over both, laid out hexagonally: `domain` at the centre,
//! `outbound` persistence adapters, and the `api` HTTP surface.

pub mod api;
pub mod doc;
pub mod domain;
pub mod middleware;
pub mod outbound;
pub mod server;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Trace-id middleware attached to every request.
pub use middleware::Trace;
