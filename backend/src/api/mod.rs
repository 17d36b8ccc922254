//! HTTP adapters: public landing pages, the console JSON surface, probes,
//! and the shared error envelope.

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod landing;
pub mod views;

pub use error::{ApiError, ApiResult};
