//! PostgreSQL persistence adapters built on Diesel.

mod diesel_error;
mod diesel_operator_repository;
mod diesel_page_view_repository;
mod diesel_sign_up_repository;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_operator_repository::DieselOperatorRepository;
pub use diesel_page_view_repository::DieselPageViewRepository;
pub use diesel_sign_up_repository::DieselSignUpRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
