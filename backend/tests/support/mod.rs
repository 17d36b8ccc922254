//! Shared fixtures for the HTTP integration tests.

use std::sync::Arc;

use landing_backend::domain::SignUp;
use landing_backend::server::AppState;
use landing_backend::test_support::{
    seeded_operator, MemoryOperatorRepository, MemoryPageViewRepository, MemorySignUpRepository,
};

/// Staff operator credentials seeded into every test app.
pub const STAFF: (&str, &str) = ("staff", "staff-secret");
/// Superuser credentials seeded into every test app.
pub const SUPERUSER: (&str, &str) = ("root", "root-secret");

/// Repository handles kept by tests for direct state assertions.
pub struct TestRepos {
    pub sign_ups: Arc<MemorySignUpRepository>,
    pub page_views: Arc<MemoryPageViewRepository>,
}

/// Build the application state over in-memory repositories, pre-seeded
/// with the given sign-up records and the two fixture operators.
pub fn seeded_state(records: Vec<SignUp>) -> (AppState, TestRepos) {
    let sign_ups = Arc::new(MemorySignUpRepository::with_records(records));
    let page_views = Arc::new(MemoryPageViewRepository::default());
    let operators = Arc::new(MemoryOperatorRepository::with_operators(vec![
        seeded_operator(STAFF.0, STAFF.1, false),
        seeded_operator(SUPERUSER.0, SUPERUSER.1, true),
    ]));
    let state = AppState::from_repositories(sign_ups.clone(), page_views.clone(), operators);
    (
        state,
        TestRepos {
            sign_ups,
            page_views,
        },
    )
}
