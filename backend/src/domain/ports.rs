//! Domain ports for driven adapters.
//!
//! Each repository trait exposes a typed error enum so adapters map their
//! failures into predictable variants instead of returning opaque strings.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::auth::OperatorRecord;
use super::listing::{PageViewListQuery, PageViewPage, ReviewUpdate, SignUpListQuery, SignUpPage};
use super::page_view::{NewPageView, PageView};
use super::phone::PhoneNumber;
use super::signup::{NewSignUp, SignUp};

/// Persistence failures raised by [`SignUpRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignUpPersistenceError {
    /// Repository connection could not be established.
    #[error("sign-up repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("sign-up repository query failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The storage-level unique constraint on `phone_number` fired.
    ///
    /// Raised when a concurrent submission commits the same number between
    /// the application-level existence check and the insert.
    #[error("phone number is already registered")]
    DuplicatePhone,
}

impl SignUpPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence failures raised by [`PageViewRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageViewPersistenceError {
    /// Repository connection could not be established.
    #[error("page-view repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("page-view repository query failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl PageViewPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence failures raised by [`OperatorRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorPersistenceError {
    /// Repository connection could not be established.
    #[error("operator repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Query failed during execution.
    #[error("operator repository query failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl OperatorPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence port for sign-up records.
#[async_trait]
pub trait SignUpRepository: Send + Sync {
    /// Persist a new sign-up, returning the stored row.
    ///
    /// Must surface a storage-level unique violation on the phone number as
    /// [`SignUpPersistenceError::DuplicatePhone`].
    async fn insert(&self, signup: &NewSignUp) -> Result<SignUp, SignUpPersistenceError>;

    /// Total number of stored sign-ups.
    async fn count(&self) -> Result<i64, SignUpPersistenceError>;

    /// Whether a row already holds this normalised number.
    async fn phone_exists(&self, phone: &PhoneNumber) -> Result<bool, SignUpPersistenceError>;

    /// Filtered, paginated listing, newest first.
    async fn list(&self, query: &SignUpListQuery) -> Result<SignUpPage, SignUpPersistenceError>;

    /// Fetch one record by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SignUp>, SignUpPersistenceError>;

    /// Apply operator review changes to one record, returning the updated
    /// row or `None` when the id is unknown.
    async fn update_review(
        &self,
        id: Uuid,
        changes: &ReviewUpdate,
    ) -> Result<Option<SignUp>, SignUpPersistenceError>;

    /// Set `is_contacted` on every listed id, returning the count affected.
    async fn mark_contacted(&self, ids: &[Uuid]) -> Result<u64, SignUpPersistenceError>;

    /// Fetch the listed records, preserving the requested id order and
    /// skipping unknown ids.
    async fn fetch_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SignUp>, SignUpPersistenceError>;

    /// Delete the listed records, returning the count removed.
    async fn delete(&self, ids: &[Uuid]) -> Result<u64, SignUpPersistenceError>;
}

/// Persistence port for the append-only page-view stream.
///
/// Deliberately has no update or delete operations.
#[async_trait]
pub trait PageViewRepository: Send + Sync {
    /// Append one page view, returning the stored row.
    async fn insert(&self, view: &NewPageView) -> Result<PageView, PageViewPersistenceError>;

    /// Filtered, paginated listing, newest first.
    async fn list(
        &self,
        query: &PageViewListQuery,
    ) -> Result<PageViewPage, PageViewPersistenceError>;
}

/// Persistence port for staff operator lookups.
#[async_trait]
pub trait OperatorRepository: Send + Sync {
    /// Fetch one operator by login name.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<OperatorRecord>, OperatorPersistenceError>;
}
