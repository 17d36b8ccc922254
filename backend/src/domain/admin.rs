//! Administrative console operations over stored records.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::auth::Operator;
use super::error::DomainError;
use super::export;
use super::listing::{
    PageViewListQuery, PageViewPage, ReviewUpdate, SignUpListQuery, SignUpPage,
};
use super::ports::{
    PageViewPersistenceError, PageViewRepository, SignUpPersistenceError, SignUpRepository,
};
use super::signup::SignUp;

fn map_sign_up_error(error: SignUpPersistenceError) -> DomainError {
    match error {
        SignUpPersistenceError::Connection { message } => {
            DomainError::service_unavailable(message)
        }
        SignUpPersistenceError::Query { message } => DomainError::internal(message),
        SignUpPersistenceError::DuplicatePhone => {
            DomainError::internal("unexpected duplicate phone during console operation")
        }
    }
}

fn map_page_view_error(error: PageViewPersistenceError) -> DomainError {
    match error {
        PageViewPersistenceError::Connection { message } => {
            DomainError::service_unavailable(message)
        }
        PageViewPersistenceError::Query { message } => DomainError::internal(message),
    }
}

/// Staff-facing operations: list, review, bulk actions, export, deletion.
///
/// Authentication happens at the HTTP boundary; the one permission rule the
/// domain owns is that deletion requires a superuser.
#[derive(Clone)]
pub struct AdminService {
    sign_ups: Arc<dyn SignUpRepository>,
    page_views: Arc<dyn PageViewRepository>,
}

impl AdminService {
    /// Create the service over its two storage ports.
    pub fn new(
        sign_ups: Arc<dyn SignUpRepository>,
        page_views: Arc<dyn PageViewRepository>,
    ) -> Self {
        Self {
            sign_ups,
            page_views,
        }
    }

    /// Filtered, paginated sign-up listing, newest first.
    pub async fn list_sign_ups(&self, query: &SignUpListQuery) -> Result<SignUpPage, DomainError> {
        self.sign_ups.list(query).await.map_err(map_sign_up_error)
    }

    /// Inline edit of the review fields on one record.
    pub async fn update_review(
        &self,
        id: Uuid,
        changes: &ReviewUpdate,
    ) -> Result<SignUp, DomainError> {
        if changes.is_empty() {
            return Err(DomainError::invalid_request("no review fields to update"));
        }
        self.sign_ups
            .update_review(id, changes)
            .await
            .map_err(map_sign_up_error)?
            .ok_or_else(|| DomainError::not_found(format!("no sign-up with id {id}")))
    }

    /// Bulk action: mark every selected record as contacted.
    pub async fn mark_contacted(&self, ids: &[Uuid]) -> Result<u64, DomainError> {
        let affected = self
            .sign_ups
            .mark_contacted(ids)
            .await
            .map_err(map_sign_up_error)?;
        info!(affected, "marked sign-ups as contacted");
        Ok(affected)
    }

    /// Bulk action: render the selected records as the `signups.csv` payload.
    pub async fn export_csv(&self, ids: &[Uuid]) -> Result<Vec<u8>, DomainError> {
        let records = self
            .sign_ups
            .fetch_by_ids(ids)
            .await
            .map_err(map_sign_up_error)?;
        Ok(export::sign_ups_csv(&records))
    }

    /// Bulk delete, gated to superusers.
    pub async fn delete_sign_ups(
        &self,
        operator: &Operator,
        ids: &[Uuid],
    ) -> Result<u64, DomainError> {
        if !operator.is_superuser {
            return Err(DomainError::forbidden(
                "record deletion requires a superuser",
            ));
        }
        let removed = self
            .sign_ups
            .delete(ids)
            .await
            .map_err(map_sign_up_error)?;
        info!(removed, operator = %operator.username, "deleted sign-ups");
        Ok(removed)
    }

    /// Filtered, paginated page-view listing; strictly read-only.
    pub async fn list_page_views(
        &self,
        query: &PageViewListQuery,
    ) -> Result<PageViewPage, DomainError> {
        self.page_views
            .list(query)
            .await
            .map_err(map_page_view_error)
    }
}
