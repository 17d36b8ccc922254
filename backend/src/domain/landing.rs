//! The public landing flow: analytics capture plus the submit pipeline.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::error::DomainError;
use super::page_view::NewPageView;
use super::ports::{
    PageViewPersistenceError, PageViewRepository, SignUpPersistenceError, SignUpRepository,
};
use super::signup::{NewSignUp, RequestMeta, SignUp};
use super::validation::{self, FieldErrors, FormField, SignUpForm, MSG_DUPLICATE_PHONE};

/// Outcome of a submission attempt that reached the pipeline.
///
/// Infrastructure failures are reported separately as [`DomainError`];
/// a rejection here always means field-level validation messages.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The sign-up was persisted.
    Accepted(Box<SignUp>),
    /// Validation failed; no row was created.
    Rejected(FieldErrors),
}

/// Orchestrates page-view capture, validation, and sign-up persistence.
#[derive(Clone)]
pub struct LandingService {
    sign_ups: Arc<dyn SignUpRepository>,
    page_views: Arc<dyn PageViewRepository>,
}

fn map_sign_up_error(error: SignUpPersistenceError) -> DomainError {
    match error {
        SignUpPersistenceError::Connection { message } => {
            DomainError::service_unavailable(message)
        }
        SignUpPersistenceError::Query { message } => DomainError::internal(message),
        // The duplicate variant is handled inside submit; reaching here from
        // any other operation is an adapter bug.
        SignUpPersistenceError::DuplicatePhone => {
            DomainError::internal("unexpected duplicate phone outside submission")
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

impl LandingService {
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

    /// Append one page-view row for the current request.
    ///
    /// Called on every landing request, before the method split, so a row
    /// exists regardless of submission outcome.
    pub async fn record_page_view(&self, meta: &RequestMeta) -> Result<(), DomainError> {
        self.page_views
            .insert(&NewPageView::from_meta(meta))
            .await
            .map(|_| ())
            .map_err(map_page_view_error)
    }

    /// Total sign-ups stored so far, shown on the landing page.
    pub async fn total_sign_ups(&self) -> Result<i64, DomainError> {
        self.sign_ups.count().await.map_err(map_sign_up_error)
    }

    /// Validate and persist a submission.
    ///
    /// The pre-insert existence check keeps the common duplicate path on a
    /// friendly message; a unique violation racing past it is mapped onto
    /// the same message rather than surfacing as a fault.
    pub async fn submit(
        &self,
        form: &SignUpForm,
        meta: &RequestMeta,
    ) -> Result<SubmissionOutcome, DomainError> {
        let draft = match validation::validate(form) {
            Ok(draft) => draft,
            Err(errors) => return Ok(SubmissionOutcome::Rejected(errors)),
        };

        let taken = self
            .sign_ups
            .phone_exists(&draft.phone_number)
            .await
            .map_err(map_sign_up_error)?;
        if taken {
            return Ok(SubmissionOutcome::Rejected(FieldErrors::single(
                FormField::PhoneNumber,
                MSG_DUPLICATE_PHONE,
            )));
        }

        let new_sign_up = NewSignUp {
            id: Uuid::new_v4(),
            full_name: draft.full_name,
            phone_number: draft.phone_number,
            email: draft.email,
            city: draft.city,
            fitness_goal: draft.fitness_goal,
            role: draft.role,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
            utm: meta.utm.clone(),
        };

        match self.sign_ups.insert(&new_sign_up).await {
            Ok(stored) => {
                info!(signup_id = %stored.id, city = %stored.city, "sign-up stored");
                Ok(SubmissionOutcome::Accepted(Box::new(stored)))
            }
            Err(SignUpPersistenceError::DuplicatePhone) => Ok(SubmissionOutcome::Rejected(
                FieldErrors::single(FormField::PhoneNumber, MSG_DUPLICATE_PHONE),
            )),
            Err(other) => Err(map_sign_up_error(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{City, FitnessGoal, Role, UtmTags};
    use crate::test_support::{MemoryPageViewRepository, MemorySignUpRepository};
    use async_trait::async_trait;
    use rstest::{fixture, rstest};

    use crate::domain::listing::{ReviewUpdate, SignUpListQuery, SignUpPage};
    use crate::domain::phone::PhoneNumber;

    #[fixture]
    fn form() -> SignUpForm {
        SignUpForm {
            full_name: "Ali Rezaei".to_owned(),
            phone_number: "09123456789".to_owned(),
            email: String::new(),
            city: "TEHRAN".to_owned(),
            fitness_goal: "WEIGHT_LOSS".to_owned(),
            role: "USER".to_owned(),
            consent: true,
        }
    }

    #[fixture]
    fn meta() -> RequestMeta {
        RequestMeta {
            ip_address: Some("203.0.113.7".to_owned()),
            user_agent: "Mozilla/5.0".to_owned(),
            referrer: String::new(),
            utm: UtmTags {
                source: "instagram".to_owned(),
                medium: "social".to_owned(),
                campaign: "launch".to_owned(),
            },
        }
    }

    fn service() -> (
        LandingService,
        Arc<MemorySignUpRepository>,
        Arc<MemoryPageViewRepository>,
    ) {
        let sign_ups = Arc::new(MemorySignUpRepository::default());
        let page_views = Arc::new(MemoryPageViewRepository::default());
        (
            LandingService::new(sign_ups.clone(), page_views.clone()),
            sign_ups,
            page_views,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn accepted_submission_stamps_request_metadata(form: SignUpForm, meta: RequestMeta) {
        let (landing, sign_ups, _) = service();

        let outcome = landing.submit(&form, &meta).await.expect("no infra failure");

        let SubmissionOutcome::Accepted(stored) = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_eq!(stored.full_name, "Ali Rezaei");
        assert_eq!(stored.phone_number.as_str(), "09123456789");
        assert_eq!(stored.city, City::Tehran);
        assert_eq!(stored.fitness_goal, FitnessGoal::WeightLoss);
        assert_eq!(stored.role, Role::User);
        assert!(stored.consent);
        assert!(stored.is_valid);
        assert!(!stored.is_contacted);
        assert_eq!(stored.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(stored.utm.source, "instagram");
        assert_eq!(sign_ups.count().await.expect("count"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_submission_creates_no_row(mut form: SignUpForm, meta: RequestMeta) {
        let (landing, sign_ups, _) = service();
        form.consent = false;

        let outcome = landing.submit(&form, &meta).await.expect("no infra failure");

        assert!(matches!(outcome, SubmissionOutcome::Rejected(_)));
        assert_eq!(sign_ups.count().await.expect("count"), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn second_submission_with_same_phone_is_rejected(form: SignUpForm, meta: RequestMeta) {
        let (landing, sign_ups, _) = service();

        let first = landing.submit(&form, &meta).await.expect("no infra failure");
        assert!(matches!(first, SubmissionOutcome::Accepted(_)));

        let mut resubmission = form.clone();
        resubmission.full_name = "Someone Else".to_owned();
        let second = landing
            .submit(&resubmission, &meta)
            .await
            .expect("no infra failure");

        let SubmissionOutcome::Rejected(errors) = second else {
            panic!("expected rejection, got {second:?}");
        };
        assert_eq!(
            errors.get(FormField::PhoneNumber),
            Some(MSG_DUPLICATE_PHONE)
        );
        assert_eq!(sign_ups.count().await.expect("count"), 1);
    }

    /// Repository that passes the existence check but raises the unique
    /// violation on insert, emulating a race between two submissions.
    struct RacingSignUps {
        inner: MemorySignUpRepository,
    }

    #[async_trait]
    impl SignUpRepository for RacingSignUps {
        async fn insert(&self, _signup: &NewSignUp) -> Result<SignUp, SignUpPersistenceError> {
            Err(SignUpPersistenceError::DuplicatePhone)
        }

        async fn count(&self) -> Result<i64, SignUpPersistenceError> {
            self.inner.count().await
        }

        async fn phone_exists(
            &self,
            _phone: &PhoneNumber,
        ) -> Result<bool, SignUpPersistenceError> {
            Ok(false)
        }

        async fn list(
            &self,
            query: &SignUpListQuery,
        ) -> Result<SignUpPage, SignUpPersistenceError> {
            self.inner.list(query).await
        }

        async fn find_by_id(
            &self,
            id: uuid::Uuid,
        ) -> Result<Option<SignUp>, SignUpPersistenceError> {
            self.inner.find_by_id(id).await
        }

        async fn update_review(
            &self,
            id: uuid::Uuid,
            changes: &ReviewUpdate,
        ) -> Result<Option<SignUp>, SignUpPersistenceError> {
            self.inner.update_review(id, changes).await
        }

        async fn mark_contacted(&self, ids: &[uuid::Uuid]) -> Result<u64, SignUpPersistenceError> {
            self.inner.mark_contacted(ids).await
        }

        async fn fetch_by_ids(
            &self,
            ids: &[uuid::Uuid],
        ) -> Result<Vec<SignUp>, SignUpPersistenceError> {
            self.inner.fetch_by_ids(ids).await
        }

        async fn delete(&self, ids: &[uuid::Uuid]) -> Result<u64, SignUpPersistenceError> {
            self.inner.delete(ids).await
        }
    }

    #[rstest]
    #[tokio::test]
    async fn storage_unique_violation_becomes_duplicate_message(
        form: SignUpForm,
        meta: RequestMeta,
    ) {
        let landing = LandingService::new(
            Arc::new(RacingSignUps {
                inner: MemorySignUpRepository::default(),
            }),
            Arc::new(MemoryPageViewRepository::default()),
        );

        let outcome = landing.submit(&form, &meta).await.expect("no infra failure");

        let SubmissionOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(
            errors.get(FormField::PhoneNumber),
            Some(MSG_DUPLICATE_PHONE)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn page_views_capture_request_metadata(meta: RequestMeta) {
        let (landing, _, page_views) = service();

        landing.record_page_view(&meta).await.expect("insert works");
        landing.record_page_view(&meta).await.expect("insert works");

        assert_eq!(page_views.len(), 2);
        let stored = page_views.latest().expect("row exists");
        assert_eq!(stored.utm.source, "instagram");
        assert_eq!(stored.ip_address.as_deref(), Some("203.0.113.7"));
    }
}
