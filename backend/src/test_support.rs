//! In-memory port implementations for unit and integration tests.
//!
//! These repositories mirror the storage semantics the Diesel adapters rely
//! on — phone uniqueness, newest-first ordering, conjunctive filters — so
//! the services and HTTP surface can be exercised without PostgreSQL.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    OperatorPersistenceError, OperatorRepository, PageViewPersistenceError, PageViewRepository,
    SignUpPersistenceError, SignUpRepository,
};
use crate::domain::{
    City, FitnessGoal, NewPageView, NewSignUp, OperatorRecord, PageView, PageViewListQuery,
    PageViewPage, PasswordDigest, PhoneNumber, ReviewUpdate, Role, SignUp, SignUpListQuery,
    SignUpPage, UtmTags,
};

static CLOCK_TICKS: AtomicI64 = AtomicI64::new(0);

/// Deterministic, strictly increasing timestamps for stored rows.
fn next_instant() -> DateTime<Utc> {
    let tick = CLOCK_TICKS.fetch_add(1, Ordering::Relaxed);
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
        + Duration::seconds(tick)
}

/// A stored sign-up with plausible defaults for tests.
pub fn seeded_sign_up(full_name: &str, phone: &str) -> SignUp {
    SignUp {
        id: Uuid::new_v4(),
        full_name: full_name.to_owned(),
        phone_number: PhoneNumber::parse(phone).expect("seeded phone must be valid"),
        email: None,
        city: City::Tehran,
        fitness_goal: FitnessGoal::GeneralFitness,
        role: Role::User,
        consent: true,
        created_at: next_instant(),
        ip_address: None,
        user_agent: String::new(),
        utm: UtmTags::default(),
        is_valid: true,
        is_contacted: false,
        notes: String::new(),
    }
}

/// A seeded operator record for login tests.
pub fn seeded_operator(username: &str, password: &str, is_superuser: bool) -> OperatorRecord {
    OperatorRecord {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        password_digest: PasswordDigest::from_password(password),
        is_superuser,
    }
}

/// In-memory [`SignUpRepository`] enforcing phone uniqueness.
#[derive(Default)]
pub struct MemorySignUpRepository {
    records: Mutex<Vec<SignUp>>,
}

impl MemorySignUpRepository {
    /// Start with pre-existing records.
    pub fn with_records(records: Vec<SignUp>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Copy of the current store, unfiltered.
    pub fn snapshot(&self) -> Vec<SignUp> {
        self.records.lock().expect("sign-up store poisoned").clone()
    }
}

fn matches_search(record: &SignUp, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    record.full_name.to_lowercase().contains(&needle)
        || record.phone_number.as_str().contains(&needle)
        || record
            .email
            .as_deref()
            .is_some_and(|email| email.to_lowercase().contains(&needle))
}

fn matches_query(record: &SignUp, query: &SignUpListQuery) -> bool {
    query.city.is_none_or(|city| record.city == city)
        && query.role.is_none_or(|role| record.role == role)
        && query
            .fitness_goal
            .is_none_or(|goal| record.fitness_goal == goal)
        && query.is_valid.is_none_or(|flag| record.is_valid == flag)
        && query
            .is_contacted
            .is_none_or(|flag| record.is_contacted == flag)
        && query
            .created_from
            .is_none_or(|from| record.created_at >= from)
        && query.created_to.is_none_or(|to| record.created_at < to)
        && query
            .search
            .as_deref()
            .is_none_or(|needle| matches_search(record, needle))
}

fn page_slice<T: Clone>(items: &[T], offset: i64, limit: i64) -> Vec<T> {
    items
        .iter()
        .skip(usize::try_from(offset).unwrap_or(0))
        .take(usize::try_from(limit).unwrap_or(0))
        .cloned()
        .collect()
}

#[async_trait]
impl SignUpRepository for MemorySignUpRepository {
    async fn insert(&self, signup: &NewSignUp) -> Result<SignUp, SignUpPersistenceError> {
        let mut records = self.records.lock().expect("sign-up store poisoned");
        if records
            .iter()
            .any(|existing| existing.phone_number == signup.phone_number)
        {
            return Err(SignUpPersistenceError::DuplicatePhone);
        }
        let stored = SignUp {
            id: signup.id,
            full_name: signup.full_name.clone(),
            phone_number: signup.phone_number.clone(),
            email: signup.email.clone(),
            city: signup.city,
            fitness_goal: signup.fitness_goal,
            role: signup.role,
            consent: true,
            created_at: next_instant(),
            ip_address: signup.ip_address.clone(),
            user_agent: signup.user_agent.clone(),
            utm: signup.utm.clone(),
            is_valid: true,
            is_contacted: false,
            notes: String::new(),
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn count(&self) -> Result<i64, SignUpPersistenceError> {
        let records = self.records.lock().expect("sign-up store poisoned");
        Ok(records.len() as i64)
    }

    async fn phone_exists(&self, phone: &PhoneNumber) -> Result<bool, SignUpPersistenceError> {
        let records = self.records.lock().expect("sign-up store poisoned");
        Ok(records.iter().any(|record| record.phone_number == *phone))
    }

    async fn list(&self, query: &SignUpListQuery) -> Result<SignUpPage, SignUpPersistenceError> {
        let records = self.records.lock().expect("sign-up store poisoned");
        let mut matching: Vec<SignUp> = records
            .iter()
            .filter(|record| matches_query(record, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let items = page_slice(&matching, query.page.offset(), query.page.limit());
        Ok(SignUpPage {
            items,
            total,
            page: query.page.number(),
            per_page: query.page.per_page(),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SignUp>, SignUpPersistenceError> {
        let records = self.records.lock().expect("sign-up store poisoned");
        Ok(records.iter().find(|record| record.id == id).cloned())
    }

    async fn update_review(
        &self,
        id: Uuid,
        changes: &ReviewUpdate,
    ) -> Result<Option<SignUp>, SignUpPersistenceError> {
        let mut records = self.records.lock().expect("sign-up store poisoned");
        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(is_valid) = changes.is_valid {
            record.is_valid = is_valid;
        }
        if let Some(is_contacted) = changes.is_contacted {
            record.is_contacted = is_contacted;
        }
        if let Some(notes) = &changes.notes {
            record.notes = notes.clone();
        }
        Ok(Some(record.clone()))
    }

    async fn mark_contacted(&self, ids: &[Uuid]) -> Result<u64, SignUpPersistenceError> {
        let mut records = self.records.lock().expect("sign-up store poisoned");
        let mut affected = 0;
        for record in records.iter_mut() {
            if ids.contains(&record.id) {
                record.is_contacted = true;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn fetch_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SignUp>, SignUpPersistenceError> {
        let records = self.records.lock().expect("sign-up store poisoned");
        Ok(ids
            .iter()
            .filter_map(|id| records.iter().find(|record| record.id == *id).cloned())
            .collect())
    }

    async fn delete(&self, ids: &[Uuid]) -> Result<u64, SignUpPersistenceError> {
        let mut records = self.records.lock().expect("sign-up store poisoned");
        let before = records.len();
        records.retain(|record| !ids.contains(&record.id));
        Ok((before - records.len()) as u64)
    }
}

/// In-memory append-only [`PageViewRepository`].
#[derive(Default)]
pub struct MemoryPageViewRepository {
    records: Mutex<Vec<PageView>>,
}

impl MemoryPageViewRepository {
    /// Number of stored views.
    pub fn len(&self) -> usize {
        self.records.lock().expect("page-view store poisoned").len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recently appended view, if any.
    pub fn latest(&self) -> Option<PageView> {
        self.records
            .lock()
            .expect("page-view store poisoned")
            .last()
            .cloned()
    }
}

fn matches_view_query(record: &PageView, query: &PageViewListQuery) -> bool {
    query
        .visited_from
        .is_none_or(|from| record.visited_at >= from)
        && query.visited_to.is_none_or(|to| record.visited_at < to)
        && query
            .utm_source
            .as_deref()
            .is_none_or(|source| record.utm.source == source)
        && query
            .utm_medium
            .as_deref()
            .is_none_or(|medium| record.utm.medium == medium)
}

#[async_trait]
impl PageViewRepository for MemoryPageViewRepository {
    async fn insert(&self, view: &NewPageView) -> Result<PageView, PageViewPersistenceError> {
        let stored = PageView {
            id: view.id,
            visited_at: next_instant(),
            ip_address: view.ip_address.clone(),
            user_agent: view.user_agent.clone(),
            referrer: view.referrer.clone(),
            utm: view.utm.clone(),
        };
        self.records
            .lock()
            .expect("page-view store poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    async fn list(
        &self,
        query: &PageViewListQuery,
    ) -> Result<PageViewPage, PageViewPersistenceError> {
        let records = self.records.lock().expect("page-view store poisoned");
        let mut matching: Vec<PageView> = records
            .iter()
            .filter(|record| matches_view_query(record, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.visited_at.cmp(&a.visited_at));
        let total = matching.len() as i64;
        let items = page_slice(&matching, query.page.offset(), query.page.limit());
        Ok(PageViewPage {
            items,
            total,
            page: query.page.number(),
            per_page: query.page.per_page(),
        })
    }
}

/// In-memory [`OperatorRepository`] seeded with fixed operators.
#[derive(Default)]
pub struct MemoryOperatorRepository {
    operators: Vec<OperatorRecord>,
}

impl MemoryOperatorRepository {
    /// Start with the given operator records.
    pub fn with_operators(operators: Vec<OperatorRecord>) -> Self {
        Self { operators }
    }
}

#[async_trait]
impl OperatorRepository for MemoryOperatorRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<OperatorRecord>, OperatorPersistenceError> {
        Ok(self
            .operators
            .iter()
            .find(|operator| operator.username == username)
            .cloned())
    }
}
