//! Diesel-backed [`SignUpRepository`] adapter.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{SignUpPersistenceError, SignUpRepository};
use crate::domain::{NewSignUp, PhoneNumber, ReviewUpdate, SignUp, SignUpListQuery, SignUpPage};

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::{NewSignUpRow, SignUpReviewChangeset, SignUpRow};
use super::pool::DbPool;
use super::schema::sign_ups;

/// PostgreSQL adapter for sign-up records.
#[derive(Clone)]
pub struct DieselSignUpRepository {
    pool: DbPool,
}

impl DieselSignUpRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection_error(error: super::pool::PoolError) -> SignUpPersistenceError {
    map_pool_error(error, SignUpPersistenceError::connection)
}

fn query_error(error: diesel::result::Error) -> SignUpPersistenceError {
    map_diesel_error(
        error,
        SignUpPersistenceError::query,
        SignUpPersistenceError::connection,
    )
}

fn insert_error(error: diesel::result::Error) -> SignUpPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            SignUpPersistenceError::DuplicatePhone
        }
        _ => query_error(error),
    }
}

/// Escape LIKE wildcards so user search text matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Apply the console filters onto a boxed query; called once for the page
/// load and once for the total count.
fn filtered(query: &SignUpListQuery) -> sign_ups::BoxedQuery<'static, Pg> {
    let mut statement = sign_ups::table.into_boxed();
    if let Some(city) = query.city {
        statement = statement.filter(sign_ups::city.eq(city.code()));
    }
    if let Some(role) = query.role {
        statement = statement.filter(sign_ups::role.eq(role.code()));
    }
    if let Some(goal) = query.fitness_goal {
        statement = statement.filter(sign_ups::fitness_goal.eq(goal.code()));
    }
    if let Some(flag) = query.is_valid {
        statement = statement.filter(sign_ups::is_valid.eq(flag));
    }
    if let Some(flag) = query.is_contacted {
        statement = statement.filter(sign_ups::is_contacted.eq(flag));
    }
    if let Some(from) = query.created_from {
        statement = statement.filter(sign_ups::created_at.ge(from));
    }
    if let Some(to) = query.created_to {
        statement = statement.filter(sign_ups::created_at.lt(to));
    }
    if let Some(needle) = &query.search {
        let pattern = like_pattern(needle);
        statement = statement.filter(
            sign_ups::full_name
                .ilike(pattern.clone())
                .nullable()
                .or(sign_ups::phone_number.ilike(pattern.clone()).nullable())
                .or(sign_ups::email.ilike(pattern)),
        );
    }
    statement
}

#[async_trait]
impl SignUpRepository for DieselSignUpRepository {
    async fn insert(&self, signup: &NewSignUp) -> Result<SignUp, SignUpPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        let row: SignUpRow = diesel::insert_into(sign_ups::table)
            .values(NewSignUpRow::from_domain(signup))
            .returning(SignUpRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(insert_error)?;
        row.into_domain()
    }

    async fn count(&self) -> Result<i64, SignUpPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        sign_ups::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn phone_exists(&self, phone: &PhoneNumber) -> Result<bool, SignUpPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        diesel::select(diesel::dsl::exists(
            sign_ups::table.filter(sign_ups::phone_number.eq(phone.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(query_error)
    }

    async fn list(&self, query: &SignUpListQuery) -> Result<SignUpPage, SignUpPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;

        let total: i64 = filtered(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)?;

        let rows: Vec<SignUpRow> = filtered(query)
            .order(sign_ups::created_at.desc())
            .offset(query.page.offset())
            .limit(query.page.limit())
            .select(SignUpRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;

        let items = rows
            .into_iter()
            .map(SignUpRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SignUpPage {
            items,
            total,
            page: query.page.number(),
            per_page: query.page.per_page(),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SignUp>, SignUpPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        let row: Option<SignUpRow> = sign_ups::table
            .find(id)
            .select(SignUpRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        row.map(SignUpRow::into_domain).transpose()
    }

    async fn update_review(
        &self,
        id: Uuid,
        changes: &ReviewUpdate,
    ) -> Result<Option<SignUp>, SignUpPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        let changeset = SignUpReviewChangeset {
            is_valid: changes.is_valid,
            is_contacted: changes.is_contacted,
            notes: changes.notes.as_deref(),
        };
        let row: Option<SignUpRow> = diesel::update(sign_ups::table.find(id))
            .set(changeset)
            .returning(SignUpRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        row.map(SignUpRow::into_domain).transpose()
    }

    async fn mark_contacted(&self, ids: &[Uuid]) -> Result<u64, SignUpPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        let affected = diesel::update(sign_ups::table.filter(sign_ups::id.eq_any(ids)))
            .set(sign_ups::is_contacted.eq(true))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(affected as u64)
    }

    async fn fetch_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SignUp>, SignUpPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        let rows: Vec<SignUpRow> = sign_ups::table
            .filter(sign_ups::id.eq_any(ids))
            .select(SignUpRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;

        let mut loaded = rows
            .into_iter()
            .map(|row| row.into_domain().map(|entity| (entity.id, entity)))
            .collect::<Result<Vec<_>, _>>()?;

        // Preserve the caller's selection order; unknown ids are skipped.
        let mut ordered = Vec::with_capacity(loaded.len());
        for id in ids {
            if let Some(position) = loaded.iter().position(|(loaded_id, _)| loaded_id == id) {
                ordered.push(loaded.swap_remove(position).1);
            }
        }
        Ok(ordered)
    }

    async fn delete(&self, ids: &[Uuid]) -> Result<u64, SignUpPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        let removed = diesel::delete(sign_ups::table.filter(sign_ups::id.eq_any(ids)))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unique_violation_maps_to_duplicate_phone() {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        );
        assert_eq!(insert_error(error), SignUpPersistenceError::DuplicatePhone);
    }

    #[rstest]
    fn other_database_errors_stay_query_errors() {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("fk".to_owned()),
        );
        assert!(matches!(
            insert_error(error),
            SignUpPersistenceError::Query { .. }
        ));
    }

    #[rstest]
    #[case("ali", "%ali%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_patterns_escape_wildcards(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(needle), expected);
    }
}
