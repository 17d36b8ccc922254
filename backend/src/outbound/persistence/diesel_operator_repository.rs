//! Diesel-backed [`OperatorRepository`] adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OperatorPersistenceError, OperatorRepository};
use crate::domain::OperatorRecord;

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::OperatorRow;
use super::pool::DbPool;
use super::schema::operators;

/// PostgreSQL adapter for staff operator lookups.
#[derive(Clone)]
pub struct DieselOperatorRepository {
    pool: DbPool,
}

impl DieselOperatorRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection_error(error: super::pool::PoolError) -> OperatorPersistenceError {
    map_pool_error(error, OperatorPersistenceError::connection)
}

fn query_error(error: diesel::result::Error) -> OperatorPersistenceError {
    map_diesel_error(
        error,
        OperatorPersistenceError::query,
        OperatorPersistenceError::connection,
    )
}

#[async_trait]
impl OperatorRepository for DieselOperatorRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<OperatorRecord>, OperatorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        let row: Option<OperatorRow> = operators::table
            .filter(operators::username.eq(username))
            .select(OperatorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(OperatorRow::into_domain))
    }
}
