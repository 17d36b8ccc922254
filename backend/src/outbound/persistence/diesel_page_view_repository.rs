//! Diesel-backed [`PageViewRepository`] adapter.
//!
//! Mirrors the append-only contract: the only mutation is the insert, and
//! listings never lock or touch stored rows.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PageViewPersistenceError, PageViewRepository};
use crate::domain::{NewPageView, PageView, PageViewListQuery, PageViewPage};

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::{NewPageViewRow, PageViewRow};
use super::pool::DbPool;
use super::schema::page_views;

/// PostgreSQL adapter for the page-view stream.
#[derive(Clone)]
pub struct DieselPageViewRepository {
    pool: DbPool,
}

impl DieselPageViewRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn connection_error(error: super::pool::PoolError) -> PageViewPersistenceError {
    map_pool_error(error, PageViewPersistenceError::connection)
}

fn query_error(error: diesel::result::Error) -> PageViewPersistenceError {
    map_diesel_error(
        error,
        PageViewPersistenceError::query,
        PageViewPersistenceError::connection,
    )
}

fn filtered(query: &PageViewListQuery) -> page_views::BoxedQuery<'static, Pg> {
    let mut statement = page_views::table.into_boxed();
    if let Some(from) = query.visited_from {
        statement = statement.filter(page_views::visited_at.ge(from));
    }
    if let Some(to) = query.visited_to {
        statement = statement.filter(page_views::visited_at.lt(to));
    }
    if let Some(source) = &query.utm_source {
        statement = statement.filter(page_views::utm_source.eq(source.clone()));
    }
    if let Some(medium) = &query.utm_medium {
        statement = statement.filter(page_views::utm_medium.eq(medium.clone()));
    }
    statement
}

#[async_trait]
impl PageViewRepository for DieselPageViewRepository {
    async fn insert(&self, view: &NewPageView) -> Result<PageView, PageViewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;
        let row: PageViewRow = diesel::insert_into(page_views::table)
            .values(NewPageViewRow::from_domain(view))
            .returning(PageViewRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(row.into_domain())
    }

    async fn list(
        &self,
        query: &PageViewListQuery,
    ) -> Result<PageViewPage, PageViewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(connection_error)?;

        let total: i64 = filtered(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)?;

        let rows: Vec<PageViewRow> = filtered(query)
            .order(page_views::visited_at.desc())
            .offset(query.page.offset())
            .limit(query.page.limit())
            .select(PageViewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;

        Ok(PageViewPage {
            items: rows.into_iter().map(PageViewRow::into_domain).collect(),
            total,
            page: query.page.number(),
            per_page: query.page.per_page(),
        })
    }
}
