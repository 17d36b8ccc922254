//! Append-only page-view analytics records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::signup::{RequestMeta, UtmTags};

/// A persisted landing-page view.
///
/// Exactly one row exists per landing-page request, regardless of whether a
/// submission on that request succeeded. Rows are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    /// Primary key, assigned at creation.
    pub id: Uuid,
    /// Visit instant, immutable, newest-first default ordering.
    pub visited_at: DateTime<Utc>,
    /// Client address captured at creation.
    pub ip_address: Option<String>,
    /// User agent captured at creation.
    pub user_agent: String,
    /// `Referer` header captured at creation.
    pub referrer: String,
    /// Campaign tags captured at creation.
    pub utm: UtmTags,
}

/// A page view about to be persisted; `visited_at` takes its storage default.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPageView {
    /// Pre-assigned primary key.
    pub id: Uuid,
    /// Client address.
    pub ip_address: Option<String>,
    /// User agent.
    pub user_agent: String,
    /// `Referer` header.
    pub referrer: String,
    /// Campaign tags.
    pub utm: UtmTags,
}

impl NewPageView {
    /// Capture a page view from request metadata.
    pub fn from_meta(meta: &RequestMeta) -> Self {
        Self {
            id: Uuid::new_v4(),
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
            referrer: meta.referrer.clone(),
            utm: meta.utm.clone(),
        }
    }
}
